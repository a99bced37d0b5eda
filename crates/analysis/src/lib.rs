//! Statistical comparison for the promotion analysis pipeline.
//!
//! This crate provides:
//! - Student's t critical values and two-sided p-values
//! - Pooled and Welch two-sample t-tests
//! - Per-period summary statistics with confidence intervals
//! - The end-to-end clean, segment, aggregate, compare pipeline

pub mod ttest;
pub mod comparator;
pub mod pipeline;

pub use ttest::{t_critical, two_sample_t_test, TTestResult};
pub use comparator::{summarize, Comparator};
pub use pipeline::{AnalysisReport, PeriodOrders, PromotionAnalysis};
