//! Order-level features for the promotion analysis pipeline.
//!
//! This crate handles:
//! - Aggregating cleaned lines into per-order totals
//! - Descriptive statistics over order totals
//! - Order-value histograms for the visualization layer

pub mod aggregator;
pub mod descriptive;
pub mod histogram;

pub use aggregator::{aggregate, OrderAggregator};
pub use descriptive::Descriptive;
pub use histogram::{HistogramBin, OrderValueHistogram};
