//! Core types and configuration for the promotion analysis pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Numeric helpers (compensated sums, quantiles)
//! - Raw and cleaned transaction records
//! - Per-order totals and summary statistics
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod numeric;
pub mod types;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use types::*;
