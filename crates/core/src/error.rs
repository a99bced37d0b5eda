//! Error types for the promotion analysis pipeline.

use crate::types::Period;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the promotion analysis pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A required column is absent from the input entirely.
    #[error("Schema error: missing required column(s): {}", .missing.join(", "))]
    Schema {
        /// Names of the required columns that were not found.
        missing: Vec<String>,
    },

    /// Fewer than two orders in a period group.
    #[error("Insufficient data: {period} period has {count} order(s), at least 2 required")]
    InsufficientData {
        /// Period that failed the check.
        period: Period,
        /// Number of orders observed.
        count: usize,
    },

    /// Neither period's order totals vary, so the t-test has no standard error.
    #[error("Degenerate variance: order totals do not vary ({period} period is all {value})")]
    DegenerateVariance {
        /// Period that failed the check.
        period: Period,
        /// The repeated order total.
        value: f64,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A distribution could not be constructed or evaluated.
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a schema error from the missing column names.
    pub fn schema<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::Schema {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(period: Period, count: usize) -> Self {
        Error::InsufficientData { period, count }
    }

    /// Create a degenerate variance error.
    pub fn degenerate_variance(period: Period, value: f64) -> Self {
        Error::DegenerateVariance { period, value }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a statistics error.
    pub fn statistics(msg: impl Into<String>) -> Self {
        Error::Statistics(msg.into())
    }
}
