//! Configuration structures for the promotion analysis pipeline.

use crate::error::{Error, Result};
use crate::types::VarianceAssumption;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Main configuration for an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cleaning configuration.
    pub cleaning: CleaningConfig,
    /// Period segmentation configuration.
    pub segmentation: SegmentationConfig,
    /// Statistical comparison configuration.
    pub comparison: ComparisonConfig,
    /// Order-value histogram configuration.
    pub histogram: HistogramConfig,
}

impl AnalysisConfig {
    /// Parse a JSON document; absent sections and fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every section holds usable values.
    pub fn validate(&self) -> Result<()> {
        let q = self.cleaning.outlier_quantile;
        if !(q > 0.0 && q <= 1.0) {
            return Err(Error::config(format!(
                "outlier_quantile must be in (0, 1], got {q}"
            )));
        }

        let c = self.comparison.confidence_level;
        if !(c > 0.0 && c < 1.0) {
            return Err(Error::config(format!(
                "confidence_level must be in (0, 1), got {c}"
            )));
        }

        if self.histogram.bins == 0 {
            return Err(Error::config("histogram bins must be at least 1"));
        }

        let columns = &self.cleaning.columns;
        let names = [
            &columns.invoice_no,
            &columns.invoice_date,
            &columns.quantity,
            &columns.unit_price,
        ];
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(Error::config("column names must not be empty"));
        }

        Ok(())
    }
}

/// Names of the required input columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Order identifier column.
    pub invoice_no: String,
    /// Timestamp column.
    pub invoice_date: String,
    /// Quantity column.
    pub quantity: String,
    /// Unit price column.
    pub unit_price: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            invoice_no: "InvoiceNo".to_string(),
            invoice_date: "InvoiceDate".to_string(),
            quantity: "Quantity".to_string(),
            unit_price: "UnitPrice".to_string(),
        }
    }
}

/// Cleaning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Quantile of line totals above which lines are dropped (e.g., 0.99).
    pub outlier_quantile: f64,
    /// Required column names.
    pub columns: ColumnNames,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            outlier_quantile: 0.99,
            columns: ColumnNames::default(),
        }
    }
}

/// How lines are assigned to a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationPolicy {
    /// Each line by its own timestamp. An order whose lines straddle the
    /// cutoff contributes a partial total to both periods.
    #[default]
    LineTimestamp,
    /// Every line of an order follows the order's earliest line timestamp.
    OrderEarliest,
}

/// Period segmentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Promotion start. Lines at or after this instant are Post.
    pub cutoff: NaiveDateTime,
    /// Line assignment policy.
    pub policy: SegmentationPolicy,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            policy: SegmentationPolicy::default(),
        }
    }
}

/// 2011-07-01 00:00:00, mid-way through the Online Retail dataset.
fn default_cutoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2011, 7, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::default())
}

/// Statistical comparison configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Two-sided confidence level for the mean intervals.
    pub confidence_level: f64,
    /// t-test formulation.
    pub variance: VarianceAssumption,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            variance: VarianceAssumption::Pooled,
        }
    }
}

/// Order-value histogram configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Number of equal-width bins per period.
    pub bins: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { bins: 50 }
    }
}
