//! Core data types for the promotion analysis pipeline.

use crate::numeric::compensated_sum;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Order (invoice) identifier. Opaque; only compared for equality and order.
pub type InvoiceNo = String;

/// A single raw transaction line as delivered by the acquisition layer.
///
/// Any of the measured fields may be missing; the cleaner decides what
/// survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Order identifier.
    pub invoice_no: InvoiceNo,
    /// Timestamp in any supported textual form.
    pub invoice_date: Option<String>,
    /// Quantity (may be zero or negative for returns).
    pub quantity: Option<i64>,
    /// Unit price (may be zero or negative for adjustments).
    pub unit_price: Option<f64>,
}

impl RawTransaction {
    /// Create a fully populated raw row.
    pub fn new(
        invoice_no: impl Into<String>,
        invoice_date: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> Self {
        Self {
            invoice_no: invoice_no.into(),
            invoice_date: Some(invoice_date.into()),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
        }
    }
}

/// A cleaned transaction line with its derived monetary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Order identifier.
    pub invoice_no: InvoiceNo,
    /// Normalized timestamp.
    pub timestamp: NaiveDateTime,
    /// Quantity, always positive.
    pub quantity: i64,
    /// Unit price, always positive.
    pub unit_price: f64,
    /// quantity * unit_price.
    pub line_total: f64,
}

/// Side of the promotion cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Strictly before the cutoff.
    Pre,
    /// At or after the cutoff.
    Post,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Pre => f.write_str("pre"),
            Period::Post => f.write_str("post"),
        }
    }
}

/// Per-order totals for one period, keyed by invoice number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderTotals {
    totals: BTreeMap<InvoiceNo, f64>,
}

impl OrderTotals {
    /// Wrap an existing invoice -> total map.
    pub fn new(totals: BTreeMap<InvoiceNo, f64>) -> Self {
        Self { totals }
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Total for a single order.
    pub fn get(&self, invoice_no: &str) -> Option<f64> {
        self.totals.get(invoice_no).copied()
    }

    /// Iterate over (invoice, total) pairs in invoice order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Order totals in invoice order.
    pub fn values(&self) -> Vec<f64> {
        self.totals.values().copied().collect()
    }

    /// Sum of all order totals.
    pub fn total(&self) -> f64 {
        compensated_sum(self.totals.values().copied())
    }
}

impl FromIterator<(InvoiceNo, f64)> for OrderTotals {
    fn from_iter<T: IntoIterator<Item = (InvoiceNo, f64)>>(iter: T) -> Self {
        Self {
            totals: iter.into_iter().collect(),
        }
    }
}

/// Equal-variance or unequal-variance two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceAssumption {
    /// Student's t-test with pooled variance.
    #[default]
    Pooled,
    /// Welch's t-test with Welch-Satterthwaite degrees of freedom.
    Welch,
}

/// Descriptive statistics for one period's order totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of orders.
    pub count: usize,
    /// Mean order total.
    pub mean: f64,
    /// Median order total.
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    /// Standard error of the mean.
    pub standard_error: f64,
    /// Lower bound of the confidence interval for the mean.
    pub ci_lower: f64,
    /// Upper bound of the confidence interval for the mean.
    pub ci_upper: f64,
    /// Smallest order total.
    pub min: f64,
    /// Largest order total.
    pub max: f64,
}

impl SummaryStats {
    /// Half-width of the confidence interval.
    pub fn margin_of_error(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

/// Outcome of comparing Pre and Post order totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Statistics for orders before the cutoff.
    pub pre_stats: SummaryStats,
    /// Statistics for orders at or after the cutoff.
    pub post_stats: SummaryStats,
    /// t statistic for mean(pre) - mean(post).
    pub t_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Degrees of freedom of the test distribution.
    pub degrees_of_freedom: f64,
    /// Formulation used for the test.
    pub variance: VarianceAssumption,
}

impl ComparisonResult {
    /// Difference of means, pre minus post.
    pub fn mean_difference(&self) -> f64 {
        self.pre_stats.mean - self.post_stats.mean
    }

    /// Change of the mean relative to the pre period.
    ///
    /// Returns `None` when the pre mean is zero.
    pub fn relative_change(&self) -> Option<f64> {
        if self.pre_stats.mean == 0.0 {
            None
        } else {
            Some((self.post_stats.mean - self.pre_stats.mean) / self.pre_stats.mean)
        }
    }
}
