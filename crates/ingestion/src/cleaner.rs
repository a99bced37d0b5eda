//! Transaction line cleaning.
//!
//! Turns raw rows into canonical [`TransactionLine`]s in five explicit steps,
//! each a pure function over the previous step's output:
//!
//! 1. drop rows missing the timestamp, quantity or unit price
//! 2. drop rows with non-positive quantity or unit price
//! 3. derive `line_total = quantity * unit_price`
//! 4. drop rows whose line total exceeds the configured percentile
//! 5. drop rows without an invoice number
//!
//! Timestamps are normalized while checking presence in step 1; a timestamp
//! that cannot be parsed counts as missing. Rows without an invoice number
//! still count towards the percentile in step 4.

use crate::frame::RawFrame;
use crate::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use promo_core::config::CleaningConfig;
use promo_core::numeric::nearest_rank;
use promo_core::{InvoiceNo, RawTransaction, Result, TransactionLine};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A row with every required field present, before value checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRow {
    /// Order identifier.
    pub invoice_no: InvoiceNo,
    /// Normalized timestamp.
    pub timestamp: NaiveDateTime,
    /// Raw quantity.
    pub quantity: i64,
    /// Raw unit price.
    pub unit_price: f64,
}

/// Statistics about a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningStats {
    /// Rows received.
    pub rows_in: usize,
    /// Rows dropped for a missing or unparseable field.
    pub dropped_missing: usize,
    /// Rows dropped for non-positive quantity or unit price.
    pub dropped_non_positive: usize,
    /// Rows dropped above the outlier cap.
    pub dropped_outliers: usize,
    /// Rows dropped for a blank invoice number.
    pub dropped_unattributed: usize,
    /// Rows kept.
    pub rows_out: usize,
    /// Line-total cap applied (None when nothing reached step 4).
    pub outlier_cap: Option<f64>,
    /// Earliest kept timestamp.
    pub earliest: Option<NaiveDateTime>,
    /// Latest kept timestamp.
    pub latest: Option<NaiveDateTime>,
}

impl CleaningStats {
    /// Total rows dropped across all steps.
    pub fn dropped(&self) -> usize {
        self.dropped_missing
            + self.dropped_non_positive
            + self.dropped_outliers
            + self.dropped_unattributed
    }

    /// Fraction of input rows kept.
    pub fn retention(&self) -> f64 {
        if self.rows_in > 0 {
            self.rows_out as f64 / self.rows_in as f64
        } else {
            0.0
        }
    }
}

/// Output of a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedLines {
    /// Canonical lines, in input order.
    pub lines: Vec<TransactionLine>,
    /// Diagnostics.
    pub stats: CleaningStats,
}

/// Step 1: keep rows with every required field present.
pub fn drop_incomplete(rows: &[RawTransaction]) -> Vec<CompleteRow> {
    rows.iter()
        .filter_map(|row| {
            let timestamp = row.invoice_date.as_deref().and_then(parse_timestamp)?;
            let quantity = row.quantity?;
            let unit_price = row.unit_price.filter(|p| !p.is_nan())?;

            Some(CompleteRow {
                invoice_no: row.invoice_no.clone(),
                timestamp,
                quantity,
                unit_price,
            })
        })
        .collect()
}

/// Step 2: keep rows with positive quantity and unit price.
pub fn drop_non_positive(rows: Vec<CompleteRow>) -> Vec<CompleteRow> {
    rows.into_iter()
        .filter(|row| row.quantity > 0 && row.unit_price > 0.0)
        .collect()
}

/// Step 3: derive the line total.
pub fn derive_line_totals(rows: Vec<CompleteRow>) -> Vec<TransactionLine> {
    rows.into_iter()
        .map(|row| TransactionLine {
            line_total: row.quantity as f64 * row.unit_price,
            invoice_no: row.invoice_no,
            timestamp: row.timestamp,
            quantity: row.quantity,
            unit_price: row.unit_price,
        })
        .collect()
}

/// Step 4: drop lines whose total exceeds the nearest-rank `q` percentile of
/// all line totals.
///
/// Returns the kept lines and the cap, or `None` for the cap when `lines` is
/// empty.
pub fn cap_outliers(lines: Vec<TransactionLine>, q: f64) -> (Vec<TransactionLine>, Option<f64>) {
    let totals: Vec<f64> = lines.iter().map(|l| l.line_total).collect();
    let Some(cap) = nearest_rank(&totals, q) else {
        return (lines, None);
    };

    let kept = lines.into_iter().filter(|l| l.line_total <= cap).collect();
    (kept, Some(cap))
}

/// Step 5: drop lines that cannot be attributed to an order.
pub fn drop_unattributed(lines: Vec<TransactionLine>) -> Vec<TransactionLine> {
    lines
        .into_iter()
        .filter(|l| !l.invoice_no.trim().is_empty())
        .collect()
}

/// Line cleaner.
#[derive(Debug, Clone)]
pub struct Cleaner {
    config: CleaningConfig,
}

impl Cleaner {
    /// Create a new cleaner.
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Clean raw transactions.
    pub fn clean(&self, rows: &[RawTransaction]) -> CleanedLines {
        let mut stats = CleaningStats {
            rows_in: rows.len(),
            ..Default::default()
        };

        let complete = drop_incomplete(rows);
        stats.dropped_missing = rows.len() - complete.len();
        debug!(
            kept = complete.len(),
            dropped = stats.dropped_missing,
            "Dropped incomplete rows"
        );

        let n = complete.len();
        let positive = drop_non_positive(complete);
        stats.dropped_non_positive = n - positive.len();
        debug!(
            kept = positive.len(),
            dropped = stats.dropped_non_positive,
            "Dropped non-positive rows"
        );

        let priced = derive_line_totals(positive);

        let n = priced.len();
        let (capped, cap) = cap_outliers(priced, self.config.outlier_quantile);
        stats.dropped_outliers = n - capped.len();
        stats.outlier_cap = cap;
        debug!(
            kept = capped.len(),
            dropped = stats.dropped_outliers,
            cap = ?cap,
            quantile = self.config.outlier_quantile,
            "Applied outlier cap"
        );

        let n = capped.len();
        let lines = drop_unattributed(capped);
        stats.dropped_unattributed = n - lines.len();
        if stats.dropped_unattributed > 0 {
            debug!(
                dropped = stats.dropped_unattributed,
                "Dropped rows without an invoice number"
            );
        }

        stats.rows_out = lines.len();
        stats.earliest = lines.iter().map(|l| l.timestamp).min();
        stats.latest = lines.iter().map(|l| l.timestamp).max();

        if lines.is_empty() && !rows.is_empty() {
            warn!(rows_in = rows.len(), "No rows survived cleaning");
        }

        info!(
            rows_in = stats.rows_in,
            rows_out = stats.rows_out,
            dropped = stats.dropped(),
            earliest = ?stats.earliest,
            latest = ?stats.latest,
            "Cleaned transaction lines"
        );

        CleanedLines { lines, stats }
    }

    /// Resolve the required columns of a frame, then clean its rows.
    ///
    /// Fails only when a required column is absent from the header.
    pub fn clean_frame(&self, frame: &RawFrame) -> Result<CleanedLines> {
        let records = frame.records(&self.config.columns)?;
        Ok(self.clean(&records))
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}
