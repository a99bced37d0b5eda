//! End-to-end analysis run.
//!
//! Raw rows flow strictly forward: clean, segment, aggregate each period,
//! compare. Any stage error aborts the run.

use crate::comparator::Comparator;
use promo_core::{AnalysisConfig, ComparisonResult, OrderTotals, RawTransaction, Result};
use promo_features::{aggregate, OrderValueHistogram};
use promo_ingestion::{Cleaner, CleaningStats, PeriodSegmenter, RawFrame};
use serde::Serialize;
use tracing::{info, warn};

/// Per-period order totals with the cleaning diagnostics that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOrders {
    /// Cleaning diagnostics.
    pub cleaning: CleaningStats,
    /// Orders before the cutoff.
    pub pre: OrderTotals,
    /// Orders at or after the cutoff.
    pub post: OrderTotals,
}

/// Full output of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Cleaning diagnostics.
    pub cleaning: CleaningStats,
    /// Orders before the cutoff.
    pub pre_orders: OrderTotals,
    /// Orders at or after the cutoff.
    pub post_orders: OrderTotals,
    /// Statistical comparison.
    pub comparison: ComparisonResult,
    /// Distribution of pre-period order values.
    pub pre_histogram: OrderValueHistogram,
    /// Distribution of post-period order values.
    pub post_histogram: OrderValueHistogram,
}

/// Promotion analysis pipeline.
#[derive(Debug, Clone)]
pub struct PromotionAnalysis {
    config: AnalysisConfig,
    cleaner: Cleaner,
    segmenter: PeriodSegmenter,
    comparator: Comparator,
}

impl PromotionAnalysis {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            cleaner: Cleaner::new(config.cleaning.clone()),
            segmenter: PeriodSegmenter::from_config(&config.segmentation),
            comparator: Comparator::new(config.comparison.clone()),
            config,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Clean, segment and aggregate, stopping before the comparison.
    pub fn prepare(&self, rows: &[RawTransaction]) -> PeriodOrders {
        let cleaned = self.cleaner.clean(rows);
        let segments = self.segmenter.segment(&cleaned.lines);

        let pre = aggregate(&segments.pre);
        let post = aggregate(&segments.post);

        info!(
            pre_orders = pre.len(),
            post_orders = post.len(),
            "Aggregated orders per period"
        );

        PeriodOrders {
            cleaning: cleaned.stats,
            pre,
            post,
        }
    }

    /// Run the full pipeline on raw rows.
    pub fn run(&self, rows: &[RawTransaction]) -> Result<AnalysisReport> {
        let orders = self.prepare(rows);

        let comparison = self
            .comparator
            .compare(&orders.pre, &orders.post)
            .map_err(|e| {
                warn!(error = %e, "Comparison failed");
                e
            })?;

        info!(
            pre_mean = comparison.pre_stats.mean,
            post_mean = comparison.post_stats.mean,
            pre_median = comparison.pre_stats.median,
            post_median = comparison.post_stats.median,
            t = comparison.t_statistic,
            p = comparison.p_value,
            "Analysis complete"
        );

        let bins = self.config.histogram.bins;
        let pre_histogram = OrderValueHistogram::from_values(&orders.pre.values(), bins);
        let post_histogram = OrderValueHistogram::from_values(&orders.post.values(), bins);

        Ok(AnalysisReport {
            cleaning: orders.cleaning,
            pre_orders: orders.pre,
            post_orders: orders.post,
            comparison,
            pre_histogram,
            post_histogram,
        })
    }

    /// Resolve the required columns of a frame, then run the full pipeline.
    pub fn run_frame(&self, frame: &RawFrame) -> Result<AnalysisReport> {
        let rows = frame.records(&self.config.cleaning.columns)?;
        self.run(&rows)
    }
}
