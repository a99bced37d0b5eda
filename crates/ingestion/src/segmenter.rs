//! Pre/Post period segmentation around the promotion cutoff.

use chrono::NaiveDateTime;
use promo_core::config::{SegmentationConfig, SegmentationPolicy};
use promo_core::{InvoiceNo, Period, TransactionLine};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Cleaned lines split by period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segments {
    /// Lines strictly before the cutoff.
    pub pre: Vec<TransactionLine>,
    /// Lines at or after the cutoff.
    pub post: Vec<TransactionLine>,
}

impl Segments {
    /// Lines of one period.
    pub fn get(&self, period: Period) -> &[TransactionLine] {
        match period {
            Period::Pre => &self.pre,
            Period::Post => &self.post,
        }
    }

    /// Total number of lines across both periods.
    pub fn len(&self) -> usize {
        self.pre.len() + self.post.len()
    }

    /// Whether both periods are empty.
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }
}

/// Splits cleaned lines into Pre and Post.
#[derive(Debug, Clone)]
pub struct PeriodSegmenter {
    cutoff: NaiveDateTime,
    policy: SegmentationPolicy,
}

impl PeriodSegmenter {
    /// Create a new segmenter.
    pub fn new(cutoff: NaiveDateTime, policy: SegmentationPolicy) -> Self {
        Self { cutoff, policy }
    }

    /// Create a segmenter from configuration.
    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new(config.cutoff, config.policy)
    }

    /// The cutoff instant.
    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    /// Period of a timestamp. The cutoff itself belongs to Post.
    #[inline]
    pub fn period_of(&self, ts: NaiveDateTime) -> Period {
        if ts < self.cutoff {
            Period::Pre
        } else {
            Period::Post
        }
    }

    /// Split lines by period. Every input line lands in exactly one output.
    pub fn segment(&self, lines: &[TransactionLine]) -> Segments {
        let segments = match self.policy {
            SegmentationPolicy::LineTimestamp => self.split_by(lines, |line| line.timestamp),
            SegmentationPolicy::OrderEarliest => {
                let earliest = earliest_by_order(lines);
                self.split_by(lines, |line| {
                    earliest
                        .get(line.invoice_no.as_str())
                        .copied()
                        .unwrap_or(line.timestamp)
                })
            }
        };

        if self.policy == SegmentationPolicy::LineTimestamp {
            let straddling = straddling_orders(&segments);
            if straddling > 0 {
                debug!(orders = straddling, "Orders with lines on both sides of the cutoff");
            }
        }

        info!(
            cutoff = %self.cutoff,
            policy = ?self.policy,
            pre = segments.pre.len(),
            post = segments.post.len(),
            "Segmented transaction lines"
        );

        segments
    }

    fn split_by<F>(&self, lines: &[TransactionLine], key: F) -> Segments
    where
        F: Fn(&TransactionLine) -> NaiveDateTime,
    {
        let (pre, post): (Vec<_>, Vec<_>) = lines
            .iter()
            .cloned()
            .partition(|line| self.period_of(key(line)) == Period::Pre);
        Segments { pre, post }
    }
}

/// Earliest line timestamp per order.
fn earliest_by_order(lines: &[TransactionLine]) -> HashMap<&str, NaiveDateTime> {
    let mut earliest: HashMap<&str, NaiveDateTime> = HashMap::new();
    for line in lines {
        earliest
            .entry(line.invoice_no.as_str())
            .and_modify(|ts| *ts = (*ts).min(line.timestamp))
            .or_insert(line.timestamp);
    }
    earliest
}

/// Number of orders present in both periods.
fn straddling_orders(segments: &Segments) -> usize {
    let pre: HashSet<&InvoiceNo> = segments.pre.iter().map(|l| &l.invoice_no).collect();
    let mut seen = HashSet::new();
    segments
        .post
        .iter()
        .filter(|l| pre.contains(&l.invoice_no) && seen.insert(&l.invoice_no))
        .count()
}
