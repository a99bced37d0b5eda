//! Order-value histogram.
//!
//! Equal-width binning of a period's order totals, the data behind the
//! pre/post distribution plot. Rendering belongs to the caller.

use ordered_float::OrderedFloat;
use serde::Serialize;

/// A single histogram bin, `[lower, upper)` except the last which is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower edge.
    pub lower: f64,
    /// Upper edge.
    pub upper: f64,
    /// Number of values in the bin.
    pub count: usize,
}

impl HistogramBin {
    /// Bin mid-point.
    pub fn mid(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// Equal-width histogram over the sample range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderValueHistogram {
    bins: Vec<HistogramBin>,
}

impl OrderValueHistogram {
    /// Bin values into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Empty input or zero bins yield an empty histogram. A constant sample
    /// collapses into one unit-width bin centred on the value.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite = || values.iter().copied().filter(|v| v.is_finite());

        let (Some(min), Some(max)) = (
            finite().map(OrderedFloat).min(),
            finite().map(OrderedFloat).max(),
        ) else {
            return Self::default();
        };
        if bins == 0 {
            return Self::default();
        }

        let (min, max) = (min.0, max.0);
        if min == max {
            return Self {
                bins: vec![HistogramBin {
                    lower: min - 0.5,
                    upper: min + 0.5,
                    count: finite().count(),
                }],
            };
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in finite() {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count,
            })
            .collect();

        Self { bins }
    }

    /// Bins in ascending order.
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Number of values binned.
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Bin with the most values (the first one on ties).
    pub fn mode_bin(&self) -> Option<&HistogramBin> {
        self.bins
            .iter()
            .rev()
            .max_by_key(|b| b.count)
    }
}
