//! Numeric helpers shared by the cleaning and statistics stages.

use ordered_float::OrderedFloat;

/// Running sum with Neumaier compensation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    /// Add a value.
    #[inline]
    pub fn add(&mut self, v: f64) {
        let t = self.sum + v;
        if self.sum.abs() >= v.abs() {
            self.compensation += (self.sum - t) + v;
        } else {
            self.compensation += (v - t) + self.sum;
        }
        self.sum = t;
    }

    /// Current total.
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Sum a sequence of floats with Neumaier compensation.
///
/// Keeps per-order and per-period totals consistent with each other on
/// inputs with hundreds of thousands of lines.
pub fn compensated_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = CompensatedSum::default();
    for v in values {
        acc.add(v);
    }
    acc.value()
}

/// Return an ascending copy of the values (NaN sorts last).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by_key(|v| OrderedFloat(*v));
    out
}

/// Quantile of an ascending slice using linear interpolation between
/// closest ranks (`pos = (n - 1) * q`).
///
/// Returns `None` for an empty slice or a `q` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Quantile of unsorted values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

/// Nearest-rank percentile of an ascending slice: the smallest value with at
/// least `q` of the sample at or below it (rank `ceil(q * n)`, 1-based).
///
/// Always returns an observed value. Returns `None` for an empty slice or a
/// `q` outside `(0, 1]`.
pub fn nearest_rank_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(q > 0.0 && q <= 1.0) {
        return None;
    }

    // Absorb representation error so 0.99 * 100 stays rank 99.
    let rank = (q * sorted.len() as f64 - 1e-9).ceil().max(1.0) as usize;
    sorted.get(rank.min(sorted.len()) - 1).copied()
}

/// Nearest-rank percentile of unsorted values.
pub fn nearest_rank(values: &[f64], q: f64) -> Option<f64> {
    nearest_rank_sorted(&sorted(values), q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compensated_sum() {
        // Naive left-to-right summation returns 0.0 here.
        let values = [1e16, 1.0, -1e16, 1.0];
        assert_eq!(compensated_sum(values), 2.0);
        assert_eq!(compensated_sum(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0];
        // pos = 3 * 0.5 = 1.5 -> between 2 and 3
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile(&values, 1.0).unwrap(), 4.0);
    }

    #[test]
    fn test_quantile_p99_of_hundred() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        // pos = 99 * 0.99 = 98.01 -> 99 + 0.01 * (100 - 99)
        assert_relative_eq!(quantile(&values, 0.99).unwrap(), 99.01, epsilon = 1e-9);
    }

    #[test]
    fn test_nearest_rank() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert_eq!(nearest_rank(&values, 0.99), Some(99.0));
        assert_eq!(nearest_rank(&values, 1.0), Some(100.0));
        assert_eq!(nearest_rank(&values, 0.001), Some(1.0));

        // Small samples keep their maximum.
        assert_eq!(nearest_rank(&[300.0, 10.0], 0.99), Some(300.0));

        let values: Vec<f64> = (1..=1000).map(|v| v as f64).collect();
        assert_eq!(nearest_rank(&values, 0.99), Some(990.0));
    }

    #[test]
    fn test_nearest_rank_edge_cases() {
        assert!(nearest_rank(&[], 0.99).is_none());
        assert!(nearest_rank(&[1.0], 0.0).is_none());
        assert_eq!(nearest_rank(&[5.0], 0.99), Some(5.0));
    }

    #[test]
    fn test_quantile_edge_cases() {
        assert!(quantile(&[], 0.5).is_none());
        assert!(quantile(&[1.0], 1.5).is_none());
        assert_eq!(quantile(&[7.0], 0.99), Some(7.0));
    }
}
