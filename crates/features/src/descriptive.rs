//! Descriptive statistics over order totals.

use promo_core::numeric::{compensated_sum, quantile_sorted, sorted};

/// Location and spread of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptive {
    /// Sample size.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the two middle values for even sizes).
    pub median: f64,
    /// Unbiased sample variance (n - 1 denominator). `None` below two values.
    pub sample_variance: Option<f64>,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Descriptive {
    /// Describe a sample. Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let ordered = sorted(values);
        let (&min, &max) = (ordered.first()?, ordered.last()?);
        let median = quantile_sorted(&ordered, 0.5)?;

        let n = values.len();
        let mean = compensated_sum(values.iter().copied()) / n as f64;

        let sample_variance = if n < 2 {
            None
        } else if min == max {
            // Two-pass rounding would otherwise leave a tiny non-zero residue.
            Some(0.0)
        } else {
            let ss = compensated_sum(values.iter().map(|v| (v - mean).powi(2)));
            Some(ss / (n - 1) as f64)
        };

        Some(Self {
            count: n,
            mean,
            median,
            sample_variance,
            min,
            max,
        })
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> Option<f64> {
        self.sample_variance.map(f64::sqrt)
    }

    /// Standard error of the mean, `s / sqrt(n)`.
    pub fn standard_error(&self) -> Option<f64> {
        self.std_dev().map(|s| s / (self.count as f64).sqrt())
    }

    /// Whether every value is identical.
    pub fn is_constant(&self) -> bool {
        self.min == self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(Descriptive::from_values(&[]).is_none());
    }

    #[test]
    fn test_single_value() {
        let d = Descriptive::from_values(&[10.0]).unwrap();
        assert_eq!(d.count, 1);
        assert_eq!(d.mean, 10.0);
        assert_eq!(d.median, 10.0);
        assert!(d.sample_variance.is_none());
        assert!(d.standard_error().is_none());
    }

    #[test]
    fn test_known_values() {
        // mean 5, squared deviations sum 32, sample variance 32/7
        let d = Descriptive::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((d.mean - 5.0).abs() < 1e-12);
        assert!((d.median - 4.5).abs() < 1e-12);
        assert!((d.sample_variance.unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert!((d.std_dev().unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        let expected_se = (32.0_f64 / 7.0).sqrt() / 8.0_f64.sqrt();
        assert!((d.standard_error().unwrap() - expected_se).abs() < 1e-12);
        assert_eq!(d.min, 2.0);
        assert_eq!(d.max, 9.0);
    }

    #[test]
    fn test_odd_median_unsorted_input() {
        let d = Descriptive::from_values(&[50.0, 10.0, 20.0]).unwrap();
        assert_eq!(d.median, 20.0);
    }

    #[test]
    fn test_constant_sample() {
        let d = Descriptive::from_values(&[0.1, 0.1, 0.1]).unwrap();
        assert!(d.is_constant());
        assert_eq!(d.sample_variance, Some(0.0));
    }

    #[test]
    fn test_two_values() {
        // [10, 20]: mean 15, s^2 = 50, se = sqrt(50 / 2) = 5
        let d = Descriptive::from_values(&[10.0, 20.0]).unwrap();
        assert_eq!(d.mean, 15.0);
        assert!((d.sample_variance.unwrap() - 50.0).abs() < 1e-12);
        assert!((d.standard_error().unwrap() - 5.0).abs() < 1e-12);
    }
}
