//! Pre/Post order-value comparison.
//!
//! Builds summary statistics with confidence intervals for each period and
//! runs the configured two-sample t-test. No significance threshold is
//! applied here; callers read `p_value` themselves.

use crate::ttest::{t_critical, two_sample_t_test};
use promo_core::config::ComparisonConfig;
use promo_core::{ComparisonResult, Error, OrderTotals, Period, Result, SummaryStats};
use promo_features::Descriptive;
use tracing::debug;

/// Minimum orders per period for a standard error to exist.
pub const MIN_ORDERS: usize = 2;

/// Describe one period's order totals, requiring at least [`MIN_ORDERS`].
fn describe(period: Period, orders: &OrderTotals) -> Result<Descriptive> {
    let values = orders.values();
    Descriptive::from_values(&values)
        .filter(|d| d.count >= MIN_ORDERS)
        .ok_or_else(|| Error::insufficient_data(period, values.len()))
}

fn to_summary(d: &Descriptive, confidence: f64) -> Result<SummaryStats> {
    let (Some(std_dev), Some(standard_error)) = (d.std_dev(), d.standard_error()) else {
        return Err(Error::statistics("standard error needs at least two values"));
    };

    let margin = t_critical((d.count - 1) as f64, confidence)? * standard_error;

    Ok(SummaryStats {
        count: d.count,
        mean: d.mean,
        median: d.median,
        std_dev,
        standard_error,
        ci_lower: d.mean - margin,
        ci_upper: d.mean + margin,
        min: d.min,
        max: d.max,
    })
}

/// Summary statistics and a `confidence` interval for the mean of `values`.
///
/// Needs at least two values; a constant sample yields a zero-width interval.
pub fn summarize(values: &[f64], confidence: f64) -> Result<SummaryStats> {
    let d = Descriptive::from_values(values)
        .ok_or_else(|| Error::statistics("cannot summarize an empty sample"))?;
    to_summary(&d, confidence)
}

/// Compares Pre and Post order totals.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    config: ComparisonConfig,
}

impl Comparator {
    /// Create a new comparator.
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    /// Compare the two periods.
    ///
    /// Fails with [`Error::InsufficientData`] when a period has fewer than two
    /// orders (Pre is checked first) and with [`Error::DegenerateVariance`]
    /// when the t-test has no standard error, i.e. neither period varies. A
    /// single constant period is compared normally and gets a zero-width
    /// interval.
    pub fn compare(&self, pre: &OrderTotals, post: &OrderTotals) -> Result<ComparisonResult> {
        let pre_desc = describe(Period::Pre, pre)?;
        let post_desc = describe(Period::Post, post)?;

        // Pooled and Welch standard errors are both zero exactly here.
        if pre_desc.is_constant() && post_desc.is_constant() {
            return Err(Error::degenerate_variance(Period::Pre, pre_desc.min));
        }

        let confidence = self.config.confidence_level;
        let pre_stats = to_summary(&pre_desc, confidence)?;
        let post_stats = to_summary(&post_desc, confidence)?;

        let test = two_sample_t_test(&pre_desc, &post_desc, self.config.variance)?;

        debug!(
            pre_orders = pre_stats.count,
            post_orders = post_stats.count,
            pre_mean = pre_stats.mean,
            post_mean = post_stats.mean,
            t = test.t_statistic,
            p = test.p_value,
            df = test.degrees_of_freedom,
            "Compared order values"
        );

        Ok(ComparisonResult {
            pre_stats,
            post_stats,
            t_statistic: test.t_statistic,
            p_value: test.p_value,
            degrees_of_freedom: test.degrees_of_freedom,
            variance: test.variance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use promo_core::VarianceAssumption;

    fn orders(values: &[f64]) -> OrderTotals {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("{i:06}"), *v))
            .collect()
    }

    #[test]
    fn test_two_by_two_scenario() {
        let result = Comparator::default()
            .compare(&orders(&[10.0, 20.0]), &orders(&[50.0, 60.0]))
            .unwrap();

        assert_eq!(result.pre_stats.count, 2);
        assert_eq!(result.post_stats.count, 2);
        assert_abs_diff_eq!(result.pre_stats.mean, 15.0);
        assert_abs_diff_eq!(result.post_stats.mean, 55.0);
        assert_abs_diff_eq!(result.pre_stats.median, 15.0);
        assert!(result.t_statistic < 0.0);
        assert!(result.p_value < 0.05);
        assert_eq!(result.variance, VarianceAssumption::Pooled);
        assert_abs_diff_eq!(result.mean_difference(), -40.0);
    }

    #[test]
    fn test_confidence_interval() {
        // se = 5, t(0.975, 1) = 12.7062
        let result = Comparator::default()
            .compare(&orders(&[10.0, 20.0]), &orders(&[50.0, 60.0]))
            .unwrap();

        let pre = &result.pre_stats;
        assert_abs_diff_eq!(pre.standard_error, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pre.ci_lower, 15.0 - 12.7062 * 5.0, epsilon = 1e-2);
        assert_abs_diff_eq!(pre.ci_upper, 15.0 + 12.7062 * 5.0, epsilon = 1e-2);
        assert_abs_diff_eq!(pre.margin_of_error(), 12.7062 * 5.0, epsilon = 1e-2);
    }

    #[test]
    fn test_insufficient_data() {
        let err = Comparator::default()
            .compare(&orders(&[10.0]), &orders(&[300.0]))
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData { period: Period::Pre, count: 1 }));

        let err = Comparator::default()
            .compare(&orders(&[10.0, 12.0]), &orders(&[]))
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData { period: Period::Post, count: 0 }));
    }

    #[test]
    fn test_one_constant_period_still_compared() {
        // Pooled variance (0 + 2) / 2 = 1, se = 1, t = (7 - 10) / 1.
        // For df = 2, p = 1 - 3 / sqrt(11).
        let result = Comparator::default()
            .compare(&orders(&[7.0, 7.0]), &orders(&[9.0, 11.0]))
            .unwrap();

        assert_abs_diff_eq!(result.t_statistic, -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 1.0 - 3.0 / 11.0_f64.sqrt(), epsilon = 1e-6);
        assert_abs_diff_eq!(result.pre_stats.std_dev, 0.0);
        assert_abs_diff_eq!(result.pre_stats.ci_lower, 7.0);
        assert_abs_diff_eq!(result.pre_stats.ci_upper, 7.0);

        let welch = Comparator::new(ComparisonConfig {
            variance: VarianceAssumption::Welch,
            ..Default::default()
        })
        .compare(&orders(&[10.0, 20.0]), &orders(&[42.0, 42.0, 42.0]))
        .unwrap();
        assert_abs_diff_eq!(welch.degrees_of_freedom, 1.0, epsilon = 1e-12);
        assert!(welch.t_statistic < 0.0);
    }

    #[test]
    fn test_degenerate_variance() {
        for variance in [VarianceAssumption::Pooled, VarianceAssumption::Welch] {
            let comparator = Comparator::new(ComparisonConfig {
                variance,
                ..Default::default()
            });
            let err = comparator
                .compare(&orders(&[7.0, 7.0]), &orders(&[42.0, 42.0, 42.0]))
                .unwrap_err();
            assert!(matches!(
                err,
                Error::DegenerateVariance { period: Period::Pre, value } if value == 7.0
            ));
        }
    }

    #[test]
    fn test_welch_configured() {
        let comparator = Comparator::new(ComparisonConfig {
            variance: VarianceAssumption::Welch,
            ..Default::default()
        });
        let result = comparator
            .compare(&orders(&[10.0, 20.0, 30.0]), &orders(&[50.0, 60.0]))
            .unwrap();

        assert_eq!(result.variance, VarianceAssumption::Welch);
        assert!(result.degrees_of_freedom < 3.0);
    }

    #[test]
    fn test_wider_interval_at_higher_confidence() {
        let values = [12.0, 15.5, 9.25, 30.0, 22.1, 18.4];
        let narrow = summarize(&values, 0.90).unwrap();
        let wide = summarize(&values, 0.99).unwrap();

        assert!(wide.ci_lower < narrow.ci_lower);
        assert!(wide.ci_upper > narrow.ci_upper);
        assert_abs_diff_eq!(wide.mean, narrow.mean);
    }

    #[test]
    fn test_summarize_errors() {
        assert!(matches!(summarize(&[], 0.95), Err(Error::Statistics(_))));
        assert!(matches!(summarize(&[1.0], 0.95), Err(Error::Statistics(_))));
    }
}
