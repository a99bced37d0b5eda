//! Student's t distribution helpers and the two-sample t-test.

use promo_core::{Error, Result, VarianceAssumption};
use promo_features::Descriptive;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| Error::statistics(format!("t(df = {df}): {e}")))
}

/// Two-sided critical value: the `(1 + confidence) / 2` quantile of t(df).
pub fn t_critical(df: f64, confidence: f64) -> Result<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::config(format!(
            "confidence level must be in (0, 1), got {confidence}"
        )));
    }
    Ok(students_t(df)?.inverse_cdf(0.5 + confidence / 2.0))
}

/// Two-sided p-value of a t statistic.
pub fn two_sided_p_value(t: f64, df: f64) -> Result<f64> {
    // Lower tail at -|t| keeps precision for large statistics.
    let p = 2.0 * students_t(df)?.cdf(-t.abs());
    Ok(p.clamp(0.0, 1.0))
}

/// Outcome of a two-sample t-test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTestResult {
    /// (mean_a - mean_b) / standard error of the difference.
    pub t_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Standard error of the difference of means.
    pub standard_error: f64,
    /// Formulation used.
    pub variance: VarianceAssumption,
}

/// Independent two-sample t-test of `a` against `b`.
///
/// Both samples need at least two values. Fails with
/// [`Error::Statistics`] when the standard error of the difference is zero.
pub fn two_sample_t_test(
    a: &Descriptive,
    b: &Descriptive,
    variance: VarianceAssumption,
) -> Result<TTestResult> {
    let (Some(va), Some(vb)) = (a.sample_variance, b.sample_variance) else {
        return Err(Error::statistics(
            "two-sample t-test needs at least two values per sample",
        ));
    };
    let (na, nb) = (a.count as f64, b.count as f64);

    let (standard_error, degrees_of_freedom) = match variance {
        VarianceAssumption::Pooled => {
            let df = na + nb - 2.0;
            let pooled = ((na - 1.0) * va + (nb - 1.0) * vb) / df;
            ((pooled * (1.0 / na + 1.0 / nb)).sqrt(), df)
        }
        VarianceAssumption::Welch => {
            let (sa, sb) = (va / na, vb / nb);
            let df = (sa + sb).powi(2) / (sa.powi(2) / (na - 1.0) + sb.powi(2) / (nb - 1.0));
            ((sa + sb).sqrt(), df)
        }
    };

    if !(standard_error > 0.0 && standard_error.is_finite()) {
        return Err(Error::statistics(format!(
            "standard error of the difference is {standard_error}"
        )));
    }

    let t_statistic = (a.mean - b.mean) / standard_error;
    let p_value = two_sided_p_value(t_statistic, degrees_of_freedom)?;

    Ok(TTestResult {
        t_statistic,
        p_value,
        degrees_of_freedom,
        standard_error,
        variance,
    })
}
