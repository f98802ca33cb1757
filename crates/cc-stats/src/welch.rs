//! Welch's unequal-variance two-sample t-test.

use cc_core::{Error, Result};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of a Welch two-sample t-test.
#[derive(Debug, Clone, Serialize)]
pub struct WelchResult {
    /// t statistic: `(mean1 − mean0) / sqrt(v0/n0 + v1/n1)`.
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    /// Two-sided p-value from the Student-t distribution.
    pub p_value: f64,
    /// Group 0 mean.
    pub mean0: f64,
    /// Group 1 mean.
    pub mean1: f64,
    /// Group 0 sample standard deviation.
    pub sd0: f64,
    /// Group 1 sample standard deviation.
    pub sd1: f64,
    /// Group 0 size.
    pub n0: usize,
    /// Group 1 size.
    pub n1: usize,
}

/// Mean and sample variance (n−1 denominator), two-pass.
pub(crate) fn mean_and_variance(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = if xs.len() > 1 {
        xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    (mean, var)
}

/// CDF of Student's t(df) at value x.
#[inline]
fn t_cdf(x: f64, df: f64) -> Result<f64> {
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::Computation(format!("t-distribution with df={}: {}", df, e)))?;
    Ok(dist.cdf(x))
}

/// Welch's t-test comparing `group0` and `group1` (two-sided).
///
/// Does not assume equal variances: the statistic is
/// `(mean1 − mean0) / sqrt(v0/n0 + v1/n1)` and the degrees of freedom follow
/// the Welch–Satterthwaite approximation. The p-value always comes from the
/// Student-t CDF, never from a linear approximation in `|t|`.
///
/// # Errors
/// - `InsufficientData` if either group has fewer than 2 observations.
/// - `Validation` if any observation is non-finite.
/// - `Computation` if both groups have zero variance (the statistic is
///   undefined).
pub fn welch_t_test(group0: &[f64], group1: &[f64]) -> Result<WelchResult> {
    if group0.len() < 2 || group1.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "Welch t-test needs at least 2 observations per group, got {} and {}",
            group0.len(),
            group1.len()
        )));
    }
    for (label, g) in [("group 0", group0), ("group 1", group1)] {
        if g.iter().any(|x| !x.is_finite()) {
            return Err(Error::Validation(format!("{} contains non-finite values", label)));
        }
    }

    let n0 = group0.len() as f64;
    let n1 = group1.len() as f64;
    let (mean0, v0) = mean_and_variance(group0);
    let (mean1, v1) = mean_and_variance(group1);

    let se2 = v0 / n0 + v1 / n1;
    if se2 <= 0.0 {
        return Err(Error::Computation(
            "zero variance in both groups; t statistic is undefined".to_string(),
        ));
    }

    let t = (mean1 - mean0) / se2.sqrt();
    let df = se2 * se2
        / ((v0 / n0) * (v0 / n0) / (n0 - 1.0) + (v1 / n1) * (v1 / n1) / (n1 - 1.0));
    let p_value = (2.0 * (1.0 - t_cdf(t.abs(), df)?)).clamp(0.0, 1.0);

    Ok(WelchResult {
        t,
        df,
        p_value,
        mean0,
        mean1,
        sd0: v0.sqrt(),
        sd1: v1.sqrt(),
        n0: group0.len(),
        n1: group1.len(),
    })
}
