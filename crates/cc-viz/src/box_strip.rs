//! Box-and-strip plot artifact for numeric two-group comparisons.
//!
//! Per group: five-number summary with 1.5·IQR whiskers, outliers beyond the
//! whiskers, and the raw sample points for the strip overlay.

use cc_core::{Error, Result};
use serde::Serialize;

/// Artifact schema identifier.
pub const SCHEMA_VERSION: &str = "cohortcomp/box_strip/v1";

/// Box-and-strip series for one comparison group.
#[derive(Debug, Clone, Serialize)]
pub struct BoxStripSeries {
    /// Group label ("0" or "1").
    pub label: String,
    /// Sample size.
    pub n: usize,
    /// Sample minimum.
    pub min: f64,
    /// First quartile (type-7 linear interpolation).
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Sample maximum.
    pub max: f64,
    /// Lowest point within `q1 − 1.5·IQR`.
    pub whisker_lo: f64,
    /// Highest point within `q3 + 1.5·IQR`.
    pub whisker_hi: f64,
    /// Points outside the whiskers.
    pub outliers: Vec<f64>,
    /// All sample points, sorted ascending (strip overlay).
    pub points: Vec<f64>,
}

/// Box-and-strip artifact for a numeric target.
#[derive(Debug, Clone, Serialize)]
pub struct BoxStripArtifact {
    /// Schema identifier.
    pub schema_version: String,
    /// Target column name.
    pub target: String,
    /// Grouping column name.
    pub grouping: String,
    /// One series per group, ordered group 0 then group 1.
    pub groups: Vec<BoxStripSeries>,
}

/// Quantile of ascending-sorted values by linear interpolation (type 7).
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = q * (n as f64 - 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

fn series(label: &str, values: &[f64]) -> Result<BoxStripSeries> {
    if values.is_empty() {
        return Err(Error::InsufficientData(format!("group {} has no points to plot", label)));
    }
    if values.iter().any(|x| !x.is_finite()) {
        return Err(Error::Validation(format!("group {} contains non-finite values", label)));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let fence_lo = q1 - 1.5 * iqr;
    let fence_hi = q3 + 1.5 * iqr;

    let whisker_lo = sorted.iter().copied().find(|x| *x >= fence_lo).unwrap_or(sorted[0]);
    let whisker_hi = sorted
        .iter()
        .rev()
        .copied()
        .find(|x| *x <= fence_hi)
        .unwrap_or(sorted[sorted.len() - 1]);
    let outliers: Vec<f64> =
        sorted.iter().copied().filter(|x| *x < fence_lo || *x > fence_hi).collect();

    Ok(BoxStripSeries {
        label: label.to_string(),
        n: sorted.len(),
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        whisker_lo,
        whisker_hi,
        outliers,
        points: sorted,
    })
}

/// Build a box-and-strip artifact from the two filtered group samples.
pub fn box_strip_artifact(
    target: &str,
    grouping: &str,
    group0: &[f64],
    group1: &[f64],
) -> Result<BoxStripArtifact> {
    Ok(BoxStripArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        target: target.to_string(),
        grouping: grouping.to_string(),
        groups: vec![series("0", group0)?, series("1", group1)?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_linear_interpolation() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&v, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&v, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&v, 0.75) - 3.25).abs() < 1e-12);
        assert!((quantile(&v, 0.0) - 1.0).abs() < 1e-12);
        assert!((quantile(&v, 1.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn series_five_number_summary() {
        let s = series("0", &[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(s.n, 5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        assert!((s.median - 3.0).abs() < 1e-12);
        assert!((s.q1 - 2.0).abs() < 1e-12);
        assert!((s.q3 - 4.0).abs() < 1e-12);
        assert!(s.outliers.is_empty());
        assert_eq!(s.whisker_lo, 1.0);
        assert_eq!(s.whisker_hi, 5.0);
    }

    #[test]
    fn outliers_beyond_fences() {
        let s = series("1", &[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        // q1=2, q3=4, fence_hi = 4 + 1.5*2 = 7
        assert_eq!(s.outliers, vec![100.0]);
        assert_eq!(s.whisker_hi, 4.0);
    }

    #[test]
    fn artifact_shape() {
        let a = box_strip_artifact("CRP", "Instability", &[1.0, 2.0], &[8.0, 9.0, 10.0]).unwrap();
        assert_eq!(a.schema_version, SCHEMA_VERSION);
        assert_eq!(a.groups.len(), 2);
        assert_eq!(a.groups[0].label, "0");
        assert_eq!(a.groups[1].n, 3);
        assert_eq!(a.groups[1].points, vec![8.0, 9.0, 10.0]);
    }

    #[test]
    fn empty_group_rejected() {
        assert!(matches!(
            box_strip_artifact("x", "g", &[], &[1.0]),
            Err(cc_core::Error::InsufficientData(_))
        ));
    }

    #[test]
    fn single_point_group() {
        let a = box_strip_artifact("x", "g", &[2.0], &[1.0, 3.0]).unwrap();
        let s = &a.groups[0];
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.q3, 2.0);
    }
}
