//! Two-group comparison driver.
//!
//! Splits a dataset by the binary grouping column, selects the test by the
//! target column's storage type, and reports statistic, p-value, and group
//! summaries. A comparison is a pure function of `(frame, grouping, target)`.

use cc_core::{Error, Result};
use cc_data::{Column, DataFrame};
use serde::Serialize;

use crate::contingency::{chi_square_test, ContingencyTable};
use crate::fisher::fisher_exact_2x2;
use crate::welch::welch_t_test;

/// Fixed significance threshold for the `significant` classification.
pub const ALPHA: f64 = 0.05;

/// Which statistical test produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Welch's unequal-variance t-test (numeric target).
    WelchT,
    /// Chi-square test of independence (categorical target).
    ChiSquare,
    /// Fisher's exact test (sparse 2×2 categorical target).
    FisherExact,
}

/// Summary of one numeric comparison group.
#[derive(Debug, Clone, Serialize)]
pub struct NumericGroupSummary {
    /// Usable row count.
    pub n: usize,
    /// Group mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub sd: f64,
}

/// Per-group summaries attached to a comparison result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSummaries {
    /// Numeric target: per-group n / mean / sd.
    Numeric {
        /// Group 0 (grouping value 0).
        group0: NumericGroupSummary,
        /// Group 1 (grouping value 1).
        group1: NumericGroupSummary,
    },
    /// Categorical target: the contingency counts.
    Categorical {
        /// Cross-tabulation of categories against the two groups.
        table: ContingencyTable,
    },
}

/// Result of one two-group comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    /// Target column name.
    pub target: String,
    /// Grouping column name.
    pub grouping: String,
    /// Test that was run.
    pub test: TestKind,
    /// Test statistic (t, chi-squared, or odds ratio for Fisher).
    pub statistic: f64,
    /// Degrees of freedom; `None` for the exact test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub df: Option<f64>,
    /// Two-sided p-value.
    pub p_value: f64,
    /// `p_value < ALPHA`.
    pub significant: bool,
    /// Rows used after filtering.
    pub n_used: usize,
    /// Rows dropped (missing grouping/target value, or grouping value
    /// outside {0, 1}).
    pub n_excluded: usize,
    /// True when the chi-square approximation had an expected cell < 5
    /// (also set when that triggered the exact-test fallback).
    pub low_expected_counts: bool,
    /// Per-group summaries.
    pub summaries: GroupSummaries,
}

/// Group indicator parsed from one grouping cell. `None` excludes the row.
fn group_of(col: &Column, row: usize) -> Option<u8> {
    match col {
        Column::Numeric(v) => match v[row] {
            Some(x) if x == 0.0 => Some(0),
            Some(x) if x == 1.0 => Some(1),
            _ => None,
        },
        Column::Categorical(v) => match v[row].as_deref().map(str::trim) {
            Some("0") => Some(0),
            Some("1") => Some(1),
            _ => None,
        },
    }
}

/// Split a numeric target into the two comparison groups.
///
/// Rows with a missing grouping or target value, or a grouping value outside
/// {0, 1}, are dropped pairwise. Exposed so presentation layers can rebuild
/// the raw per-group samples (e.g. for a strip plot overlay).
pub fn numeric_groups(
    frame: &DataFrame,
    grouping: &str,
    target: &str,
) -> Result<(Vec<f64>, Vec<f64>, usize)> {
    let gcol = frame.column(grouping)?;
    let tcol = frame.column(target)?;
    let values = match tcol {
        Column::Numeric(v) => v,
        Column::Categorical(_) => {
            return Err(Error::Validation(format!("column '{}' is not numeric", target)))
        }
    };

    let mut g0 = Vec::new();
    let mut g1 = Vec::new();
    let mut excluded = 0usize;
    for row in 0..frame.n_rows() {
        match (group_of(gcol, row), values[row]) {
            (Some(0), Some(x)) => g0.push(x),
            (Some(1), Some(x)) => g1.push(x),
            _ => excluded += 1,
        }
    }
    Ok((g0, g1, excluded))
}

fn categorical_groups(
    frame: &DataFrame,
    grouping: &str,
    target: &str,
) -> Result<(Vec<(String, u8)>, usize)> {
    let gcol = frame.column(grouping)?;
    let tcol = frame.column(target)?;
    let values = match tcol {
        Column::Categorical(v) => v,
        Column::Numeric(_) => {
            return Err(Error::Validation(format!("column '{}' is not categorical", target)))
        }
    };

    let mut obs = Vec::new();
    let mut excluded = 0usize;
    for row in 0..frame.n_rows() {
        match (group_of(gcol, row), &values[row]) {
            (Some(g), Some(cat)) => obs.push((cat.clone(), g)),
            _ => excluded += 1,
        }
    }
    Ok((obs, excluded))
}

/// Run the appropriate two-group comparison for `target` against the binary
/// `grouping` column.
///
/// Numeric targets get Welch's t-test; categorical targets get the
/// chi-square test of independence, falling back to Fisher's exact test for
/// 2×2 tables with an expected cell count below 5.
pub fn compare(frame: &DataFrame, grouping: &str, target: &str) -> Result<ComparisonResult> {
    if target == grouping {
        return Err(Error::Validation(
            "target column cannot be the grouping column".to_string(),
        ));
    }

    let tcol = frame.column(target)?;
    match tcol {
        Column::Numeric(_) => compare_numeric(frame, grouping, target),
        Column::Categorical(_) => compare_categorical(frame, grouping, target),
    }
}

fn compare_numeric(frame: &DataFrame, grouping: &str, target: &str) -> Result<ComparisonResult> {
    let (g0, g1, excluded) = numeric_groups(frame, grouping, target)?;
    if excluded > 0 {
        tracing::debug!(column = %target, excluded, "rows dropped before numeric comparison");
    }
    if g0.is_empty() || g1.is_empty() {
        return Err(Error::InsufficientData(format!(
            "no usable rows in group {} for '{}'",
            if g0.is_empty() { 0 } else { 1 },
            target
        )));
    }

    let r = welch_t_test(&g0, &g1)?;

    Ok(ComparisonResult {
        target: target.to_string(),
        grouping: grouping.to_string(),
        test: TestKind::WelchT,
        statistic: r.t,
        df: Some(r.df),
        p_value: r.p_value,
        significant: r.p_value < ALPHA,
        n_used: r.n0 + r.n1,
        n_excluded: excluded,
        low_expected_counts: false,
        summaries: GroupSummaries::Numeric {
            group0: NumericGroupSummary { n: r.n0, mean: r.mean0, sd: r.sd0 },
            group1: NumericGroupSummary { n: r.n1, mean: r.mean1, sd: r.sd1 },
        },
    })
}

fn compare_categorical(
    frame: &DataFrame,
    grouping: &str,
    target: &str,
) -> Result<ComparisonResult> {
    let (obs, excluded) = categorical_groups(frame, grouping, target)?;
    if excluded > 0 {
        tracing::debug!(column = %target, excluded, "rows dropped before categorical comparison");
    }

    let table = ContingencyTable::from_observations(&obs)?;
    let (c0, c1) = table.group_totals();
    if c0 == 0 || c1 == 0 {
        return Err(Error::InsufficientData(format!(
            "no usable rows in group {} for '{}'",
            if c0 == 0 { 0 } else { 1 },
            target
        )));
    }

    let chi = chi_square_test(&table)?;
    let n_used = table.total() as usize;

    // Exact-test fallback for sparse 2×2 tables; larger sparse tables keep
    // the chi-square result but carry the low_expected_counts flag.
    if chi.low_expected_counts && table.is_2x2() {
        let f = fisher_exact_2x2(
            table.group0[0],
            table.group1[0],
            table.group0[1],
            table.group1[1],
        )?;
        return Ok(ComparisonResult {
            target: target.to_string(),
            grouping: grouping.to_string(),
            test: TestKind::FisherExact,
            statistic: f.odds_ratio,
            df: None,
            p_value: f.p_value,
            significant: f.p_value < ALPHA,
            n_used,
            n_excluded: excluded,
            low_expected_counts: true,
            summaries: GroupSummaries::Categorical { table },
        });
    }

    Ok(ComparisonResult {
        target: target.to_string(),
        grouping: grouping.to_string(),
        test: TestKind::ChiSquare,
        statistic: chi.chi_squared,
        df: Some(chi.df as f64),
        p_value: chi.p_value,
        significant: chi.p_value < ALPHA,
        n_used,
        n_excluded: excluded,
        low_expected_counts: chi.low_expected_counts,
        summaries: GroupSummaries::Categorical { table },
    })
}

/// One failed column in a batch comparison.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Target column name.
    pub target: String,
    /// Error message.
    pub error: String,
}

/// Outcome of comparing every eligible column against the grouping column.
#[derive(Debug, Clone, Serialize)]
pub struct BatchComparison {
    /// Grouping column name.
    pub grouping: String,
    /// Successful comparisons, in column load order.
    pub results: Vec<ComparisonResult>,
    /// Columns whose comparison failed, with the reason.
    pub failures: Vec<BatchFailure>,
}

/// Compare every non-grouping column, collecting per-column failures instead
/// of aborting the batch.
pub fn compare_all(frame: &DataFrame, grouping: &str) -> Result<BatchComparison> {
    if frame.index_of(grouping).is_none() {
        return Err(Error::MissingColumn(grouping.to_string()));
    }

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for name in frame.names() {
        if name == grouping {
            continue;
        }
        match compare(frame, grouping, name) {
            Ok(r) => results.push(r),
            Err(e) => {
                tracing::debug!(column = %name, error = %e, "comparison failed");
                failures.push(BatchFailure { target: name.clone(), error: e.to_string() });
            }
        }
    }
    Ok(BatchComparison { grouping: grouping.to_string(), results, failures })
}
