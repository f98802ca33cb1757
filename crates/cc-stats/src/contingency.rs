//! Contingency tables and the chi-square test of independence.

use cc_core::{Error, Result};
use serde::Serialize;

/// Minimum expected cell count below which the chi-square approximation is
/// considered unreliable.
pub const MIN_EXPECTED: f64 = 5.0;

/// Cross-tabulation of target categories against the two comparison groups.
///
/// Rows are categories (sorted), columns are group 0 and group 1 counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    /// Category labels, sorted ascending.
    pub categories: Vec<String>,
    /// Per-category counts in group 0, aligned with `categories`.
    pub group0: Vec<u64>,
    /// Per-category counts in group 1, aligned with `categories`.
    pub group1: Vec<u64>,
}

impl ContingencyTable {
    /// Build a table from per-row `(category, group)` observations.
    ///
    /// `group` must be 0 or 1 (callers filter beforehand).
    pub fn from_observations<S: AsRef<str>>(obs: &[(S, u8)]) -> Result<Self> {
        let mut counts: std::collections::BTreeMap<String, [u64; 2]> =
            std::collections::BTreeMap::new();
        for (cat, g) in obs {
            if *g > 1 {
                return Err(Error::Validation(format!("group label must be 0 or 1, got {}", g)));
            }
            counts.entry(cat.as_ref().to_string()).or_insert([0, 0])[*g as usize] += 1;
        }
        let categories: Vec<String> = counts.keys().cloned().collect();
        let group0: Vec<u64> = counts.values().map(|c| c[0]).collect();
        let group1: Vec<u64> = counts.values().map(|c| c[1]).collect();
        Ok(Self { categories, group0, group1 })
    }

    /// Number of category rows.
    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    /// Total observation count.
    pub fn total(&self) -> u64 {
        self.group0.iter().sum::<u64>() + self.group1.iter().sum::<u64>()
    }

    /// Column totals `(group 0, group 1)`.
    pub fn group_totals(&self) -> (u64, u64) {
        (self.group0.iter().sum(), self.group1.iter().sum())
    }

    /// Expected counts under independence, row-major `[e0, e1]` per category.
    pub fn expected(&self) -> Vec<[f64; 2]> {
        let n = self.total() as f64;
        let (c0, c1) = self.group_totals();
        self.group0
            .iter()
            .zip(&self.group1)
            .map(|(&g0, &g1)| {
                let row = (g0 + g1) as f64;
                [row * c0 as f64 / n, row * c1 as f64 / n]
            })
            .collect()
    }

    /// Smallest expected cell count.
    pub fn min_expected(&self) -> f64 {
        self.expected().iter().flatten().copied().fold(f64::INFINITY, f64::min)
    }

    /// True for a 2-category table (2×2 with the two group columns).
    pub fn is_2x2(&self) -> bool {
        self.n_categories() == 2
    }
}

/// Result of a chi-square test of independence.
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquareResult {
    /// Chi-squared test statistic (no continuity correction).
    pub chi_squared: f64,
    /// Degrees of freedom, `(rows − 1) · (cols − 1)`.
    pub df: usize,
    /// p-value from the chi-squared distribution.
    pub p_value: f64,
    /// Smallest expected cell count.
    pub min_expected: f64,
    /// True when `min_expected < 5`, i.e. the asymptotic approximation is weak.
    pub low_expected_counts: bool,
}

/// Chi-squared CDF `F(x; k)` via the regularised lower incomplete gamma
/// function `P(k/2, x/2)`.
fn chi_squared_cdf(x: f64, k: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    statrs::function::gamma::gamma_lr(k / 2.0, x / 2.0)
}

/// Chi-square test of independence for a categories × groups table.
///
/// # Errors
/// - `InsufficientData` if the table has fewer than 2 categories or an empty
///   group column (df would be 0 or expected counts undefined).
pub fn chi_square_test(table: &ContingencyTable) -> Result<ChiSquareResult> {
    if table.n_categories() < 2 {
        return Err(Error::InsufficientData(format!(
            "chi-square test needs at least 2 categories, got {}",
            table.n_categories()
        )));
    }
    let (c0, c1) = table.group_totals();
    if c0 == 0 || c1 == 0 {
        return Err(Error::InsufficientData(
            "a comparison group has no usable rows".to_string(),
        ));
    }

    let expected = table.expected();
    let mut chi_squared = 0.0;
    for ((&g0, &g1), e) in table.group0.iter().zip(&table.group1).zip(&expected) {
        // Row totals are > 0 by construction (only observed categories),
        // and both column totals are > 0, so every expected cell is > 0.
        for (obs, exp) in [(g0 as f64, e[0]), (g1 as f64, e[1])] {
            let d = obs - exp;
            chi_squared += d * d / exp;
        }
    }

    let df = table.n_categories() - 1;
    let p_value = 1.0 - chi_squared_cdf(chi_squared, df as f64);
    let min_expected = table.min_expected();

    Ok(ChiSquareResult {
        chi_squared,
        df,
        p_value,
        min_expected,
        low_expected_counts: min_expected < MIN_EXPECTED,
    })
}
