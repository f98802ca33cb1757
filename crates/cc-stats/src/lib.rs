//! # cc-stats
//!
//! Statistical tests for CohortComp:
//! - Welch's unequal-variance two-sample t-test
//! - chi-square test of independence over a contingency table
//! - Fisher's exact test for sparse 2×2 tables
//! - the group-comparison driver tying them to a [`cc_data::DataFrame`]

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Group splitting, test selection, and comparison results.
pub mod compare;
/// Contingency tables and the chi-square test of independence.
pub mod contingency;
/// Fisher's exact test for 2×2 tables.
pub mod fisher;
/// Welch's two-sample t-test.
pub mod welch;

pub use compare::{
    compare, compare_all, BatchComparison, ComparisonResult, GroupSummaries, TestKind, ALPHA,
};
pub use contingency::{chi_square_test, ChiSquareResult, ContingencyTable};
pub use fisher::{fisher_exact_2x2, FisherResult};
pub use welch::{welch_t_test, WelchResult};
