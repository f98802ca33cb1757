//! Stacked-bar artifact for categorical two-group comparisons.

use cc_stats::ContingencyTable;
use serde::Serialize;

/// Artifact schema identifier.
pub const SCHEMA_VERSION: &str = "cohortcomp/stacked_bar/v1";

/// Stacked-bar chart data: per-category counts for each comparison group.
#[derive(Debug, Clone, Serialize)]
pub struct StackedBarArtifact {
    /// Schema identifier.
    pub schema_version: String,
    /// Target column name.
    pub target: String,
    /// Grouping column name.
    pub grouping: String,
    /// Group labels for the two stacks.
    pub group_labels: [String; 2],
    /// Category labels, sorted ascending.
    pub categories: Vec<String>,
    /// Group 0 counts, aligned with `categories`.
    pub group0_counts: Vec<u64>,
    /// Group 1 counts, aligned with `categories`.
    pub group1_counts: Vec<u64>,
}

/// Build a stacked-bar artifact from a contingency table.
pub fn stacked_bar_artifact(
    target: &str,
    grouping: &str,
    table: &ContingencyTable,
) -> StackedBarArtifact {
    StackedBarArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        target: target.to_string(),
        grouping: grouping.to_string(),
        group_labels: ["0".to_string(), "1".to_string()],
        categories: table.categories.clone(),
        group0_counts: table.group0.clone(),
        group1_counts: table.group1.clone(),
    }
}
