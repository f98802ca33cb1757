//! Grouping-column resolution and column classification.

use cc_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::frame::{ColumnType, DataFrame};
use crate::reader::canonical_name;

/// Declarative alias table for resolving the binary grouping column.
///
/// Aliases are tried in order and matched case-insensitively against the
/// frame's canonical column names. Aliases may carry parenthetical
/// annotations themselves ("Instability (0/1)"); they are canonicalized the
/// same way as headers before matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Accepted names for the grouping column.
    pub aliases: Vec<String>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            aliases: vec![
                "Instability".to_string(),
                "Instability (0/1)".to_string(),
                "instability".to_string(),
            ],
        }
    }
}

impl GroupingConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let cfg: GroupingConfig = serde_json::from_str(&json)?;
        if cfg.aliases.is_empty() {
            return Err(Error::Validation("grouping config has no aliases".to_string()));
        }
        Ok(cfg)
    }

    /// Resolve the grouping column against a frame's canonical names.
    ///
    /// Returns the matched column name, or `MissingColumn` naming the alias
    /// list when nothing matches. No comparison runs without this column.
    pub fn resolve(&self, frame: &DataFrame) -> Result<String> {
        for alias in &self.aliases {
            let wanted = canonical_name(alias);
            for name in frame.names() {
                if name.eq_ignore_ascii_case(&wanted) {
                    return Ok(name.clone());
                }
            }
        }
        Err(Error::MissingColumn(format!(
            "no grouping column found (tried: {})",
            self.aliases.join(", ")
        )))
    }
}

/// Partition of non-grouping columns by declared storage type.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnClassification {
    /// Resolved grouping column name.
    pub grouping: String,
    /// Numeric target candidates, in load order.
    pub numeric: Vec<String>,
    /// Categorical target candidates, in load order.
    pub categorical: Vec<String>,
}

/// Classify every non-grouping column as numeric or categorical.
pub fn classify_columns(frame: &DataFrame, grouping: &str) -> Result<ColumnClassification> {
    if frame.index_of(grouping).is_none() {
        return Err(Error::MissingColumn(grouping.to_string()));
    }
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for name in frame.names() {
        if name == grouping {
            continue;
        }
        match frame.column(name)?.column_type() {
            ColumnType::Numeric => numeric.push(name.clone()),
            ColumnType::Categorical => categorical.push(name.clone()),
        }
    }
    Ok(ColumnClassification { grouping: grouping.to_string(), numeric, categorical })
}
