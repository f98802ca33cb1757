//! Typed in-memory dataset.
//!
//! A [`DataFrame`] is an ordered collection of named columns, loaded once per
//! session and treated as immutable afterwards. A column stores either f64
//! values or strings; empty CSV cells become `None`.

use cc_core::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Declared storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Every non-missing cell parsed as f64 (booleans coerced to 0/1).
    Numeric,
    /// At least one non-missing cell did not parse as a number.
    Categorical,
}

/// A single column of data. Missing cells are `None`.
#[derive(Debug, Clone)]
pub enum Column {
    /// Floating-point values.
    Numeric(Vec<Option<f64>>),
    /// String-valued categories.
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Number of rows (including missing cells).
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    /// True if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared storage type.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Numeric(_) => ColumnType::Numeric,
            Column::Categorical(_) => ColumnType::Categorical,
        }
    }

    /// Number of missing cells.
    pub fn n_missing(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }
}

/// Immutable tabular dataset.
#[derive(Debug, Clone)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataFrame {
    /// Build a frame from parallel name/column vectors.
    ///
    /// Names must be unique and all columns must share the same length.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(Error::Validation(format!(
                "{} names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        if columns.is_empty() {
            return Err(Error::Validation("dataset has no columns".to_string()));
        }
        let n_rows = columns[0].len();
        for (name, col) in names.iter().zip(&columns) {
            if col.len() != n_rows {
                return Err(Error::Validation(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    col.len(),
                    n_rows
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::Validation(format!("duplicate column name '{}'", name)));
            }
        }
        Ok(Self { names, columns, n_rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a column by exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column by name, or `MissingColumn`.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.index_of(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Column by positional index.
    pub fn column_at(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    /// Per-column summary statistics, in load order.
    pub fn summaries(&self) -> Vec<ColumnSummary> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| ColumnSummary::of(name, col))
            .collect()
    }
}

/// Summary statistics of a numeric column (over non-missing cells).
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n−1); 0 for a single observation.
    pub sd: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

/// Summary statistics of a categorical column (over non-missing cells).
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalSummary {
    /// Number of distinct categories.
    pub distinct: usize,
    /// Most frequent category (ties broken lexicographically).
    pub mode: String,
    /// Count of the most frequent category.
    pub mode_count: usize,
}

/// Per-column summary for `describe`-style output.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Canonical column name.
    pub name: String,
    /// Declared storage type.
    pub column_type: ColumnType,
    /// Non-missing cell count.
    pub count: usize,
    /// Missing cell count.
    pub missing: usize,
    /// Numeric stats (numeric columns with at least one value).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    /// Categorical stats (categorical columns with at least one value).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical: Option<CategoricalSummary>,
}

impl ColumnSummary {
    fn of(name: &str, col: &Column) -> Self {
        let missing = col.n_missing();
        let count = col.len() - missing;
        let (numeric, categorical) = match col {
            Column::Numeric(v) => {
                let vals: Vec<f64> = v.iter().flatten().copied().collect();
                (numeric_summary(&vals), None)
            }
            Column::Categorical(v) => {
                let vals: Vec<&str> = v.iter().flatten().map(String::as_str).collect();
                (None, categorical_summary(&vals))
            }
        };
        Self {
            name: name.to_string(),
            column_type: col.column_type(),
            count,
            missing,
            numeric,
            categorical,
        }
    }
}

fn numeric_summary(vals: &[f64]) -> Option<NumericSummary> {
    if vals.is_empty() {
        return None;
    }
    let n = vals.len() as f64;
    let mean = vals.iter().sum::<f64>() / n;
    let sd = if vals.len() > 1 {
        (vals.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(NumericSummary { mean, sd, min, max })
}

fn categorical_summary(vals: &[&str]) -> Option<CategoricalSummary> {
    if vals.is_empty() {
        return None;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in vals {
        *counts.entry(v).or_insert(0) += 1;
    }
    let distinct = counts.len();
    // Deterministic mode: highest count, then lexicographic.
    let (mode, mode_count) = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(k, c)| (k.to_string(), c))?;
    Some(CategoricalSummary { distinct, mode, mode_count })
}
