//! # cc-data
//!
//! Tabular data layer for CohortComp:
//! - CSV/TSV ingestion with per-column type inference
//! - column-name canonicalization and duplicate-header dedup
//! - grouping-column alias resolution from declarative config
//! - column classification (numeric vs categorical) and summaries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod frame;
pub mod reader;
pub mod schema;

pub use frame::{Column, ColumnSummary, ColumnType, DataFrame};
pub use reader::{canonical_name, read_csv, read_csv_with_delimiter};
pub use schema::{classify_columns, ColumnClassification, GroupingConfig};
