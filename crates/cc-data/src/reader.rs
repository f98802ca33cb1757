//! CSV/TSV ingestion with per-column type inference.
//!
//! Strategy: read all rows as strings, then build typed columns by attempting
//! numeric parsing per column. Columns where every non-empty cell parses as
//! f64 (or true/false) become numeric; everything else stays categorical.

use cc_core::{Error, Result};
use std::path::Path;

use crate::frame::{Column, DataFrame};

/// Strip a parenthetical annotation from a raw header.
///
/// `"Instability (0/1)"` → `"Instability"`. If stripping would leave an empty
/// name, the trimmed raw header is kept as-is.
pub fn canonical_name(raw: &str) -> String {
    let base = raw.split('(').next().unwrap_or(raw).trim();
    if base.is_empty() {
        raw.trim().to_string()
    } else {
        base.to_string()
    }
}

/// Deduplicate canonical headers by suffixing repeats with `.1`, `.2`, ...
fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let n = seen.entry(name.clone()).or_insert(0);
        if *n == 0 {
            out.push(name.clone());
        } else {
            out.push(format!("{}.{}", name, n));
        }
        *seen.get_mut(&name).unwrap() += 1;
    }
    out
}

/// Delimiter chosen by file extension: `.tsv` → tab, everything else comma.
fn delimiter_for_path(path: &Path) -> u8 {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
    if ext == "tsv" {
        b'\t'
    } else {
        b','
    }
}

fn map_csv_err(e: csv::Error) -> Error {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::Parse(format!("{:?}", other)),
        }
    } else {
        Error::Parse(e.to_string())
    }
}

/// Read a CSV/TSV file into a [`DataFrame`], picking the delimiter from the
/// file extension.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    read_csv_with_delimiter(path, delimiter_for_path(path))
}

/// Read a delimited text file into a [`DataFrame`].
pub fn read_csv_with_delimiter(path: &Path, delimiter: u8) -> Result<DataFrame> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(map_csv_err)?;

    let headers: Vec<String> =
        rdr.headers().map_err(map_csv_err)?.iter().map(canonical_name).collect();
    if headers.is_empty() {
        return Err(Error::Parse("file has no columns".to_string()));
    }
    let names = dedup_names(headers);

    let n_cols = names.len();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); n_cols];
    for result in rdr.records() {
        let record = result.map_err(map_csv_err)?;
        for j in 0..n_cols {
            cells[j].push(record.get(j).unwrap_or("").trim().to_string());
        }
    }
    if cells[0].is_empty() {
        return Err(Error::Parse("file contains no data rows".to_string()));
    }

    let columns: Vec<Column> = cells.iter().map(|col| infer_column(col)).collect();
    let frame = DataFrame::new(names, columns)?;
    tracing::debug!(rows = frame.n_rows(), cols = frame.n_cols(), "dataset loaded");
    Ok(frame)
}

/// Build a typed column from raw string cells. Empty cells are missing.
fn infer_column(cells: &[String]) -> Column {
    let all_numeric = cells.iter().all(|s| {
        s.is_empty()
            || s.parse::<f64>().is_ok()
            || s.eq_ignore_ascii_case("true")
            || s.eq_ignore_ascii_case("false")
    });
    let any_value = cells.iter().any(|s| !s.is_empty());

    if all_numeric && any_value {
        Column::Numeric(
            cells
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        None
                    } else if s.eq_ignore_ascii_case("true") {
                        Some(1.0)
                    } else if s.eq_ignore_ascii_case("false") {
                        Some(0.0)
                    } else {
                        // all_numeric guarantees this parses
                        s.parse::<f64>().ok()
                    }
                })
                .collect(),
        )
    } else {
        Column::Categorical(
            cells.iter().map(|s| if s.is_empty() { None } else { Some(s.clone()) }).collect(),
        )
    }
}
