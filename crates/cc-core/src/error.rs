//! Error types for CohortComp

use thiserror::Error;

/// CohortComp error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed tabular input
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required column is absent from the dataset
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Not enough usable rows to run a test
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
