//! # cc-core
//!
//! Shared error type and version information for CohortComp.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{Error, Result};

/// Workspace version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
