//! # cc-viz
//!
//! Visualization data artifacts for CohortComp.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects). Actual
//! rendering is left to external presentation layers.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Box-and-strip artifacts for numeric comparisons.
pub mod box_strip;

/// Stacked-bar artifacts for categorical comparisons.
pub mod stacked_bar;

pub use box_strip::{box_strip_artifact, BoxStripArtifact, BoxStripSeries};
pub use stacked_bar::{stacked_bar_artifact, StackedBarArtifact};
