//! # Error Types
//!
//! This module defines all error types for the chart generator.
//!
//! Fatal errors carry enough location information (stage number or field name) to
//! point at the offending part of the song spec. Stage skips are not errors: a stage
//! whose window is empty is reported through [`StageSkip`] and the run continues.
//!
//! ## Error Types
//! - `ConfigError` - An out-of-domain song-level parameter
//! - `StageConfigError` - An out-of-domain parameter of one stage
//! - `SpecParseError` - The YAML song spec could not be read
//! - `OnsetCurveError` - The onset curve is malformed
//! - `SerializationError` - The chart could not be written as JSON
//!
//! ## Usage
//! ```rust
//! use beatchart::{generate_chart, ChartError, OnsetCurve, SongSpec};
//!
//! let curve = OnsetCurve::new(vec![0.0, 231.0], vec![0.0, 0.0]).unwrap();
//! match generate_chart(&SongSpec::default(), &curve) {
//!     Ok(report) => println!("{} notes", report.notes.len()),
//!     Err(ChartError::StageConfigError { stage, message }) => {
//!         eprintln!("Stage {} is misconfigured: {}", stage, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// Invalid song-level parameter.
    ///
    /// # Example
    /// ```
    /// # use beatchart::ChartError;
    /// let err = ChartError::ConfigError {
    ///     field: "bpm".to_string(),
    ///     message: "must be positive, got 0".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid configuration for bpm: must be positive, got 0");
    /// ```
    #[error("Invalid configuration for {field}: {message}")]
    ConfigError { field: String, message: String },

    /// Invalid parameter of a single stage (stages are numbered from 1).
    ///
    /// # Example
    /// ```
    /// # use beatchart::ChartError;
    /// let err = ChartError::StageConfigError {
    ///     stage: 3,
    ///     message: "keep fraction must be in (0, 1], got 0".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid configuration at stage 3: keep fraction must be in (0, 1], got 0"
    /// );
    /// ```
    #[error("Invalid configuration at stage {stage}: {message}")]
    StageConfigError { stage: usize, message: String },

    /// The YAML song spec is not well-formed.
    #[error("Invalid song spec: {0}")]
    SpecParseError(String),

    /// The onset curve is empty, mismatched, unordered, or contains non-finite values.
    #[error("Invalid onset curve: {0}")]
    OnsetCurveError(String),

    #[error("Failed to serialize chart: {0}")]
    SerializationError(String),
}

/// Why a stage produced no notes.
///
/// Skips are recovered locally: the engine records them in the report and moves on
/// to the next stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageSkip {
    /// The transition and clear margins left no playable time.
    #[error("stage {stage} has no playable window ({hit_start:.3}s -> {hit_end:.3}s)")]
    EmptyWindow {
        stage: usize,
        hit_start: f64,
        hit_end: f64,
    },

    /// The window is non-empty but no grid line falls inside it.
    #[error("stage {stage} has no grid points inside its window")]
    EmptyCandidateGrid { stage: usize },
}
