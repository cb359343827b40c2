//! # Public API
//!
//! This module contains the main entry points for the chart generator library.
//!
//! ## Generation Functions
//!
//! - [`generate_chart()`] - Validate a spec and chart an onset curve
//! - [`generate_chart_json()`] - Same, rendered as the game's chart JSON
//! - [`generate_chart_from_sources()`] - Parse YAML spec and JSON curve text first
//!
//! ## Typical Usage
//!
//! ```rust
//! use beatchart::{generate_chart, OnsetCurve, SongSpec};
//!
//! let times: Vec<f64> = (0..=2310).map(|i| i as f64 * 0.1).collect();
//! let strengths = times.iter().map(|t| (t * 2.0).sin().abs()).collect();
//! let curve = OnsetCurve::new(times, strengths)?;
//!
//! let report = generate_chart(&SongSpec::default(), &curve)?;
//! assert!(report.notes.iter().all(|n| n.lane < 4));
//! # Ok::<(), beatchart::ChartError>(())
//! ```

use crate::chart::{ChartEngine, ChartReport};
use crate::config::SongSpec;
use crate::error::ChartError;
use crate::onset::OnsetCurve;
use crate::output::to_chart_json;

/// Generate a chart.
///
/// This is the main entry point for the library.
///
/// # Pipeline
/// 1. Validate the song spec
/// 2. Fix the tempo phase (pinned or estimated from the curve)
/// 3. Per stage: window, grid, selection, gap enforcement, holds, lanes
/// 4. Merge all stages in spawn order
///
/// # Errors
/// Returns [`ChartError`] if the spec fails validation. Stages without playable
/// time are not errors; they show up as skips in the returned report.
pub fn generate_chart(spec: &SongSpec, curve: &OnsetCurve) -> Result<ChartReport, ChartError> {
    let engine = ChartEngine::new(spec, curve)?;
    Ok(engine.run())
}

/// Generate a chart and render it as JSON.
pub fn generate_chart_json(spec: &SongSpec, curve: &OnsetCurve) -> Result<String, ChartError> {
    let report = generate_chart(spec, curve)?;
    to_chart_json(&report.notes)
}

/// Parse a YAML song spec and a JSON onset curve, then generate the chart.
///
/// # Example
/// ```rust
/// use beatchart::generate_chart_from_sources;
///
/// let spec = "duration: 12\nbpm: 120\nphase: 0\nboundaries: [0, 12]\nstages:\n  - { speed: 300, subdivisions: 2, keep: 0.5, min-gap: 0.25, max-gap: 1.0, cluster-gap: 0.2, jumpiness: 0.2 }\n";
/// let curve = r#"{"times": [0, 6, 12], "strengths": [0.1, 1.0, 0.1]}"#;
///
/// let report = generate_chart_from_sources(spec, curve)?;
/// assert_eq!(report.stages.len(), 1);
/// # Ok::<(), beatchart::ChartError>(())
/// ```
pub fn generate_chart_from_sources(spec_yaml: &str, curve_json: &str) -> Result<ChartReport, ChartError> {
    let spec = SongSpec::from_yaml(spec_yaml)?;
    let curve = OnsetCurve::from_json(curve_json)?;
    generate_chart(&spec, &curve)
}
