//! # Chart Output
//!
//! Renders a finished chart for the game client and for people.
//!
//! ## JSON Format
//! The chart is a pretty-printed array of notes in spawn order:
//!
//! ```json
//! [
//!   {
//!     "spawn": 0.2375,
//!     "hit": 2.3,
//!     "end": 2.3,
//!     "lane": 1,
//!     "stage": 1,
//!     "speed": 320.0,
//!     "type": "tap"
//!   }
//! ]
//! ```
//!
//! Times carry 4 decimals and speed 2; the rounding is done when notes are built.

use crate::chart::{ChartReport, Note, StageOutcome};
use crate::error::ChartError;

/// Serialize notes as the game's chart JSON.
pub fn to_chart_json(notes: &[Note]) -> Result<String, ChartError> {
    serde_json::to_string_pretty(notes).map_err(|e| ChartError::SerializationError(e.to_string()))
}

/// Human-readable summary of a chart run: phase, per-stage windows and counts.
pub fn format_summary(report: &ChartReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Phase {:.4}s | notes={} | holds={}\n",
        report.phase,
        report.notes.len(),
        report.hold_count()
    ));
    out.push_str("Playable stage windows:\n");

    for stage in &report.stages {
        match &stage.outcome {
            StageOutcome::Generated(stats) => {
                out.push_str(&format!(
                    "  Stage {}: {:.2}s -> {:.2}s | cand={} selected={} kept={} notes={} holds={} dropped={}\n",
                    stage.stage,
                    stage.hit_start,
                    stage.hit_end,
                    stats.candidates,
                    stats.selected,
                    stats.kept,
                    stats.notes,
                    stats.holds,
                    stats.dropped
                ));
            }
            StageOutcome::Skipped(skip) => {
                out.push_str(&format!("  Stage {}: skipped, {}\n", stage.stage, skip));
            }
        }
    }

    out
}
