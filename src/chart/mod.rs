//! # Chart Module
//!
//! Synthesize a staged, four-lane rhythm-game chart from an onset-strength curve.
//!
//! ## Purpose
//! This module turns "where the music has energy" into "what the player presses":
//! 1. **Timing** - beat-locked candidates, ranked by onset strength
//! 2. **Pacing** - no dead air longer than `max_gap`, no bursts tighter than `min_gap`
//! 3. **Playability** - holds from dense runs, lanes that never collide with a hold
//!
//! ## Sub-modules
//! - `grid` - Beat grid construction
//! - `phase` - Tempo phase search against the onset curve
//! - `window` - Per-stage hit windows around transition popups
//! - `select` - Onset-strength candidate ranking
//! - `gaps` - Max-gap densifying and min-gap thinning
//! - `holds` - Run clustering into holds
//! - `lanes` - Lane choice with hold occupancy and jump smoothing
//! - `assemble` - Spawn times, rounding, final merge
//! - `engine` - The per-stage pipeline
//! - `types` - Event, Note, and report types
//!
//! ## Entry Point
//! [`ChartEngine`] - validate a spec, fix the phase, and run every stage
//!
//! ## Example
//! ```rust
//! use beatchart::chart::ChartEngine;
//! use beatchart::{OnsetCurve, SongSpec};
//!
//! let spec = SongSpec::from_yaml(r#"
//! duration: 20
//! bpm: 120
//! phase: 0
//! boundaries: [0, 10, 20]
//! stages:
//!   - { speed: 300, subdivisions: 1, keep: 0.5, min-gap: 0.3, max-gap: 1.0, cluster-gap: 0.3, jumpiness: 0.1 }
//!   - { speed: 300, subdivisions: 2, keep: 0.5, min-gap: 0.2, max-gap: 1.0, cluster-gap: 0.3, jumpiness: 0.3 }
//! "#).unwrap();
//! let curve = OnsetCurve::new(vec![0.0, 20.0], vec![0.2, 0.8]).unwrap();
//!
//! let report = ChartEngine::new(&spec, &curve).unwrap().run();
//!
//! assert!(!report.notes.is_empty());
//! assert!(report.notes.windows(2).all(|w| w[0].spawn <= w[1].spawn));
//! ```
//!
//! ## Determinism
//! Every step except lane choice is a pure function of its inputs. Lane choice
//! draws from one generator seeded by the spec, so equal specs and curves always
//! produce equal charts.
//!
//! ## Related Modules
//! - `config` - `SongSpec` and `StageSpec`
//! - `onset` - `OnsetCurve` interpolation
//! - `output` - JSON rendering of the finished notes

mod assemble;
mod engine;
mod gaps;
mod grid;
mod holds;
mod lanes;
mod phase;
mod select;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use assemble::{assemble_stage, finalize, round_to, SPEED_DECIMALS, TIME_DECIMALS};
pub use engine::ChartEngine;
pub use gaps::{densify, enforce_bounds, thin_by_gap};
pub use grid::{build_grid, grid_step};
pub use holds::{cluster, taps};
pub use lanes::{assign_lane, schedule, ScheduleState};
pub use phase::estimate_phase;
pub use select::{keep_count, select_candidates, PEAK_EMPHASIS};
pub use types::{
    ChartReport, Event, Note, NoteKind, StageOutcome, StageReport, StageStats, LANE_COUNT,
};
pub use window::{compute_window, StageWindow, WindowGeometry};
