//! Tempo phase estimation
//!
//! The tempo is known up front but the position of the first beat is not. The
//! estimator slides a beat grid across one beat period and keeps the offset whose
//! grid lines land on the most onset energy.

use tracing::debug;

use super::grid::build_grid;
use crate::config::PhaseSearch;
use crate::onset::OnsetCurve;

/// Find the tempo phase in `[0, 60 / bpm)` that best aligns a beat grid with onsets.
///
/// Evaluates `search.steps` evenly spaced phases across one beat period. Each
/// candidate's grid is restricted to `[search.window_start, min(search.window_end,
/// duration)]` and scored by the summed interpolated onset strength at its lines.
/// The first candidate with a strictly greater score wins, so ties resolve to the
/// earliest phase. Candidates whose restricted grid is empty are skipped; if every
/// candidate is skipped the phase is 0.
///
/// # Example
/// ```rust
/// use beatchart::chart::estimate_phase;
/// use beatchart::{OnsetCurve, PhaseSearch};
///
/// // Onsets every half second starting at 0.1s (120 bpm)
/// let times: Vec<f64> = (0..2000).map(|i| i as f64 * 0.005).collect();
/// let strengths = (0..2000).map(|i| if i % 100 == 20 { 1.0 } else { 0.0 }).collect();
/// let curve = OnsetCurve::new(times, strengths).unwrap();
///
/// let search = PhaseSearch { window_start: 0.0, window_end: 10.0, steps: 100, subdivisions: 1 };
/// let phase = estimate_phase(120.0, 10.0, &curve, &search);
/// assert!((phase - 0.1).abs() < 0.005);
/// ```
pub fn estimate_phase(bpm: f64, duration: f64, curve: &OnsetCurve, search: &PhaseSearch) -> f64 {
    let beat_period = 60.0 / bpm;
    let window_end = search.window_end.min(duration);

    let mut best_phase = 0.0;
    let mut best_score = f64::NEG_INFINITY;

    for step in 0..search.steps {
        let phase = beat_period * step as f64 / search.steps as f64;
        let grid = build_grid(duration, bpm, search.subdivisions, phase);

        let mut lines = grid
            .iter()
            .filter(|&&t| t >= search.window_start && t <= window_end)
            .peekable();
        if lines.peek().is_none() {
            continue;
        }

        let score: f64 = lines.map(|&t| curve.strength_at(t)).sum();
        if score > best_score {
            best_score = score;
            best_phase = phase;
        }
    }

    debug!(
        "Estimated phase {:.4}s (score {:.3}, {} candidates)",
        best_phase, best_score, search.steps
    );
    best_phase
}
