//! Onset-driven candidate selection

use std::cmp::Ordering;

use super::window::StageWindow;
use crate::onset::OnsetCurve;

/// Exponent applied to onset strength before ranking; >1 favors clear peaks.
pub const PEAK_EMPHASIS: f64 = 1.6;

/// Number of candidates kept for a given count and keep fraction (at least 1).
pub fn keep_count(count: usize, keep_fraction: f64) -> usize {
    if count == 0 {
        return 0;
    }
    // absorb float error in the product, e.g. 10 * 0.3 = 3.0000000000000004
    let wanted = (count as f64 * keep_fraction - 1e-9).ceil();
    (wanted.max(1.0) as usize).min(count)
}

/// Keep the strongest fraction of the grid points inside `window`.
///
/// Each in-window grid point is scored by its interpolated onset strength raised to
/// [`PEAK_EMPHASIS`]. The top `ceil(count * keep_fraction)` scores are kept; equal
/// scores are ranked by grid order. The result is in chronological order.
pub fn select_candidates(
    grid: &[f64],
    window: &StageWindow,
    curve: &OnsetCurve,
    keep_fraction: f64,
) -> Vec<f64> {
    let candidates: Vec<f64> = grid.iter().copied().filter(|&t| window.contains(t)).collect();
    let keep = keep_count(candidates.len(), keep_fraction);

    let mut ranked: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, &t)| (i, curve.strength_at(t).powf(PEAK_EMPHASIS)))
        .collect();
    // stable, so equal scores stay in grid order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut kept: Vec<usize> = ranked.into_iter().take(keep).map(|(i, _)| i).collect();
    kept.sort_unstable();
    kept.into_iter().map(|i| candidates[i]).collect()
}
