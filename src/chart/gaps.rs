//! Gap enforcement
//!
//! Onset selection alone leaves long silences in quiet passages and crowds in busy
//! ones. Gap enforcement fixes both in two ordered passes:
//!
//! 1. **Densify** - every gap longer than `max_gap` (including the edges from the
//!    window start to the first hit and from the last hit to the window end) gets up
//!    to `fill_rate` grid-aligned fillers, picked by evenly subdividing the grid
//!    points strictly inside the gap.
//! 2. **Thin** - walk the sorted, de-duplicated result and keep a point only if it is
//!    at least `min_gap` after the previously kept one.
//!
//! Thinning runs last, so `min_gap` always holds. `max_gap` holds between kept hits
//! when the fill rate can cover each gap and `min_gap` is small next to `max_gap`.

use super::window::StageWindow;

/// Run both passes: [`densify`] then [`thin_by_gap`].
///
/// # Example
/// ```rust
/// use beatchart::chart::{enforce_bounds, StageWindow};
///
/// let grid: Vec<f64> = (0..=10).map(|i| i as f64).collect();
/// let window = StageWindow { hit_start: 0.0, hit_end: 10.0, travel_time: 1.0 };
///
/// let out = enforce_bounds(&[5.0], &grid, &window, 2.0, 0.5, 1);
/// assert_eq!(out, vec![2.0, 5.0, 7.0]);
/// ```
pub fn enforce_bounds(
    chosen: &[f64],
    grid: &[f64],
    window: &StageWindow,
    max_gap: f64,
    min_gap: f64,
    fill_rate: usize,
) -> Vec<f64> {
    let densified = densify(chosen, grid, window, max_gap, fill_rate);
    thin_by_gap(&densified, min_gap)
}

/// Fill oversized gaps with grid-aligned points.
///
/// Only in-window points take part. If `chosen` has no in-window points but the
/// window holds grid lines, the line nearest the window midpoint seeds the pass.
/// Gaps with no grid line strictly inside them are left as they are. The result is
/// sorted and free of duplicates.
pub fn densify(
    chosen: &[f64],
    grid: &[f64],
    window: &StageWindow,
    max_gap: f64,
    fill_rate: usize,
) -> Vec<f64> {
    let mut kept: Vec<f64> = chosen.iter().copied().filter(|&t| window.contains(t)).collect();
    kept.sort_by(f64::total_cmp);

    let stage_grid: Vec<f64> = grid.iter().copied().filter(|&t| window.contains(t)).collect();
    if stage_grid.is_empty() {
        return kept;
    }

    if kept.is_empty() {
        let mid = window.midpoint();
        let seed = stage_grid
            .iter()
            .copied()
            .fold(stage_grid[0], |best, t| {
                if (t - mid).abs() < (best - mid).abs() {
                    t
                } else {
                    best
                }
            });
        kept.push(seed);
    }

    let mut filled = kept.clone();

    // Virtual edge anchors at the window bounds; they are never emitted themselves
    let anchors: Vec<f64> = std::iter::once(window.hit_start)
        .chain(kept.iter().copied())
        .chain(std::iter::once(window.hit_end))
        .collect();
    for pair in anchors.windows(2) {
        fill_between(pair[0], pair[1], &stage_grid, max_gap, fill_rate, &mut filled);
    }

    filled.sort_by(f64::total_cmp);
    filled.dedup();
    filled
}

/// Insert up to `fill_rate` lines strictly between `a` and `b` if the gap is too long.
///
/// With `n` interior lines and `k = min(fill_rate, n)` fillers, filler `j` (1-based)
/// is interior line `floor(j * (n - 1) / (k + 1))`.
fn fill_between(a: f64, b: f64, stage_grid: &[f64], max_gap: f64, fill_rate: usize, out: &mut Vec<f64>) {
    if b - a <= max_gap {
        return;
    }

    let lo = stage_grid.partition_point(|&t| t <= a);
    let hi = stage_grid.partition_point(|&t| t < b);
    if lo >= hi {
        return;
    }
    let between = &stage_grid[lo..hi];

    let n = between.len();
    let k = fill_rate.min(n);
    for j in 1..=k {
        out.push(between[j * (n - 1) / (k + 1)]);
    }
}

/// Greedy streaming thinning: keep a time only if it is at least `min_gap` after the
/// last kept time. Earlier times win.
pub fn thin_by_gap(times: &[f64], min_gap: f64) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(times.len());
    for &t in times {
        match out.last() {
            Some(&last) if t - last < min_gap => {}
            _ => out.push(t),
        }
    }
    out
}
