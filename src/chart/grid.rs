//! Beat grid construction

/// Seconds per grid line for a tempo and subdivision
pub fn grid_step(bpm: f64, subdivisions_per_beat: u32) -> f64 {
    (60.0 / bpm) / subdivisions_per_beat as f64
}

/// Build a fixed-tempo grid of candidate timestamps.
///
/// Lines are spaced `(60 / bpm) / subdivisions_per_beat` apart and start at the
/// first line at or after 0 that is congruent to `phase` modulo the spacing. Every
/// line up to and including `duration` is returned.
///
/// # Parameters
/// - `duration`: song length in seconds
/// - `bpm`: tempo, must be positive
/// - `subdivisions_per_beat`: 1 = quarters, 2 = eighths, 4 = sixteenths
/// - `phase`: time of any beat line; may be negative or beyond one period
///
/// # Example
/// ```rust
/// use beatchart::chart::build_grid;
///
/// let grid = build_grid(2.0, 120.0, 1, 0.25);
/// assert_eq!(grid, vec![0.25, 0.75, 1.25, 1.75]);
/// ```
pub fn build_grid(duration: f64, bpm: f64, subdivisions_per_beat: u32, phase: f64) -> Vec<f64> {
    if !(bpm > 0.0) || subdivisions_per_beat == 0 || !(duration >= 0.0) {
        return Vec::new();
    }

    let step = grid_step(bpm, subdivisions_per_beat);
    let mut first = phase.rem_euclid(step);
    // a tiny negative phase can round up to a full step
    if first >= step {
        first -= step;
    }
    if first > duration {
        return Vec::new();
    }

    let count = ((duration - first) / step).floor() as usize + 1;
    // Multiply instead of accumulating so long songs don't drift
    (0..count)
        .map(|i| first + i as f64 * step)
        .filter(|&t| t <= duration)
        .collect()
}
