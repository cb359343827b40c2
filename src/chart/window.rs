//! Stage hit-window planning
//!
//! Stages are separated by a transition overlay ("popup"). No note may be on screen
//! while the overlay is visible, so each stage's hit window is shrunk at both ends:
//!
//! - **Start**: after the first stage, the first hit waits for the popup to finish
//!   *and* for a freshly spawned note to travel down to the hit line.
//! - **End**: the last hit comes early enough that a missed note can slide past the
//!   hit line by the miss margin before the next popup opens.

/// Playable hit window of one stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWindow {
    pub hit_start: f64,
    pub hit_end: f64,
    /// Seconds a note needs to fall from the spawn line to the hit line
    pub travel_time: f64,
}

impl StageWindow {
    /// True when no playable time remains
    pub fn is_empty(&self) -> bool {
        !(self.hit_end > self.hit_start)
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.hit_start && t <= self.hit_end
    }

    pub fn midpoint(&self) -> f64 {
        (self.hit_start + self.hit_end) / 2.0
    }
}

/// On-screen geometry and transition timing shared by every stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub spawn_y: f64,
    pub hit_y: f64,
    pub popup_seconds: f64,
    pub miss_margin_px: f64,
    pub song_duration: f64,
}

/// Compute a stage's hit window.
///
/// # Parameters
/// - `stage`: 1-based stage number; stage 1 has no popup before it
/// - `boundaries`: the stage's `(start, end)` in seconds
/// - `speed`: fall speed in px/s
/// - `geometry`: spawn/hit lines, popup length, miss margin and song duration
///
/// Both bounds are clamped into `[0, song_duration]`. The result may be empty
/// (see [`StageWindow::is_empty`]); callers skip such stages.
///
/// # Example
/// ```rust
/// use beatchart::chart::{compute_window, WindowGeometry};
///
/// let geometry = WindowGeometry {
///     spawn_y: -60.0,
///     hit_y: 600.0,
///     popup_seconds: 1.0,
///     miss_margin_px: 60.0,
///     song_duration: 20.0,
/// };
/// let window = compute_window(2, (10.0, 20.0), 300.0, &geometry);
/// assert!((window.hit_start - 13.2).abs() < 1e-9);
/// assert!((window.hit_end - 19.8).abs() < 1e-9);
/// ```
pub fn compute_window(
    stage: usize,
    boundaries: (f64, f64),
    speed: f64,
    geometry: &WindowGeometry,
) -> StageWindow {
    let (start, end) = boundaries;
    let travel_time = (geometry.hit_y - geometry.spawn_y) / speed;
    let clear_time = geometry.miss_margin_px / speed;

    let hit_start = if stage <= 1 {
        start
    } else {
        start + geometry.popup_seconds + travel_time
    };
    let hit_end = end - clear_time;

    StageWindow {
        hit_start: hit_start.clamp(0.0, geometry.song_duration),
        hit_end: hit_end.clamp(0.0, geometry.song_duration),
        travel_time,
    }
}
