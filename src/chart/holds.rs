//! Hold clustering
//!
//! Runs of closely spaced hits read better as one sustained note than as a burst of
//! taps. Clustering is fully deterministic: the same hits always give the same events.

use super::types::Event;

/// Group closely spaced hits into holds.
///
/// Hits are scanned in order. A run grows while each consecutive gap is at most
/// `cluster_gap`. A run of two or more hits becomes one hold spanning
/// `[first, min(last, hit_end_limit)]` if that span is at least
/// `hold_min_duration`; otherwise every hit in the run becomes its own tap. Single
/// hits are always taps.
///
/// # Example
/// ```rust
/// use beatchart::chart::{cluster, NoteKind};
///
/// let events = cluster(&[1.0, 1.2, 1.4, 1.6, 3.0], 0.25, 0.4, 10.0);
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[0].kind, NoteKind::Hold);
/// assert_eq!((events[0].hit, events[0].end), (1.0, 1.6));
/// assert_eq!(events[1].kind, NoteKind::Tap);
/// ```
pub fn cluster(
    hit_times: &[f64],
    cluster_gap: f64,
    hold_min_duration: f64,
    hit_end_limit: f64,
) -> Vec<Event> {
    let mut events = Vec::with_capacity(hit_times.len());
    let mut i = 0;

    while i < hit_times.len() {
        let mut j = i;
        while j + 1 < hit_times.len() && hit_times[j + 1] - hit_times[j] <= cluster_gap {
            j += 1;
        }

        let start = hit_times[i];
        let end = hit_times[j].min(hit_end_limit);
        if j > i && end - start >= hold_min_duration {
            events.push(Event::hold(start, end));
        } else {
            events.extend(hit_times[i..=j].iter().map(|&t| Event::tap(t)));
        }
        i = j + 1;
    }

    events
}

/// One tap per hit, for stages with holds turned off.
pub fn taps(hit_times: &[f64]) -> Vec<Event> {
    hit_times.iter().map(|&t| Event::tap(t)).collect()
}
