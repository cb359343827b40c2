//! Note assembly
//!
//! Turns lane-assigned events into notes and merges every stage into one list in
//! spawn order. Rounding happens in [`finalize`] and only there, after every
//! comparison on unrounded times is done.

use super::types::{Event, Note};
use super::window::StageWindow;

/// Decimal places of time fields in emitted notes
pub const TIME_DECIMALS: i32 = 4;
/// Decimal places of the speed field in emitted notes
pub const SPEED_DECIMALS: i32 = 2;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Build the unrounded notes of one stage.
///
/// `scheduled` holds events in hit order with their lanes. An event whose spawn time
/// `hit - travel_time` would fall before the song starts is dropped.
///
/// Returns the notes and the number of dropped events.
pub fn assemble_stage(
    scheduled: &[(Event, usize)],
    stage: usize,
    window: &StageWindow,
    speed: f64,
) -> (Vec<Note>, usize) {
    let mut notes = Vec::with_capacity(scheduled.len());
    let mut dropped = 0;

    for (event, lane) in scheduled {
        let spawn = event.hit - window.travel_time;
        if spawn < 0.0 {
            dropped += 1;
            continue;
        }
        notes.push(Note {
            spawn,
            hit: event.hit,
            end: event.end,
            lane: *lane,
            stage,
            speed,
            kind: event.kind,
        });
    }

    (notes, dropped)
}

/// Merge stage notes into the final chart.
///
/// Notes whose hit lies outside `[0, duration]` are removed and the rest are stably
/// sorted by spawn time, so equal spawns keep stage emission order. Both steps see
/// unrounded times; the surviving notes are rounded last.
pub fn finalize(mut notes: Vec<Note>, duration: f64) -> Vec<Note> {
    notes.retain(|n| n.hit >= 0.0 && n.hit <= duration);
    notes.sort_by(|a, b| a.spawn.total_cmp(&b.spawn));
    notes.into_iter().map(round_note).collect()
}

fn round_note(note: Note) -> Note {
    Note {
        spawn: round_to(note.spawn, TIME_DECIMALS),
        hit: round_to(note.hit, TIME_DECIMALS),
        end: round_to(note.end, TIME_DECIMALS),
        speed: round_to(note.speed, SPEED_DECIMALS),
        ..note
    }
}
