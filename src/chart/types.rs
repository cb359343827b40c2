//! Chart data type definitions
//!
//! This module defines the events that flow between pipeline stages and the notes
//! the pipeline finally emits.

use serde::Serialize;

use crate::error::StageSkip;

/// Number of lanes on the playfield
pub const LANE_COUNT: usize = 4;

/// Note kind
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Single press at the hit time
    Tap,
    /// Press at the hit time, held until the end time
    Hold,
}

/// A timed input before it has a lane
///
/// `end == hit` for taps; `end > hit` for holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub hit: f64,
    pub end: f64,
    pub kind: NoteKind,
}

impl Event {
    pub fn tap(hit: f64) -> Self {
        Self {
            hit,
            end: hit,
            kind: NoteKind::Tap,
        }
    }

    pub fn hold(hit: f64, end: f64) -> Self {
        Self {
            hit,
            end,
            kind: NoteKind::Hold,
        }
    }

    pub fn is_hold(&self) -> bool {
        self.kind == NoteKind::Hold
    }
}

/// A finished chart note
///
/// # Fields
/// - `spawn`: when the note appears at the spawn line (seconds, 4 decimals)
/// - `hit`: when the note reaches the hit line (seconds, 4 decimals)
/// - `end`: hold release time, equal to `hit` for taps (seconds, 4 decimals)
/// - `lane`: 0..=3
/// - `stage`: 1-based stage number
/// - `speed`: fall speed in px/s (2 decimals)
/// - `kind`: serialized as `"type": "tap" | "hold"`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Note {
    pub spawn: f64,
    pub hit: f64,
    pub end: f64,
    pub lane: usize,
    pub stage: usize,
    pub speed: f64,
    #[serde(rename = "type")]
    pub kind: NoteKind,
}

/// Counts gathered while generating one stage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageStats {
    /// Grid points inside the hit window
    pub candidates: usize,
    /// Points kept by onset strength
    pub selected: usize,
    /// Points left after gap enforcement and the global offset
    pub kept: usize,
    pub notes: usize,
    pub holds: usize,
    /// Events dropped because they would spawn before the song starts
    pub dropped: usize,
}

/// What happened to one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Generated(StageStats),
    Skipped(StageSkip),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub stage: usize,
    pub hit_start: f64,
    pub hit_end: f64,
    pub travel_time: f64,
    pub outcome: StageOutcome,
}

/// Result of a full chart run
#[derive(Debug, Clone, PartialEq)]
pub struct ChartReport {
    /// Tempo phase all stage grids were anchored to
    pub phase: f64,
    /// Notes sorted by spawn time
    pub notes: Vec<Note>,
    /// One entry per configured stage, in stage order
    pub stages: Vec<StageReport>,
}

impl ChartReport {
    pub fn skipped(&self) -> impl Iterator<Item = &StageSkip> {
        self.stages.iter().filter_map(|s| match &s.outcome {
            StageOutcome::Skipped(skip) => Some(skip),
            StageOutcome::Generated(_) => None,
        })
    }

    pub fn hold_count(&self) -> usize {
        self.notes.iter().filter(|n| n.kind == NoteKind::Hold).count()
    }
}
