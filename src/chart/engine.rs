//! Chart generation engine
//!
//! Drives the full pipeline for one song. The phase is fixed once for the whole
//! song; every stage then runs the same sequence on its own grid:
//!
//! ```text
//! window -> grid -> select -> enforce gaps -> offset -> cluster -> lanes -> assemble
//! ```
//!
//! Stages are processed in order because the previous lane carries across stage
//! boundaries. Stages whose window or grid is empty are skipped and reported.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::{debug, info, warn};

use super::assemble::{assemble_stage, finalize};
use super::gaps::enforce_bounds;
use super::grid::build_grid;
use super::holds::{cluster, taps};
use super::lanes::{schedule, ScheduleState};
use super::phase::estimate_phase;
use super::select::select_candidates;
use super::types::{ChartReport, Event, Note, NoteKind, StageOutcome, StageReport, StageStats};
use super::window::{compute_window, StageWindow, WindowGeometry};
use crate::config::{SongSpec, StageSpec};
use crate::error::{ChartError, StageSkip};
use crate::onset::OnsetCurve;
use crate::validate::validate;

/// One validated song ready to be charted.
pub struct ChartEngine<'a> {
    spec: &'a SongSpec,
    curve: &'a OnsetCurve,
    phase: f64,
}

/// Output of one stage before merging
struct StageRun {
    report: StageReport,
    notes: Vec<Note>,
    state: ScheduleState,
}

impl<'a> ChartEngine<'a> {
    /// Validate `spec` and fix the tempo phase.
    ///
    /// The phase is taken from `spec.phase` when set and estimated from `curve`
    /// otherwise.
    ///
    /// # Errors
    /// Returns the first configuration error found by [`validate`].
    pub fn new(spec: &'a SongSpec, curve: &'a OnsetCurve) -> Result<Self, ChartError> {
        validate(spec)?;

        let phase = match spec.phase {
            Some(phase) => {
                debug!("Using fixed phase {:.4}s", phase);
                phase
            }
            None => estimate_phase(spec.bpm, spec.duration, curve, &spec.phase_search),
        };

        Ok(Self { spec, curve, phase })
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Generate the chart with a generator seeded from `spec.seed`.
    pub fn run(&self) -> ChartReport {
        let mut rng = Pcg64::seed_from_u64(self.spec.seed);
        self.run_with_rng(&mut rng)
    }

    /// Generate the chart drawing lane choices from `rng`.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> ChartReport {
        let geometry = WindowGeometry {
            spawn_y: self.spec.spawn_y,
            hit_y: self.spec.hit_y,
            popup_seconds: self.spec.popup_seconds,
            miss_margin_px: self.spec.miss_margin_px,
            song_duration: self.spec.duration,
        };

        let mut state = ScheduleState::new();
        let mut notes = Vec::new();
        let mut stages = Vec::with_capacity(self.spec.stages.len());

        for stage in &self.spec.stages {
            let run = self.run_stage(rng, stage, &geometry, state);
            state = run.state;
            notes.extend(run.notes);
            stages.push(run.report);
        }

        let notes = finalize(notes, self.spec.duration);
        info!(
            "Generated {} notes across {} stages (phase {:.4}s)",
            notes.len(),
            stages.len(),
            self.phase
        );

        ChartReport {
            phase: self.phase,
            notes,
            stages,
        }
    }

    fn run_stage<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        stage: &StageSpec,
        geometry: &WindowGeometry,
        state: ScheduleState,
    ) -> StageRun {
        let window = compute_window(stage.stage, (stage.start, stage.end), stage.speed, geometry);
        let skipped = |skip: StageSkip| {
            warn!("Skipping {}", skip);
            StageRun {
                report: stage_report(stage, &window, StageOutcome::Skipped(skip)),
                notes: Vec::new(),
                state,
            }
        };

        if window.is_empty() {
            return skipped(StageSkip::EmptyWindow {
                stage: stage.stage,
                hit_start: window.hit_start,
                hit_end: window.hit_end,
            });
        }

        let grid = build_grid(self.spec.duration, self.spec.bpm, stage.subdivisions, self.phase);
        let candidates = grid.iter().filter(|&&t| window.contains(t)).count();
        if candidates == 0 {
            return skipped(StageSkip::EmptyCandidateGrid { stage: stage.stage });
        }

        let chosen = select_candidates(&grid, &window, self.curve, stage.keep_fraction);
        let adjusted = enforce_bounds(
            &chosen,
            &grid,
            &window,
            stage.max_gap,
            stage.min_gap,
            stage.fill_rate,
        );
        let hits: Vec<f64> = adjusted
            .iter()
            .map(|&t| t + self.spec.offset)
            .filter(|&t| window.contains(t))
            .collect();
        debug!(
            "Stage {}: {} candidates, {} selected, {} after gap enforcement, {} in window",
            stage.stage,
            candidates,
            chosen.len(),
            adjusted.len(),
            hits.len()
        );

        let events = if stage.holds {
            cluster(&hits, stage.cluster_gap, self.spec.hold_min_duration, window.hit_end)
        } else {
            taps(&hits)
        };

        let mut state = state.next_stage();
        let mut scheduled: Vec<(Event, usize)> = Vec::with_capacity(events.len());
        for event in events {
            let (lane, next) = schedule(rng, state, &event, stage.jumpiness);
            state = next;
            scheduled.push((event, lane));
        }

        let (notes, dropped) = assemble_stage(&scheduled, stage.stage, &window, stage.speed);
        let stats = StageStats {
            candidates,
            selected: chosen.len(),
            kept: hits.len(),
            notes: notes.len(),
            holds: notes.iter().filter(|n| n.kind == NoteKind::Hold).count(),
            dropped,
        };

        info!(
            "Stage {}: subdiv={} cand={} keep={:.2} minGap={:.2}s maxGap={:.2}s fill={} notes={} holds={}",
            stage.stage,
            stage.subdivisions,
            stats.candidates,
            stage.keep_fraction,
            stage.min_gap,
            stage.max_gap,
            stage.fill_rate,
            stats.notes,
            stats.holds
        );

        StageRun {
            report: stage_report(stage, &window, StageOutcome::Generated(stats)),
            notes,
            state,
        }
    }
}

fn stage_report(stage: &StageSpec, window: &StageWindow, outcome: StageOutcome) -> StageReport {
    StageReport {
        stage: stage.stage,
        hit_start: window.hit_start,
        hit_end: window.hit_end,
        travel_time: window.travel_time,
        outcome,
    }
}
