use super::*;
use crate::{ChartError, OnsetCurve, SongSpec, StageSkip};

/// Two stages at 120 bpm: quarters in stage 1, eighths in stage 2.
fn two_stage_spec() -> SongSpec {
    SongSpec::from_yaml(
        r#"
duration: 20
bpm: 120
phase: 0
seed: 42
popup-seconds: 1
miss-margin-px: 60
spawn-y: -60
hit-y: 600
hold-min-duration: 0.4
boundaries: [0, 10, 20]
stages:
  - { speed: 300, subdivisions: 1, keep: 0.35, min-gap: 0.3, max-gap: 1.0, cluster-gap: 0.3, jumpiness: 0.1 }
  - { speed: 300, subdivisions: 2, keep: 0.5, min-gap: 0.2, max-gap: 1.0, cluster-gap: 0.3, jumpiness: 0.3 }
"#,
    )
    .unwrap()
}

fn silent_curve() -> OnsetCurve {
    OnsetCurve::new(vec![0.0, 20.0], vec![0.0, 0.0]).unwrap()
}

fn stats(report: &ChartReport, stage: usize) -> StageStats {
    match &report.stages[stage - 1].outcome {
        StageOutcome::Generated(stats) => stats.clone(),
        StageOutcome::Skipped(skip) => panic!("stage {} was skipped: {}", stage, skip),
    }
}

fn stage_notes(report: &ChartReport, stage: usize) -> Vec<Note> {
    report
        .notes
        .iter()
        .filter(|n| n.stage == stage)
        .cloned()
        .collect()
}

#[test]
fn test_stage_two_waits_for_popup_and_travel() {
    let spec = two_stage_spec();
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();

    assert_eq!(report.stages[0].hit_start, 0.0);
    assert!((report.stages[1].hit_start - 13.2).abs() < 1e-9);
    assert!((report.stages[1].hit_end - 19.8).abs() < 1e-9);
    assert!(stage_notes(&report, 2).iter().all(|n| n.hit >= 13.2));
}

#[test]
fn test_silent_curve_selects_ceil_of_keep_fraction() {
    let spec = two_stage_spec();
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();

    // stage 1: quarters 0.0..=9.5 inside [0, 9.8]
    let first = stats(&report, 1);
    assert_eq!(first.candidates, 20);
    assert_eq!(first.selected, 7);

    // stage 2: eighths 13.25..=19.75 inside [13.2, 19.8]
    let second = stats(&report, 2);
    assert_eq!(second.candidates, 27);
    assert_eq!(second.selected, 14);
}

#[test]
fn test_silent_curve_chart_shape() {
    let spec = two_stage_spec();
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();

    // Stage 1 keeps 0.0..=3.0 and one filler at 6.5; hits before 2.2s cannot spawn
    let first = stats(&report, 1);
    assert_eq!(first.kept, 8);
    assert_eq!(first.dropped, 5);
    let hits: Vec<f64> = stage_notes(&report, 1).iter().map(|n| n.hit).collect();
    assert_eq!(hits, vec![2.5, 3.0, 6.5]);

    // Stage 2: the dense opening run becomes one hold, the filler stays a tap
    let notes = stage_notes(&report, 2);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].kind, NoteKind::Hold);
    assert_eq!((notes[0].hit, notes[0].end), (13.25, 16.5));
    assert_eq!(notes[1].kind, NoteKind::Tap);
    assert_eq!(notes[1].hit, 18.25);
    assert_eq!(stats(&report, 2).holds, 1);
    assert_eq!(report.hold_count(), 1);
}

#[test]
fn test_notes_are_sorted_and_spawn_after_song_start() {
    let spec = SongSpec::default();
    let times: Vec<f64> = (0..=23_100).map(|i| i as f64 * 0.01).collect();
    let strengths = times
        .iter()
        .map(|t| ((t * 3.7).sin() * (t * 0.9).cos()).abs())
        .collect();
    let curve = OnsetCurve::new(times, strengths).unwrap();

    let report = ChartEngine::new(&spec, &curve).unwrap().run();

    assert!(!report.notes.is_empty());
    assert!(report.notes.windows(2).all(|w| w[0].spawn <= w[1].spawn));
    for note in &report.notes {
        assert!(note.spawn >= 0.0);
        assert!(note.lane < LANE_COUNT);
        assert!(note.end >= note.hit);
        let window = &report.stages[note.stage - 1];
        assert!(note.hit >= window.hit_start - 1e-4 && note.end <= window.hit_end + 1e-4);
    }
    // the last stage has holds turned off
    assert!(stage_notes(&report, 6).iter().all(|n| n.kind == NoteKind::Tap));
}

#[test]
fn test_min_gap_holds_within_each_stage() {
    let spec = SongSpec::default();
    let times: Vec<f64> = (0..=2_310).map(|i| i as f64 * 0.1).collect();
    let strengths = times.iter().map(|t| (t * 1.3).sin().abs()).collect();
    let curve = OnsetCurve::new(times, strengths).unwrap();

    let report = ChartEngine::new(&spec, &curve).unwrap().run();

    for stage in &spec.stages {
        let notes = stage_notes(&report, stage.stage);
        for pair in notes.windows(2) {
            assert!(
                pair[1].hit - pair[0].hit >= stage.min_gap - 1e-3,
                "stage {}: {} -> {}",
                stage.stage,
                pair[0].hit,
                pair[1].hit
            );
        }
    }
}

#[test]
fn test_no_note_lands_in_a_held_lane() {
    let spec = SongSpec::default();
    let times: Vec<f64> = (0..=2_310).map(|i| i as f64 * 0.1).collect();
    let strengths = times.iter().map(|t| 0.5 + 0.5 * (t * 2.1).sin()).collect();
    let curve = OnsetCurve::new(times, strengths).unwrap();

    let report = ChartEngine::new(&spec, &curve).unwrap().run();

    for hold in report.notes.iter().filter(|n| n.kind == NoteKind::Hold) {
        let clash = report.notes.iter().any(|n| {
            n.stage == hold.stage && n.lane == hold.lane && n.hit > hold.hit && n.hit < hold.end
        });
        assert!(!clash, "lane {} is held {} -> {}", hold.lane, hold.hit, hold.end);
    }
}

#[test]
fn test_runs_are_reproducible() {
    let spec = SongSpec::default();
    let times: Vec<f64> = (0..=2_310).map(|i| i as f64 * 0.1).collect();
    let strengths = times.iter().map(|t| (t * 0.7).cos().abs()).collect();
    let curve = OnsetCurve::new(times, strengths).unwrap();

    let a = ChartEngine::new(&spec, &curve).unwrap().run();
    let b = ChartEngine::new(&spec, &curve).unwrap().run();
    assert_eq!(a, b);
}

#[test]
fn test_holds_can_be_disabled_per_stage() {
    let mut spec = two_stage_spec();
    spec.stages[1].holds = false;
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();

    let notes = stage_notes(&report, 2);
    assert_eq!(notes.len(), 15);
    assert!(notes.iter().all(|n| n.kind == NoteKind::Tap));
}

#[test]
fn test_offset_shifts_hits_and_refilters_window() {
    let mut spec = two_stage_spec();
    spec.offset = 0.1;
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();
    let notes = stage_notes(&report, 2);
    assert_eq!((notes[0].hit, notes[0].end), (13.35, 16.6));
    assert_eq!(notes[1].hit, 18.35);

    // shifting earlier pushes 13.25 out of the window
    spec.offset = -0.1;
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();
    let notes = stage_notes(&report, 2);
    assert_eq!((notes[0].hit, notes[0].end), (13.4, 16.4));
}

#[test]
fn test_short_stage_is_skipped_not_fatal() {
    let mut spec = two_stage_spec();
    spec.stages[1].end = 12.0;
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();

    assert_eq!(stats(&report, 1).notes, 3);
    let skipped: Vec<&StageSkip> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert!(matches!(skipped[0], StageSkip::EmptyWindow { stage: 2, .. }));
    assert!(stage_notes(&report, 2).is_empty());
}

#[test]
fn test_window_without_grid_lines_is_skipped() {
    // 10 bpm quarters: lines at 0, 6 and 12, none inside stage 2's [13.2, 16.8]
    let mut spec = two_stage_spec();
    spec.bpm = 10.0;
    spec.stages[1].subdivisions = 1;
    spec.stages[1].end = 17.0;
    spec.duration = 17.0;
    let report = ChartEngine::new(&spec, &silent_curve()).unwrap().run();

    assert_eq!(
        report.skipped().collect::<Vec<_>>(),
        vec![&StageSkip::EmptyCandidateGrid { stage: 2 }]
    );
    assert_eq!(stats(&report, 1).candidates, 2);
}

#[test]
fn test_invalid_spec_fails_before_any_stage() {
    let mut spec = two_stage_spec();
    spec.bpm = -1.0;
    let err = ChartEngine::new(&spec, &silent_curve()).err().unwrap();
    assert!(matches!(err, ChartError::ConfigError { ref field, .. } if field == "bpm"));
}

#[test]
fn test_engine_estimates_phase_when_not_pinned() {
    let mut spec = two_stage_spec();
    spec.phase = None;
    spec.phase_search.window_end = 20.0;
    spec.phase_search.steps = 100;

    // pulses every beat at 0.2s + k * 0.5s
    let times: Vec<f64> = (0..=4_000).map(|i| i as f64 * 0.005).collect();
    let strengths = (0..=4_000)
        .map(|i| if i % 100 == 40 { 1.0 } else { 0.0 })
        .collect();
    let curve = OnsetCurve::new(times, strengths).unwrap();

    let engine = ChartEngine::new(&spec, &curve).unwrap();
    assert!((engine.phase() - 0.2).abs() < 0.01, "phase {}", engine.phase());
    assert_eq!(engine.run().phase, engine.phase());
}

#[test]
fn test_run_with_rng_follows_the_generator() {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    let spec = two_stage_spec();
    let curve = silent_curve();
    let engine = ChartEngine::new(&spec, &curve).unwrap();

    // Same generator stream, same chart
    let mut a = Pcg64::seed_from_u64(99);
    let mut b = Pcg64::seed_from_u64(99);
    assert_eq!(engine.run_with_rng(&mut a), engine.run_with_rng(&mut b));
}
