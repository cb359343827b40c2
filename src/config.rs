//! # Song Spec
//!
//! The song spec is the complete, immutable parameter set for one chart run: song
//! timing, on-screen geometry, and the per-stage difficulty ramp.
//!
//! ## YAML Format
//! All keys are kebab-case and optional; anything omitted falls back to the default
//! six-stage ramp ([`SongSpec::default`]).
//!
//! ```yaml
//! bpm: 75
//! duration: 231
//! seed: 42
//! spawn-y: -60
//! hit-y: 600
//! popup-seconds: 1.4
//! miss-margin-px: 60
//! hold-min-duration: 0.4
//! phase-search: { window-start: 0, window-end: 45, steps: 240 }
//! boundaries: [0, 15, 30]
//! stages:
//!   - { speed: 320, subdivisions: 1, keep: 0.4, min-gap: 0.35, max-gap: 1.0, cluster-gap: 0.42, jumpiness: 0.15 }
//!   - { speed: 360, subdivisions: 2, keep: 0.5, min-gap: 0.33, max-gap: 1.0, cluster-gap: 0.38, jumpiness: 0.2, holds: false }
//! ```
//!
//! `boundaries` must hold one more entry than `stages`; stage N spans
//! `boundaries[N-1]..boundaries[N]`. When only one of the two lists is given, the
//! other is taken from the defaults and the counts must still agree.
//!
//! ## Related Modules
//! - `validate` - Domain checks run once before any stage is processed
//! - `chart::engine` - Consumes the spec

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// One stage of the difficulty ramp, with its resolved boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    /// 1-based stage number
    pub stage: usize,
    /// Stage boundary start in seconds
    pub start: f64,
    /// Stage boundary end in seconds
    pub end: f64,
    /// Note fall speed in px/s
    pub speed: f64,
    /// Grid lines per beat: 1 = quarters, 2 = eighths, 4 = sixteenths
    pub subdivisions: u32,
    /// Fraction of in-window grid points kept by onset strength
    pub keep_fraction: f64,
    pub min_gap: f64,
    pub max_gap: f64,
    /// Maximum fillers inserted into one oversized gap
    pub fill_rate: usize,
    pub cluster_gap: f64,
    /// 0 keeps lanes near the previous one, 1 is uniform
    pub jumpiness: f64,
    /// Whether close runs collapse into holds
    pub holds: bool,
}

/// Tempo-phase search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSearch {
    pub window_start: f64,
    pub window_end: f64,
    /// Candidate phases evaluated across one beat period
    pub steps: usize,
    /// Grid lines per beat used while scoring (1 = the beat grid)
    pub subdivisions: u32,
}

impl Default for PhaseSearch {
    fn default() -> Self {
        Self {
            window_start: 0.0,
            window_end: 45.0,
            steps: 240,
            subdivisions: 1,
        }
    }
}

/// Complete parameter set for one chart run.
#[derive(Debug, Clone, PartialEq)]
pub struct SongSpec {
    pub duration: f64,
    pub bpm: f64,
    /// Seed of the lane-choice generator
    pub seed: u64,
    /// Shift applied to every hit time after gap enforcement
    pub offset: f64,
    /// Fixed tempo phase; estimated from the onset curve when `None`
    pub phase: Option<f64>,
    pub phase_search: PhaseSearch,
    pub spawn_y: f64,
    pub hit_y: f64,
    /// Length of the transition overlay shown between stages
    pub popup_seconds: f64,
    /// Distance past the hit line a missed note travels before it is gone
    pub miss_margin_px: f64,
    pub hold_min_duration: f64,
    pub stages: Vec<StageSpec>,
}

/// Per-stage difficulty settings before boundaries are attached
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawStage {
    speed: f64,
    subdivisions: u32,
    keep: f64,
    min_gap: f64,
    max_gap: f64,
    #[serde(default = "default_fill_rate")]
    fill_rate: usize,
    cluster_gap: f64,
    jumpiness: f64,
    #[serde(default = "default_holds")]
    holds: bool,
}

fn default_fill_rate() -> usize {
    1
}

fn default_holds() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawPhaseSearch {
    window_start: Option<f64>,
    window_end: Option<f64>,
    steps: Option<usize>,
    subdivisions: Option<u32>,
}

/// Raw song spec for YAML deserialization
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawSongSpec {
    duration: Option<f64>,
    bpm: Option<f64>,
    seed: Option<u64>,
    offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<f64>,
    phase_search: Option<RawPhaseSearch>,
    spawn_y: Option<f64>,
    hit_y: Option<f64>,
    popup_seconds: Option<f64>,
    miss_margin_px: Option<f64>,
    hold_min_duration: Option<f64>,
    boundaries: Option<Vec<f64>>,
    stages: Option<Vec<RawStage>>,
}

const DEFAULT_BOUNDARIES: [f64; 7] = [0.0, 15.0, 30.0, 75.0, 110.0, 160.0, 231.0];

/// The default ramp: speeds rise, grids get finer, and the last stage is
/// tap-only with tighter gaps.
fn default_ramp() -> Vec<RawStage> {
    let speeds = [320.0, 360.0, 400.0, 440.0, 480.0, 520.0];
    let subdivisions = [1, 2, 2, 2, 4, 4];
    let keep = [0.40, 0.50, 0.60, 0.65, 0.70, 0.85];
    let min_gap = [0.35, 0.33, 0.30, 0.28, 0.24, 0.19];
    let max_gap = [1.00, 1.00, 1.00, 1.00, 1.00, 0.85];
    let fill_rate = [1, 1, 3, 1, 2, 2];
    let cluster_gap = [0.42, 0.38, 0.32, 0.28, 0.26, 0.22];
    let jumpiness = [0.15, 0.20, 0.22, 0.22, 0.26, 0.45];

    (0..speeds.len())
        .map(|i| RawStage {
            speed: speeds[i],
            subdivisions: subdivisions[i],
            keep: keep[i],
            min_gap: min_gap[i],
            max_gap: max_gap[i],
            fill_rate: fill_rate[i],
            cluster_gap: cluster_gap[i],
            jumpiness: jumpiness[i],
            holds: i + 1 < speeds.len(),
        })
        .collect()
}

impl Default for SongSpec {
    fn default() -> Self {
        let stages = attach_boundaries(&DEFAULT_BOUNDARIES, &default_ramp())
            .unwrap_or_default();
        Self {
            duration: 231.0,
            bpm: 75.0,
            seed: 42,
            offset: 0.0,
            phase: None,
            phase_search: PhaseSearch::default(),
            spawn_y: -60.0,
            hit_y: 600.0,
            popup_seconds: 1.4,
            miss_margin_px: 60.0,
            hold_min_duration: 0.40,
            stages,
        }
    }
}

impl SongSpec {
    /// Parse a song spec from YAML, filling omitted keys from the defaults.
    ///
    /// Only structural problems are reported here (malformed YAML, unknown keys,
    /// boundary/stage count mismatch). Domain checks live in [`crate::validate`].
    pub fn from_yaml(content: &str) -> Result<Self, ChartError> {
        let raw: RawSongSpec = if content.trim().is_empty() {
            RawSongSpec::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ChartError::SpecParseError(e.to_string()))?
        };

        let defaults = Self::default();

        let boundaries = raw.boundaries.unwrap_or_else(|| DEFAULT_BOUNDARIES.to_vec());
        let ramp = raw.stages.unwrap_or_else(default_ramp);
        let stages = attach_boundaries(&boundaries, &ramp)?;

        let search = raw.phase_search.unwrap_or_default();
        let phase_search = PhaseSearch {
            window_start: search.window_start.unwrap_or(defaults.phase_search.window_start),
            window_end: search.window_end.unwrap_or(defaults.phase_search.window_end),
            steps: search.steps.unwrap_or(defaults.phase_search.steps),
            subdivisions: search.subdivisions.unwrap_or(defaults.phase_search.subdivisions),
        };

        Ok(Self {
            duration: raw.duration.unwrap_or(defaults.duration),
            bpm: raw.bpm.unwrap_or(defaults.bpm),
            seed: raw.seed.unwrap_or(defaults.seed),
            offset: raw.offset.unwrap_or(defaults.offset),
            phase: raw.phase,
            phase_search,
            spawn_y: raw.spawn_y.unwrap_or(defaults.spawn_y),
            hit_y: raw.hit_y.unwrap_or(defaults.hit_y),
            popup_seconds: raw.popup_seconds.unwrap_or(defaults.popup_seconds),
            miss_margin_px: raw.miss_margin_px.unwrap_or(defaults.miss_margin_px),
            hold_min_duration: raw.hold_min_duration.unwrap_or(defaults.hold_min_duration),
            stages,
        })
    }

    /// Stage boundaries: each stage's start followed by the last stage's end.
    pub fn boundaries(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self.stages.iter().map(|s| s.start).collect();
        if let Some(last) = self.stages.last() {
            out.push(last.end);
        }
        out
    }

    /// Render the spec back to YAML in the format [`SongSpec::from_yaml`] reads.
    pub fn to_yaml(&self) -> Result<String, ChartError> {
        serde_yaml::to_string(&RawSongSpec::from(self))
            .map_err(|e| ChartError::SerializationError(e.to_string()))
    }
}

impl From<&SongSpec> for RawSongSpec {
    fn from(spec: &SongSpec) -> Self {
        Self {
            duration: Some(spec.duration),
            bpm: Some(spec.bpm),
            seed: Some(spec.seed),
            offset: Some(spec.offset),
            phase: spec.phase,
            phase_search: Some(RawPhaseSearch {
                window_start: Some(spec.phase_search.window_start),
                window_end: Some(spec.phase_search.window_end),
                steps: Some(spec.phase_search.steps),
                subdivisions: Some(spec.phase_search.subdivisions),
            }),
            spawn_y: Some(spec.spawn_y),
            hit_y: Some(spec.hit_y),
            popup_seconds: Some(spec.popup_seconds),
            miss_margin_px: Some(spec.miss_margin_px),
            hold_min_duration: Some(spec.hold_min_duration),
            boundaries: Some(spec.boundaries()),
            stages: Some(spec.stages.iter().map(RawStage::from).collect()),
        }
    }
}

impl From<&StageSpec> for RawStage {
    fn from(stage: &StageSpec) -> Self {
        Self {
            speed: stage.speed,
            subdivisions: stage.subdivisions,
            keep: stage.keep_fraction,
            min_gap: stage.min_gap,
            max_gap: stage.max_gap,
            fill_rate: stage.fill_rate,
            cluster_gap: stage.cluster_gap,
            jumpiness: stage.jumpiness,
            holds: stage.holds,
        }
    }
}

fn attach_boundaries(boundaries: &[f64], ramp: &[RawStage]) -> Result<Vec<StageSpec>, ChartError> {
    if boundaries.len() != ramp.len() + 1 {
        return Err(ChartError::ConfigError {
            field: "boundaries".to_string(),
            message: format!(
                "{} stages need {} boundaries, got {}",
                ramp.len(),
                ramp.len() + 1,
                boundaries.len()
            ),
        });
    }

    Ok(ramp
        .iter()
        .enumerate()
        .map(|(i, r)| StageSpec {
            stage: i + 1,
            start: boundaries[i],
            end: boundaries[i + 1],
            speed: r.speed,
            subdivisions: r.subdivisions,
            keep_fraction: r.keep,
            min_gap: r.min_gap,
            max_gap: r.max_gap,
            fill_rate: r.fill_rate,
            cluster_gap: r.cluster_gap,
            jumpiness: r.jumpiness,
            holds: r.holds,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ramp() {
        let spec = SongSpec::default();
        assert_eq!(spec.stages.len(), 6);
        assert_eq!(spec.boundaries(), DEFAULT_BOUNDARIES.to_vec());
        assert_eq!(spec.stages[0].speed, 320.0);
        assert_eq!(spec.stages[5].subdivisions, 4);
        assert!(spec.stages[4].holds);
        assert!(!spec.stages[5].holds);
        assert_eq!(spec.stages[2].fill_rate, 3);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(SongSpec::from_yaml("").unwrap(), SongSpec::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
bpm: 128
duration: 20
seed: 7
phase: 0.12
popup-seconds: 1
boundaries: [0, 10, 20]
stages:
  - { speed: 300, subdivisions: 2, keep: 0.5, min-gap: 0.2, max-gap: 1.0, cluster-gap: 0.3, jumpiness: 0.1 }
  - { speed: 400, subdivisions: 4, keep: 0.6, min-gap: 0.15, max-gap: 0.8, fill-rate: 3, cluster-gap: 0.2, jumpiness: 0.4, holds: false }
"#;
        let spec = SongSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.bpm, 128.0);
        assert_eq!(spec.seed, 7);
        assert_eq!(spec.phase, Some(0.12));
        assert_eq!(spec.stages.len(), 2);
        assert_eq!(spec.stages[1].stage, 2);
        assert_eq!(spec.stages[1].start, 10.0);
        assert_eq!(spec.stages[1].end, 20.0);
        assert_eq!(spec.stages[0].fill_rate, 1);
        assert!(spec.stages[0].holds);
        assert!(!spec.stages[1].holds);
        // untouched keys keep their defaults
        assert_eq!(spec.hit_y, 600.0);
        assert_eq!(spec.phase_search.steps, 240);
    }

    #[test]
    fn test_boundary_count_mismatch() {
        let err = SongSpec::from_yaml("boundaries: [0, 10, 20]").unwrap_err();
        assert!(matches!(err, ChartError::ConfigError { ref field, .. } if field == "boundaries"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = SongSpec::from_yaml("tempo: 120").unwrap_err();
        assert!(matches!(err, ChartError::SpecParseError(_)));
    }

    #[test]
    fn test_misspelled_stage_key_is_rejected() {
        let yaml = r#"
boundaries: [0, 10]
stages:
  - { speed: 300, subdivisions: 2, keep: 0.5, min-gap: 0.2, max-gap: 1.0, fill_rate: 3, cluster-gap: 0.3, jumpiness: 0.1 }
"#;
        let err = SongSpec::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ChartError::SpecParseError(ref m) if m.contains("fill_rate")));

        let yaml = yaml.replace("fill_rate: 3", "hold: false");
        assert!(matches!(
            SongSpec::from_yaml(&yaml),
            Err(ChartError::SpecParseError(_))
        ));
    }

    #[test]
    fn test_misspelled_phase_search_key_is_rejected() {
        let err = SongSpec::from_yaml("phase-search: { window_end: 5 }").unwrap_err();
        assert!(matches!(err, ChartError::SpecParseError(ref m) if m.contains("window_end")));
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let spec = SongSpec::default();
        let yaml = spec.to_yaml().unwrap();
        assert!(yaml.contains("phase-search:"));
        assert!(yaml.contains("fill-rate:"));
        // no pinned phase in the defaults
        assert!(!yaml.lines().any(|line| line.starts_with("phase:")));
        assert_eq!(SongSpec::from_yaml(&yaml).unwrap(), spec);
    }

    #[test]
    fn test_yaml_round_trip_keeps_pinned_phase_and_stage_flags() {
        let mut spec = SongSpec::default();
        spec.phase = Some(0.125);
        spec.offset = -0.03;
        spec.stages[1].fill_rate = 4;
        spec.stages[1].holds = false;
        let yaml = spec.to_yaml().unwrap();
        assert_eq!(SongSpec::from_yaml(&yaml).unwrap(), spec);
    }
}
