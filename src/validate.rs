//! # Song Spec Validation
//!
//! A parsed [`SongSpec`] may be well-formed YAML and still describe an impossible
//! chart. This module rejects out-of-domain parameters once, before any stage is
//! processed, so the pipeline itself never has to re-check them.
//!
//! ## Validation Rules
//!
//! ### Song Level
//! - `duration` and `bpm` must be positive
//! - `hit-y` must lie below `spawn-y` so travel time is positive
//! - `popup-seconds`, `miss-margin-px`, `hold-min-duration` must be non-negative
//! - Phase search needs at least one step, one subdivision, and a non-empty window
//!
//! ### Stages
//! - At least one stage; stage numbers run 1, 2, 3, ...
//! - Boundaries strictly increase and never overlap the previous stage
//! - `speed` positive, `subdivisions` at least 1, `keep` in (0, 1]
//! - `min-gap`, `max-gap`, `cluster-gap` non-negative; `jumpiness` in [0, 1]
//!
//! ## Entry Point
//! `validate(spec: &SongSpec) -> Result<(), ChartError>`

use crate::config::{SongSpec, StageSpec};
use crate::error::ChartError;

/// Validate a song spec for domain correctness
pub fn validate(spec: &SongSpec) -> Result<(), ChartError> {
    validate_song(spec)?;
    validate_stage_order(spec)?;
    for stage in &spec.stages {
        validate_stage(stage)?;
    }
    Ok(())
}

fn config_error(field: &str, message: String) -> ChartError {
    ChartError::ConfigError {
        field: field.to_string(),
        message,
    }
}

fn stage_error(stage: &StageSpec, message: String) -> ChartError {
    ChartError::StageConfigError {
        stage: stage.stage,
        message,
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ChartError> {
    // written to also reject NaN
    if !(value > 0.0) || !value.is_finite() {
        return Err(config_error(field, format!("must be positive, got {}", value)));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> Result<(), ChartError> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(config_error(field, format!("must be non-negative, got {}", value)));
    }
    Ok(())
}

fn validate_song(spec: &SongSpec) -> Result<(), ChartError> {
    require_positive("duration", spec.duration)?;
    require_positive("bpm", spec.bpm)?;
    require_non_negative("popup-seconds", spec.popup_seconds)?;
    require_non_negative("miss-margin-px", spec.miss_margin_px)?;
    require_non_negative("hold-min-duration", spec.hold_min_duration)?;

    if !spec.offset.is_finite() {
        return Err(config_error("offset", format!("must be finite, got {}", spec.offset)));
    }
    if let Some(phase) = spec.phase {
        if !phase.is_finite() {
            return Err(config_error("phase", format!("must be finite, got {}", phase)));
        }
    }
    if !(spec.hit_y > spec.spawn_y) {
        return Err(config_error(
            "hit-y",
            format!(
                "hit line ({}) must be below the spawn line ({})",
                spec.hit_y, spec.spawn_y
            ),
        ));
    }

    let search = &spec.phase_search;
    if search.steps == 0 {
        return Err(config_error("phase-search.steps", "must be at least 1".to_string()));
    }
    if search.subdivisions == 0 {
        return Err(config_error(
            "phase-search.subdivisions",
            "must be at least 1".to_string(),
        ));
    }
    require_non_negative("phase-search.window-start", search.window_start)?;
    if !(search.window_end > search.window_start) {
        return Err(config_error(
            "phase-search.window-end",
            format!(
                "must be after window-start ({} <= {})",
                search.window_end, search.window_start
            ),
        ));
    }

    Ok(())
}

fn validate_stage_order(spec: &SongSpec) -> Result<(), ChartError> {
    if spec.stages.is_empty() {
        return Err(config_error("stages", "at least one stage is required".to_string()));
    }

    let mut previous_end: Option<f64> = None;
    for (i, stage) in spec.stages.iter().enumerate() {
        if stage.stage != i + 1 {
            return Err(stage_error(
                stage,
                format!("expected stage number {}, found {}", i + 1, stage.stage),
            ));
        }
        if !stage.start.is_finite() || !stage.end.is_finite() || !(stage.end > stage.start) {
            return Err(stage_error(
                stage,
                format!(
                    "boundaries must increase ({}s -> {}s)",
                    stage.start, stage.end
                ),
            ));
        }
        if let Some(prev) = previous_end {
            if stage.start < prev {
                return Err(stage_error(
                    stage,
                    format!(
                        "starts at {}s, before the previous stage ends at {}s",
                        stage.start, prev
                    ),
                ));
            }
        }
        previous_end = Some(stage.end);
    }
    Ok(())
}

fn validate_stage(stage: &StageSpec) -> Result<(), ChartError> {
    if !(stage.speed > 0.0) || !stage.speed.is_finite() {
        return Err(stage_error(stage, format!("speed must be positive, got {}", stage.speed)));
    }
    if stage.subdivisions == 0 {
        return Err(stage_error(stage, "subdivisions must be at least 1".to_string()));
    }
    if !(stage.keep_fraction > 0.0 && stage.keep_fraction <= 1.0) {
        return Err(stage_error(
            stage,
            format!("keep fraction must be in (0, 1], got {}", stage.keep_fraction),
        ));
    }
    for (name, value) in [
        ("min-gap", stage.min_gap),
        ("max-gap", stage.max_gap),
        ("cluster-gap", stage.cluster_gap),
    ] {
        if !(value >= 0.0) || !value.is_finite() {
            return Err(stage_error(
                stage,
                format!("{} must be non-negative, got {}", name, value),
            ));
        }
    }
    if !(0.0..=1.0).contains(&stage.jumpiness) {
        return Err(stage_error(
            stage,
            format!("jumpiness must be in [0, 1], got {}", stage.jumpiness),
        ));
    }
    Ok(())
}
