//! # Onset Curve
//!
//! The onset-strength curve is the only view of the audio the chart generator has.
//! It is produced outside this crate (by an audio analysis tool) and handed in as two
//! equal-length sequences: ascending sample times in seconds and strengths in [0, 1].
//!
//! ## Interpolation
//! [`OnsetCurve::strength_at`] linearly interpolates between samples. Queries before
//! the first sample or after the last one clamp to the endpoint strengths, so every
//! query returns a value and nothing here can fail once the curve is built.
//!
//! ## JSON Input
//! ```json
//! { "times": [0.0, 0.023, 0.046], "strengths": [0.1, 0.8, 0.3], "normalize": false }
//! ```
//! With `"normalize": true` the strengths are treated as raw envelope values:
//! negatives are clamped to zero and the curve is divided by its maximum.

use serde::Deserialize;

use crate::error::ChartError;

/// Strength values below this are treated as an all-silent curve when normalizing.
const NORMALIZE_FLOOR: f64 = 1e-9;

/// Validated onset-strength curve.
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetCurve {
    times: Vec<f64>,
    strengths: Vec<f64>,
}

/// Raw curve for JSON deserialization
#[derive(Deserialize, Debug)]
struct RawOnsetCurve {
    times: Vec<f64>,
    strengths: Vec<f64>,
    #[serde(default)]
    normalize: bool,
}

impl OnsetCurve {
    /// Build a curve from already-normalized strengths.
    ///
    /// # Errors
    /// Returns [`ChartError::OnsetCurveError`] if the curve is empty, the sequences
    /// differ in length, times are not strictly ascending, or any strength is outside
    /// [0, 1].
    pub fn new(times: Vec<f64>, strengths: Vec<f64>) -> Result<Self, ChartError> {
        check_shape(&times, &strengths)?;
        if let Some((i, s)) = strengths
            .iter()
            .enumerate()
            .find(|(_, s)| !(0.0..=1.0).contains(*s))
        {
            return Err(ChartError::OnsetCurveError(format!(
                "strength {} at index {} is outside [0, 1]",
                s, i
            )));
        }
        Ok(Self { times, strengths })
    }

    /// Build a curve from a raw envelope.
    ///
    /// Negative values are clamped to zero and the result is divided by its peak.
    /// A curve whose peak is effectively zero stays all-zero.
    pub fn normalized(times: Vec<f64>, raw: Vec<f64>) -> Result<Self, ChartError> {
        check_shape(&times, &raw)?;
        let clamped: Vec<f64> = raw.into_iter().map(|v| v.max(0.0)).collect();
        let peak = clamped.iter().copied().fold(0.0_f64, f64::max);
        let strengths = if peak > NORMALIZE_FLOOR {
            clamped.into_iter().map(|v| v / peak).collect()
        } else {
            clamped
        };
        Ok(Self { times, strengths })
    }

    /// Parse a curve from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let raw: RawOnsetCurve =
            serde_json::from_str(json).map_err(|e| ChartError::OnsetCurveError(e.to_string()))?;
        if raw.normalize {
            Self::normalized(raw.times, raw.strengths)
        } else {
            Self::new(raw.times, raw.strengths)
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn strengths(&self) -> &[f64] {
        &self.strengths
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false for a constructed curve; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last sample.
    pub fn end_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Linearly interpolated strength at `t`, clamped to the endpoint values
    /// outside the sampled range.
    pub fn strength_at(&self, t: f64) -> f64 {
        let last = self.times.len() - 1;
        if t <= self.times[0] {
            return self.strengths[0];
        }
        if t >= self.times[last] {
            return self.strengths[last];
        }

        // First index with time > t; guaranteed in 1..=last by the checks above.
        let hi = self.times.partition_point(|&x| x <= t);
        let lo = hi - 1;
        let (t0, t1) = (self.times[lo], self.times[hi]);
        let (s0, s1) = (self.strengths[lo], self.strengths[hi]);
        s0 + (s1 - s0) * (t - t0) / (t1 - t0)
    }
}

fn check_shape(times: &[f64], values: &[f64]) -> Result<(), ChartError> {
    if times.is_empty() {
        return Err(ChartError::OnsetCurveError(
            "curve has no samples".to_string(),
        ));
    }
    if times.len() != values.len() {
        return Err(ChartError::OnsetCurveError(format!(
            "{} times but {} strengths",
            times.len(),
            values.len()
        )));
    }
    if let Some(i) = times
        .iter()
        .chain(values.iter())
        .position(|v| !v.is_finite())
    {
        return Err(ChartError::OnsetCurveError(format!(
            "non-finite value at position {}",
            i % times.len()
        )));
    }
    if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ChartError::OnsetCurveError(format!(
            "times must be strictly ascending (index {} -> {})",
            i,
            i + 1
        )));
    }
    Ok(())
}
