//! Sampled response curves for plotting scalers.
//!
//! The frontend charts each factor's weight across its raw domain at every
//! importance level. Sampling happens here so charts always reflect the
//! calibration tables actually used for scoring.

use serde::Serialize;
use walkscore_models::{Factor, ImportanceLevel};

use crate::scaler_for;

/// One sampled point of a response curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Raw measurement.
    pub raw: f64,
    /// Weight at that measurement.
    pub weight: f64,
}

/// A sampled response curve for one factor at one importance level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalerCurve {
    /// Factor being plotted.
    pub factor: Factor,
    /// Importance level being plotted.
    pub level: ImportanceLevel,
    /// Sampled points in ascending raw order.
    pub points: Vec<CurvePoint>,
}

/// Returns `samples` evenly spaced values from `start` to `end` inclusive.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Samples the response curve of `factor` at `level`.
#[must_use]
pub fn sample_curve(
    factor: Factor,
    level: ImportanceLevel,
    start: f64,
    end: f64,
    samples: usize,
) -> ScalerCurve {
    let points = linspace(start, end, samples)
        .into_iter()
        .map(|raw| CurvePoint {
            raw,
            weight: scaler_for(factor, Some(raw), level),
        })
        .collect();

    ScalerCurve {
        factor,
        level,
        points,
    }
}

/// Samples `factor` at every importance level.
#[must_use]
pub fn sample_all_levels(factor: Factor, start: f64, end: f64, samples: usize) -> Vec<ScalerCurve> {
    ImportanceLevel::ALL
        .into_iter()
        .map(|level| sample_curve(factor, level, start, end, samples))
        .collect()
}

/// A reasonable plotting domain for each factor, covering every band edge.
#[must_use]
pub const fn default_domain(factor: Factor) -> (f64, f64) {
    match factor {
        Factor::Slope => (0.0, 30.0),
        Factor::SpeedLimit => (0.0, 60.0),
        Factor::BusinessDensity => (0.0, 6.0),
        Factor::CrimeDensity | Factor::CrashDensity => (0.0, 4.0),
    }
}
