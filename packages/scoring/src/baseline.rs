//! Baseline (unadjusted) walkscore from infrastructure components.
//!
//! Each component column (sidewalk, park and trail area) is min-max
//! normalized across all cells, then the normalized components are combined
//! as a weighted sum. The result is the preference-independent
//! `unadjusted_walkscore` that personalization later scales.

use walkscore_models::CellFeature;

use crate::ScoringError;

/// Allowed deviation of the weight sum from `1.0`.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Component weights of the baseline score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineWeights {
    /// Sidewalk area weight.
    pub sidewalk: f64,
    /// Park area weight.
    pub park: f64,
    /// Trail area weight.
    pub trail: f64,
}

impl Default for BaselineWeights {
    fn default() -> Self {
        Self {
            sidewalk: 0.5,
            park: 0.3,
            trail: 0.2,
        }
    }
}

impl BaselineWeights {
    /// Checks that every weight is non-negative and the weights sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidWeights`] otherwise.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let weights = [self.sidewalk, self.park, self.trail];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScoringError::InvalidWeights {
                message: format!("weights must be non-negative, got {weights:?}"),
            });
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights {
                message: format!("weights must sum to 1.0, got {sum}"),
            });
        }
        Ok(())
    }
}

/// Attribute names of the component columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineFields {
    /// Sidewalk area column.
    pub sidewalk: String,
    /// Park area column.
    pub park: String,
    /// Trail area column.
    pub trail: String,
}

impl Default for BaselineFields {
    fn default() -> Self {
        Self {
            sidewalk: "SUM_SW_area".to_string(),
            park: "SUM_Park_Area".to_string(),
            trail: "SUM_trail_area".to_string(),
        }
    }
}

/// Reads a numeric pass-through attribute, matching its name
/// case-insensitively. Numeric strings are accepted.
#[must_use]
pub fn component(cell: &CellFeature, field: &str) -> Option<f64> {
    let value = cell
        .extra
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(field))
        .map(|(_, value)| value)?;

    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n: &f64| n.is_finite())
}

/// Rescales present values onto `[0, 1]`.
///
/// Missing values stay missing. A column with a single distinct value has
/// no range and normalizes to `0`.
#[must_use]
pub fn min_max_normalize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present = values.iter().flatten().copied();
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;

    values
        .iter()
        .map(|value| {
            value.map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        })
        .collect()
}

/// Computes `unadjusted_walkscore` for every cell.
///
/// Missing components contribute nothing to the weighted sum, so a cell
/// with no components at all scores `0`.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidWeights`] if `weights` do not validate.
pub fn compute_baseline(
    cells: &mut [CellFeature],
    fields: &BaselineFields,
    weights: &BaselineWeights,
) -> Result<(), ScoringError> {
    weights.validate()?;

    let column = |field: &str| -> Vec<Option<f64>> {
        let raw: Vec<Option<f64>> = cells.iter().map(|c| component(c, field)).collect();
        let present = raw.iter().flatten().count();
        if present == 0 && !cells.is_empty() {
            log::warn!("No values found for baseline component {field}");
        }
        min_max_normalize(&raw)
    };

    let sidewalk = column(&fields.sidewalk);
    let park = column(&fields.park);
    let trail = column(&fields.trail);

    for (i, cell) in cells.iter_mut().enumerate() {
        let score: f64 = [
            (sidewalk[i], weights.sidewalk),
            (park[i], weights.park),
            (trail[i], weights.trail),
        ]
        .into_iter()
        .filter_map(|(value, weight)| value.map(|v| v * weight))
        .sum();
        cell.unadjusted_walkscore = Some(score);
    }

    log::info!("Computed baseline walkscore for {} cells", cells.len());
    Ok(())
}
