//! Per-cell recalculation of the personalized walkscore.
//!
//! For each cell the five scalers are looked up from the cell's raw
//! measurements and the user's sliders, multiplied into the baseline
//! walkscore, and the result is lifted off zero by a small floor so the
//! downstream rank normalization and color ramps never see a zero score.

use walkscore_models::{CellFeature, CellScalers, Factor, Sliders};
use walkscore_scaler::scaler_for;

/// Constants of the per-cell score formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFormula {
    /// Added to every raw personalized score.
    pub floor: f64,
    /// Scores below this after adding the floor are raised to it.
    pub minimum: f64,
}

impl Default for ScoreFormula {
    fn default() -> Self {
        Self {
            floor: 0.001,
            minimum: 0.001,
        }
    }
}

impl ScoreFormula {
    /// Applies the floor and minimum clamp to a raw product.
    #[must_use]
    pub fn finish(&self, raw: f64) -> f64 {
        let lifted = raw + self.floor;
        if lifted.is_nan() || lifted < self.minimum {
            self.minimum
        } else {
            lifted
        }
    }

    /// Computes the score for a baseline walkscore and a set of scalers.
    ///
    /// A missing, zero, negative, or non-finite baseline skips the
    /// multiplication and yields the floor.
    #[must_use]
    pub fn score(&self, baseline: Option<f64>, scalers: &CellScalers) -> f64 {
        match baseline.filter(|b| b.is_finite() && *b > 0.0) {
            Some(base) => self.finish(scalers.apply(base)),
            None => self.finish(0.0),
        }
    }
}

/// Looks up all five scalers for a cell.
///
/// The `streets` slider drives both the speed limit and crash density
/// scalers.
#[must_use]
pub fn cell_scalers(cell: &CellFeature, sliders: Sliders) -> CellScalers {
    let weight = |factor: Factor, raw: Option<f64>| scaler_for(factor, raw, sliders.level_for(factor));

    CellScalers {
        slope: weight(Factor::Slope, cell.effective_slope),
        speed_limit: weight(Factor::SpeedLimit, cell.max_effective_speed_limit),
        business_density: weight(Factor::BusinessDensity, cell.business_density),
        crime_density: weight(Factor::CrimeDensity, cell.crime_density_normalized),
        crash_density: weight(Factor::CrashDensity, cell.crash_density_normalized),
    }
}

/// Computes the raw personalized walkscore of one cell.
#[must_use]
pub fn personalized_score(cell: &CellFeature, sliders: Sliders, formula: &ScoreFormula) -> f64 {
    formula.score(cell.unadjusted_walkscore, &cell_scalers(cell, sliders))
}

/// Recalculates every cell for a slider combination.
///
/// Returns new records carrying `personalized_walkscore` and `scalers`;
/// the input is left untouched, so repeated calls with different sliders
/// do not influence each other.
#[must_use]
pub fn recalculate(
    cells: &[CellFeature],
    sliders: Sliders,
    formula: &ScoreFormula,
) -> Vec<CellFeature> {
    log::debug!(
        "Recalculating {} cells for sliders {:?}",
        cells.len(),
        sliders.values()
    );

    cells
        .iter()
        .map(|cell| {
            let scalers = cell_scalers(cell, sliders);
            let mut scored = cell.clone();
            scored.personalized_walkscore = Some(formula.score(cell.unadjusted_walkscore, &scalers));
            scored.scalers = Some(scalers);
            scored
        })
        .collect()
}
