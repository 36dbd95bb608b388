//! Serve-time evaluation of a precalculated slider combination.

use std::collections::HashMap;

use walkscore_models::{CellFeature, NeighborhoodRecord, ScoreRecord, Sliders};
use walkscore_neighborhood::{ScoringOutcome, evaluate};
use walkscore_scoring::ScoringConfig;

use crate::PrecalculatedStore;

/// Copies precalculated raw scores onto `cells` by cell id.
///
/// Cells absent from `records` are left without a score and take no part
/// in normalization or aggregation.
#[must_use]
pub fn join_scores(cells: &[CellFeature], records: &[ScoreRecord]) -> Vec<CellFeature> {
    let scores: HashMap<i64, f64> = records
        .iter()
        .map(|r| (r.cell_id, r.personalized_walkscore))
        .collect();

    let mut unmatched = 0_usize;
    let joined = cells
        .iter()
        .map(|cell| {
            let mut joined = cell.clone();
            joined.personalized_walkscore = scores.get(&cell.id).copied();
            if joined.personalized_walkscore.is_none() {
                unmatched += 1;
            }
            joined
        })
        .collect();

    if unmatched > 0 {
        log::warn!("{unmatched} cells have no precalculated score");
    }
    joined
}

/// Looks up `sliders` in the store and finishes scoring over the current
/// cell and neighborhood sets.
///
/// Returns `None` if the store has no entry for `sliders`.
#[must_use]
pub fn evaluate_combination(
    store: &PrecalculatedStore,
    sliders: Sliders,
    cells: &[CellFeature],
    neighborhoods: &[NeighborhoodRecord],
    config: &ScoringConfig,
) -> Option<ScoringOutcome> {
    let records = store.lookup(sliders)?;
    log::debug!(
        "Serving {} precalculated scores for sliders {:?}",
        records.len(),
        sliders.values()
    );
    Some(evaluate(join_scores(cells, records), neighborhoods, config))
}
