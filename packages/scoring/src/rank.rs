//! Dense-rank normalization onto a bounded 0-5 scale.
//!
//! Raw personalized scores span orders of magnitude depending on the
//! slider combination. Rank normalization keeps only their order: each
//! distinct value gets a dense rank and ranks are spread evenly over
//! `[0, RANK_SCALE_MAX]`. Equal inputs always produce equal outputs, and any
//! positive monotonic transform of the inputs produces identical outputs.

use walkscore_models::CellFeature;

/// Upper end of the rank scale.
pub const RANK_SCALE_MAX: f64 = 5.0;

/// Folds `-0.0` into `0.0` so both land on the same rank.
fn canonical(value: f64) -> f64 {
    value + 0.0
}

/// Rank-normalizes `scores`, returning a parallel vector.
///
/// The smallest distinct value maps to `0`, the largest to
/// [`RANK_SCALE_MAX`]. When every value is identical there is no spread to
/// distribute and every output is `0`. `NaN` inputs take no part in the
/// ranking and map to `0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rank_normalize(scores: &[f64]) -> Vec<f64> {
    let mut distinct: Vec<f64> = scores
        .iter()
        .copied()
        .filter(|s| !s.is_nan())
        .map(canonical)
        .collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());

    let max_rank = distinct.len().saturating_sub(1);
    if max_rank == 0 {
        return vec![0.0; scores.len()];
    }

    scores
        .iter()
        .map(|&score| {
            if score.is_nan() {
                return 0.0;
            }
            let key = canonical(score);
            let rank = distinct
                .binary_search_by(|probe| probe.total_cmp(&key))
                .unwrap_or_else(|i| i);
            rank as f64 / max_rank as f64 * RANK_SCALE_MAX
        })
        .collect()
}

/// Rank-normalizes a field of each item in place.
///
/// `get` reads the raw value; `set` receives the scaled one. Items whose
/// raw value is `None` are left untouched and do not affect the ranking.
pub fn rank_normalize_by<T>(
    items: &mut [T],
    get: impl Fn(&T) -> Option<f64>,
    mut set: impl FnMut(&mut T, f64),
) {
    let present: Vec<usize> = (0..items.len())
        .filter(|&i| get(&items[i]).is_some())
        .collect();
    let raw: Vec<f64> = present
        .iter()
        .filter_map(|&i| get(&items[i]))
        .collect();

    for (i, scaled) in present.into_iter().zip(rank_normalize(&raw)) {
        set(&mut items[i], scaled);
    }
}

/// Replaces each cell's `personalized_walkscore` with its rank-scaled value.
pub fn rank_normalize_cells(cells: &mut [CellFeature]) {
    rank_normalize_by(
        cells,
        |cell| cell.personalized_walkscore,
        |cell, scaled| cell.personalized_walkscore = Some(scaled),
    );
}
