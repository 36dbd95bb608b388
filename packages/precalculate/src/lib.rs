#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Offline precalculation of personalized walkscores.
//!
//! Sliders take five discrete values each, so there are only 625 possible
//! slider states. This crate computes the raw per-cell personalized score
//! for all of them ahead of time and persists the results keyed by
//! [`ComboKey`], so a client can look a state up instead of recomputing it.
//!
//! Only the per-cell formula is precomputed. Rank normalization and
//! neighborhood aggregation depend on the full record set being served and
//! run at lookup time (see [`serve`]). Hosts that serve many slider states
//! from one loaded dataset can keep finished outcomes in a [`cache::ScoreCache`].

pub mod cache;
pub mod combinations;
pub mod serve;
pub mod store;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use walkscore_models::{CellFeature, ComboKey, ScoreRecord};
use walkscore_scoring::{ProgressCallback, ScoreFormula, null_progress, personalized_score};

pub use combinations::{COMBINATION_COUNT, all_combinations};
pub use store::{PrecalculatedStore, write_store};

/// Precalculated raw scores for every slider combination.
pub type Precalculated = BTreeMap<ComboKey, Vec<ScoreRecord>>;

/// Errors that can occur while precalculating or serving stored scores.
#[derive(Debug, Error)]
pub enum PrecalculateError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store file is not valid JSON for a precalculated store.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the input dataset failed.
    #[error("Dataset error: {0}")]
    Dataset(#[from] walkscore_dataset::DatasetError),

    /// The scoring configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] walkscore_scoring::ScoringError),
}

/// Computes the raw personalized score of every cell for every slider
/// combination.
///
/// Combinations are spread across the `rayon` thread pool; each needs only
/// read access to `cells`. The result does not depend on scheduling.
#[must_use]
pub fn precalculate_all(
    cells: &[CellFeature],
    formula: &ScoreFormula,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Precalculated {
    let progress = progress.unwrap_or_else(null_progress);
    let combinations = all_combinations();
    progress.set_total(combinations.len() as u64);

    let start = Instant::now();
    let results: Vec<(ComboKey, Vec<ScoreRecord>)> = combinations
        .par_iter()
        .map(|&sliders| {
            let records = cells
                .iter()
                .map(|cell| ScoreRecord {
                    cell_id: cell.id,
                    personalized_walkscore: personalized_score(cell, sliders, formula),
                })
                .collect();
            progress.inc(1);
            (ComboKey::new(sliders), records)
        })
        .collect();

    let elapsed = start.elapsed();
    progress.finish(format!(
        "Precalculated {} combinations in {:.1}s",
        results.len(),
        elapsed.as_secs_f64()
    ));
    log::info!(
        "Precalculated {} combinations x {} cells in {:.1}s",
        results.len(),
        cells.len(),
        elapsed.as_secs_f64()
    );

    results.into_iter().collect()
}

/// Reads a cell dataset, precalculates every combination, and writes the
/// store. Returns the number of combinations written.
///
/// # Errors
///
/// Returns [`PrecalculateError::Dataset`] if the input cannot be read and
/// [`PrecalculateError::Io`] or [`PrecalculateError::Json`] if the output
/// cannot be written.
pub fn precalculate_file(
    input: &Path,
    output: &Path,
    formula: &ScoreFormula,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<usize, PrecalculateError> {
    let cells = walkscore_dataset::read_cells(input)?;
    let precalculated = precalculate_all(&cells, formula, progress);
    write_store(output, &precalculated)?;
    Ok(precalculated.len())
}
