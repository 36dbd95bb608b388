//! End-to-end scoring: cell normalization, aggregation, and ranking.

use serde::Serialize;
use walkscore_models::{CellFeature, NeighborhoodRecord, NeighborhoodScore, Sliders, TopNeighborhood};
use walkscore_scoring::{ScoreDistribution, ScoringConfig, rank_normalize_cells, recalculate};

use crate::{aggregate, top_neighborhoods};

/// Everything a client needs to render one slider state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOutcome {
    /// Cells with rank-scaled `personalized_walkscore`.
    pub cells: Vec<CellFeature>,
    /// Per-neighborhood aggregates in input order.
    pub neighborhoods: Vec<NeighborhoodScore>,
    /// Best neighborhoods, excluded names removed.
    pub top: Vec<TopNeighborhood>,
    /// Histogram of the rank-scaled cell scores.
    pub distribution: ScoreDistribution,
}

/// Runs rank normalization, aggregation, and top-K extraction over cells
/// that already carry raw personalized scores.
///
/// Normalization needs the complete cell set, so this is the point where
/// per-cell work for one slider state must have finished.
#[must_use]
pub fn evaluate(
    mut cells: Vec<CellFeature>,
    neighborhoods: &[NeighborhoodRecord],
    config: &ScoringConfig,
) -> ScoringOutcome {
    rank_normalize_cells(&mut cells);
    let distribution = ScoreDistribution::from_cells(&cells);

    let scores = aggregate(&cells, neighborhoods, config.area_exponent);
    let top = top_neighborhoods(&scores, &config.excluded_neighborhoods, config.top_k);

    log::info!(
        "Scored {} cells across {} neighborhoods; top: {}",
        cells.len(),
        scores.len(),
        top.iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    ScoringOutcome {
        cells,
        neighborhoods: scores,
        top,
        distribution,
    }
}

/// Recalculates cells for `sliders`, then runs [`evaluate`].
#[must_use]
pub fn personalize(
    cells: &[CellFeature],
    neighborhoods: &[NeighborhoodRecord],
    sliders: Sliders,
    config: &ScoringConfig,
) -> ScoringOutcome {
    let scored = recalculate(cells, sliders, &config.formula());
    evaluate(scored, neighborhoods, config)
}
