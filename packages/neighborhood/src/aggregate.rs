//! Sums cell scores per neighborhood and normalizes by area.

use std::collections::BTreeMap;

use walkscore_models::{CellFeature, NeighborhoodRecord, NeighborhoodScore};
use walkscore_scoring::rank::rank_normalize_by;

use crate::centroid::resolve_coordinates;

/// Divides `aggregate` by `area ^ exponent`, leaving it unscaled when the
/// area is missing or not positive.
#[must_use]
pub fn area_normalize(aggregate: f64, area: Option<f64>, exponent: f64) -> f64 {
    match area.filter(|a| a.is_finite() && *a > 0.0) {
        Some(area) => aggregate / area.powf(exponent),
        None => aggregate,
    }
}

/// Aggregates cell scores into one [`NeighborhoodScore`] per neighborhood.
///
/// Cells contribute their `personalized_walkscore` to the neighborhood
/// named by their `neighborhood_id`. Cells without a score, without a
/// neighborhood, or referencing an unknown neighborhood are skipped.
/// Neighborhoods with no contributing cells aggregate to `0`. The output
/// follows the order of `neighborhoods` and carries the rank-normalized
/// score across all of them.
#[must_use]
pub fn aggregate(
    cells: &[CellFeature],
    neighborhoods: &[NeighborhoodRecord],
    area_exponent: f64,
) -> Vec<NeighborhoodScore> {
    let mut sums: BTreeMap<&str, (f64, u64)> = neighborhoods
        .iter()
        .map(|n| (n.id.as_str(), (0.0, 0)))
        .collect();

    let mut orphans = 0_usize;
    for cell in cells {
        let Some(score) = cell.personalized_walkscore else {
            continue;
        };
        match cell
            .neighborhood_id
            .as_deref()
            .and_then(|id| sums.get_mut(id))
        {
            Some((sum, count)) => {
                *sum += score;
                *count += 1;
            }
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        log::debug!("Excluded {orphans} cells without a known neighborhood from aggregation");
    }

    let mut scores: Vec<NeighborhoodScore> = neighborhoods
        .iter()
        .map(|record| {
            let (aggregate_score, cell_count) =
                sums.get(record.id.as_str()).copied().unwrap_or((0.0, 0));
            let (latitude, longitude) = resolve_coordinates(record);

            NeighborhoodScore {
                id: record.id.clone(),
                name: record.display_name().to_string(),
                area: record.area,
                cell_count,
                aggregate_score,
                normalized_score: area_normalize(aggregate_score, record.area, area_exponent),
                rank_scaled_score: 0.0,
                latitude,
                longitude,
            }
        })
        .collect();

    rank_normalize_by(
        &mut scores,
        |score| Some(score.normalized_score),
        |score, scaled| score.rank_scaled_score = scaled,
    );

    log::debug!(
        "Aggregated {} cells into {} neighborhoods",
        cells.len(),
        scores.len()
    );

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: i64, neighborhood: Option<&str>, score: Option<f64>) -> CellFeature {
        let mut cell = CellFeature::new(id);
        cell.neighborhood_id = neighborhood.map(str::to_string);
        cell.personalized_walkscore = score;
        cell
    }

    fn neighborhoods() -> Vec<NeighborhoodRecord> {
        vec![
            NeighborhoodRecord::new("Ballard", Some(4.0)),
            NeighborhoodRecord::new("Fremont", Some(1.0)),
            NeighborhoodRecord::new("Magnolia", None),
        ]
    }

    #[test]
    fn sums_member_cells_exactly() {
        let cells = vec![
            cell(1, Some("Ballard"), Some(0.1)),
            cell(2, Some("Ballard"), Some(0.2)),
            cell(3, Some("Fremont"), Some(4.5)),
            cell(4, Some("Ballard"), Some(0.3)),
        ];
        let scores = aggregate(&cells, &neighborhoods(), 0.8);

        let expected: f64 = [0.1, 0.2, 0.3].iter().sum();
        assert_eq!(scores[0].aggregate_score.to_bits(), expected.to_bits());
        assert_eq!(scores[0].cell_count, 3);
        assert_eq!(scores[1].cell_count, 1);
        assert!((scores[1].aggregate_score - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_orphans_and_unscored_cells() {
        let cells = vec![
            cell(1, Some("Ballard"), Some(1.0)),
            cell(2, None, Some(3.0)),
            cell(3, Some("Atlantis"), Some(3.0)),
            cell(4, Some("Ballard"), None),
        ];
        let scores = aggregate(&cells, &neighborhoods(), 0.8);
        assert_eq!(scores[0].cell_count, 1);
        assert!((scores[0].aggregate_score - 1.0).abs() < f64::EPSILON);
        let total: u64 = scores.iter().map(|s| s.cell_count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn normalizes_by_area_power() {
        let cells = vec![
            cell(1, Some("Ballard"), Some(2.0)),
            cell(2, Some("Magnolia"), Some(2.0)),
        ];
        let scores = aggregate(&cells, &neighborhoods(), 0.5);
        assert!((scores[0].normalized_score - 1.0).abs() < 1e-12);
        assert!((scores[2].normalized_score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_area_is_left_unscaled() {
        assert!((area_normalize(3.0, Some(0.0), 0.8) - 3.0).abs() < f64::EPSILON);
        assert!((area_normalize(3.0, Some(-2.0), 0.8) - 3.0).abs() < f64::EPSILON);
        assert!((area_normalize(3.0, None, 0.8) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rank_scales_across_neighborhoods() {
        let cells = vec![
            cell(1, Some("Ballard"), Some(8.0)),
            cell(2, Some("Fremont"), Some(5.0)),
        ];
        let scores = aggregate(&cells, &neighborhoods(), 1.0);
        assert!((scores[0].rank_scaled_score - 2.5).abs() < f64::EPSILON);
        assert!((scores[1].rank_scaled_score - 5.0).abs() < f64::EPSILON);
        assert!(scores[2].rank_scaled_score.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_neighborhoods_aggregate_to_zero() {
        let scores = aggregate(&[], &neighborhoods(), 0.8);
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|s| s.aggregate_score.abs() < f64::EPSILON && s.cell_count == 0));
        assert!(scores.iter().all(|s| s.rank_scaled_score.abs() < f64::EPSILON));
    }

    #[test]
    fn no_neighborhoods_yields_nothing() {
        let cells = vec![cell(1, Some("Ballard"), Some(1.0))];
        assert!(aggregate(&cells, &[], 0.8).is_empty());
    }
}
