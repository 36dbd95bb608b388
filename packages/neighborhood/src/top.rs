//! Top-K neighborhood extraction.

use walkscore_models::{NeighborhoodScore, TopNeighborhood};

/// Returns the `k` best-scoring neighborhoods.
///
/// Entries are labelled with the neighborhood key (`id`), the same key
/// cells reference. Sorted descending by `rank_scaled_score`, ties broken
/// by key so the list is deterministic. A neighborhood is dropped when
/// either its key or its display name is on `excluded` (matched
/// case-insensitively, ignoring surrounding whitespace), or when its key
/// is blank.
#[must_use]
pub fn top_neighborhoods(
    scores: &[NeighborhoodScore],
    excluded: &[String],
    k: usize,
) -> Vec<TopNeighborhood> {
    let listed = |name: &str| {
        let name = name.trim();
        excluded.iter().any(|e| e.trim().eq_ignore_ascii_case(name))
    };
    let is_excluded = |score: &NeighborhoodScore| {
        score.id.trim().is_empty() || listed(&score.id) || listed(&score.name)
    };

    let mut ranked: Vec<&NeighborhoodScore> = scores.iter().filter(|s| !is_excluded(s)).collect();
    ranked.sort_by(|a, b| {
        b.rank_scaled_score
            .total_cmp(&a.rank_scaled_score)
            .then_with(|| a.id.cmp(&b.id))
    });

    ranked
        .into_iter()
        .take(k)
        .zip(1_u32..)
        .map(|(score, rank)| TopNeighborhood {
            rank,
            name: score.id.trim().to_string(),
            score: score.rank_scaled_score,
            latitude: score.latitude,
            longitude: score.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(name: &str, rank_scaled_score: f64) -> NeighborhoodScore {
        NeighborhoodScore {
            id: name.to_string(),
            name: name.to_string(),
            area: Some(1.0),
            cell_count: 1,
            aggregate_score: rank_scaled_score,
            normalized_score: rank_scaled_score,
            rank_scaled_score,
            latitude: Some(47.6),
            longitude: Some(-122.3),
        }
    }

    fn names(top: &[TopNeighborhood]) -> Vec<&str> {
        top.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_assigns_ranks() {
        let scores = vec![
            score("Ballard", 2.0),
            score("Fremont", 5.0),
            score("Magnolia", 0.0),
            score("Wallingford", 4.0),
        ];
        let top = top_neighborhoods(&scores, &[], 3);
        assert_eq!(names(&top), vec!["Fremont", "Wallingford", "Ballard"]);
        assert_eq!(top.iter().map(|t| t.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn drops_excluded_names() {
        let scores = vec![
            score("Discovery Park", 5.0),
            score("Ballard", 4.0),
            score(" seward park ", 3.0),
            score("", 4.5),
        ];
        let excluded = vec!["Discovery Park".to_string(), "Seward Park".to_string()];
        let top = top_neighborhoods(&scores, &excluded, 5);
        assert_eq!(names(&top), vec!["Ballard"]);
        assert_eq!(top[0].rank, 1);
    }

    #[test]
    fn excludes_by_key_when_display_name_differs() {
        let mut renamed = score("Discovery Park", 5.0);
        renamed.name = "Lawton Park".to_string();
        let mut aliased = score("Interbay", 4.5);
        aliased.name = "Seward Park".to_string();
        let scores = vec![renamed, aliased, score("Ballard", 4.0)];

        let excluded = vec!["Discovery Park".to_string(), "seward park".to_string()];
        let top = top_neighborhoods(&scores, &excluded, 5);
        assert_eq!(names(&top), vec!["Ballard"]);
    }

    #[test]
    fn labels_entries_with_the_neighborhood_key() {
        let mut renamed = score("Fremont", 3.0);
        renamed.name = "Center of the Universe".to_string();
        let top = top_neighborhoods(&[renamed], &[], 5);
        assert_eq!(names(&top), vec!["Fremont"]);
    }

    #[test]
    fn breaks_ties_by_name() {
        let scores = vec![score("Fremont", 2.5), score("Ballard", 2.5)];
        let top = top_neighborhoods(&scores, &[], 5);
        assert_eq!(names(&top), vec!["Ballard", "Fremont"]);
    }

    #[test]
    fn fewer_than_k_returns_all() {
        let top = top_neighborhoods(&[score("Ballard", 1.0)], &[], 5);
        assert_eq!(top.len(), 1);
        assert!(top_neighborhoods(&[], &[], 5).is_empty());
    }
}
