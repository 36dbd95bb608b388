//! Explicit cache of scoring outcomes keyed by slider combination.
//!
//! A cache entry is only valid for the dataset and configuration it was
//! computed from. The cache is bound to a fingerprint of those inputs and
//! [`ScoreCache::rebind`] drops every entry when the fingerprint changes.

use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use walkscore_models::{CellFeature, ComboKey, NeighborhoodRecord, Sliders};
use walkscore_neighborhood::ScoringOutcome;
use walkscore_scoring::ScoringConfig;

/// Fingerprints the inputs that determine a [`ScoringOutcome`].
///
/// Covers every field the scoring stages read. Pass-through attributes
/// and geometry other than neighborhood boundaries are ignored.
#[must_use]
pub fn dataset_fingerprint(
    cells: &[CellFeature],
    neighborhoods: &[NeighborhoodRecord],
    config: &ScoringConfig,
) -> u64 {
    fn number(hasher: &mut DefaultHasher, value: Option<f64>) {
        value.map(f64::to_bits).hash(hasher);
    }

    let mut hasher = DefaultHasher::new();

    cells.len().hash(&mut hasher);
    for cell in cells {
        cell.id.hash(&mut hasher);
        cell.neighborhood_id.hash(&mut hasher);
        for value in [
            cell.effective_slope,
            cell.max_effective_speed_limit,
            cell.business_density,
            cell.crime_density_normalized,
            cell.crash_density_normalized,
            cell.unadjusted_walkscore,
        ] {
            number(&mut hasher, value);
        }
    }

    neighborhoods.len().hash(&mut hasher);
    for neighborhood in neighborhoods {
        neighborhood.id.hash(&mut hasher);
        neighborhood.name.hash(&mut hasher);
        number(&mut hasher, neighborhood.area);
        number(&mut hasher, neighborhood.latitude);
        number(&mut hasher, neighborhood.longitude);
        neighborhood
            .geometry
            .as_ref()
            .map(ToString::to_string)
            .hash(&mut hasher);
    }

    for value in [config.floor, config.minimum, config.area_exponent] {
        number(&mut hasher, Some(value));
    }
    config.top_k.hash(&mut hasher);
    config.excluded_neighborhoods.hash(&mut hasher);

    hasher.finish()
}

/// Cache of [`ScoringOutcome`]s for one dataset fingerprint.
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    fingerprint: u64,
    entries: BTreeMap<ComboKey, Arc<ScoringOutcome>>,
    hits: u64,
    misses: u64,
}

impl ScoreCache {
    /// Creates an empty cache bound to `fingerprint`.
    #[must_use]
    pub const fn new(fingerprint: u64) -> Self {
        Self {
            fingerprint,
            entries: BTreeMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The fingerprint the cached entries belong to.
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Returns the cached outcome for `sliders`, if any.
    #[must_use]
    pub fn get(&self, sliders: Sliders) -> Option<Arc<ScoringOutcome>> {
        self.entries.get(&ComboKey::new(sliders)).cloned()
    }

    /// Returns the cached outcome for `sliders`, computing and storing it
    /// with `compute` on a miss.
    pub fn get_or_insert_with(
        &mut self,
        sliders: Sliders,
        compute: impl FnOnce() -> ScoringOutcome,
    ) -> Arc<ScoringOutcome> {
        let key = ComboKey::new(sliders);
        if let Some(outcome) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(outcome);
        }

        self.misses += 1;
        log::debug!("Score cache miss for {key}");
        let outcome = Arc::new(compute());
        self.entries.insert(key, Arc::clone(&outcome));
        outcome
    }

    /// Drops the entry for `sliders`. Returns whether one was present.
    pub fn invalidate(&mut self, sliders: Sliders) -> bool {
        self.entries.remove(&ComboKey::new(sliders)).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Binds the cache to `fingerprint`, dropping every entry if it
    /// differs from the current one. Returns whether entries were dropped.
    pub fn rebind(&mut self, fingerprint: u64) -> bool {
        if fingerprint == self.fingerprint {
            return false;
        }

        log::info!(
            "Dataset changed, dropping {} cached score sets",
            self.entries.len()
        );
        self.fingerprint = fingerprint;
        self.entries.clear();
        true
    }

    /// Number of cached combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[must_use]
    pub const fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use walkscore_models::ImportanceLevel;
    use walkscore_neighborhood::personalize;

    use super::*;

    fn dataset() -> (Vec<CellFeature>, Vec<NeighborhoodRecord>) {
        let mut cell = CellFeature::new(1);
        cell.neighborhood_id = Some("Ballard".to_string());
        cell.unadjusted_walkscore = Some(0.5);
        (vec![cell], vec![NeighborhoodRecord::new("Ballard", Some(1.0))])
    }

    #[test]
    fn computes_once_per_combination() {
        let (cells, neighborhoods) = dataset();
        let config = ScoringConfig::default();
        let mut cache = ScoreCache::new(dataset_fingerprint(&cells, &neighborhoods, &config));
        let calls = Cell::new(0);

        for _ in 0..3 {
            cache.get_or_insert_with(Sliders::default(), || {
                calls.set(calls.get() + 1);
                personalize(&cells, &neighborhoods, Sliders::default(), &config)
            });
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats(), (2, 1));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(Sliders::default()).is_some());
    }

    #[test]
    fn invalidate_drops_single_entry() {
        let (cells, neighborhoods) = dataset();
        let config = ScoringConfig::default();
        let mut cache = ScoreCache::new(0);
        let other = Sliders::uniform(ImportanceLevel::VeryImportant);

        for sliders in [Sliders::default(), other] {
            cache.get_or_insert_with(sliders, || personalize(&cells, &neighborhoods, sliders, &config));
        }

        assert!(cache.invalidate(other));
        assert!(!cache.invalidate(other));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(other).is_none());
    }

    #[test]
    fn rebind_clears_only_on_change() {
        let (mut cells, neighborhoods) = dataset();
        let config = ScoringConfig::default();
        let fingerprint = dataset_fingerprint(&cells, &neighborhoods, &config);
        let mut cache = ScoreCache::new(fingerprint);
        cache.get_or_insert_with(Sliders::default(), || {
            personalize(&cells, &neighborhoods, Sliders::default(), &config)
        });

        assert!(!cache.rebind(fingerprint));
        assert_eq!(cache.len(), 1);

        cells[0].unadjusted_walkscore = Some(0.7);
        let changed = dataset_fingerprint(&cells, &neighborhoods, &config);
        assert_ne!(changed, fingerprint);
        assert!(cache.rebind(changed));
        assert!(cache.is_empty());
        assert_eq!(cache.fingerprint(), changed);
    }

    #[test]
    fn fingerprint_tracks_config() {
        let (cells, neighborhoods) = dataset();
        let base = ScoringConfig::default();
        let tuned = ScoringConfig::parse("area_exponent = 0.85").unwrap();
        assert_eq!(
            dataset_fingerprint(&cells, &neighborhoods, &base),
            dataset_fingerprint(&cells, &neighborhoods, &base)
        );
        assert_ne!(
            dataset_fingerprint(&cells, &neighborhoods, &base),
            dataset_fingerprint(&cells, &neighborhoods, &tuned)
        );
    }
}
