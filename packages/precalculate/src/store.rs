//! Persistence of precalculated scores.
//!
//! The store is a single JSON object mapping each serialized [`ComboKey`]
//! to the `{cellId, personalizedWalkscore}` records for that combination.

use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use walkscore_models::{ComboKey, ScoreRecord, Sliders};

use crate::{Precalculated, PrecalculateError, all_combinations};

/// Writes precalculated scores to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`PrecalculateError::Io`] if the file cannot be written and
/// [`PrecalculateError::Json`] if serialization fails.
pub fn write_store(path: &Path, precalculated: &Precalculated) -> Result<(), PrecalculateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, precalculated)?;
    writer.flush()?;

    log::info!(
        "Saved {} combinations to {}",
        precalculated.len(),
        path.display()
    );
    Ok(())
}

/// Precalculated scores loaded for lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecalculatedStore {
    entries: Precalculated,
}

impl From<Precalculated> for PrecalculatedStore {
    fn from(entries: Precalculated) -> Self {
        Self { entries }
    }
}

impl PrecalculatedStore {
    /// Loads a store file.
    ///
    /// Keys may use any axis order or spacing; they are canonicalized on
    /// load.
    ///
    /// # Errors
    ///
    /// Returns [`PrecalculateError::Io`] if the file cannot be read and
    /// [`PrecalculateError::Json`] if it is not a valid store.
    pub fn load(path: &Path) -> Result<Self, PrecalculateError> {
        let reader = BufReader::new(std::fs::File::open(path)?);
        let entries: Precalculated = serde_json::from_reader(reader)?;
        let store = Self { entries };

        let missing = store.missing_combinations();
        if !missing.is_empty() {
            log::warn!(
                "Store {} is missing {} of {} combinations",
                path.display(),
                missing.len(),
                crate::COMBINATION_COUNT
            );
        }
        log::info!("Loaded {} combinations from {}", store.len(), path.display());

        Ok(store)
    }

    /// Parses a store from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PrecalculateError::Json`] if it is not a valid store.
    pub fn parse(json: &str) -> Result<Self, PrecalculateError> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    /// Returns the records stored for a slider combination.
    #[must_use]
    pub fn lookup(&self, sliders: Sliders) -> Option<&[ScoreRecord]> {
        self.entries
            .get(&ComboKey::new(sliders))
            .map(Vec::as_slice)
    }

    /// Combinations with no stored records.
    #[must_use]
    pub fn missing_combinations(&self) -> Vec<Sliders> {
        all_combinations()
            .into_iter()
            .filter(|sliders| !self.entries.contains_key(&ComboKey::new(*sliders)))
            .collect()
    }

    /// Number of stored combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use walkscore_models::{CellFeature, ImportanceLevel};
    use walkscore_scoring::ScoreFormula;

    use super::*;
    use crate::precalculate_all;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("walkscore_store_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn round_trips_through_disk() {
        let mut cell = CellFeature::new(42);
        cell.unadjusted_walkscore = Some(0.6);
        cell.effective_slope = Some(4.5);
        let precalculated = precalculate_all(&[cell], &ScoreFormula::default(), None);

        let path = temp_path("combinations.json");
        write_store(&path, &precalculated).unwrap();
        let store = PrecalculatedStore::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.len(), 625);
        assert!(store.missing_combinations().is_empty());
        assert_eq!(store, PrecalculatedStore::from(precalculated));
    }

    #[test]
    fn resolves_keys_written_with_spaces_and_snake_case_fields() {
        let json = r#"{
            "{\"slope\": 2, \"streets\": 2, \"amenity\": 2, \"crime\": 2}": [
                {"IndexID": 1, "personalized_walkscore": 0.25}
            ]
        }"#;
        let store = PrecalculatedStore::parse(json).unwrap();
        let records = store
            .lookup(Sliders::uniform(ImportanceLevel::Neutral))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cell_id, 1);
        assert!((records[0].personalized_walkscore - 0.25).abs() < f64::EPSILON);

        let steep = Sliders::new(
            ImportanceLevel::VeryImportant,
            ImportanceLevel::Neutral,
            ImportanceLevel::Neutral,
            ImportanceLevel::Neutral,
        );
        assert!(store.lookup(steep).is_none());
        assert_eq!(store.missing_combinations().len(), 624);
    }

    #[test]
    fn serialized_keys_are_compact_json() {
        let mut precalculated = Precalculated::new();
        precalculated.insert(ComboKey::new(Sliders::default()), Vec::new());
        let json = serde_json::to_string(&precalculated).unwrap();
        assert_eq!(json, r#"{"{\"slope\":2,\"streets\":2,\"amenity\":2,\"crime\":2}":[]}"#);
    }

    #[test]
    fn rejects_invalid_keys() {
        assert!(matches!(
            PrecalculatedStore::parse(r#"{"{\"slope\": 9}": []}"#),
            Err(PrecalculateError::Json(_))
        ));
    }
}
