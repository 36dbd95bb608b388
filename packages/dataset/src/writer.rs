//! Result file output.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::DatasetError;

/// Writes `value` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be written and
/// [`DatasetError::Json`] if `value` cannot be serialized.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Wraps records as an Esri feature set, moving each record's `geometry`
/// attribute out of its attributes.
///
/// # Errors
///
/// Returns [`DatasetError::Structure`] if a record does not serialize to a
/// JSON object.
pub fn to_feature_set<T: Serialize>(records: &[T]) -> Result<Value, DatasetError> {
    let features = records
        .iter()
        .map(|record| {
            let Value::Object(mut attributes) = serde_json::to_value(record)? else {
                return Err(DatasetError::Structure {
                    message: "record did not serialize to an object".to_string(),
                });
            };
            let mut feature = Map::new();
            if let Some(geometry) = attributes.remove("geometry") {
                feature.insert("geometry".to_string(), geometry);
            }
            feature.insert("attributes".to_string(), Value::Object(attributes));
            Ok(Value::Object(feature))
        })
        .collect::<Result<Vec<_>, DatasetError>>()?;

    Ok(json!({ "features": features }))
}

/// Writes records as an Esri feature set file.
///
/// # Errors
///
/// Same as [`write_json`] and [`to_feature_set`].
pub fn write_feature_set<T: Serialize>(path: &Path, records: &[T]) -> Result<(), DatasetError> {
    write_json(path, &to_feature_set(records)?)
}

#[cfg(test)]
mod tests {
    use walkscore_models::CellFeature;

    use super::*;
    use crate::read_cells;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("walkscore_writer_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn feature_set_moves_geometry_out_of_attributes() {
        let mut cell = CellFeature::new(3);
        cell.geometry = Some(json!({"x": 1.0, "y": 2.0}));
        cell.personalized_walkscore = Some(2.5);

        let set = to_feature_set(&[cell]).unwrap();
        let feature = &set["features"][0];
        assert_eq!(feature["geometry"]["x"], 1.0);
        assert_eq!(feature["attributes"]["id"], 3);
        assert_eq!(feature["attributes"]["personalizedWalkscore"], 2.5);
        assert!(feature["attributes"].get("geometry").is_none());
    }

    #[test]
    fn written_feature_set_reads_back() {
        let mut cell = CellFeature::new(9);
        cell.neighborhood_id = Some("Ballard".to_string());
        cell.unadjusted_walkscore = Some(0.4);
        cell.geometry = Some(json!({"x": -122.38, "y": 47.67}));

        let path = temp_path("cells.json");
        write_feature_set(&path, std::slice::from_ref(&cell)).unwrap();
        let read = read_cells(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(read, vec![cell]);
    }

    #[test]
    fn rejects_non_object_records() {
        assert!(matches!(
            to_feature_set(&[1, 2]),
            Err(DatasetError::Structure { .. })
        ));
    }
}
