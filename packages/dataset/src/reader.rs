//! Feature set parsing.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use walkscore_models::{CellFeature, NeighborhoodRecord};

use crate::DatasetError;

/// Reads cells from a feature set file.
///
/// # Errors
///
/// * [`DatasetError::Io`] if the file cannot be read
/// * [`DatasetError::Json`] if it is not JSON
/// * [`DatasetError::Structure`] if it is not a feature set or a record
///   lacks its identifier
pub fn read_cells(path: &Path) -> Result<Vec<CellFeature>, DatasetError> {
    let cells = parse_cells(&std::fs::read_to_string(path)?)?;
    log::info!("Loaded {} cells from {}", cells.len(), path.display());
    Ok(cells)
}

/// Reads neighborhoods from a feature set file.
///
/// # Errors
///
/// Same as [`read_cells`].
pub fn read_neighborhoods(path: &Path) -> Result<Vec<NeighborhoodRecord>, DatasetError> {
    let neighborhoods = parse_neighborhoods(&std::fs::read_to_string(path)?)?;
    log::info!(
        "Loaded {} neighborhoods from {}",
        neighborhoods.len(),
        path.display()
    );
    Ok(neighborhoods)
}

/// Parses cells from feature set JSON.
///
/// # Errors
///
/// [`DatasetError::Json`] for malformed JSON, [`DatasetError::Structure`]
/// for anything that is not a feature set of cell records.
pub fn parse_cells(json: &str) -> Result<Vec<CellFeature>, DatasetError> {
    parse_records(json, "cell", &["id", "IndexID"])
}

/// Parses neighborhoods from feature set JSON.
///
/// # Errors
///
/// Same as [`parse_cells`].
pub fn parse_neighborhoods(json: &str) -> Result<Vec<NeighborhoodRecord>, DatasetError> {
    parse_records(json, "neighborhood", &["id", "nested"])
}

fn parse_records<T: DeserializeOwned>(
    json: &str,
    kind: &str,
    id_keys: &[&str],
) -> Result<Vec<T>, DatasetError> {
    let document: Value = serde_json::from_str(json)?;

    feature_attributes(document, id_keys)?
        .into_iter()
        .enumerate()
        .map(|(index, attributes)| {
            serde_json::from_value(Value::Object(attributes)).map_err(|e| {
                DatasetError::Structure {
                    message: format!("{kind} record {index}: {e}"),
                }
            })
        })
        .collect()
}

/// Flattens a feature set into one attribute object per feature.
///
/// Feature geometry is carried along as a `geometry` attribute. For
/// `GeoJSON` features, a top-level feature `id` is carried along as `id`
/// unless the attributes already hold one of `id_keys`.
///
/// # Errors
///
/// Returns [`DatasetError::Structure`] if the document is neither a
/// feature collection nor an array of objects.
pub fn feature_attributes(
    document: Value,
    id_keys: &[&str],
) -> Result<Vec<Map<String, Value>>, DatasetError> {
    let features = match document {
        Value::Array(records) => return records.into_iter().map(into_object).collect(),
        Value::Object(mut object) => match object.remove("features") {
            Some(Value::Array(features)) => features,
            _ => {
                return Err(structure("expected a \"features\" array".to_string()));
            }
        },
        other => {
            return Err(structure(format!(
                "expected a feature set, found {}",
                kind_of(&other)
            )));
        }
    };

    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let Value::Object(mut feature) = feature else {
                return Err(structure(format!("feature {index} is not an object")));
            };

            let mut attributes = match feature
                .remove("attributes")
                .or_else(|| feature.remove("properties"))
            {
                Some(Value::Object(attributes)) => attributes,
                Some(Value::Null) | None => Map::new(),
                Some(other) => {
                    return Err(structure(format!(
                        "feature {index} attributes are {}, not an object",
                        kind_of(&other)
                    )));
                }
            };

            if let Some(geometry) = feature.remove("geometry").filter(|g| !g.is_null()) {
                attributes.entry("geometry").or_insert(geometry);
            }
            let has_id = id_keys.iter().any(|key| attributes.contains_key(*key));
            if let Some(id) = feature.remove("id").filter(|_| !has_id) {
                attributes.insert("id".to_string(), id);
            }

            Ok(attributes)
        })
        .collect()
}

fn into_object(record: Value) -> Result<Map<String, Value>, DatasetError> {
    match record {
        Value::Object(object) => Ok(object),
        other => Err(structure(format!(
            "expected an attribute object, found {}",
            kind_of(&other)
        ))),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

const fn structure(message: String) -> DatasetError {
    DatasetError::Structure { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESRI_CELLS: &str = r#"{
        "displayFieldName": "",
        "fields": [],
        "features": [
            {
                "attributes": {
                    "IndexID": 101,
                    "nested": "Ballard",
                    "effective_slope": 6,
                    "Max_Speed_Limit": 28,
                    "business_density": 1.2,
                    "crime_density_normalized": 0.6,
                    "crash_density_normalized": 0.6,
                    "unadjusted_walkscore": 0.00005,
                    "SUM_SW_area": 1520.5
                },
                "geometry": {"rings": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]]}
            },
            {
                "attributes": {"IndexID": "102", "nested": null, "effective_slope": null}
            }
        ]
    }"#;

    #[test]
    fn parses_esri_feature_set() {
        let cells = parse_cells(ESRI_CELLS).unwrap();
        assert_eq!(cells.len(), 2);

        let first = &cells[0];
        assert_eq!(first.id, 101);
        assert_eq!(first.neighborhood_id.as_deref(), Some("Ballard"));
        assert_eq!(first.max_effective_speed_limit, Some(28.0));
        assert_eq!(first.unadjusted_walkscore, Some(0.000_05));
        assert!(first.geometry.is_some());
        assert!(first.extra.contains_key("SUM_SW_area"));

        let second = &cells[1];
        assert_eq!(second.id, 102);
        assert_eq!(second.neighborhood_id, None);
        assert_eq!(second.effective_slope, None);
    }

    #[test]
    fn parses_geojson_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 7,
                    "properties": {"nested": "Fremont", "neighborhood_area": 2500000.0},
                    "geometry": {"type": "Point", "coordinates": [-122.35, 47.65]}
                }
            ]
        }"#;
        let neighborhoods = parse_neighborhoods(json).unwrap();
        assert_eq!(neighborhoods.len(), 1);
        assert_eq!(neighborhoods[0].id, "Fremont");
        assert_eq!(neighborhoods[0].area, Some(2_500_000.0));
        assert!(neighborhoods[0].geometry.is_some());
        assert!(neighborhoods[0].extra.is_empty());
    }

    #[test]
    fn geojson_feature_id_becomes_cell_id() {
        let json = r#"{"features": [{"type": "Feature", "id": 12, "properties": {"unadjusted_walkscore": 0.4}, "geometry": null}]}"#;
        let cells = parse_cells(json).unwrap();
        assert_eq!(cells[0].id, 12);
        assert!(cells[0].geometry.is_none());
    }

    #[test]
    fn parses_bare_array() {
        let cells = parse_cells(r#"[{"id": 1}, {"IndexID": 2.0, "businessDensity": "3.5"}]"#).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].id, 2);
        assert_eq!(cells[1].business_density, Some(3.5));
    }

    #[test]
    fn rejects_non_feature_sets() {
        for json in [r#"{"type": "FeatureCollection"}"#, "42", r#"[1, 2]"#, r#"{"features": [3]}"#] {
            assert!(
                matches!(parse_cells(json), Err(DatasetError::Structure { .. })),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_records_without_identifier() {
        let err = parse_cells(r#"[{"nested": "Ballard"}]"#).unwrap_err();
        assert!(err.to_string().contains("cell record 0"), "{err}");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse_cells("{"), Err(DatasetError::Json(_))));
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("walkscore_reader_{}.json", std::process::id()));
        std::fs::write(&path, ESRI_CELLS).unwrap();
        let cells = read_cells(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cells.len(), 2);

        assert!(matches!(
            read_cells(Path::new("/nonexistent/walkscore/cells.json")),
            Err(DatasetError::Io(_))
        ));
    }
}
