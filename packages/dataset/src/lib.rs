#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! File boundary of the walkscore pipeline.
//!
//! Reads fishnet cells and neighborhood boundaries from the JSON exports
//! of the feature service and writes scored results back out. Three input
//! shapes are accepted:
//!
//! * an Esri feature set: `{ "features": [{ "attributes": {..}, "geometry": {..} }] }`
//! * a `GeoJSON` `FeatureCollection`: `{ "features": [{ "properties": {..}, "geometry": {..} }] }`
//! * a bare array of attribute objects

pub mod reader;
pub mod writer;

pub use reader::{parse_cells, parse_neighborhoods, read_cells, read_neighborhoods};
pub use writer::{to_feature_set, write_feature_set, write_json};

use thiserror::Error;

/// Errors that can occur while reading or writing dataset files.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON does not have the shape of a feature set.
    #[error("Invalid dataset structure: {message}")]
    Structure {
        /// Description of what went wrong.
        message: String,
    },
}
