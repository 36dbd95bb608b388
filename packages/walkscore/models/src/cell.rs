//! Fishnet cell records and their derived per-cell scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::de;

/// One fishnet grid cell as supplied by the upstream feature service.
///
/// Raw measurements are optional: a missing or malformed attribute is a
/// data-quality issue that disables the corresponding factor rather than
/// rejecting the cell. Input field names from the `ArcGIS` export
/// (`IndexID`, `nested`, `Max_Speed_Limit`, snake case measurements) are
/// accepted as aliases; output always uses camel case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFeature {
    /// Stable cell identifier, unique within a dataset snapshot.
    #[serde(alias = "IndexID", deserialize_with = "de::integer_id")]
    pub id: i64,
    /// Key of the neighborhood this cell belongs to, if any.
    #[serde(
        default,
        alias = "nested",
        alias = "neighborhood_id",
        deserialize_with = "de::optional_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub neighborhood_id: Option<String>,
    /// Effective terrain slope (percent grade).
    #[serde(
        default,
        alias = "effective_slope",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_slope: Option<f64>,
    /// Highest effective speed limit around the cell.
    #[serde(
        default,
        alias = "Max_Speed_Limit",
        alias = "max_effective_speed_limit",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_effective_speed_limit: Option<f64>,
    /// Normalized business density index.
    #[serde(
        default,
        alias = "business_density",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub business_density: Option<f64>,
    /// Normalized crime density.
    #[serde(
        default,
        alias = "crime_density_normalized",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub crime_density_normalized: Option<f64>,
    /// Normalized traffic crash density.
    #[serde(
        default,
        alias = "crash_density_normalized",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub crash_density_normalized: Option<f64>,
    /// Baseline walkscore, independent of user preference.
    #[serde(
        default,
        alias = "unadjusted_walkscore",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub unadjusted_walkscore: Option<f64>,
    /// Personalized score from the most recent recalculation.
    #[serde(
        default,
        alias = "personalized_walkscore",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub personalized_walkscore: Option<f64>,
    /// Scaler values used for the most recent recalculation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalers: Option<CellScalers>,
    /// Cell geometry, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
    /// Any other attributes, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CellFeature {
    /// Creates a cell with only an identifier set.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            neighborhood_id: None,
            effective_slope: None,
            max_effective_speed_limit: None,
            business_density: None,
            crime_density_normalized: None,
            crash_density_normalized: None,
            unadjusted_walkscore: None,
            personalized_walkscore: None,
            scalers: None,
            geometry: None,
            extra: BTreeMap::new(),
        }
    }
}

/// The five multiplicative weights applied to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellScalers {
    /// Terrain slope weight.
    pub slope: f64,
    /// Effective speed limit weight.
    pub speed_limit: f64,
    /// Business density weight.
    pub business_density: f64,
    /// Crime density weight.
    pub crime_density: f64,
    /// Crash density weight.
    pub crash_density: f64,
}

impl CellScalers {
    /// All weights neutral.
    pub const NEUTRAL: Self = Self {
        slope: 1.0,
        speed_limit: 1.0,
        business_density: 1.0,
        crime_density: 1.0,
        crash_density: 1.0,
    };

    /// Applies the weights to `base`, multiplying left to right in factor
    /// order so results are reproducible bit for bit.
    #[must_use]
    pub fn apply(&self, base: f64) -> f64 {
        base * self.slope
            * self.speed_limit
            * self.business_density
            * self.crime_density
            * self.crash_density
    }
}

/// A precalculated `(cell, score)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Identifier of the scored cell.
    #[serde(alias = "IndexID")]
    pub cell_id: i64,
    /// Raw personalized walkscore for that cell.
    #[serde(alias = "personalized_walkscore")]
    pub personalized_walkscore: f64,
}
