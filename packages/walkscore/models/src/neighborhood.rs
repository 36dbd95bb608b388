//! Neighborhood input records and the aggregated scores derived from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::de;

/// A neighborhood polygon as supplied by the upstream feature service.
///
/// `id` is the key that cell records reference through their
/// `neighborhoodId`. In the `ArcGIS` layers that key is the
/// neighborhood name stored in the `nested` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodRecord {
    /// Stable identifier matched against cell `neighborhoodId`s.
    #[serde(alias = "nested", deserialize_with = "de::required_key")]
    pub id: String,
    /// Display name. Falls back to `id` when absent.
    #[serde(
        default,
        alias = "Name",
        deserialize_with = "de::optional_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Polygon area, used as the normalization denominator.
    #[serde(
        default,
        alias = "neighborhood_area",
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub area: Option<f64>,
    /// Centroid latitude.
    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    /// Centroid longitude.
    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    /// Polygon geometry, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
    /// Any other attributes, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NeighborhoodRecord {
    /// Creates a neighborhood with an identifier and area.
    #[must_use]
    pub fn new(id: impl Into<String>, area: Option<f64>) -> Self {
        Self {
            id: id.into(),
            name: None,
            area,
            latitude: None,
            longitude: None,
            geometry: None,
            extra: BTreeMap::new(),
        }
    }

    /// Returns the display name, falling back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Aggregated personalized score for one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodScore {
    /// Neighborhood identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Polygon area, if known.
    pub area: Option<f64>,
    /// Number of cells that contributed to `aggregate_score`.
    pub cell_count: u64,
    /// Sum of member cell scores.
    pub aggregate_score: f64,
    /// `aggregate_score` divided by `area ^ exponent`.
    pub normalized_score: f64,
    /// Final rank-normalized score on the 0-5 scale.
    pub rank_scaled_score: f64,
    /// Centroid latitude.
    pub latitude: Option<f64>,
    /// Centroid longitude.
    pub longitude: Option<f64>,
}

/// One entry in the top neighborhoods list shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNeighborhood {
    /// 1-based position in the ranking.
    pub rank: u32,
    /// Display name.
    pub name: String,
    /// Rank-normalized score on the 0-5 scale.
    pub score: f64,
    /// Centroid latitude.
    pub latitude: Option<f64>,
    /// Centroid longitude.
    pub longitude: Option<f64>,
}
