//! Centroid derivation from neighborhood boundary geometry.
//!
//! Accepts `GeoJSON` geometries (bare or wrapped in a `Feature`), Esri
//! polygon geometry (`{ "rings": [...] }`) and Esri points (`{ "x", "y" }`).

use geo::{Centroid, Coord, LineString, MultiPolygon, Point, Polygon, Winding};
use geojson::GeoJson;
use serde_json::Value;
use walkscore_models::NeighborhoodRecord;

/// Computes the centroid of a geometry, if it can be decoded.
#[must_use]
pub fn centroid_of(geometry: &Value) -> Option<Point<f64>> {
    let point = if let Some(rings) = geometry.get("rings").and_then(Value::as_array) {
        esri_polygons(rings)?.centroid()
    } else if let (Some(x), Some(y)) = (
        geometry.get("x").and_then(Value::as_f64),
        geometry.get("y").and_then(Value::as_f64),
    ) {
        Some(Point::new(x, y))
    } else {
        geojson_geometry(geometry)?.centroid()
    };

    point.filter(|p| p.x().is_finite() && p.y().is_finite())
}

/// Returns `(latitude, longitude)` for a neighborhood.
///
/// Explicit coordinates win. Otherwise the centroid of the boundary is
/// used; when that cannot be computed either, whatever partial
/// coordinates the record has are returned unchanged.
#[must_use]
pub fn resolve_coordinates(record: &NeighborhoodRecord) -> (Option<f64>, Option<f64>) {
    if record.latitude.is_some() && record.longitude.is_some() {
        return (record.latitude, record.longitude);
    }

    match record.geometry.as_ref().and_then(centroid_of) {
        Some(point) => (Some(point.y()), Some(point.x())),
        None => (record.latitude, record.longitude),
    }
}

fn geojson_geometry(value: &Value) -> Option<geo::Geometry<f64>> {
    let geometry = match GeoJson::from_json_value(value.clone()).ok()? {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature.geometry?,
        GeoJson::FeatureCollection(_) => return None,
    };
    geometry.try_into().ok()
}

/// Builds polygons from Esri rings. Clockwise rings are exteriors; each
/// counter-clockwise ring is a hole in the exterior before it.
fn esri_polygons(rings: &[Value]) -> Option<MultiPolygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in rings.iter().filter_map(esri_ring) {
        match polygons.last_mut() {
            Some(exterior) if !ring.is_cw() => exterior.interiors_push(ring),
            _ => polygons.push(Polygon::new(ring, vec![])),
        }
    }

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon(polygons))
    }
}

fn esri_ring(ring: &Value) -> Option<LineString<f64>> {
    let coords = ring
        .as_array()?
        .iter()
        .map(|pair| {
            let pair = pair.as_array()?;
            Some(Coord {
                x: pair.first()?.as_f64()?,
                y: pair.get(1)?.as_f64()?,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    (coords.len() >= 3).then(|| LineString::from(coords))
}
