// Bearing and coordinate helpers shared by the preview compiler.

use geo::{Bearing, Haversine};
use geo_types::Point;
use serde_json::Value;

/// Initial great-circle bearing from `from` to `to`, both [lng, lat] in
/// degrees. Returns compass degrees normalized into [0, 360). Coincident
/// inputs degenerate to 0 rather than erroring; adjacent path vertices are
/// never coincident in practice.
pub fn initial_bearing(from: [f64; 2], to: [f64; 2]) -> f64 {
    let degrees = Haversine::bearing(Point::new(from[0], from[1]), Point::new(to[0], to[1]));
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Extract a numeric [lng, lat] pair from one raw coordinate object.
/// Anything without numeric `lat` and `lng` fields is rejected.
pub fn coordinate_from_value(value: &Value) -> Option<[f64; 2]> {
    let lat = value.get("lat")?.as_f64()?;
    let lng = value.get("lng")?.as_f64()?;
    Some([lng, lat])
}

/// Normalize a raw `coordinates` field into a single [lng, lat] pair. A
/// sequence yields its first element; null or malformed shapes yield None.
pub fn normalize_single(coords: &Value) -> Option<[f64; 2]> {
    match coords {
        Value::Array(items) => items.first().and_then(coordinate_from_value),
        Value::Object(_) => coordinate_from_value(coords),
        _ => None,
    }
}

/// Filter a coordinate sequence down to its valid [lng, lat] pairs,
/// preserving order. Non-array input yields an empty path.
pub fn normalize_path(coords: &Value) -> Vec<[f64; 2]> {
    match coords {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| coordinate_from_value(item))
            .collect(),
        _ => Vec::new(),
    }
}
