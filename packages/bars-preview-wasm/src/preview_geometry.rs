// The lighting-point-to-map-geometry compiler. Takes the flat point list the
// API serves for one airport and builds the marker list plus the four
// GeoJSON sources the map preview layers render from.

use serde_json::Value;

use crate::geo_math::{initial_bearing, normalize_path, normalize_single};
use crate::models::{
    CapProperties, Directionality, Feature, FeatureCollection, Geometry, LineProperties, Marker,
    PointKind, PreviewGeometry, RawLightingPoint, TaxiwayColor,
};
use crate::point_style::{cap_icon_name, classify};

/// Compile the raw point list into preview geometry.
///
/// Pure and deterministic: identical input produces identical output, and
/// input order is preserved in the per-partition sort keys. Records that
/// cannot be fully geo-located are dropped with no error and no log entry;
/// the API serves partially populated records during data entry, and the
/// preview degrades by omission rather than failing the render.
pub fn compile_preview(points: &[RawLightingPoint]) -> PreviewGeometry {
    let mut markers: Vec<Marker> = Vec::new();
    let mut lower_lines: Vec<Feature<LineProperties>> = Vec::new();
    let mut upper_lines: Vec<Feature<LineProperties>> = Vec::new();
    let mut lower_caps: Vec<Feature<CapProperties>> = Vec::new();
    let mut upper_caps: Vec<Feature<CapProperties>> = Vec::new();

    // Sort keys are sequenced separately per partition so each layer's draw
    // order is dense over its own features.
    let mut lower_sort_key: u32 = 0;
    let mut upper_sort_key: u32 = 0;

    for point in points {
        let id = match &point.id {
            Some(id) => id.clone(),
            None => continue,
        };

        let kind = PointKind::parse(point.r#type.as_deref());
        let is_upper = kind == PointKind::Stopbar;

        // An array of coordinates is a path candidate; a bare {lat, lng}
        // object is a marker candidate. A path that filters down to fewer
        // than two valid vertices is dropped outright, never demoted to a
        // marker.
        if !matches!(&point.coordinates, Value::Array(_)) {
            if let Some([lng, lat]) = normalize_single(&point.coordinates) {
                markers.push(Marker {
                    point: point.clone(),
                    longitude: lng,
                    latitude: lat,
                });
            }
            continue;
        }

        let path = normalize_path(&point.coordinates);
        if path.len() < 2 {
            continue;
        }

        let directionality = Directionality::parse(point.directionality.as_deref());
        let style = classify(
            kind,
            TaxiwayColor::parse(point.color.as_deref()),
            directionality,
        );

        let sort_key = if is_upper {
            let key = upper_sort_key;
            upper_sort_key += 1;
            key
        } else {
            let key = lower_sort_key;
            lower_sort_key += 1;
            key
        };

        let line = Feature::new(
            Geometry::line_string(&path),
            LineProperties {
                id: id.clone(),
                r#type: kind,
                directionality,
                top_color: style.top,
                bottom_color: style.bottom,
                sort_key,
            },
        );

        let icon = cap_icon_name(style);

        // One cap per endpoint. The end cap keeps the start-to-end
        // orientation: its bearing is taken *into* the last vertex.
        let start_bearing = initial_bearing(path[0], path[1]);
        let end_bearing = initial_bearing(path[path.len() - 2], path[path.len() - 1]);

        let start_cap = Feature::new(
            Geometry::point(path[0]),
            CapProperties {
                icon: icon.to_string(),
                rotation: start_bearing - 90.0,
                id: id.clone(),
                sort_key,
            },
        );
        let end_cap = Feature::new(
            Geometry::point(path[path.len() - 1]),
            CapProperties {
                icon: icon.to_string(),
                rotation: end_bearing - 90.0,
                id,
                sort_key,
            },
        );

        if is_upper {
            upper_lines.push(line);
            upper_caps.push(start_cap);
            upper_caps.push(end_cap);
        } else {
            lower_lines.push(line);
            lower_caps.push(start_cap);
            lower_caps.push(end_cap);
        }
    }

    PreviewGeometry {
        markers,
        lower_lines: FeatureCollection::new(lower_lines),
        upper_lines: FeatureCollection::new(upper_lines),
        lower_caps: FeatureCollection::new(lower_caps),
        upper_caps: FeatureCollection::new(upper_caps),
    }
}
