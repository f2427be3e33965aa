// Host-side tests for the preview compiler and its helpers.

use serde_json::{json, Value};

use crate::airport_points::points_from_value;
use crate::geo_math::{initial_bearing, normalize_path, normalize_single};
use crate::models::{Color, Directionality, PointKind, RawLightingPoint, TaxiwayColor};
use crate::point_style::{cap_icon_name, classify, classify_point, StylePair, CAP_ICONS};
use crate::preview_geometry::compile_preview;

fn points(value: Value) -> Vec<RawLightingPoint> {
    let (points, _) = points_from_value(value).expect("test payload should parse");
    points
}

#[test]
fn classifier_is_total_over_every_tag_combination() {
    let kinds = [
        PointKind::Stopbar,
        PointKind::LeadOn,
        PointKind::Taxiway,
        PointKind::Stand,
        PointKind::Unknown,
    ];
    let colors = [
        TaxiwayColor::Green,
        TaxiwayColor::GreenYellow,
        TaxiwayColor::GreenBlue,
        TaxiwayColor::GreenOrange,
    ];
    let directionalities = [
        Directionality::UniDirectional,
        Directionality::BiDirectional,
    ];

    for kind in kinds {
        for color in colors {
            for directionality in directionalities {
                let pair = classify(kind, color, directionality);
                assert!(
                    CAP_ICONS.iter().any(|(_, known)| *known == pair),
                    "classify({:?}, {:?}, {:?}) produced a pair outside the icon vocabulary",
                    kind,
                    color,
                    directionality
                );
            }
        }
    }
}

#[test]
fn classifier_rule_table() {
    let uni = Directionality::UniDirectional;
    let bi = Directionality::BiDirectional;

    assert_eq!(
        classify(PointKind::Taxiway, TaxiwayColor::Green, uni),
        StylePair {
            top: Color::Green,
            bottom: Color::Green
        }
    );
    assert_eq!(
        classify(PointKind::Taxiway, TaxiwayColor::GreenYellow, uni),
        StylePair {
            top: Color::Green,
            bottom: Color::Yellow
        }
    );
    assert_eq!(
        classify(PointKind::Taxiway, TaxiwayColor::GreenBlue, bi),
        StylePair {
            top: Color::Green,
            bottom: Color::Blue
        }
    );
    assert_eq!(
        classify(PointKind::Taxiway, TaxiwayColor::GreenOrange, uni),
        StylePair {
            top: Color::Green,
            bottom: Color::Orange
        }
    );
    assert_eq!(
        classify(PointKind::LeadOn, TaxiwayColor::Green, bi),
        StylePair {
            top: Color::Green,
            bottom: Color::Yellow
        }
    );
    assert_eq!(
        classify(PointKind::Stand, TaxiwayColor::Green, uni),
        StylePair {
            top: Color::Orange,
            bottom: Color::Orange
        }
    );
    assert_eq!(
        classify(PointKind::Stopbar, TaxiwayColor::Green, bi),
        StylePair {
            top: Color::Red,
            bottom: Color::Red
        }
    );
    assert_eq!(
        classify(PointKind::Stopbar, TaxiwayColor::Green, uni),
        StylePair {
            top: Color::Gray,
            bottom: Color::Red
        }
    );
    assert_eq!(
        classify(PointKind::Unknown, TaxiwayColor::Green, uni),
        StylePair {
            top: Color::Gray,
            bottom: Color::Red
        }
    );
}

#[test]
fn classifier_handles_missing_tags() {
    // No type at all classifies like an unrecognized stopbar
    let bare = points(json!([{"id": "x"}])).remove(0);
    assert_eq!(
        classify_point(&bare),
        StylePair {
            top: Color::Gray,
            bottom: Color::Red
        }
    );

    // Unknown taxiway color falls back to plain green
    let magenta = points(json!([{"id": "y", "type": "taxiway", "color": "magenta"}])).remove(0);
    let pair = classify_point(&magenta);
    assert_eq!(
        pair,
        StylePair {
            top: Color::Green,
            bottom: Color::Green
        }
    );
    assert_eq!(cap_icon_name(pair), "cap-green-green");
}

#[test]
fn cap_icon_name_falls_back_to_gray_red() {
    let impossible = StylePair {
        top: Color::Blue,
        bottom: Color::Blue,
    };
    assert_eq!(cap_icon_name(impossible), "cap-gray-red");
}

#[test]
fn bearing_cardinal_directions() {
    assert!((initial_bearing([0.0, 0.0], [0.0, 1.0]) - 0.0).abs() < 1e-6);
    assert!((initial_bearing([0.0, 0.0], [1.0, 0.0]) - 90.0).abs() < 1e-6);
    assert!((initial_bearing([0.0, 1.0], [0.0, 0.0]) - 180.0).abs() < 1e-6);
    assert!((initial_bearing([1.0, 0.0], [0.0, 0.0]) - 270.0).abs() < 1e-6);
}

#[test]
fn bearing_stays_in_range() {
    let samples = [
        ([-0.45, 51.47], [2.55, 49.01]),
        ([151.18, -33.95], [144.84, -37.67]),
        ([-122.38, 37.62], [139.78, 35.55]),
        ([9.74, 52.46], [9.68, 52.46]),
    ];
    for (from, to) in samples {
        let bearing = initial_bearing(from, to);
        assert!(
            (0.0..360.0).contains(&bearing),
            "bearing({:?}, {:?}) = {} out of range",
            from,
            to,
            bearing
        );
    }
}

#[test]
fn bearing_of_coincident_points_degenerates_to_zero() {
    assert_eq!(initial_bearing([10.0, 5.0], [10.0, 5.0]), 0.0);
}

#[test]
fn normalize_handles_untrusted_shapes() {
    assert_eq!(normalize_single(&Value::Null), None);
    assert_eq!(normalize_single(&json!({"lat": 5.0, "lng": 10.0})), Some([10.0, 5.0]));
    assert_eq!(normalize_single(&json!({"lat": "5", "lng": 10.0})), None);
    assert_eq!(
        normalize_single(&json!([{"lat": 1.0, "lng": 2.0}, {"lat": 3.0, "lng": 4.0}])),
        Some([2.0, 1.0])
    );
    assert_eq!(normalize_single(&json!([])), None);

    assert_eq!(
        normalize_path(&json!([
            {"lat": 1.0, "lng": 2.0},
            {"lng": 4.0},
            {"lat": "bad", "lng": 4.0},
            {"lat": 3.0, "lng": 4.0},
        ])),
        vec![[2.0, 1.0], [4.0, 3.0]]
    );
    assert_eq!(normalize_path(&json!({"lat": 1.0, "lng": 2.0})), Vec::<[f64; 2]>::new());
}

#[test]
fn stopbar_paths_partition_upper_everything_else_lower() {
    let input = points(json!([
        {"id": "sb1", "type": "stopbar", "coordinates": [{"lat": 0.0, "lng": 0.0}, {"lat": 0.0, "lng": 1.0}]},
        {"id": "tw1", "type": "taxiway", "coordinates": [{"lat": 1.0, "lng": 0.0}, {"lat": 1.0, "lng": 1.0}]},
        {"id": "sb2", "type": "stopbar", "coordinates": [{"lat": 2.0, "lng": 0.0}, {"lat": 2.0, "lng": 1.0}]},
        {"id": "lo1", "type": "lead_on", "coordinates": [{"lat": 3.0, "lng": 0.0}, {"lat": 3.0, "lng": 1.0}]},
        {"id": "zz1", "type": "frequency", "coordinates": [{"lat": 4.0, "lng": 0.0}, {"lat": 4.0, "lng": 1.0}]},
    ]));

    let geometry = compile_preview(&input);

    let upper_ids: Vec<&str> = geometry
        .upper_lines
        .features
        .iter()
        .map(|f| f.properties.id.as_str())
        .collect();
    let lower_ids: Vec<&str> = geometry
        .lower_lines
        .features
        .iter()
        .map(|f| f.properties.id.as_str())
        .collect();

    assert_eq!(upper_ids, vec!["sb1", "sb2"]);
    assert_eq!(lower_ids, vec!["tw1", "lo1", "zz1"]);
    for id in &upper_ids {
        assert!(!lower_ids.contains(id));
    }

    // Sort keys are dense and sequenced independently per partition
    let upper_keys: Vec<u32> = geometry
        .upper_lines
        .features
        .iter()
        .map(|f| f.properties.sort_key)
        .collect();
    let lower_keys: Vec<u32> = geometry
        .lower_lines
        .features
        .iter()
        .map(|f| f.properties.sort_key)
        .collect();
    assert_eq!(upper_keys, vec![0, 1]);
    assert_eq!(lower_keys, vec![0, 1, 2]);
}

#[test]
fn every_line_gets_exactly_two_matching_caps() {
    let input = points(json!([
        {"id": "sb1", "type": "stopbar", "coordinates": [{"lat": 0.0, "lng": 0.0}, {"lat": 0.5, "lng": 0.5}, {"lat": 0.0, "lng": 1.0}]},
        {"id": "tw1", "type": "taxiway", "color": "green-blue", "coordinates": [{"lat": 1.0, "lng": 0.0}, {"lat": 1.0, "lng": 1.0}]},
    ]));

    let geometry = compile_preview(&input);

    for (lines, caps) in [
        (&geometry.upper_lines, &geometry.upper_caps),
        (&geometry.lower_lines, &geometry.lower_caps),
    ] {
        assert_eq!(caps.features.len(), lines.features.len() * 2);
        for line in &lines.features {
            let matching: Vec<_> = caps
                .features
                .iter()
                .filter(|cap| {
                    cap.properties.id == line.properties.id
                        && cap.properties.sort_key == line.properties.sort_key
                })
                .collect();
            assert_eq!(matching.len(), 2);
        }
    }

    // The green-blue taxiway resolves its cap icon from its color pair
    assert!(geometry
        .lower_caps
        .features
        .iter()
        .all(|cap| cap.properties.icon == "cap-green-blue"));
}

#[test]
fn degenerate_path_is_dropped_not_demoted() {
    let input = points(json!([
        {"id": "sb1", "type": "stopbar", "coordinates": [{"lat": 1.0, "lng": 1.0}]},
    ]));

    let geometry = compile_preview(&input);

    assert!(geometry.markers.is_empty());
    assert!(geometry.upper_lines.features.is_empty());
    assert!(geometry.upper_caps.features.is_empty());
    assert!(geometry.lower_lines.features.is_empty());
    assert!(geometry.lower_caps.features.is_empty());
}

#[test]
fn path_with_one_valid_vertex_left_is_dropped() {
    let input = points(json!([
        {"id": "tw1", "type": "taxiway", "coordinates": [
            {"lat": 1.0, "lng": 1.0},
            {"lat": "oops", "lng": 2.0},
            {"lng": 3.0},
        ]},
    ]));

    let geometry = compile_preview(&input);

    assert!(geometry.markers.is_empty());
    assert!(geometry.lower_lines.features.is_empty());
    assert!(geometry.lower_caps.features.is_empty());
}

#[test]
fn bidirectional_stopbar_end_to_end() {
    let input = points(json!([
        {"id": "a", "type": "stopbar", "directionality": "bi-directional",
         "coordinates": [{"lat": 0.0, "lng": 0.0}, {"lat": 0.0, "lng": 1.0}]},
    ]));

    let geometry = compile_preview(&input);

    assert!(geometry.markers.is_empty());
    assert!(geometry.lower_lines.features.is_empty());
    assert!(geometry.lower_caps.features.is_empty());

    assert_eq!(geometry.upper_lines.features.len(), 1);
    let line = &geometry.upper_lines.features[0];
    assert_eq!(line.properties.top_color, Color::Red);
    assert_eq!(line.properties.bottom_color, Color::Red);
    assert_eq!(line.properties.sort_key, 0);
    assert_eq!(line.geometry.r#type, "LineString");
    assert_eq!(line.geometry.coordinates, json!([[0.0, 0.0], [1.0, 0.0]]));

    assert_eq!(geometry.upper_caps.features.len(), 2);
    for cap in &geometry.upper_caps.features {
        assert_eq!(cap.properties.icon, "cap-red-red");
        assert_eq!(cap.properties.id, "a");
        // The path runs due east, so both caps sit at bearing 90 - 90 = 0
        assert!((cap.properties.rotation - 0.0).abs() < 1e-6);
    }
    assert_eq!(geometry.upper_caps.features[0].geometry.coordinates, json!([0.0, 0.0]));
    assert_eq!(geometry.upper_caps.features[1].geometry.coordinates, json!([1.0, 0.0]));
}

#[test]
fn single_coordinate_stand_becomes_a_marker() {
    let input = points(json!([
        {"id": "b", "type": "stand", "coordinates": {"lat": 5.0, "lng": 10.0}, "elevated": true},
    ]));

    let geometry = compile_preview(&input);

    assert_eq!(geometry.markers.len(), 1);
    let marker = &geometry.markers[0];
    assert_eq!(marker.longitude, 10.0);
    assert_eq!(marker.latitude, 5.0);
    assert_eq!(marker.point.id.as_deref(), Some("b"));
    assert!(marker.point.elevated);

    assert!(geometry.upper_lines.features.is_empty());
    assert!(geometry.lower_lines.features.is_empty());
    assert!(geometry.upper_caps.features.is_empty());
    assert!(geometry.lower_caps.features.is_empty());
}

#[test]
fn malformed_records_are_silently_excluded() {
    let input = points(json!([
        {"type": "stand", "coordinates": {"lat": 1.0, "lng": 1.0}},
        {"id": "no-coords", "type": "stand"},
        {"id": "bad-coords", "type": "stand", "coordinates": {"lat": "x", "lng": 1.0}},
        {"id": "string-coords", "type": "stand", "coordinates": "1,2"},
        {"id": "ok", "type": "stand", "coordinates": {"lat": 1.0, "lng": 2.0},
         "unknownField": {"nested": true}},
    ]));

    let geometry = compile_preview(&input);

    assert_eq!(geometry.markers.len(), 1);
    assert_eq!(geometry.markers[0].point.id.as_deref(), Some("ok"));
}

#[test]
fn compile_is_deterministic() {
    let input = points(json!([
        {"id": "sb1", "type": "stopbar", "coordinates": [{"lat": 0.0, "lng": 0.0}, {"lat": 0.0, "lng": 1.0}]},
        {"id": "st1", "type": "stand", "coordinates": {"lat": 2.0, "lng": 2.0}},
        {"id": "tw1", "type": "taxiway", "color": "green-orange",
         "coordinates": [{"lat": 3.0, "lng": 0.0}, {"lat": 3.0, "lng": 1.0}]},
    ]));

    let first = serde_json::to_string(&compile_preview(&input)).expect("serializes");
    let second = serde_json::to_string(&compile_preview(&input)).expect("serializes");
    assert_eq!(first, second);
}

#[test]
fn output_json_matches_the_map_layer_contract() {
    let input = points(json!([
        {"id": "sb1", "type": "stopbar", "directionality": "uni-directional",
         "coordinates": [{"lat": 0.0, "lng": 0.0}, {"lat": 0.0, "lng": 1.0}]},
    ]));

    let value = serde_json::to_value(compile_preview(&input)).expect("serializes");

    assert!(value.get("lowerLines").is_some());
    assert!(value.get("upperCaps").is_some());
    assert_eq!(value["upperLines"]["type"], json!("FeatureCollection"));

    let feature = &value["upperLines"]["features"][0];
    assert_eq!(feature["type"], json!("Feature"));
    assert_eq!(feature["properties"]["type"], json!("stopbar"));
    assert_eq!(feature["properties"]["directionality"], json!("uni-directional"));
    assert_eq!(feature["properties"]["topColor"], json!("gray"));
    assert_eq!(feature["properties"]["bottomColor"], json!("red"));
    assert_eq!(feature["properties"]["sortKey"], json!(0));

    let cap = &value["upperCaps"]["features"][0];
    assert_eq!(cap["properties"]["icon"], json!("cap-gray-red"));
    assert!(cap["properties"]["rotation"].is_number());
}
