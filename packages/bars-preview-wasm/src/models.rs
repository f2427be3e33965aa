// This is the models module containing shared data structures for the
// lighting point input and the preview geometry output.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One lighting point record as delivered by the BARS API.
///
/// Field shapes are not trusted: `coordinates` may be a single {lat, lng}
/// object or an array of them, and any field may be missing on records that
/// are still being entered in the division portal. Unknown extra fields are
/// ignored during deserialization.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RawLightingPoint {
    pub id: Option<String>,
    pub r#type: Option<String>,
    #[serde(default)]
    pub coordinates: Value,
    pub directionality: Option<String>,
    pub color: Option<String>,
    pub orientation: Option<String>,
    #[serde(default)]
    pub elevated: bool,
    #[serde(default)]
    pub ihp: bool,
}

/// The closed tag set for `type`. Anything the API sends that we do not
/// recognize lands on `Unknown`, which classifies like a stopbar but
/// partitions as a lower-layer feature.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Stopbar,
    LeadOn,
    Taxiway,
    Stand,
    Unknown,
}

impl PointKind {
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("stopbar") => PointKind::Stopbar,
            Some("lead_on") => PointKind::LeadOn,
            Some("taxiway") => PointKind::Taxiway,
            Some("stand") => PointKind::Stand,
            _ => PointKind::Unknown,
        }
    }
}

/// Directionality tag; only meaningful for stopbars and taxiways. Absent or
/// unrecognized values fall back to uni-directional.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directionality {
    #[serde(rename = "uni-directional")]
    UniDirectional,
    #[serde(rename = "bi-directional")]
    BiDirectional,
}

impl Directionality {
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("bi-directional") => Directionality::BiDirectional,
            _ => Directionality::UniDirectional,
        }
    }
}

/// Taxiway centerline color scheme. Absent or unrecognized values fall back
/// to plain green.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaxiwayColor {
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "green-yellow")]
    GreenYellow,
    #[serde(rename = "green-blue")]
    GreenBlue,
    #[serde(rename = "green-orange")]
    GreenOrange,
}

impl TaxiwayColor {
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("green-yellow") => TaxiwayColor::GreenYellow,
            Some("green-blue") => TaxiwayColor::GreenBlue,
            Some("green-orange") => TaxiwayColor::GreenOrange,
            _ => TaxiwayColor::Green,
        }
    }
}

/// The fixed display palette. Red and gray only appear through the
/// stopbar/unknown defaults.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Yellow,
    Blue,
    Orange,
    Red,
    Gray,
}

// GeoJSON structures for the map layers. Coordinates stay a Value so
// LineString and Point features share the same geometry struct.

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Geometry {
    pub r#type: String,
    pub coordinates: Value,
}

impl Geometry {
    pub fn line_string(path: &[[f64; 2]]) -> Self {
        Geometry {
            r#type: "LineString".to_string(),
            coordinates: serde_json::to_value(path).unwrap_or(Value::Null),
        }
    }

    pub fn point(position: [f64; 2]) -> Self {
        Geometry {
            r#type: "Point".to_string(),
            coordinates: serde_json::to_value(position).unwrap_or(Value::Null),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Feature<P> {
    pub r#type: String,
    pub geometry: Geometry,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: Geometry, properties: P) -> Self {
        Feature {
            r#type: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FeatureCollection<P> {
    pub r#type: String,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        FeatureCollection {
            r#type: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Properties carried by one line feature. `sort_key` orders draw order
/// within its partition so later-declared paths paint on top.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LineProperties {
    pub id: String,
    pub r#type: PointKind,
    pub directionality: Directionality,
    pub top_color: Color,
    pub bottom_color: Color,
    pub sort_key: u32,
}

/// Properties carried by one endpoint cap. `rotation` is the local path
/// bearing offset by -90 degrees so the icon artwork lines up with the line
/// direction.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CapProperties {
    pub icon: String,
    pub rotation: f64,
    pub id: String,
    pub sort_key: u32,
}

/// One DOM-rendered point marker. The original record rides along so the
/// front-end can pick its quadrant highlight from the raw tags.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Marker {
    pub point: RawLightingPoint,
    pub longitude: f64,
    pub latitude: f64,
}

/// Everything the map preview needs for one airport: interactive markers
/// plus four stacked GeoJSON sources (stopbars render above everything
/// else).
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PreviewGeometry {
    pub markers: Vec<Marker>,
    pub lower_lines: FeatureCollection<LineProperties>,
    pub upper_lines: FeatureCollection<LineProperties>,
    pub lower_caps: FeatureCollection<CapProperties>,
    pub upper_caps: FeatureCollection<CapProperties>,
}

#[derive(Serialize, Deserialize)]
pub struct CacheStats {
    pub cached_airports: usize,
    pub max_cached_airports: usize,
    pub icon_contexts: usize,
    pub total_requests: usize,
    pub hit_rate: f64,
}
