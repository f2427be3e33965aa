// Color classification for lighting points and the cap icon vocabulary.

use crate::models::{Color, Directionality, PointKind, RawLightingPoint, TaxiwayColor};

/// The two halves of a bicolor line or marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StylePair {
    pub top: Color,
    pub bottom: Color,
}

/// Every bicolor combination the classifier can produce, paired with the
/// image name the map style registers for it. The renderer pre-registers
/// exactly these seven names before the cap layers resolve.
pub const CAP_ICONS: [(&str, StylePair); 7] = [
    (
        "cap-gray-red",
        StylePair {
            top: Color::Gray,
            bottom: Color::Red,
        },
    ),
    (
        "cap-red-red",
        StylePair {
            top: Color::Red,
            bottom: Color::Red,
        },
    ),
    (
        "cap-green-green",
        StylePair {
            top: Color::Green,
            bottom: Color::Green,
        },
    ),
    (
        "cap-green-yellow",
        StylePair {
            top: Color::Green,
            bottom: Color::Yellow,
        },
    ),
    (
        "cap-green-blue",
        StylePair {
            top: Color::Green,
            bottom: Color::Blue,
        },
    ),
    (
        "cap-green-orange",
        StylePair {
            top: Color::Green,
            bottom: Color::Orange,
        },
    ),
    (
        "cap-orange-orange",
        StylePair {
            top: Color::Orange,
            bottom: Color::Orange,
        },
    ),
];

/// Classify a point's display colors from its parsed tags. Total over every
/// tag combination; stopbars and unrecognized types share the same branch so
/// half-filled records still render something sensible.
pub fn classify(kind: PointKind, color: TaxiwayColor, directionality: Directionality) -> StylePair {
    match kind {
        PointKind::Taxiway => match color {
            TaxiwayColor::Green => StylePair {
                top: Color::Green,
                bottom: Color::Green,
            },
            TaxiwayColor::GreenYellow => StylePair {
                top: Color::Green,
                bottom: Color::Yellow,
            },
            TaxiwayColor::GreenBlue => StylePair {
                top: Color::Green,
                bottom: Color::Blue,
            },
            TaxiwayColor::GreenOrange => StylePair {
                top: Color::Green,
                bottom: Color::Orange,
            },
        },
        PointKind::LeadOn => StylePair {
            top: Color::Green,
            bottom: Color::Yellow,
        },
        PointKind::Stand => StylePair {
            top: Color::Orange,
            bottom: Color::Orange,
        },
        PointKind::Stopbar | PointKind::Unknown => match directionality {
            Directionality::BiDirectional => StylePair {
                top: Color::Red,
                bottom: Color::Red,
            },
            Directionality::UniDirectional => StylePair {
                top: Color::Gray,
                bottom: Color::Red,
            },
        },
    }
}

/// Classify straight from a raw record.
pub fn classify_point(point: &RawLightingPoint) -> StylePair {
    classify(
        PointKind::parse(point.r#type.as_deref()),
        TaxiwayColor::parse(point.color.as_deref()),
        Directionality::parse(point.directionality.as_deref()),
    )
}

/// Resolve the icon name for a style pair. Combinations outside the known
/// seven fall back to the gray/red disc.
pub fn cap_icon_name(style: StylePair) -> &'static str {
    for (name, candidate) in CAP_ICONS.iter() {
        if *candidate == style {
            return name;
        }
    }
    "cap-gray-red"
}
