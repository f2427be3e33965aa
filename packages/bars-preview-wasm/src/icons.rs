// Cap icon rasterization and per-style-context registration tracking.
//
// Map engines discard custom images whenever the style reloads, so the
// front-end asks for the cap discs once per style lifetime. The registry
// tracks which names each context has already received and only rasterizes
// the missing ones.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::Color;
use crate::point_style::{StylePair, CAP_ICONS};

/// Edge length of the rasterized cap discs, in pixels.
pub const CAP_ICON_SIZE: u32 = 32;

const OUTLINE_WIDTH: f64 = 2.0;

/// One RGBA image ready for `map.addImage(name, ...)` on the JS side.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct IconImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Tracks which cap icons have been realized into which style context.
pub struct IconRegistry {
    registered: HashMap<String, HashSet<String>>,
}

impl IconRegistry {
    pub fn new() -> Self {
        IconRegistry {
            registered: HashMap::new(),
        }
    }

    /// Rasterize every cap icon the given context has not seen yet and mark
    /// them registered. Idempotent: a second call for the same context
    /// returns an empty list.
    pub fn ensure_registered(&mut self, context_key: &str) -> Vec<IconImage> {
        let entry = self
            .registered
            .entry(context_key.to_string())
            .or_insert_with(HashSet::new);

        let mut images = Vec::new();
        for (name, style) in CAP_ICONS.iter() {
            if entry.insert((*name).to_string()) {
                images.push(rasterize_cap_icon(name, *style, CAP_ICON_SIZE));
            }
        }
        images
    }

    /// Forget a context (style unload). Returns whether it existed.
    pub fn release_context(&mut self, context_key: &str) -> bool {
        self.registered.remove(context_key).is_some()
    }

    pub fn context_count(&self) -> usize {
        self.registered.len()
    }

    pub fn clear(&mut self) {
        self.registered.clear();
    }
}

// Palette used when rasterizing. The classifier works in named colors; only
// the rasterizer needs pixel values.
fn color_rgb(color: Color) -> [u8; 3] {
    match color {
        Color::Green => [0, 200, 83],
        Color::Yellow => [255, 214, 0],
        Color::Blue => [41, 121, 255],
        Color::Orange => [255, 145, 0],
        Color::Red => [255, 23, 68],
        Color::Gray => [158, 158, 158],
    }
}

/// Draw one bicolor disc: transparent background, white outline ring, upper
/// half in the top color, lower half in the bottom color. The outer edge is
/// antialiased over one pixel so the disc does not shimmer when the map
/// rotates it.
pub fn rasterize_cap_icon(name: &str, style: StylePair, size: u32) -> IconImage {
    let mut data = vec![0u8; (size * size * 4) as usize];
    let center = (size as f64 - 1.0) / 2.0;
    let radius = size as f64 / 2.0 - 1.5;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            let rgb = if dist > radius - OUTLINE_WIDTH {
                [255, 255, 255]
            } else if dy < 0.0 {
                color_rgb(style.top)
            } else {
                color_rgb(style.bottom)
            };

            let offset = ((y * size + x) * 4) as usize;
            data[offset] = rgb[0];
            data[offset + 1] = rgb[1];
            data[offset + 2] = rgb[2];
            data[offset + 3] = (coverage * 255.0).round() as u8;
        }
    }

    IconImage {
        name: name.to_string(),
        width: size,
        height: size,
        data,
    }
}
