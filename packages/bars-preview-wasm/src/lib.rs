use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

// Create a console module for logging
pub mod console;
// Shared data model for the wasm boundary
mod models;
// Color classification and the cap icon vocabulary
mod point_style;
// Bearing and coordinate helpers
mod geo_math;
// The lighting-point-to-map-geometry compiler
mod preview_geometry;
// Global module state and the preview cache
mod module_state;
// Cache key helpers
mod cache_keys;
// Cap icon rasterization and registration tracking
mod icons;
// Airport point list retrieval
mod airport_points;

#[cfg(test)]
mod preview_test;

use cache_keys::{make_airport_key, make_icon_context_key};
use module_state::ModuleState;
use preview_geometry::compile_preview;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

#[wasm_bindgen]
extern "C" {
    // JavaScript function to fetch raw bytes from a URL
    #[wasm_bindgen(js_namespace = wasmJsHelpers, catch)]
    pub fn fetch(url: &str) -> Result<js_sys::Promise, JsValue>;
}

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => (crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        // Initialize the module state with its cache limit
        ModuleState::with_mut(|state| {
            state.max_cached_airports = module_state::MAX_CACHED_AIRPORTS;
        });

        console_log!("BARS preview geometry module initialized");
    });
}

/// One-shot compile: lighting point array in, preview geometry out. No
/// caching; use `compile_preview_for_airport` from the map screen so
/// re-renders with unchanged data skip the recompute.
#[wasm_bindgen]
pub fn compile_preview_geometry(points_js: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(points_js)?;
    let (points, skipped) =
        airport_points::points_from_value(value).map_err(|e| JsValue::from_str(&e))?;
    if skipped > 0 {
        web_sys::console::warn_1(
            &format!("Skipped {} malformed point records", skipped).into(),
        );
    }

    Ok(to_value(&compile_preview(&points))?)
}

/// Memoized compile keyed by airport. The cache hits only when the payload
/// is byte-identical to the one the cached geometry was compiled from.
#[wasm_bindgen]
pub fn compile_preview_for_airport(airport: &str, points_json: &str) -> Result<JsValue, JsValue> {
    let airport_key = make_airport_key(airport);
    if airport_key.is_empty() {
        return Err(JsValue::from_str("Missing airport identifier"));
    }

    let cached = ModuleState::with_mut(|state| state.get_preview(&airport_key, points_json));
    if let Some(geometry) = cached {
        return Ok(to_value(&geometry)?);
    }

    let (points, skipped) =
        airport_points::parse_points_body(points_json).map_err(|e| JsValue::from_str(&e))?;
    if skipped > 0 {
        web_sys::console::warn_1(
            &format!(
                "{}: skipped {} malformed point records",
                airport_key, skipped
            )
            .into(),
        );
    }

    let geometry = compile_preview(&points);
    console_log!(
        "Compiled preview geometry for {}: {} markers, {} lower / {} upper lines",
        airport_key,
        geometry.markers.len(),
        geometry.lower_lines.features.len(),
        geometry.upper_lines.features.len()
    );

    ModuleState::with_mut(|state| {
        state.store_preview(
            &airport_key,
            points_json.to_string(),
            geometry.clone(),
            js_sys::Date::now(),
        )
    });

    Ok(to_value(&geometry)?)
}

// Function to check if an airport has a cached preview
#[wasm_bindgen]
pub fn has_cached_preview(airport: &str) -> bool {
    let airport_key = make_airport_key(airport);
    ModuleState::with(|state| state.has_preview(&airport_key))
}

/// Rasterize the cap icons the given style context has not registered yet.
/// Call once per map style (re)load; the engine drops custom images on style
/// changes, so a reload passes a fresh context id (or releases the old one).
#[wasm_bindgen]
pub fn ensure_cap_icons(context_id: &str) -> Result<JsValue, JsValue> {
    let context_key = make_icon_context_key(context_id);
    let images = ModuleState::with_mut(|state| state.icon_registry.ensure_registered(&context_key));

    console_log!(
        "Realized {} cap icons for style context {}",
        images.len(),
        context_id
    );

    Ok(to_value(&images)?)
}

// Function to forget a style context when its map style unloads
#[wasm_bindgen]
pub fn release_icon_context(context_id: &str) -> bool {
    let context_key = make_icon_context_key(context_id);
    ModuleState::with_mut(|state| state.icon_registry.release_context(&context_key))
}

// Function to get cache statistics
#[wasm_bindgen]
pub fn get_cache_stats() -> Result<JsValue, JsValue> {
    let stats = ModuleState::with(|state| state.stats());
    Ok(to_value(&stats)?)
}

// Function to clear all caches
#[wasm_bindgen]
pub fn clear_caches() -> bool {
    ModuleState::with_mut(|state| state.clear_all_caches());
    true
}

// Re-export the airport points fetching function
// Note: We don't use #[wasm_bindgen] on the use statement
pub use airport_points::fetch_airport_points;
