// Airport point list retrieval. The page provides a fetch helper (same
// pattern as the tile fetchers elsewhere in the console); we pull the raw
// bytes through it, gunzip if needed, parse leniently, and compile through
// the memoizing cache so a refetch of unchanged data costs nothing.

use flate2::read::GzDecoder;
use js_sys::Uint8Array;
use serde::{Deserialize, Serialize};
use std::io::Read;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::cache_keys::make_airport_key;
use crate::models::RawLightingPoint;
use crate::module_state::ModuleState;
use crate::preview_geometry::compile_preview;
use crate::{console_log, fetch};

// Input for the airport points fetch
#[derive(Serialize, Deserialize, Clone)]
pub struct FetchPointsInput {
    pub airport: String,
    // Override for staging/test backends; defaults to the production API
    pub url: Option<String>,
}

// Function to detect if data is gzipped (checking for gzip magic number)
fn is_gzipped(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1F && data[1] == 0x8B
}

// Function to decompress gzipped data
fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>, String> {
    if !is_gzipped(data) {
        return Ok(data.to_vec());
    }

    let mut decoder = GzDecoder::new(data);
    let mut decompressed_data = Vec::new();

    decoder
        .read_to_end(&mut decompressed_data)
        .map_err(|e| format!("Error decompressing gzip data: {}", e))?;

    Ok(decompressed_data)
}

/// Parse a decoded JSON value into lighting point records. Accepts either a
/// bare array or an object wrapping it under "points". Individual records
/// that do not deserialize at all are skipped; the skip count is returned so
/// the caller can log it.
pub fn points_from_value(value: serde_json::Value) -> Result<(Vec<RawLightingPoint>, usize), String> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("points") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err("Points payload has no 'points' array".to_string()),
        },
        _ => return Err("Points payload must be a JSON array".to_string()),
    };

    let mut points = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match serde_json::from_value::<RawLightingPoint>(item) {
            Ok(point) => points.push(point),
            Err(_) => skipped += 1,
        }
    }

    Ok((points, skipped))
}

/// Parse a raw response body into lighting point records.
pub fn parse_points_body(body: &str) -> Result<(Vec<RawLightingPoint>, usize), String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("Invalid points JSON: {}", e))?;
    points_from_value(value)
}

// Make this function available to JS
#[wasm_bindgen]
pub async fn fetch_airport_points(input_js: JsValue) -> Result<JsValue, JsValue> {
    // Parse input
    let input: FetchPointsInput = serde_wasm_bindgen::from_value(input_js)?;

    let airport_key = make_airport_key(&input.airport);
    if airport_key.is_empty() {
        return Err(JsValue::from_str("Missing airport identifier"));
    }

    let url = input.url.unwrap_or_else(|| {
        format!("https://api.stopbars.com/airports/{}/points", airport_key)
    });

    console_log!("Fetching lighting points for {} from {}", airport_key, url);

    let fetch_promise = fetch(&url)?;
    let fetch_result = JsFuture::from(fetch_promise).await?;
    let data_array = Uint8Array::new(&fetch_result);
    let data_vec = data_array.to_vec();

    let body_bytes = if is_gzipped(&data_vec) {
        console_log!("Detected gzipped points payload, decompressing...");
        decompress_gzip(&data_vec).map_err(|e| JsValue::from_str(&e))?
    } else {
        data_vec
    };

    let body = String::from_utf8(body_bytes)
        .map_err(|_| JsValue::from_str("Points payload is not valid UTF-8"))?;

    let (points, skipped) = parse_points_body(&body).map_err(|e| JsValue::from_str(&e))?;
    if skipped > 0 {
        web_sys::console::warn_1(
            &format!(
                "{}: skipped {} malformed point records",
                airport_key, skipped
            )
            .into(),
        );
    }

    console_log!(
        "Parsed {} lighting points for {}",
        points.len(),
        airport_key
    );

    // Go through the memoized path so a later call with unchanged data is a
    // cache hit.
    let cached = ModuleState::with_mut(|state| state.get_preview(&airport_key, &body));
    let geometry = match cached {
        Some(geometry) => geometry,
        None => {
            let geometry = compile_preview(&points);
            ModuleState::with_mut(|state| {
                state.store_preview(
                    &airport_key,
                    body.clone(),
                    geometry.clone(),
                    js_sys::Date::now(),
                )
            });
            geometry
        }
    };

    Ok(serde_wasm_bindgen::to_value(&geometry)?)
}
