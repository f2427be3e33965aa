// Utility functions to generate consistent cache keys across the module.

/// Normalize an airport identifier into its cache key: trimmed, upper-cased
/// ("eglc " and "EGLC" hit the same entry).
pub fn make_airport_key(airport: &str) -> String {
    airport.trim().to_ascii_uppercase()
}

/// Namespace an icon context id so style contexts can never collide with
/// airport keys in diagnostics or logs.
pub fn make_icon_context_key(context_id: &str) -> String {
    format!("icons_{}", context_id.trim())
}
