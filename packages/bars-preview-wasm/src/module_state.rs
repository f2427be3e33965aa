use lazy_static::lazy_static;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::icons::IconRegistry;
use crate::models::{CacheStats, PreviewGeometry};

// Default cap on cached airports
pub const MAX_CACHED_AIRPORTS: usize = 32;

/// A compiled preview plus the exact payload it was compiled from. A cache
/// hit requires the stored JSON to match the incoming payload byte for byte,
/// so a changed point list always recompiles.
#[derive(Clone)]
pub struct CachedPreview {
    pub points_json: String,
    pub geometry: PreviewGeometry,
    pub timestamp: f64, // For eviction ordering
}

// Module state to keep cached resources
pub struct ModuleState {
    // Compiled preview geometry keyed by airport ICAO
    pub previews: HashMap<String, CachedPreview>,

    // Which cap icons each style context has already received
    pub icon_registry: IconRegistry,

    // Configuration for cache limits
    pub max_cached_airports: usize,

    // Stats
    pub cache_hits: usize,
    pub cache_misses: usize,
}

// Create a global static instance of the module state
lazy_static! {
    static ref MODULE_STATE: ReentrantMutex<RefCell<ModuleState>> =
        ReentrantMutex::new(RefCell::new(ModuleState::new()));
}

impl ModuleState {
    pub fn new() -> Self {
        ModuleState {
            previews: HashMap::new(),
            icon_registry: IconRegistry::new(),
            max_cached_airports: MAX_CACHED_AIRPORTS,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn with_mut<F, R>(f: F) -> R
    where
        F: FnOnce(&mut ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let mut borrow = guard.borrow_mut();
        f(&mut borrow)
    }

    pub fn with<F, R>(f: F) -> R
    where
        F: FnOnce(&ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let borrow = guard.borrow();
        f(&borrow)
    }

    /// Look up the memoized preview for an airport. Hits only when the
    /// cached entry was compiled from exactly this payload.
    pub fn get_preview(&mut self, airport_key: &str, points_json: &str) -> Option<PreviewGeometry> {
        match self.previews.get(airport_key) {
            Some(entry) if entry.points_json == points_json => {
                self.cache_hits += 1;
                Some(entry.geometry.clone())
            }
            _ => {
                self.cache_misses += 1;
                None
            }
        }
    }

    /// Store a compiled preview, evicting the oldest airport when at
    /// capacity.
    pub fn store_preview(
        &mut self,
        airport_key: &str,
        points_json: String,
        geometry: PreviewGeometry,
        timestamp: f64,
    ) {
        if self.previews.len() >= self.max_cached_airports
            && !self.previews.contains_key(airport_key)
        {
            let oldest_key = self
                .previews
                .iter()
                .min_by(|a, b| {
                    a.1.timestamp
                        .partial_cmp(&b.1.timestamp)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(k, _)| k.clone());

            if let Some(oldest) = oldest_key {
                self.previews.remove(&oldest);
            }
        }

        self.previews.insert(
            airport_key.to_string(),
            CachedPreview {
                points_json,
                geometry,
                timestamp,
            },
        );
    }

    pub fn has_preview(&self, airport_key: &str) -> bool {
        self.previews.contains_key(airport_key)
    }

    // Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let total_requests = self.cache_hits + self.cache_misses;
        let hit_rate = if total_requests > 0 {
            self.cache_hits as f64 / total_requests as f64
        } else {
            0.0
        };

        CacheStats {
            cached_airports: self.previews.len(),
            max_cached_airports: self.max_cached_airports,
            icon_contexts: self.icon_registry.context_count(),
            total_requests,
            hit_rate,
        }
    }

    // Clear all caches
    pub fn clear_all_caches(&mut self) {
        self.previews.clear();
        self.icon_registry.clear();
        // Reset stats
        self.cache_hits = 0;
        self.cache_misses = 0;
    }
}
