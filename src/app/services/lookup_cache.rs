//! Run-scoped memoization for postal and geocoding lookups
//!
//! One `LookupCache` is built per manifest run and handed to the reconciler.
//! Hit counters only move on hits; the first value stored for a key wins.

use crate::app::models::{GeoPoint, GeocodeQuery, PostalRecord};
use crate::app::services::address_normalizer::normalize_key;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Postal-code and location tables with per-table hit counters
#[derive(Debug, Default)]
pub struct LookupCache {
    postal: HashMap<String, PostalRecord>,
    locations: HashMap<String, GeoPoint>,
    postal_hits: u64,
    location_hits: u64,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached postal record for a digits-only postal code
    pub fn fetch_postal(&mut self, postal_code: &str) -> Option<PostalRecord> {
        let record = self.postal.get(postal_code).cloned()?;
        self.postal_hits += 1;
        Some(record)
    }

    /// Store a postal record unless the code already has one
    pub fn store_postal(&mut self, postal_code: impl Into<String>, record: PostalRecord) {
        if let Entry::Vacant(slot) = self.postal.entry(postal_code.into()) {
            debug!("Caching postal record for {}", slot.key());
            slot.insert(record);
        }
    }

    /// Cached coordinates for a composite location key
    pub fn fetch_location(&mut self, key: &str) -> Option<GeoPoint> {
        let point = self.locations.get(key).copied()?;
        self.location_hits += 1;
        Some(point)
    }

    /// Store coordinates unless the key already has some
    pub fn store_location(&mut self, key: impl Into<String>, point: GeoPoint) {
        self.locations.entry(key.into()).or_insert(point);
    }

    pub fn postal_hits(&self) -> u64 {
        self.postal_hits
    }

    pub fn location_hits(&self) -> u64 {
        self.location_hits
    }

    pub fn postal_len(&self) -> usize {
        self.postal.len()
    }

    pub fn location_len(&self) -> usize {
        self.locations.len()
    }

    /// Empty both tables and reset both counters; called once at run end
    pub fn clear(&mut self) {
        self.postal.clear();
        self.locations.clear();
        self.postal_hits = 0;
        self.location_hits = 0;
    }

    /// Composite key: each component normalized on its own, joined with `_`
    pub fn location_key(query: &GeocodeQuery) -> String {
        [
            query.street.as_str(),
            query.number.as_str(),
            query.postal_code.as_str(),
            query.neighborhood.as_str(),
            query.city.as_str(),
        ]
        .iter()
        .map(|part| normalize_key(part))
        .collect::<Vec<_>>()
        .join("_")
    }
}
