//! Tests for the row reconciliation pipeline
//!
//! Providers are replaced by in-memory fakes that count their calls.

pub mod pipeline_tests;

use crate::app::models::{GeoPoint, GeocodeQuery, ManifestRow, PostalRecord};
use crate::app::services::providers::{Geocoder, PostalLookup, ProviderError, ProviderResult};
use crate::constants::columns;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Postal directory backed by two maps
#[derive(Debug, Default)]
pub struct FakePostal {
    pub by_code: HashMap<String, PostalRecord>,
    /// Keyed by the cleaned street name the reconciler sends
    pub by_street: HashMap<String, PostalRecord>,
    pub fail: bool,
    pub forward_calls: AtomicUsize,
    pub reverse_calls: AtomicUsize,
}

impl FakePostal {
    pub fn with_code(mut self, code: &str, street: &str, city: &str) -> Self {
        self.by_code
            .insert(code.to_string(), PostalRecord::new(street, city));
        self
    }

    pub fn with_street(mut self, cleaned: &str, street: &str, city: &str) -> Self {
        self.by_street
            .insert(cleaned.to_string(), PostalRecord::new(street, city));
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

impl PostalLookup for FakePostal {
    async fn lookup_postal_code(&self, postal_code: &str) -> ProviderResult<Option<PostalRecord>> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::status("fake postal", 503));
        }
        Ok(self.by_code.get(postal_code).cloned())
    }

    async fn reverse_lookup_street(
        &self,
        street: &str,
        _city: &str,
    ) -> ProviderResult<Option<PostalRecord>> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::status("fake postal", 503));
        }
        Ok(self.by_street.get(street).cloned())
    }
}

/// Geocoder answering one fixed point, optionally after a delay
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    pub point: Option<GeoPoint>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub last_query: std::sync::Mutex<Option<GeocodeQuery>>,
}

impl FakeGeocoder {
    pub fn answering(lat: f64, lng: f64) -> Self {
        Self {
            point: Some(GeoPoint::new(lat, lng)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<GeocodeQuery> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> ProviderResult<Option<GeoPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.point)
    }
}

/// Manifest row with the usual export columns
pub fn manifest_row(sequence: &str, address: &str, postal_code: &str) -> ManifestRow {
    ManifestRow::from_fields(
        [
            columns::SEQUENCE,
            columns::STOP,
            columns::DESTINATION_ADDRESS,
            columns::POSTAL_CODE,
            columns::NEIGHBORHOOD,
            columns::CITY,
            columns::LATITUDE,
            columns::LONGITUDE,
        ],
        [sequence, "1", address, postal_code, "Centro", "São Paulo", "", ""],
    )
}

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);
