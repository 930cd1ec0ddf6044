//! Per-row reconciliation: postal lookup, street correction, geocoding,
//! complement split and frequency counting
//!
//! Rows are processed strictly one after another; each row's cache writes and
//! counts are visible to the next. Provider failures and timeouts degrade to
//! "no information" and never fail the row.

use super::stats::RunStats;
use crate::app::models::{GeoPoint, GeocodeQuery, ManifestRow, PostalRecord};
use crate::app::services::address_normalizer::{
    clean_street_name, split_address, street_name_matches,
};
use crate::app::services::frequency::FrequencyAggregator;
use crate::app::services::lookup_cache::LookupCache;
use crate::app::services::providers::{Geocoder, PostalLookup, ProviderError, ProviderResult};
use crate::constants::columns;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Terminal state of a row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Row is ready to be written
    Written(ManifestRow),
    /// Row had no postal code and is excluded from output and statistics
    Dropped,
}

/// What a run leaves behind once the cache has been cleared
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frequencies: FrequencyAggregator,
    pub stats: RunStats,
    pub postal_cache_hits: u64,
    pub location_cache_hits: u64,
}

/// Reconciles manifest rows against a postal directory and a geocoder
///
/// Owns the run's [`LookupCache`], [`FrequencyAggregator`] and [`RunStats`];
/// build one per manifest and call [`RowReconciler::finish`] at the end.
pub struct RowReconciler<'a, P, G> {
    postal: &'a P,
    geocoder: &'a G,
    timeout: Duration,
    cache: LookupCache,
    frequencies: FrequencyAggregator,
    stats: RunStats,
}

impl<'a, P: PostalLookup, G: Geocoder> RowReconciler<'a, P, G> {
    pub fn new(postal: &'a P, geocoder: &'a G, timeout: Duration) -> Self {
        Self {
            postal,
            geocoder,
            timeout,
            cache: LookupCache::new(),
            frequencies: FrequencyAggregator::new(),
            stats: RunStats::new(),
        }
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub fn frequencies(&self) -> &FrequencyAggregator {
        &self.frequencies
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Run one row through the pipeline
    pub async fn reconcile(&mut self, mut row: ManifestRow) -> RowOutcome {
        self.stats.rows_read += 1;

        let Some(raw_postal_code) = row.postal_code() else {
            self.stats.rows_dropped += 1;
            return RowOutcome::Dropped;
        };
        let postal_code = normalize_postal_code(raw_postal_code);
        debug!("Processing zip code: {}", postal_code);

        match self.postal_record(&postal_code).await {
            Some(record) => {
                debug!("Address found: {}", record.street_name);
                self.reconcile_street(&mut row, &record).await;
            }
            None => {
                warn!("Zip code not found: {}", postal_code);
                self.stats.postal_not_found += 1;
            }
        }

        self.geocode_row(&mut row, &postal_code).await;
        self.split_complement(&mut row);

        self.frequencies
            .record_delivery(row.destination_address(), row.sequence_number());
        self.stats.rows_reconciled += 1;

        RowOutcome::Written(row)
    }

    /// Log cache usage, clear the cache and hand back the run results
    pub fn finish(mut self) -> RunSummary {
        let postal_cache_hits = self.cache.postal_hits();
        let location_cache_hits = self.cache.location_hits();
        info!(
            "Geolocation cache was used {} times and the zip code cache was used {} times",
            location_cache_hits, postal_cache_hits
        );
        self.cache.clear();

        RunSummary {
            frequencies: self.frequencies,
            stats: self.stats,
            postal_cache_hits,
            location_cache_hits,
        }
    }

    async fn postal_record(&mut self, postal_code: &str) -> Option<PostalRecord> {
        if postal_code.is_empty() {
            return None;
        }
        if let Some(record) = self.cache.fetch_postal(postal_code) {
            return Some(record);
        }

        let postal = self.postal;
        let lookup = timed(self.timeout, "postal lookup", postal.lookup_postal_code(postal_code));
        let record = self.absorb_failure(lookup.await, postal_code)?;
        self.cache.store_postal(postal_code, record.clone());
        Some(record)
    }

    /// Rewrite the street segment to the directory's spelling, directly on a
    /// match or through a reverse street search otherwise
    async fn reconcile_street(&mut self, row: &mut ManifestRow, record: &PostalRecord) {
        let address = row.destination_address().to_string();
        let input_street = address.split(',').next().unwrap_or_default().trim();

        if street_name_matches(input_street, &record.street_name) {
            row.set(
                columns::DESTINATION_ADDRESS,
                replace_street(&address, &record.street_name),
            );
            self.stats.streets_confirmed += 1;
            return;
        }

        warn!("Trying to correct street name: {}", input_street);
        let cleaned = clean_street_name(input_street);
        if cleaned.is_empty() {
            self.stats.streets_unresolved += 1;
            return;
        }

        let postal = self.postal;
        let search = timed(
            self.timeout,
            "reverse street lookup",
            postal.reverse_lookup_street(&cleaned, &record.city),
        );
        match self.absorb_failure(search.await, input_street) {
            Some(found) => {
                debug!("Street '{}' corrected to '{}'", input_street, found.street_name);
                row.set(
                    columns::DESTINATION_ADDRESS,
                    replace_street(&address, &found.street_name),
                );
                self.stats.streets_corrected += 1;
            }
            None => self.stats.streets_unresolved += 1,
        }
    }

    async fn geocode_row(&mut self, row: &mut ManifestRow, postal_code: &str) {
        let Some((street, number)) = street_and_number(row.destination_address()) else {
            self.stats.geocoding_skipped += 1;
            return;
        };

        let query = GeocodeQuery {
            street,
            number,
            postal_code: postal_code.to_string(),
            neighborhood: row.neighborhood().to_string(),
            city: row.city().to_string(),
        };

        let Some(point) = self.location(&query).await else {
            return;
        };

        row.set(columns::LATITUDE, point.lat.to_string());
        row.set(columns::LONGITUDE, point.lng.to_string());
        self.stats.geocoded += 1;
    }

    async fn location(&mut self, query: &GeocodeQuery) -> Option<GeoPoint> {
        let key = LookupCache::location_key(query);
        if let Some(point) = self.cache.fetch_location(&key) {
            return Some(point);
        }

        let geocoder = self.geocoder;
        let lookup = timed(self.timeout, "geocoding", geocoder.geocode(query));
        match lookup.await {
            Ok(Some(point)) => {
                self.cache.store_location(key, point);
                Some(point)
            }
            Ok(None) => {
                warn!("Location not found: {}, {}", query.street, query.number);
                self.stats.geocode_not_found += 1;
                None
            }
            Err(e) => {
                self.record_failure(&key, &e);
                None
            }
        }
    }

    fn split_complement(&mut self, row: &mut ManifestRow) {
        let outcome = split_address(row.destination_address());
        if !outcome.is_matched() {
            debug!("Address kept as typed: {}", row.destination_address());
            self.stats.unsplit_addresses += 1;
        }

        let complement = outcome.complement().unwrap_or_default().to_string();
        row.set(columns::DESTINATION_ADDRESS, outcome.main_address());
        row.set(columns::COMPLEMENT, complement);
    }

    /// Provider failures are logged and counted, then treated like "not found"
    fn absorb_failure<T>(&mut self, result: ProviderResult<Option<T>>, subject: &str) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.record_failure(subject, &e);
                None
            }
        }
    }

    fn record_failure(&mut self, subject: &str, error: &ProviderError) {
        warn!("Lookup failed for '{}': {}", subject, error);
        self.stats.provider_failures += 1;
    }
}

/// Bound a provider call; an elapsed timeout becomes a provider failure
async fn timed<T>(
    timeout: Duration,
    provider: &str,
    call: impl Future<Output = ProviderResult<T>>,
) -> ProviderResult<T> {
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(ProviderError::timeout(provider, timeout.as_secs())))
}

/// Keep ASCII digits only ("01310-100" → "01310100")
pub fn normalize_postal_code(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Replace the text before the first comma, keeping the rest verbatim
///
/// An address without a comma is replaced entirely.
pub fn replace_street(address: &str, street: &str) -> String {
    match address.split_once(',') {
        Some((_, rest)) => format!("{},{}", street, rest),
        None => street.to_string(),
    }
}

/// Street (first comma segment) and house number (first word of the second)
pub fn street_and_number(address: &str) -> Option<(String, String)> {
    let mut segments = address.split(',');
    let street = segments.next()?.trim();
    let number = segments.next()?.split_whitespace().next()?;
    if street.is_empty() {
        return None;
    }
    Some((street.to_string(), number.to_string()))
}
