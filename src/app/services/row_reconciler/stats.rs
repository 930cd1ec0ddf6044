//! Run statistics for manifest reconciliation

use serde::Serialize;

/// Counters for one manifest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Rows read from the manifest
    pub rows_read: usize,
    /// Rows dropped for lacking a postal code
    pub rows_dropped: usize,
    /// Rows that went through the whole pipeline
    pub rows_reconciled: usize,
    /// Rows without postal directory information (not found, invalid or failed)
    pub postal_not_found: usize,
    /// Streets confirmed against the postal directory
    pub streets_confirmed: usize,
    /// Streets rewritten from a reverse street search
    pub streets_corrected: usize,
    /// Streets left as typed after both lookups failed to agree
    pub streets_unresolved: usize,
    /// Rows that received coordinates
    pub geocoded: usize,
    /// Rows whose address had no street or number to geocode
    pub geocoding_skipped: usize,
    /// Geocoding queries the geocoder answered with no result
    pub geocode_not_found: usize,
    /// Provider calls that failed or timed out
    pub provider_failures: usize,
    /// Addresses that did not fit the "street, number[, complement]" shape
    pub unsplit_addresses: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of reconciled rows that received coordinates, as a percentage
    pub fn geocoding_rate(&self) -> f64 {
        if self.rows_reconciled == 0 {
            0.0
        } else {
            (self.geocoded as f64 / self.rows_reconciled as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Run Summary: {} rows read, {} reconciled, {} dropped | \
             Streets: {} confirmed, {} corrected, {} unresolved | \
             Geocoded: {:.1}% ({} skipped, {} not found) | \
             Postal codes not found: {} | Provider failures: {}",
            self.rows_read,
            self.rows_reconciled,
            self.rows_dropped,
            self.streets_confirmed,
            self.streets_corrected,
            self.streets_unresolved,
            self.geocoding_rate(),
            self.geocoding_skipped,
            self.geocode_not_found,
            self.postal_not_found,
            self.provider_failures
        )
    }
}
