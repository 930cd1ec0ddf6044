//! External lookup collaborators
//!
//! The reconciler only sees the [`PostalLookup`] and [`Geocoder`] traits.
//! `Ok(None)` means the provider answered "not found"; `Err` means the call
//! itself failed. Both end up as "no information" for the row, but they are
//! logged and counted separately.
//!
//! - [`viacep`] - ViaCEP postal directory (forward and reverse)
//! - [`google`] - Google geocoding API

pub mod google;
pub mod viacep;

#[cfg(test)]
pub mod tests;

use crate::app::models::{GeoPoint, GeocodeQuery, PostalRecord};
use std::future::Future;
use thiserror::Error;

pub use google::GoogleGeocoder;
pub use viacep::ViaCepClient;

/// Failure talking to a lookup provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    #[error("{provider} reported status {status}")]
    Remote { provider: String, status: String },

    #[error("{provider} response could not be decoded: {message}")]
    Decode { provider: String, message: String },

    #[error("{provider} did not answer within {secs}s")]
    Timeout { provider: String, secs: u64 },
}

impl ProviderError {
    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn status(provider: impl Into<String>, status: u16) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
        }
    }

    pub fn remote(provider: impl Into<String>, status: impl Into<String>) -> Self {
        Self::Remote {
            provider: provider.into(),
            status: status.into(),
        }
    }

    pub fn decode(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            provider: provider.into(),
            secs,
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Postal-code directory
pub trait PostalLookup {
    /// Forward lookup: digits-only postal code → street and city
    fn lookup_postal_code(
        &self,
        postal_code: &str,
    ) -> impl Future<Output = ProviderResult<Option<PostalRecord>>> + Send;

    /// Reverse lookup: prefix-stripped street name within a city → canonical street
    fn reverse_lookup_street(
        &self,
        street: &str,
        city: &str,
    ) -> impl Future<Output = ProviderResult<Option<PostalRecord>>> + Send;
}

/// Address → coordinates
pub trait Geocoder {
    fn geocode(
        &self,
        query: &GeocodeQuery,
    ) -> impl Future<Output = ProviderResult<Option<GeoPoint>>> + Send;
}
