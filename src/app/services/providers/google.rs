//! Google geocoding client

use super::{Geocoder, ProviderError, ProviderResult};
use crate::app::models::{GeoPoint, GeocodeQuery};
use crate::config::ProvidersConfig;
use crate::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const PROVIDER: &str = "Google geocoding";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: GeoPoint,
}

impl GeocodeResponse {
    /// First result's location; `ZERO_RESULTS` is a plain miss, other
    /// non-OK statuses (quota, denied key) are failures
    pub fn into_point(self) -> ProviderResult<Option<GeoPoint>> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" | "" => {
                Ok(self.results.into_iter().next().map(|r| r.geometry.location))
            }
            other => Err(ProviderError::remote(PROVIDER, other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
    country: String,
}

impl GoogleGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        country: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::provider(format!("Failed to build geocoding client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            country: country.into(),
        })
    }

    /// Requires an API key in the configuration
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let api_key = config.geocoding_api_key.clone().ok_or_else(|| {
            Error::configuration("No geocoding API key configured (set GOOGLE_API_KEY)")
        })?;

        Self::new(
            config.geocoding_base_url.clone(),
            api_key,
            config.country.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// "street, number, neighborhood, city, country"; the postal code is only
    /// part of the cache key
    pub fn address_text(&self, query: &GeocodeQuery) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            query.street, query.number, query.neighborhood, query.city, self.country
        )
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &GeocodeQuery) -> ProviderResult<Option<GeoPoint>> {
        let address = self.address_text(query);
        debug!("Geocoding: {}", address);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("address", address.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::status(PROVIDER, status.as_u16()));
        }

        response
            .json::<GeocodeResponse>()
            .await
            .map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))?
            .into_point()
    }
}
