//! ViaCEP postal directory client
//!
//! Forward: `GET {base}/{cep}/json/` answers one address or `{"erro": true}`.
//! Reverse: `GET {base}/{UF}/{city}/{street}/json/` answers a list of addresses.

use super::{PostalLookup, ProviderError, ProviderResult};
use crate::app::models::PostalRecord;
use crate::app::services::address_normalizer::strip_accents;
use crate::config::ProvidersConfig;
use crate::{Error, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const PROVIDER: &str = "ViaCEP";

/// One address entry as returned by ViaCEP
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViaCepAddress {
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub erro: Option<serde_json::Value>,
}

impl ViaCepAddress {
    /// `None` for the "erro" marker and for entries without a street
    pub fn into_record(self) -> Option<PostalRecord> {
        if self.erro.as_ref().is_some_and(is_truthy) {
            return None;
        }
        let street_name = self.logradouro.filter(|s| !s.trim().is_empty())?;
        Some(PostalRecord {
            street_name,
            city: self.localidade.unwrap_or_default(),
        })
    }
}

// ViaCEP has answered both `true` and `"true"` over time
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::String(text) => text.eq_ignore_ascii_case("true"),
        _ => true,
    }
}

#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
    state: String,
}

impl ViaCepClient {
    pub fn new(base_url: &str, state: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            Error::configuration(format!("Invalid postal base URL '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::provider(format!("Failed to build ViaCEP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            state: state.into(),
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Self::new(
            &config.postal_base_url,
            config.postal_state.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// `{base}/{cep}/json/`
    pub fn postal_url(&self, postal_code: &str) -> ProviderResult<Url> {
        self.url_with_segments(&[postal_code, "json", ""])
    }

    /// `{base}/{UF}/{city}/{street}/json/` with the street accent-folded and lower-cased
    pub fn street_search_url(&self, street: &str, city: &str) -> ProviderResult<Url> {
        let street = strip_accents(street);
        self.url_with_segments(&[self.state.as_str(), city, street.trim(), "json", ""])
    }

    fn url_with_segments(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::transport(PROVIDER, "base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> ProviderResult<T> {
        debug!("Fetching URL: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::status(PROVIDER, status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))
    }
}

impl PostalLookup for ViaCepClient {
    async fn lookup_postal_code(&self, postal_code: &str) -> ProviderResult<Option<PostalRecord>> {
        let url = self.postal_url(postal_code)?;
        let address: ViaCepAddress = self.get_json(url).await?;
        Ok(address.into_record())
    }

    async fn reverse_lookup_street(
        &self,
        street: &str,
        city: &str,
    ) -> ProviderResult<Option<PostalRecord>> {
        let url = self.street_search_url(street, city)?;
        let addresses: Vec<ViaCepAddress> = self.get_json(url).await?;
        Ok(first_record(addresses))
    }
}

/// First usable entry of a reverse-search answer
pub fn first_record(addresses: Vec<ViaCepAddress>) -> Option<PostalRecord> {
    addresses.into_iter().find_map(ViaCepAddress::into_record)
}
