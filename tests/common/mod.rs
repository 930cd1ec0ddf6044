//! Mocked postal directory and geocoder for the integration tests
//!
//! Unmatched requests get httpmock's default 404.

#![allow(dead_code)]

use httpmock::Mock;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

pub const MANIFEST_HEADER: &str =
    "Sequence,Stop,Destination Address,Zipcode/Postal code,Bairro,City,Latitude,Longitude";

/// Endpoints of the São Paulo scenario used across the integration tests
pub struct SaoPauloMocks<'a> {
    pub postal: Mock<'a>,
    pub unknown_postal: Mock<'a>,
    pub street_search: Mock<'a>,
    pub geocode: Mock<'a>,
}

impl SaoPauloMocks<'_> {
    pub async fn total_calls(&self) -> usize {
        self.postal.calls_async().await
            + self.unknown_postal.calls_async().await
            + self.street_search.calls_async().await
            + self.geocode.calls_async().await
    }
}

pub async fn mock_sao_paulo(server: &MockServer) -> SaoPauloMocks<'_> {
    let postal = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01310100/json/");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "cep": "01310-100",
                    "logradouro": "Avenida Paulista",
                    "bairro": "Bela Vista",
                    "localidade": "São Paulo",
                    "uf": "SP"
                }));
        })
        .await;

    let unknown_postal = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/99999999/json/");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "erro": true }));
        })
        .await;

    // The city segment arrives percent-encoded
    let street_search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_includes("/ws/SP/")
                .path_includes("/augusta/json/");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{
                    "cep": "01305-000",
                    "logradouro": "Rua Augusta",
                    "localidade": "São Paulo",
                    "uf": "SP"
                }]));
        })
        .await;

    let geocode = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/geocode/json")
                .query_param("key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "OK",
                    "results": [{ "geometry": { "location": { "lat": -23.56, "lng": -46.66 } } }]
                }));
        })
        .await;

    SaoPauloMocks {
        postal,
        unknown_postal,
        street_search,
        geocode,
    }
}

/// 500 for every request
pub async fn mock_failing(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|_when, then| {
            then.status(500);
        })
        .await
}

/// Answers every request only after `delay`
pub async fn mock_slow(server: &MockServer, delay: Duration) -> Mock<'_> {
    server
        .mock_async(|_when, then| {
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({}))
                .delay(delay);
        })
        .await
}

/// Four rows: a misspelled street, a repeat, an unknown postal code and a
/// row without one
pub fn sample_manifest() -> String {
    format!(
        "{}\n\
         1,1,\"R Augusta, 500, loja 3\",01310-100,Consolação,São Paulo,,\n\
         2,2,\"Rua Augusta, 500\",01310100,Consolação,São Paulo,,\n\
         3,3,\"Travessa Boa Vista, 12\",99999999,Centro,São Paulo,,\n\
         4,4,\"Rua Sem Cep, 1\",,Centro,São Paulo,,\n",
        MANIFEST_HEADER
    )
}
