//! End-to-end manifest runs with the real HTTP clients against mocked providers

mod common;

use common::{mock_failing, mock_sao_paulo, mock_slow, sample_manifest};
use httpmock::MockServer;
use manifest_reconciler::app::services::providers::{GoogleGeocoder, ViaCepClient};
use manifest_reconciler::app::services::row_reconciler::{
    ManifestJob, RunOptions, RunSummary, run_manifest,
};
use manifest_reconciler::config::Config;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn config_for(server: &MockServer, timeout_secs: u64) -> Config {
    let mut config = Config::default().with_timeout_secs(timeout_secs);
    config.providers.postal_base_url = format!("{}/ws", server.base_url());
    config.providers.geocoding_base_url = format!("{}/geocode/json", server.base_url());
    config.providers.geocoding_api_key = Some("test-key".to_string());
    config
}

async fn run(temp_dir: &TempDir, config: &Config) -> (ManifestJob, RunSummary) {
    let input = temp_dir.path().join("rota.csv");
    fs::write(&input, sample_manifest()).unwrap();
    let job = ManifestJob::new(
        &input,
        temp_dir.path().join("manifesto.csv"),
        temp_dir.path().join("log_enderecos.txt"),
    );

    let postal = ViaCepClient::from_config(&config.providers).unwrap();
    let geocoder = GoogleGeocoder::from_config(&config.providers).unwrap();
    let summary = run_manifest(&job, &postal, &geocoder, &RunOptions::from(config), None)
        .await
        .unwrap();

    (job, summary)
}

#[tokio::test]
async fn test_manifest_is_corrected_geocoded_and_reported() {
    let server = MockServer::start_async().await;
    let mocks = mock_sao_paulo(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let (job, summary) = run(&temp_dir, &config_for(&server, 5)).await;

    let output = fs::read_to_string(&job.output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Sequence,Stop,Destination Address,Complement,Zipcode/Postal code,Bairro,City,Latitude,Longitude",
            "1,1,\"Rua Augusta, 500\",loja 3,01310-100,Consolação,São Paulo,-23.56,-46.66",
            "2,2,\"Rua Augusta, 500\",,01310100,Consolação,São Paulo,-23.56,-46.66",
            "3,3,\"Travessa Boa Vista, 12\",,99999999,Centro,São Paulo,-23.56,-46.66",
        ]
    );

    let stats = &summary.stats;
    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.rows_dropped, 1);
    assert_eq!(stats.rows_reconciled, 3);
    assert_eq!(stats.streets_corrected, 2);
    assert_eq!(stats.postal_not_found, 1);
    assert_eq!(stats.geocoded, 3);
    assert_eq!(stats.provider_failures, 0);

    // Postal codes and locations are cached; reverse searches are not
    mocks.postal.assert_calls_async(1).await;
    mocks.unknown_postal.assert_calls_async(1).await;
    mocks.street_search.assert_calls_async(2).await;
    mocks.geocode.assert_calls_async(2).await;
    assert_eq!(summary.postal_cache_hits, 1);
    assert_eq!(summary.location_cache_hits, 1);

    let report = fs::read_to_string(&job.report).unwrap();
    assert!(report.starts_with("Endereços com mais pedidos:\n"));
    assert!(report.contains("2 pacotes na Rua Augusta, 500, com as ordens 1, 2\n"));
    assert!(report.contains("2 pacotes na Rua Augusta, com as ordens 1, 2\n"));
    assert!(report.contains(
        "Travessas e/ou Passagens com mais pedidos:\n\n1 pacote na Travessa Boa Vista, com a ordem 3\n"
    ));
    assert!(!report.contains("Sem Cep"));
}

#[tokio::test]
async fn test_failing_providers_leave_rows_as_typed() {
    let server = MockServer::start_async().await;
    let failing = mock_failing(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let (job, summary) = run(&temp_dir, &config_for(&server, 5)).await;

    let output = fs::read_to_string(&job.output).unwrap();
    assert!(output.contains("1,1,\"R Augusta, 500\",loja 3,01310-100,Consolação,São Paulo,,\n"));

    let stats = &summary.stats;
    assert_eq!(stats.rows_reconciled, 3);
    assert_eq!(stats.postal_not_found, 3);
    assert_eq!(stats.geocoded, 0);
    // Failures are counted apart from misses and never cached: three postal
    // calls and three geocoding calls
    assert_eq!(stats.geocode_not_found, 0);
    assert_eq!(stats.provider_failures, 6);
    failing.assert_calls_async(6).await;
}

#[tokio::test]
async fn test_unresponsive_provider_times_out() {
    let server = MockServer::start_async().await;
    mock_slow(&server, Duration::from_secs(30)).await;
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("rota.csv");
    fs::write(
        &input,
        format!("{}\n1,1,\"Rua Augusta, 500\",01310100,Centro,São Paulo,,\n", common::MANIFEST_HEADER),
    )
    .unwrap();
    let job = ManifestJob::new(
        &input,
        temp_dir.path().join("manifesto.csv"),
        temp_dir.path().join("log_enderecos.txt"),
    );

    let config = config_for(&server, 1);
    let postal = ViaCepClient::from_config(&config.providers).unwrap();
    let geocoder = GoogleGeocoder::from_config(&config.providers).unwrap();
    let summary = run_manifest(&job, &postal, &geocoder, &RunOptions::from(&config), None)
        .await
        .unwrap();

    assert_eq!(summary.stats.rows_reconciled, 1);
    assert_eq!(summary.stats.provider_failures, 2);
    assert!(fs::read_to_string(&job.output)
        .unwrap()
        .contains("1,1,\"Rua Augusta, 500\",,01310100,Centro,São Paulo,,"));
}

#[tokio::test]
async fn test_missing_address_column_is_fatal() {
    let server = MockServer::start_async().await;
    let mocks = mock_sao_paulo(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("rota.csv");
    fs::write(&input, "Sequence,Zipcode/Postal code\n1,01310100\n").unwrap();
    let job = ManifestJob::new(
        &input,
        temp_dir.path().join("manifesto.csv"),
        temp_dir.path().join("log_enderecos.txt"),
    );

    let config = config_for(&server, 5);
    let postal = ViaCepClient::from_config(&config.providers).unwrap();
    let geocoder = GoogleGeocoder::from_config(&config.providers).unwrap();
    let result = run_manifest(&job, &postal, &geocoder, &RunOptions::from(&config), None).await;

    assert!(matches!(
        result,
        Err(manifest_reconciler::Error::MissingColumn { .. })
    ));
    assert_eq!(mocks.total_calls().await, 0);
}
