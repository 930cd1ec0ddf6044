//! Tests for whole-manifest runs

use super::*;
use crate::app::services::row_reconciler::{ManifestJob, RunOptions, run_manifest};
use std::fs;

const INPUT: &str = "\
Sequence,Stop,Destination Address,Zipcode/Postal code,Bairro,City,Latitude,Longitude
1,1,\"Rua Fictícia, 123\",12345678,Centro,São Paulo,-123,-456
2.0,2.0,\"R Ficticia, 123, apto 7\",12345-678,Centro,São Paulo,,
3,3,\"Rua Sem Cep, 1\",,Centro,São Paulo,,
4,4,\"Travessa Um, 9\",87654321,Vila,São Paulo,,
";

fn options() -> RunOptions {
    RunOptions {
        top_n: 10,
        timeout: TEST_TIMEOUT,
    }
}

#[tokio::test]
async fn test_run_manifest_writes_output_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, INPUT).unwrap();
    let job = ManifestJob::new(&input, dir.path().join("out.csv"), dir.path().join("log.txt"));

    let postal = FakePostal::default()
        .with_code("12345678", "Rua Fictícia", "São Paulo")
        .with_code("87654321", "Travessa Um", "São Paulo");
    let geocoder = FakeGeocoder::answering(-23.55052, -46.633308);

    let summary = run_manifest(&job, &postal, &geocoder, &options(), None)
        .await
        .unwrap();

    let output = fs::read_to_string(&job.output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Sequence,Stop,Destination Address,Complement,Zipcode/Postal code,Bairro,City,Latitude,Longitude",
            "1,1,\"Rua Fictícia, 123\",,12345678,Centro,São Paulo,-23.55052,-46.633308",
            "2,2,\"Rua Fictícia, 123\",apto 7,12345-678,Centro,São Paulo,-23.55052,-46.633308",
            "4,4,\"Travessa Um, 9\",,87654321,Vila,São Paulo,-23.55052,-46.633308",
        ]
    );

    assert_eq!(summary.stats.rows_read, 4);
    assert_eq!(summary.stats.rows_dropped, 1);
    assert_eq!(summary.stats.rows_reconciled, 3);
    assert_eq!(summary.postal_cache_hits, 1);
    assert_eq!(summary.location_cache_hits, 1);

    let report = fs::read_to_string(&job.report).unwrap();
    assert!(report.contains("2 pacotes na Rua Fictícia, 123, com as ordens 1, 2"));
    assert!(report.contains("1 pacote na Travessa Um, com a ordem 4"));
    assert!(!report.contains("Sem Cep"));
}

#[tokio::test]
async fn test_run_manifest_requires_address_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "Sequence,Zipcode/Postal code\n1,12345678\n").unwrap();
    let job = ManifestJob::new(&input, dir.path().join("out.csv"), dir.path().join("log.txt"));

    let result = run_manifest(
        &job,
        &FakePostal::default(),
        &FakeGeocoder::default(),
        &options(),
        None,
    )
    .await;

    assert!(matches!(result, Err(crate::Error::MissingColumn { .. })));
}

#[tokio::test]
async fn test_quoted_commas_survive_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(
        &input,
        "Sequence,Destination Address,Zipcode/Postal code\n7,\"Rua \"\"A\"\", 3, bloco 1, apto 2\",\n8,\"Rua A, 3, bloco 1, apto 2\",01001000\n",
    )
    .unwrap();
    let job = ManifestJob::new(&input, dir.path().join("out.csv"), dir.path().join("log.txt"));

    run_manifest(
        &job,
        &FakePostal::default(),
        &FakeGeocoder::default(),
        &options(),
        None,
    )
    .await
    .unwrap();

    let mut reader = csv::Reader::from_path(&job.output).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "8");
    assert_eq!(&records[0][1], "Rua A, 3");
    assert_eq!(&records[0][2], "bloco 1, apto 2");
}

#[tokio::test]
async fn test_output_over_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("07-03-2024 manifesto.csv");
    fs::write(&input, INPUT).unwrap();
    let job = ManifestJob::new(
        &input,
        dir.path().join(".").join("07-03-2024 manifesto.csv"),
        dir.path().join("log.txt"),
    );

    let postal = FakePostal::default();
    let geocoder = FakeGeocoder::default();
    let result = run_manifest(&job, &postal, &geocoder, &options(), None).await;

    assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    assert_eq!(fs::read_to_string(&input).unwrap(), INPUT);
    assert_eq!(postal.forward_calls(), 0);
}
