//! Tests for the manifest reader

use super::SAMPLE_HEADER;
use crate::app::services::manifest_io::ManifestReader;
use crate::constants::columns;

#[test]
fn test_reads_headers_and_rows() {
    let input = format!(
        "{}\n1,1,\"Rua Fictícia, 123, apto 4\",12345-678,Centro,São Paulo,,\n",
        SAMPLE_HEADER
    );
    let mut reader = ManifestReader::from_reader(input.as_bytes(), "memory").unwrap();

    assert_eq!(reader.headers().len(), 8);
    assert_eq!(reader.headers()[2], columns::DESTINATION_ADDRESS);

    let rows: Vec<_> = reader.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].destination_address(), "Rua Fictícia, 123, apto 4");
    assert_eq!(rows[0].postal_code(), Some("12345-678"));
    assert_eq!(rows[0].get(columns::LATITUDE), Some(""));
}

#[test]
fn test_strips_byte_order_mark_from_first_header() {
    let input = format!("\u{feff}{}\n", SAMPLE_HEADER);
    let reader = ManifestReader::from_reader(input.as_bytes(), "memory").unwrap();

    assert_eq!(reader.headers()[0], columns::SEQUENCE);
}

#[test]
fn test_short_rows_leave_fields_unset() {
    let input = format!("{}\n3,2,\"Rua B, 7\"\n", SAMPLE_HEADER);
    let mut reader = ManifestReader::from_reader(input.as_bytes(), "memory").unwrap();

    let row = reader.rows().next().unwrap().unwrap();
    assert_eq!(row.postal_code(), None);
    assert_eq!(row.get(columns::CITY), None);
    assert_eq!(row.sequence_number(), 3);
}

#[test]
fn test_open_missing_file_is_io_error() {
    let result = ManifestReader::open(std::path::Path::new("/nonexistent/manifest.csv"));
    assert!(matches!(result, Err(crate::Error::Io { .. })));
}
