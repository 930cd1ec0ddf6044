//! Manifest reader

use crate::app::models::ManifestRow;
use crate::{Error, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming manifest reader yielding one [`ManifestRow`] per record
pub struct ManifestReader<R: Read> {
    reader: Reader<R>,
    headers: Vec<String>,
    source: String,
}

impl ManifestReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::io(format!("Failed to open manifest '{}'", path.display()), e)
        })?;
        Self::from_reader(file, path.display().to_string())
    }
}

impl<R: Read> ManifestReader<R> {
    /// Wrap any reader; `source` names the input in error messages
    pub fn from_reader(input: R, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| Error::csv(&source, "Failed to read header row", Some(e)))?
            .iter()
            .enumerate()
            .map(|(i, header)| {
                // Spreadsheet exports often start with a byte order mark
                let header = if i == 0 { header.trim_start_matches('\u{feff}') } else { header };
                header.trim().to_string()
            })
            .collect();

        Ok(Self {
            reader,
            headers,
            source,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Remaining rows, each decoded against the header
    pub fn rows(&mut self) -> impl Iterator<Item = Result<ManifestRow>> + '_ {
        let headers = self.headers.clone();
        let source = self.source.clone();
        self.reader.records().map(move |record| {
            record
                .map(|record| to_row(&headers, &record))
                .map_err(|e| Error::csv(&source, "Failed to read manifest row", Some(e)))
        })
    }
}

fn to_row(headers: &[String], record: &StringRecord) -> ManifestRow {
    ManifestRow::from_fields(headers.iter().cloned(), record.iter())
}
