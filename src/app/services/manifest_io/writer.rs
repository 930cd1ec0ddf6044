//! Manifest writer

use crate::app::models::ManifestRow;
use crate::constants::columns::{COMPLEMENT, DESTINATION_ADDRESS};
use crate::{Error, Result};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output header: input header with `Complement` right after the destination address
///
/// A header that already carries `Complement` is returned unchanged.
pub fn output_headers(input: &[String], source: &str) -> Result<Vec<String>> {
    let position = input
        .iter()
        .position(|header| header == DESTINATION_ADDRESS)
        .ok_or_else(|| Error::missing_column(source, DESTINATION_ADDRESS))?;

    let mut headers = input.to_vec();
    if !headers.iter().any(|header| header == COMPLEMENT) {
        headers.insert(position + 1, COMPLEMENT.to_string());
    }
    Ok(headers)
}

/// Writes rows in header order, quoting fields as needed
pub struct ManifestWriter<W: Write> {
    writer: Writer<W>,
    headers: Vec<String>,
    target: String,
    rows_written: usize,
}

impl ManifestWriter<File> {
    pub fn create(path: &Path, headers: Vec<String>) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            Error::io(format!("Failed to create output '{}'", path.display()), e)
        })?;
        Self::from_writer(file, headers, path.display().to_string())
    }
}

impl<W: Write> ManifestWriter<W> {
    /// Wrap any writer and emit the header row
    pub fn from_writer(output: W, headers: Vec<String>, target: impl Into<String>) -> Result<Self> {
        let target = target.into();
        let mut writer = WriterBuilder::new().from_writer(output);
        writer
            .write_record(&headers)
            .map_err(|e| Error::csv(&target, "Failed to write header row", Some(e)))?;

        Ok(Self {
            writer,
            headers,
            target,
            rows_written: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn write_row(&mut self, row: &ManifestRow) -> Result<()> {
        let values: Vec<String> = row.values_for(&self.headers).collect();
        self.writer
            .write_record(&values)
            .map_err(|e| Error::csv(&self.target, "Failed to write manifest row", Some(e)))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W> {
        let target = self.target;
        self.writer
            .into_inner()
            .map_err(|e| Error::io(format!("Failed to flush '{}'", target), e.into_error()))
    }
}
