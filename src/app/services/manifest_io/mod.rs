//! Manifest CSV input and output
//!
//! Manifests are standard quoted CSV with a header row. Field values are
//! decoded before any address logic sees them, so commas inside quoted
//! addresses survive a read/write cycle.

pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use reader::ManifestReader;
pub use writer::{ManifestWriter, output_headers};
