//! Manifest Reconciler Library
//!
//! A Rust library for correcting and enriching delivery manifests before
//! they are handed to drivers.
//!
//! This library provides tools for:
//! - Normalizing free-text Brazilian street addresses (accents, prefixes, filler words)
//! - Matching user-typed street names against the postal-code directory (CEP)
//! - Splitting addresses into canonical street+number and a free-text complement
//! - Memoizing postal and geocoding lookups for the duration of one run
//! - Aggregating the most requested addresses and streets into a text report
//! - Reading and writing quoted CSV manifests

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod address_normalizer;
        pub mod frequency;
        pub mod lookup_cache;
        pub mod manifest_io;
        pub mod providers;
        pub mod row_reconciler;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AddressParts, GeoPoint, ManifestRow, PostalRecord};
pub use config::Config;

/// Result type alias for the manifest reconciler
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for manifest reconciliation operations
///
/// Lookup misses and provider failures are not errors at this level; they are
/// absorbed row by row. Anything that reaches this enum aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing error
    #[error("CSV error in file '{file}': {message}")]
    Csv {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Manifest header lacks a column the pipeline cannot work without
    #[error("Manifest '{file}' has no '{column}' column")]
    MissingColumn { file: String, column: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Provider client could not be built
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error with context
    pub fn csv(file: impl Into<String>, message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::Csv {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing column error
    pub fn missing_column(file: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            file: file.into(),
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a provider construction error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            file: "unknown".to_string(),
            message: "CSV processing failed".to_string(),
            source: Some(error),
        }
    }
}
