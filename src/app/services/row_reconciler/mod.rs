//! Row reconciliation pipeline for delivery manifests
//!
//! This module turns raw manifest rows into corrected ones and keeps the
//! run-wide state consistent while doing so.
//!
//! # Architecture
//!
//! - [`reconciler`] - RowReconciler, the per-row state machine
//! - [`pipeline`] - whole-file runs from input CSV to output CSV and report
//! - [`stats`] - run counters and summary
//!
//! # Processing Pipeline
//!
//! 1. **Intake**: rows without a postal code are dropped
//! 2. **Postal lookup**: cached, then the postal directory
//! 3. **Street reconciliation**: match against the directory street, else a
//!    reverse street search; the address is left as typed if both fail
//! 4. **Geocoding**: cached by composite key, then the geocoder
//! 5. **Complement split**: "street, number" back into the address field,
//!    the rest into `Complement`
//! 6. **Statistics**: address and street frequency buckets
//!
//! No step retries and no provider failure fails a row.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use manifest_reconciler::app::services::providers::{GoogleGeocoder, ViaCepClient};
//! use manifest_reconciler::app::services::row_reconciler::{ManifestJob, RunOptions, run_manifest};
//! use manifest_reconciler::config::Config;
//!
//! # async fn example() -> manifest_reconciler::Result<()> {
//! let config = Config::default();
//! let postal = ViaCepClient::from_config(&config.providers)?;
//! let geocoder = GoogleGeocoder::from_config(&config.providers)?;
//!
//! let job = ManifestJob::new("rota.csv", "rota corrigida.csv", "log_enderecos.txt");
//! let summary = run_manifest(&job, &postal, &geocoder, &RunOptions::from(&config), None).await?;
//!
//! println!("{}", summary.stats.summary());
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
pub mod reconciler;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use pipeline::{ManifestJob, RunOptions, reconcile_rows, run_manifest};
pub use reconciler::{RowOutcome, RowReconciler, RunSummary};
pub use stats::RunStats;
