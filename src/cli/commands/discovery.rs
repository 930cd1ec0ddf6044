//! Input discovery for the process command
//!
//! Explicit files are taken as given. Directories are scanned for manifests
//! modified after the time stored in the last-checked file.

use crate::config::OutputConfig;
use crate::constants::OUTPUT_DATE_FORMAT;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Manifests selected for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPlan {
    pub manifests: Vec<PathBuf>,
    /// At least one directory was scanned, so the last-checked time moves
    pub scanned_directories: bool,
}

/// Time of the previous directory scan; the epoch when unknown
pub fn load_last_checked(path: &Path) -> DateTime<Utc> {
    let Ok(content) = std::fs::read_to_string(path) else {
        debug!("No last-checked file at {}", path.display());
        return DateTime::<Utc>::UNIX_EPOCH;
    };

    match DateTime::parse_from_rfc3339(content.trim()) {
        Ok(time) => time.with_timezone(&Utc),
        Err(e) => {
            warn!(
                "Ignoring unreadable last-checked time in {}: {}",
                path.display(),
                e
            );
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

pub fn store_last_checked(path: &Path, time: DateTime<Utc>) -> Result<()> {
    std::fs::write(path, format!("{}\n", time.to_rfc3339())).map_err(|e| {
        Error::io(
            format!("Failed to update last-checked file '{}'", path.display()),
            e,
        )
    })?;
    info!("Updated last check time");
    Ok(())
}

/// Whether `path` is a corrected manifest this tool wrote
/// (`<dd-mm-YYYY> [label ]<manifest_suffix>`)
pub fn is_generated_manifest(path: &Path, output: &OutputConfig) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let Some(prefix) = name.strip_suffix(output.manifest_suffix.as_str()) else {
        return false;
    };
    prefix
        .split_whitespace()
        .next()
        .is_some_and(|date| NaiveDate::parse_from_str(date, OUTPUT_DATE_FORMAT).is_ok())
}

/// `*.csv` files in `dir` modified after `since`, in name order
///
/// Corrected manifests written by earlier runs are skipped, so the output
/// directory can also be a scan directory.
pub fn discover_new_manifests(
    dir: &Path,
    since: DateTime<Utc>,
    output: &OutputConfig,
) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.csv");
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern).map_err(|e| {
        Error::configuration(format!("Invalid input directory '{}': {}", dir.display(), e))
    })?;

    let mut manifests = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if is_generated_manifest(&path, output) {
            debug!("Skipping generated manifest: {}", path.display());
            continue;
        }

        let modified = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| Error::io(format!("Failed to stat '{}'", path.display()), e))?;
        if DateTime::<Utc>::from(modified) > since {
            manifests.push(path);
        } else {
            debug!("Already processed: {}", path.display());
        }
    }

    manifests.sort();
    Ok(manifests)
}

/// Expand command-line inputs into the list of manifests to process
pub fn plan_inputs(
    inputs: &[PathBuf],
    last_checked_file: &Path,
    output: &OutputConfig,
) -> Result<InputPlan> {
    let mut plan = InputPlan::default();
    let mut since = None;

    for input in inputs {
        if input.is_dir() {
            let since = *since.get_or_insert_with(|| {
                let time = load_last_checked(last_checked_file);
                info!("Last check: {}", time.format("%d/%m/%Y %H:%M:%S"));
                time
            });
            let found = discover_new_manifests(input, since, output)?;
            info!(
                "New files for processing in {}: {}",
                input.display(),
                found.len()
            );
            plan.manifests.extend(found);
            plan.scanned_directories = true;
        } else {
            plan.manifests.push(input.clone());
        }
    }

    Ok(plan)
}
