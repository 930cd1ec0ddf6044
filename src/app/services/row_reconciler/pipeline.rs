//! Whole-manifest runs: reader → reconciler → writer, then the report

use super::reconciler::{RowOutcome, RowReconciler, RunSummary};
use crate::{Error, Result};
use crate::app::services::manifest_io::{ManifestReader, ManifestWriter, output_headers};
use crate::app::services::providers::{Geocoder, PostalLookup};
use indicatif::ProgressBar;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Files involved in one manifest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: PathBuf,
}

impl ManifestJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, report: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            report: report.into(),
        }
    }

    /// Refuse to write the corrected manifest or the report over the input
    pub fn check_paths(&self) -> Result<()> {
        let input = resolve(&self.input);
        for target in [&self.output, &self.report] {
            if resolve(target) == input {
                return Err(Error::configuration(format!(
                    "Output '{}' would overwrite input '{}'",
                    target.display(),
                    self.input.display()
                )));
            }
        }
        Ok(())
    }
}

/// Canonical form of a path that may not exist yet
fn resolve(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Knobs for a manifest run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Entries per report section
    pub top_n: usize,
    /// Upper bound for each provider call
    pub timeout: Duration,
}

/// Stream every row of `reader` through `reconciler` into `writer`
///
/// Dropped rows are never written. The progress bar, if any, ticks once per
/// input row.
pub async fn reconcile_rows<R, W, P, G>(
    reader: &mut ManifestReader<R>,
    writer: &mut ManifestWriter<W>,
    reconciler: &mut RowReconciler<'_, P, G>,
    progress: Option<&ProgressBar>,
) -> Result<()>
where
    R: Read,
    W: Write,
    P: PostalLookup,
    G: Geocoder,
{
    for row in reader.rows() {
        if let RowOutcome::Written(row) = reconciler.reconcile(row?).await {
            writer.write_row(&row)?;
        }
        if let Some(progress) = progress {
            progress.inc(1);
        }
    }
    Ok(())
}

/// Reconcile one manifest file, write the corrected manifest and the report
pub async fn run_manifest<P, G>(
    job: &ManifestJob,
    postal: &P,
    geocoder: &G,
    options: &RunOptions,
    progress: Option<&ProgressBar>,
) -> Result<RunSummary>
where
    P: PostalLookup,
    G: Geocoder,
{
    info!("Starting file processing: {}", job.input.display());
    job.check_paths()?;

    let mut reader = ManifestReader::open(&job.input)?;
    let headers = output_headers(reader.headers(), &job.input.display().to_string())?;
    let mut writer = ManifestWriter::create(&job.output, headers)?;
    info!("Header processed and written to output file.");

    let mut reconciler = RowReconciler::new(postal, geocoder, options.timeout);
    reconcile_rows(&mut reader, &mut writer, &mut reconciler, progress).await?;
    writer.finish()?;

    reconciler
        .frequencies()
        .report(options.top_n)
        .write_to(&job.report)?;

    let summary = reconciler.finish();
    info!(
        "Processing completed. File saved as: {}",
        file_name(&job.output)
    );
    info!("{}", summary.stats.summary());

    Ok(summary)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl From<&crate::config::Config> for RunOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            top_n: config.report.top_n,
            timeout: Duration::from_secs(config.providers.timeout_secs),
        }
    }
}
