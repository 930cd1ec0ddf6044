//! Process command implementation
//!
//! Resolves inputs, builds the provider clients once, then runs every
//! manifest through the reconciliation pipeline with its own cache and
//! statistics.

use super::discovery::{InputPlan, plan_inputs, store_last_checked};
use super::shared::{count_rows, create_progress_bar, load_configuration, setup_logging};
use crate::Error;
use crate::app::services::providers::{GoogleGeocoder, ViaCepClient};
use crate::app::services::row_reconciler::{ManifestJob, RunOptions, RunStats, run_manifest};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::config::Config;
use chrono::{Local, NaiveDate, Utc};
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Result of one manifest run
#[derive(Debug, Clone, Serialize)]
pub struct ManifestOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: PathBuf,
    pub stats: RunStats,
    pub postal_cache_hits: u64,
    pub location_cache_hits: u64,
}

/// Everything the process command did
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    pub manifests: Vec<ManifestOutcome>,
    pub failed: Vec<PathBuf>,
    pub processing_time: Duration,
}

impl ProcessReport {
    pub fn rows_reconciled(&self) -> usize {
        self.manifests.iter().map(|m| m.stats.rows_reconciled).sum()
    }
}

/// Process command runner
///
/// 1. Set up logging and configuration
/// 2. Resolve inputs, scanning directories for new manifests
/// 3. Reconcile each manifest into dated output files
/// 4. Move the last-checked time forward and print the summary
pub async fn run_process(args: ProcessArgs) -> anyhow::Result<ProcessReport> {
    let start_time = Instant::now();

    setup_logging(&args);
    info!("Starting manifest reconciliation");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let scan_started = Utc::now();
    let plan = plan_inputs(
        &args.inputs,
        &config.watch.last_checked_file,
        &config.output,
    )?;

    let mut report = ProcessReport::default();
    if plan.manifests.is_empty() {
        warn!("No new files to process");
        report.processing_time = start_time.elapsed();
        generate_final_report(args.output_format, &report)?;
        return Ok(report);
    }

    config.ensure_output_directory()?;
    let postal = ViaCepClient::from_config(&config.providers)?;
    let geocoder = GoogleGeocoder::from_config(&config.providers)?;
    let options = RunOptions::from(&config);

    let jobs = plan_jobs(&plan, &args, &config, Local::now().date_naive());
    for (i, job) in jobs.iter().enumerate() {
        info!(
            "Processing {}/{}: {}",
            i + 1,
            jobs.len(),
            job.input.display()
        );

        let progress = if args.show_progress() {
            let total = count_rows(&job.input).unwrap_or(0);
            Some(create_progress_bar(total, &display_name(&job.input)))
        } else {
            None
        };

        let result = run_manifest(job, &postal, &geocoder, &options, progress.as_ref()).await;
        if let Some(progress) = progress {
            progress.finish_and_clear();
        }

        match result {
            Ok(summary) => report.manifests.push(ManifestOutcome {
                input: job.input.clone(),
                output: job.output.clone(),
                report: job.report.clone(),
                stats: summary.stats,
                postal_cache_hits: summary.postal_cache_hits,
                location_cache_hits: summary.location_cache_hits,
            }),
            Err(e) => {
                error!("Failed to process {}: {}", job.input.display(), e);
                report.failed.push(job.input.clone());
            }
        }
    }

    // Failed manifests stay "new" so the next scan picks them up again
    if plan.scanned_directories && report.failed.is_empty() {
        store_last_checked(&config.watch.last_checked_file, scan_started)?;
    }

    report.processing_time = start_time.elapsed();
    generate_final_report(args.output_format, &report)?;

    if !report.failed.is_empty() {
        return Err(Error::processing_interrupted(format!(
            "{} of {} manifests failed",
            report.failed.len(),
            jobs.len()
        ))
        .into());
    }

    Ok(report)
}

/// Input and output paths for every manifest in the plan
///
/// Explicit `--output`/`--report` paths apply to a single input. Otherwise
/// outputs are dated, and named after their input when several manifests
/// run together.
pub fn plan_jobs(
    plan: &InputPlan,
    args: &ProcessArgs,
    config: &Config,
    date: NaiveDate,
) -> Vec<ManifestJob> {
    let several = plan.manifests.len() > 1;

    plan.manifests
        .iter()
        .map(|input| {
            let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned());
            let label = if several { stem.as_deref() } else { None };

            let output = args
                .output_file
                .clone()
                .unwrap_or_else(|| config.output.manifest_path(date, label));
            let report = args
                .report_file
                .clone()
                .unwrap_or_else(|| config.output.report_path(date, label));

            ManifestJob::new(input.clone(), output, report)
        })
        .collect()
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Generate final processing report
fn generate_final_report(format: OutputFormat, report: &ProcessReport) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => {
            generate_human_report(report);
            Ok(())
        }
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Generate human-readable report
fn generate_human_report(report: &ProcessReport) {
    println!("\n{}", "Reconciliation Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(report.processing_time).to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Manifests processed:".bright_cyan(),
        report.manifests.len().to_string().bright_white()
    );
    if !report.failed.is_empty() {
        println!(
            "  {} {}",
            "Manifests failed:".bright_red(),
            report.failed.len().to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Rows reconciled:".bright_cyan(),
        report.rows_reconciled().to_string().bright_white().bold()
    );

    for outcome in &report.manifests {
        let stats = &outcome.stats;
        println!("\n  {}", display_name(&outcome.input).bold());
        println!(
            "    {} {} confirmed, {} corrected, {} unresolved",
            "Streets:".bright_cyan(),
            stats.streets_confirmed,
            stats.streets_corrected,
            stats.streets_unresolved
        );
        println!(
            "    {} {:.1}% ({} not found)",
            "Geocoded:".bright_cyan(),
            stats.geocoding_rate(),
            stats.geocode_not_found
        );
        if stats.rows_dropped > 0 || stats.postal_not_found > 0 {
            println!(
                "    {} {} without postal code, {} not in directory",
                "Postal codes:".yellow(),
                stats.rows_dropped,
                stats.postal_not_found
            );
        }
        if stats.provider_failures > 0 {
            println!(
                "    {} {}",
                "Provider failures:".bright_red(),
                stats.provider_failures.to_string().bright_red()
            );
        }
        println!(
            "    {} {}",
            "Manifest:".bright_cyan(),
            outcome.output.display()
        );
        println!("    {} {}", "Report:".bright_cyan(), outcome.report.display());
    }
    println!();
}

/// Generate JSON report for machine consumption
fn generate_json_report(report: &ProcessReport) -> anyhow::Result<()> {
    let json = serde_json::json!({
        "manifests_processed": report.manifests.len(),
        "manifests_failed": report.failed,
        "rows_reconciled": report.rows_reconciled(),
        "processing_time_seconds": report.processing_time.as_secs_f64(),
        "manifests": report.manifests,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
