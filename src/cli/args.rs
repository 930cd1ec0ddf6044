//! Command-line argument definitions for the manifest reconciler
//!
//! This module defines the CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the manifest reconciler
///
/// Corrects street names in delivery manifests against the postal-code
/// directory, adds coordinates and writes a report of the busiest addresses.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "manifest-reconciler",
    version,
    about = "Correct and geocode delivery manifest addresses",
    long_about = "Reads delivery manifest CSVs, checks each street name against the postal-code \
                  directory (ViaCEP), corrects it when the directory disagrees, geocodes the \
                  address, splits out the free-text complement and writes a corrected manifest \
                  together with a report of the most requested addresses and streets."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Reconcile one or more manifests
    Process(ProcessArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Manifest CSV files or directories to scan for new manifests
    ///
    /// Directories are scanned for `*.csv` files modified since the time
    /// stored in the last-checked file, which is updated afterwards.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for dated output files
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory for corrected manifests and reports"
    )]
    pub output_dir: Option<PathBuf>,

    /// Explicit path for the corrected manifest (single input only)
    #[arg(long = "output", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Explicit path for the report (single input only)
    #[arg(long = "report", value_name = "FILE")]
    pub report_file: Option<PathBuf>,

    /// Entries per report section
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for ~/.config/manifest-reconciler/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors and the final summary
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the final summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        let explicit_paths = self.output_file.is_some() || self.report_file.is_some();
        if explicit_paths && (self.inputs.len() != 1 || !self.inputs[0].is_file()) {
            return Err(Error::configuration(
                "--output and --report need exactly one manifest file as input",
            ));
        }

        if self.top_n == Some(0) {
            return Err(Error::configuration("--top-n must be at least 1"));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}
