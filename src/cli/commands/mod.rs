//! Command implementations for the manifest reconciler CLI

pub mod discovery;
pub mod process;
pub mod shared;

pub use process::ProcessReport;

use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand handler
///
/// Returns an empty report when no subcommand was given; `main` prints help
/// before getting here.
pub async fn run(args: Args) -> anyhow::Result<ProcessReport> {
    match args.command {
        Some(Commands::Process(process_args)) => process::run_process(process_args).await,
        None => Ok(ProcessReport::default()),
    }
}
