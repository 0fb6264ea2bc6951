//! CLI for the issue migrator.
//!
//! This tool turns dumped source-tracker issues into target issue documents
//! and milestones, ready for an import client.

use clap::Parser;
use issue_migrator::{RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Migrator - Compose target issue documents from source tracker dumps.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the migration configuration.
    #[arg(long, env = "ISSUE_MIGRATOR_CONFIG", default_value = "migrator.toml")]
    config: PathBuf,

    /// Path to the enumeration dump (statuses, trackers, users, versions...).
    #[arg(long, default_value = "dump/lookups.json")]
    lookups: PathBuf,

    /// Directory of `<id>.json` issue dumps.
    #[arg(long, default_value = "dump/issues/")]
    issues_path: PathBuf,

    /// Directory to write composed documents to.
    #[arg(long, default_value = "out/")]
    output_path: PathBuf,

    /// Comma separated list of issue ids to migrate.
    #[arg(long, value_delimiter = ',')]
    issues: Vec<u64>,

    /// Print previews instead of writing files.
    #[arg(long)]
    dry_run: bool,

    /// Maximum issues converted at once.
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(
        args.config,
        args.lookups,
        args.issues_path,
        args.output_path,
        args.dry_run,
        args.concurrency,
    )
    .with_issue_ids(args.issues);
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Issues discovered: {}", summary.issues_discovered);
    println!("  Issues composed: {}", summary.issues_composed);
    println!("  Issues skipped: {}", summary.issues_skipped);
    println!("  Issues failed: {}", summary.issues_failed);
    println!("  Milestones: {}", summary.milestones_written);
}
