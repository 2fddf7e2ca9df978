//! CLI for the Branch Migrator.
//!
//! Migrates the default branch of every repository listed in a batch file
//! and reports which old branches can be deleted.

use branch_migrator::{
    Cancellation, MigrationResult, ProcessingResult, RunSummary, Runner, RunnerConfig,
    RunnerError, SafetyStatus,
};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Branch Migrator - Move repositories to a new default branch.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the batch configuration file.
    #[arg(long, default_value = "branch-migration.toml")]
    config: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: String,

    /// Push workflow commits, overriding the batch file.
    #[arg(long, conflicts_with = "no_push")]
    push: bool,

    /// Do not push workflow commits, overriding the batch file.
    #[arg(long)]
    no_push: bool,

    /// Only report whether the old branches can be deleted.
    #[arg(long)]
    check_only: bool,

    /// Log git commands and their output.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    let cancellation = Cancellation::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current step");
            on_interrupt.cancel();
        }
    });

    match run(args, &cancellation).await {
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
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `--debug` is passed.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Main execution logic.
async fn run(args: Args, cancellation: &Cancellation) -> Result<RunSummary, RunnerError> {
    let push_override = match (args.push, args.no_push) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let config = RunnerConfig::new(args.config, args.token)
        .with_push_override(push_override)
        .with_check_only(args.check_only)
        .with_debug_logging(args.debug);

    let runner = Runner::new(config)?;
    let summary = runner.run(cancellation).await?;
    for result in &summary.results {
        print_result(result);
    }
    Ok(summary)
}

/// Prints the outcome for a single repository.
fn print_result(result: &ProcessingResult) {
    if let Err(e) = write_result(&mut io::stdout().lock(), result) {
        warn!(error = %e, "Failed to print result");
    }
}

fn write_result(out: &mut impl Write, result: &ProcessingResult) -> io::Result<()> {
    writeln!(out, "{}:", result.repository())?;
    match result {
        ProcessingResult::Migrated { result, .. } => write_migration(out, result),
        ProcessingResult::Checked { status, .. } => write_safety(out, status),
        ProcessingResult::Failed { error, partial, .. } => {
            writeln!(out, "  Failed: {error}")?;
            match partial {
                Some(partial) => {
                    writeln!(out, "  Completed before the failure:")?;
                    write_migration(out, partial)
                }
                None => Ok(()),
            }
        }
    }
}

fn write_migration(out: &mut impl Write, result: &MigrationResult) -> io::Result<()> {
    writeln!(
        out,
        "  Workflow files updated: {}",
        result.workflow_outcome.updated_files.len()
    )?;
    writeln!(out, "  Pages updated: {}", result.pages_configuration_updated)?;
    writeln!(out, "  Default branch updated: {}", result.default_branch_updated)?;
    writeln!(
        out,
        "  Pull requests retargeted: {:?}",
        result.retargeted_pull_requests
    )?;
    write_safety(out, &result.safety_status)
}

fn write_safety(out: &mut impl Write, status: &SafetyStatus) -> io::Result<()> {
    if status.safe_to_delete {
        writeln!(out, "  Safe to delete old branch: yes")
    } else {
        writeln!(
            out,
            "  Safe to delete old branch: no ({})",
            status.blocking_reasons.join(", ")
        )
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.check_only { "Check Only" } else { "Migrate" }
    );
    println!("  Repositories processed: {}", summary.repositories_processed);

    if !summary.check_only {
        println!("  Repositories migrated: {}", summary.repositories_migrated);
        println!("  Workflow files updated: {}", summary.workflow_files_updated);
        println!(
            "  Pull requests retargeted: {}",
            summary.pull_requests_retargeted
        );
    }
    println!("  Repositories failed: {}", summary.repositories_failed);
    println!(
        "  Old branches safe to delete: {}",
        summary.branches_safe_to_delete
    );
}
