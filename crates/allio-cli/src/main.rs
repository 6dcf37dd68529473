//! # allio-cli
//!
//! Command-line validator for ALLIO diagram files.
//!
//! Prints one line per diagnostic on stdout and exits with 0 when the
//! document passes, 1 when it has failing diagnostics, and 2 when the
//! input or configuration could not be processed.

mod config;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use allio_pipeline::{Pipeline, PipelineConfig, WarningPolicy};
use allio_schema::{Strictness, ValidatorCache};

use crate::config::CliConfig;
use crate::report::{Status, write_report};

#[derive(Parser)]
#[command(name = "alliodiagram")]
#[command(about = "Validate ALLIO automation diagram files")]
#[command(version)]
struct Cli {
    /// Path to the input diagram file
    input: PathBuf,

    /// Report every schema violation instead of the first one
    #[arg(short, long)]
    verbose: bool,

    /// Treat warnings as failures
    #[arg(long)]
    deny_warnings: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(status) => status.into(),
        Err(error) => {
            eprintln!("error: {error:#}");
            Status::Fault.into()
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Status> {
    let settings = match &cli.config {
        Some(path) => CliConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CliConfig::default(),
    }
    .with_flags(cli.verbose, cli.deny_warnings);

    let config = PipelineConfig {
        strictness: Strictness::from_verbose(settings.verbose),
        ..PipelineConfig::default()
    };
    let warnings = WarningPolicy::from_deny_warnings(settings.deny_warnings);

    let cache = ValidatorCache::new();
    let mut pipeline = Pipeline::new(config);
    let outcome = pipeline
        .validate_file(&cache, &cli.input)
        .with_context(|| format!("Failed to validate {}", cli.input.display()))?;

    let source_path = cli.input.display().to_string();
    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), &source_path, outcome.diagnostics())
        .context("Failed to write diagnostics")?;

    let status = Status::of(&outcome, warnings);
    tracing::info!(
        input = %source_path,
        diagnostics = outcome.diagnostics().len(),
        rejected_at = ?outcome.rejected_at(),
        ?status,
        "Validation finished"
    );
    Ok(status)
}
