//! dupescan - single-pass duplicate file finder
//!
//! Walks a directory tree once and classifies every regular file as it is
//! visited: files with a length nobody else has are unique without reading a
//! byte, and only colliding lengths pay for a windowed content hash.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::copy_batch;
use crate::cli::{Cli, Commands, CopySet, FindArgs, OutputFormat, ScanArgs, WalkArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{JsonOutput, JsonSearchOutput, TextOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;

/// Run the application logic for parsed arguments.
///
/// Returns the exit code for a completed run. Fatal problems come back as
/// errors; use [`ExitCode::for_error`] to map them.
///
/// # Errors
///
/// Returns an error if the configuration is unusable, the root or reference
/// file is invalid, or results cannot be written to stdout.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Effective configuration before flags: {:?}", config);

    match cli.command {
        Commands::Scan(args) => run_scan(args, config, cli.quiet),
        Commands::Find(args) => run_find(args, config, cli.quiet),
    }
}

fn finder_config(config: &Config, walk: &WalkArgs, quiet: bool) -> Result<FinderConfig> {
    Ok(FinderConfig::default()
        .with_classifier_config(config.classifier_config()?)
        .with_walker_config(WalkerConfig::new(walk.skip_hidden, walk.max_depth))
        .with_progress_callback(Arc::new(Progress::new(quiet))))
}

fn run_scan(args: ScanArgs, config: Config, quiet: bool) -> Result<ExitCode> {
    let config = config.with_hashing_overrides(&args.hashing);
    let mode = args.report.unwrap_or(config.report);
    let format = args.output.unwrap_or(config.output);

    let finder = DuplicateFinder::new(finder_config(&config, &args.walk, quiet)?);
    let report = finder.find_duplicates(&args.path)?;

    if let Some(ref dest) = args.copy_to {
        let set = args.copy_set.unwrap_or(config.copy_set);
        let files = match set {
            CopySet::Unique => &report.unique,
            CopySet::Retained => &report.retained,
        };
        let result = copy_batch(files, &report.root, dest);
        if !result.all_succeeded() {
            log::warn!(
                "{} of {} files could not be copied to {}",
                result.failure_count(),
                files.len(),
                dest.display()
            );
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => TextOutput::new(report.paths(mode))
            .write_to(&mut out)
            .context("Failed to write results")?,
        OutputFormat::Json => JsonOutput::new(&report, mode, ExitCode::Success)
            .write_to(&mut out, true)
            .context("Failed to write results")?,
    }
    out.flush().context("Failed to write results")?;

    Ok(ExitCode::Success)
}

fn run_find(args: FindArgs, config: Config, quiet: bool) -> Result<ExitCode> {
    let config = config.with_hashing_overrides(&args.hashing);
    let format = args.output.unwrap_or(config.output);

    let finder = DuplicateFinder::new(finder_config(&config, &args.walk, quiet)?);
    let search = finder.find_copies(&args.file, &args.haystack)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            TextOutput::new(search.matches.iter().map(|p| p.as_path()).collect())
                .write_to(&mut out)
                .context("Failed to write results")?;
        }
        OutputFormat::Json => JsonSearchOutput::new(&search)
            .write_to(&mut out, true)
            .context("Failed to write results")?,
    }

    Ok(ExitCode::Success)
}
