//! Command-line interface definitions for dupescan.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, config file, error format) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # List later copies of duplicate files
//! dupescan scan ~/Downloads
//!
//! # Hash the last 64 KiB of every candidate with SHA-256
//! dupescan scan ~/Downloads --window suffix --window-size 64KiB --algorithm sha256
//!
//! # Copy one representative of every distinct length to a backup tree
//! dupescan scan ~/Photos --copy-to /mnt/backup
//!
//! # Look for copies of a single file
//! dupescan find report.pdf --in ~/Documents
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::ReportMode;
use crate::scanner::HashAlgorithm;

/// Single-pass duplicate file finder.
///
/// dupescan walks a directory tree once, bucketing files by length and
/// hashing only those whose length collides.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (default: platform config dir/dupescan/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupescan.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Find copies of one file inside a directory
    Find(FindArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Which result list to print
    #[arg(short, long, value_enum)]
    pub report: Option<ReportMode>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Copy a result set to this directory, preserving relative paths
    #[arg(long, value_name = "DEST")]
    pub copy_to: Option<PathBuf>,

    /// Which files --copy-to copies
    #[arg(long, value_enum, requires = "copy_to")]
    pub copy_set: Option<CopySet>,

    #[command(flatten)]
    pub hashing: HashingArgs,

    #[command(flatten)]
    pub walk: WalkArgs,
}

/// Arguments for the find subcommand.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// File whose copies to look for
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory to search
    #[arg(long = "in", value_name = "DIR")]
    pub haystack: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub hashing: HashingArgs,

    #[command(flatten)]
    pub walk: WalkArgs,
}

/// Hashing options shared by all subcommands.
///
/// Every field is optional so that unset flags fall through to the
/// configuration file and environment.
#[derive(Debug, Default, Args)]
pub struct HashingArgs {
    /// Digest algorithm
    #[arg(short, long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Part of each file to hash
    #[arg(short, long, value_enum)]
    pub window: Option<WindowMode>,

    /// Window length for prefix and suffix windows (e.g., 4096, 64KiB, 1MB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub window_size: Option<u64>,

    /// Window length for the proportional window, as a percentage of the file
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub window_percent: Option<u8>,
}

/// Traversal options shared by all subcommands.
#[derive(Debug, Default, Args)]
pub struct WalkArgs {
    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Maximum directory depth below the root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

/// Which bytes of a file are hashed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum WindowMode {
    /// The first --window-size bytes
    #[default]
    Prefix,
    /// The last --window-size bytes
    Suffix,
    /// The first --window-percent percent of the file
    Proportional,
    /// The whole file
    WholeFile,
}

/// Output format for results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One absolute path per line
    #[default]
    Text,
    /// JSON document with paths and counters
    Json,
}

/// Files copied by --copy-to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CopySet {
    /// Files whose length no other file shares
    #[default]
    Unique,
    /// Every file except confirmed later copies
    Retained,
}

/// Parse a human-readable size string into bytes.
///
/// Supports the following formats:
/// - Plain numbers: "1024" (bytes)
/// - Decimal units: "1KB", "1MB", "1GB", "1TB" (powers of 1000)
/// - Binary units: "1KiB", "1MiB", "1GiB", "1TiB" (powers of 1024)
/// - Short forms: "1K", "1M", "1G", "1T" (decimal)
///
/// # Errors
///
/// Returns an error message if the string is not a valid size.
///
/// # Examples
///
/// ```
/// use dupescan::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
