//! JSON output formatter for scan and search results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/home/user/Downloads",
//!   "report": "duplicates",
//!   "paths": ["/home/user/Downloads/b/copy.txt"],
//!   "duplicates": [
//!     {
//!       "path": "/home/user/Downloads/b/copy.txt",
//!       "original": "/home/user/Downloads/a/copy.txt",
//!       "size": 1024
//!     }
//!   ],
//!   "summary": {
//!     "files": 100,
//!     "directories": 12,
//!     "unique_files": 80,
//!     "size_duplicates": 4,
//!     "hash_duplicates": 1,
//!     "bytes_read": 16384,
//!     "scan_duration_ms": 12,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{CopySearch, HashDuplicate, ReportMode, ScanReport, ScanSummary};
use crate::error::ExitCode;

/// A confirmed duplicate in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    /// The later copy
    pub path: String,
    /// The earlier file it matched
    pub original: String,
    /// Length in bytes
    pub size: u64,
}

impl From<&HashDuplicate> for JsonDuplicate {
    fn from(dup: &HashDuplicate) -> Self {
        Self {
            path: dup.path.to_string_lossy().into_owned(),
            original: dup.original.to_string_lossy().into_owned(),
            size: dup.size,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Non-directory entries visited
    pub files: usize,
    /// Directories entered, root included
    pub directories: usize,
    /// Entries that could not be visited
    pub visit_failures: usize,
    /// Files that were classified
    pub classified: usize,
    /// Files skipped as non-regular or unreadable
    pub skipped: usize,
    /// Files whose length no other file shares
    pub unique_files: usize,
    /// Files whose length matched an earlier file
    pub size_duplicates: usize,
    /// Confirmed later copies
    pub hash_duplicates: usize,
    /// Files that could not be fingerprinted
    pub hash_failures: usize,
    /// Fingerprint computations performed
    pub fingerprints_computed: u64,
    /// Bytes read while fingerprinting
    pub bytes_read: u64,
    /// Bytes held by confirmed later copies
    pub reclaimable_bytes: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            files: summary.files,
            directories: summary.directories,
            visit_failures: summary.visit_failures,
            classified: summary.classified,
            skipped: summary.skipped,
            unique_files: summary.unique_files,
            size_duplicates: summary.size_duplicates,
            hash_duplicates: summary.hash_duplicates,
            hash_failures: summary.hash_failures,
            fingerprints_computed: summary.fingerprints_computed,
            bytes_read: summary.bytes_read,
            reclaimable_bytes: summary.reclaimable_bytes,
            scan_duration_ms: u64::try_from(summary.duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON document for a scan.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Absolute scan root
    pub root: String,
    /// Which list `paths` holds
    pub report: ReportMode,
    /// The selected result list
    pub paths: Vec<String>,
    /// Every confirmed duplicate with its original
    pub duplicates: Vec<JsonDuplicate>,
    /// Counters
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the document for `report`, listing the paths selected by `mode`.
    #[must_use]
    pub fn new(report: &ScanReport, mode: ReportMode, exit_code: ExitCode) -> Self {
        Self {
            root: report.root.to_string_lossy().into_owned(),
            report: mode,
            paths: report
                .paths(mode)
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            duplicates: report.hash_duplicates.iter().map(JsonDuplicate::from).collect(),
            summary: JsonSummary::from_scan_summary(&report.summary, exit_code),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        write_json(self, writer, pretty)
    }
}

/// JSON document for a `find` search.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSearchOutput {
    /// The reference file
    pub needle: String,
    /// Its length in bytes
    pub size: u64,
    /// Copies found
    pub matches: Vec<String>,
    /// Non-directory entries visited
    pub files: usize,
    /// Directories entered
    pub directories: usize,
    /// Fingerprint computations performed
    pub fingerprints_computed: u64,
    /// Bytes read while fingerprinting
    pub bytes_read: u64,
}

impl JsonSearchOutput {
    /// Build the document for a finished search.
    #[must_use]
    pub fn new(search: &CopySearch) -> Self {
        Self {
            needle: search.needle.to_string_lossy().into_owned(),
            size: search.size,
            matches: search
                .matches
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            files: search.stats.files,
            directories: search.stats.directories,
            fingerprints_computed: search.io.fingerprints,
            bytes_read: search.io.bytes_read,
        }
    }

    /// Write the document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        write_json(self, writer, pretty)
    }
}

fn write_json<T: Serialize, W: Write>(
    value: &T,
    writer: &mut W,
    pretty: bool,
) -> Result<(), JsonOutputError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Errors from JSON output generation.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// Serialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing failed.
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
