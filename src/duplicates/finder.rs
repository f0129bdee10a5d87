//! Duplicate finder: walks a tree and feeds every file to the classifier.
//!
//! # Overview
//!
//! [`DuplicateFinder`] is the orchestration layer. It validates the root,
//! drives a single [`Walker`] pass, classifies each file as it arrives and
//! assembles a [`ScanReport`] with counters and timings. There is exactly one
//! traversal; nothing is collected up front.
//!
//! It also offers a targeted search, [`DuplicateFinder::find_copies`], which
//! looks for copies of one given file inside a tree.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let report = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for dup in &report.hash_duplicates {
//!     println!("{} copies {}", dup.path.display(), dup.original.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::classifier::{Classifier, ClassifierConfig};
use super::report::{ScanReport, ScanSummary};
use crate::progress::ProgressCallback;
use crate::scanner::{
    HashAlgorithm, HashError, Hasher, IoCounters, ScanError, WalkStats, Walker, WalkerConfig,
    WindowPolicy,
};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Hashing settings handed to the classifier.
    pub classifier: ClassifierConfig,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("classifier", &self.classifier)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.classifier.algorithm = algorithm;
        self
    }

    /// Set the hash window policy.
    #[must_use]
    pub fn with_window(mut self, window: WindowPolicy) -> Self {
        self.classifier.window = window;
        self
    }

    /// Set the full classifier configuration.
    #[must_use]
    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The provided path is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// An I/O error occurred with a specific path.
    #[error("I/O error for {path}: {source}")]
    IoWithPath {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The reference file could not be fingerprinted.
    #[error(transparent)]
    HashError(#[from] HashError),

    /// A scan error occurred.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

impl FinderError {
    /// Whether the error was caused by a bad path argument.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound(_)
                | Self::NotADirectory(_)
                | Self::NotAFile(_)
                | Self::ScanError(ScanError::NotFound(_) | ScanError::NotADirectory(_))
        )
    }
}

/// Result of searching a tree for copies of one file.
#[derive(Debug, Default)]
pub struct CopySearch {
    /// The reference file
    pub needle: PathBuf,
    /// Length of the reference file
    pub size: u64,
    /// Files under the haystack matching the reference, in visit order
    pub matches: Vec<PathBuf>,
    /// Traversal counters
    pub stats: WalkStats,
    /// Hashing I/O, reference file included
    pub io: IoCounters,
    /// Candidates that could not be fingerprinted
    pub errors: Vec<HashError>,
}

/// Duplicate finder that drives the walker and the classifier.
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find duplicate files under `path` in a single traversal.
    ///
    /// Per-file problems (unreadable entries, hash failures) are logged and
    /// collected in the report; they never abort the scan.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the path does not exist, is not a directory,
    /// or cannot be walked at all.
    pub fn find_duplicates(&self, path: &Path) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();
        let root = validate_directory(path)?;

        log::info!("Starting duplicate scan of {}", root.display());
        log::debug!(
            "Hashing with {} over {}",
            self.config.classifier.algorithm,
            self.config.classifier.window
        );

        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_phase_start("walking", 0);
        }

        let walker = Walker::new(&root, self.config.walker_config.clone());
        let mut classifier = Classifier::new(self.config.classifier);
        let mut walk_errors = Vec::new();
        let mut visited = 0usize;

        let stats = walker.walk_with_failure_hook(
            |file| {
                visited += 1;
                if let Some(cb) = callback {
                    cb.on_progress(visited, &file.path.to_string_lossy());
                }
                classifier.classify(file);
            },
            |error| {
                log::warn!("Unable to visit {}: {}", error.path().display(), error);
                walk_errors.push(error);
            },
        )?;

        if let Some(cb) = callback {
            cb.on_phase_end("walking");
        }

        let distinct_sizes = classifier.sizes().len();
        let outcome = classifier.finish();

        let summary = ScanSummary {
            files: stats.files,
            directories: stats.directories,
            visit_failures: stats.failures,
            classified: outcome.classified,
            skipped: outcome.skipped,
            distinct_sizes,
            unique_files: outcome.unique.len(),
            size_duplicates: outcome.size_duplicates.len(),
            hash_duplicates: outcome.hash_duplicates.len(),
            hash_failures: outcome.errors.len(),
            fingerprints: outcome.fingerprints,
            fingerprints_computed: outcome.io.fingerprints,
            bytes_read: outcome.io.bytes_read,
            reclaimable_bytes: outcome.hash_duplicates.iter().map(|d| d.size).sum(),
            duration: start_time.elapsed(),
        };

        log::info!(
            "Scanned {} files in {} directories: {} unique, {} size collisions, {} duplicates ({} reclaimable)",
            summary.files,
            summary.directories,
            summary.unique_files,
            summary.size_duplicates,
            summary.hash_duplicates,
            summary.reclaimable_display()
        );
        log::info!(
            "Computed {} fingerprints over {} in {:.2?}",
            summary.fingerprints_computed,
            summary.bytes_read_display(),
            summary.duration
        );
        if summary.visit_failures > 0 || summary.hash_failures > 0 {
            log::warn!(
                "{} entries could not be visited and {} files could not be hashed",
                summary.visit_failures,
                summary.hash_failures
            );
        }

        Ok(ScanReport {
            root,
            size_duplicates: outcome.size_duplicates,
            hash_duplicates: outcome.hash_duplicates,
            unique: outcome.unique,
            retained: outcome.retained,
            summary,
            walk_errors,
            hash_errors: outcome.errors,
        })
    }

    /// Find copies of `needle` anywhere under `haystack`.
    ///
    /// Only files with the needle's length are fingerprinted. The needle
    /// itself is never reported, even when it lives inside the haystack.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the needle is missing or not a regular file,
    /// if it cannot be fingerprinted, or if the haystack is not a directory.
    pub fn find_copies(&self, needle: &Path, haystack: &Path) -> Result<CopySearch, FinderError> {
        let metadata = std::fs::metadata(needle).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FinderError::PathNotFound(needle.to_path_buf()),
            _ => FinderError::IoWithPath {
                path: needle.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_file() {
            return Err(FinderError::NotAFile(needle.to_path_buf()));
        }
        let root = validate_directory(haystack)?;
        let needle_real = std::fs::canonicalize(needle).map_err(|e| FinderError::IoWithPath {
            path: needle.to_path_buf(),
            source: e,
        })?;

        let size = metadata.len();
        let hasher = Hasher::new(
            self.config.classifier.algorithm,
            self.config.classifier.window,
        );
        // Empty files all match each other without hashing.
        let target = if size == 0 {
            None
        } else {
            Some(hasher.fingerprint(needle, size)?)
        };

        log::info!(
            "Searching {} for copies of {} ({} bytes)",
            root.display(),
            needle.display(),
            size
        );

        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_phase_start("searching", 0);
        }

        let walker = Walker::new(&root, self.config.walker_config.clone());
        let mut matches = Vec::new();
        let mut errors = Vec::new();
        let mut visited = 0usize;

        let stats = walker.walk(|file| {
            visited += 1;
            if let Some(cb) = callback {
                cb.on_progress(visited, &file.path.to_string_lossy());
            }
            if !file.is_classifiable() || file.size != size {
                return;
            }
            if std::fs::canonicalize(&file.path).is_ok_and(|p| p == needle_real) {
                return;
            }
            let Some(ref target) = target else {
                matches.push(file.path);
                return;
            };
            match hasher.fingerprint(&file.path, size) {
                Ok(fp) if fp == *target => {
                    log::debug!("Match: {}", file.path.display());
                    matches.push(file.path);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    errors.push(e);
                }
            }
        })?;

        if let Some(cb) = callback {
            cb.on_phase_end("searching");
        }

        log::info!(
            "Found {} copies among {} files in {} directories",
            matches.len(),
            stats.files,
            stats.directories
        );

        Ok(CopySearch {
            needle: needle.to_path_buf(),
            size,
            matches,
            stats,
            io: hasher.counters(),
            errors,
        })
    }
}

/// Check that `path` is an existing directory and return its absolute form.
fn validate_directory(path: &Path) -> Result<PathBuf, FinderError> {
    if !path.exists() {
        return Err(FinderError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    std::path::absolute(path).map_err(|e| FinderError::IoWithPath {
        path: path.to_path_buf(),
        source: e,
    })
}
