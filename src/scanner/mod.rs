//! Scanner module for directory traversal and windowed content hashing.
//!
//! This module provides functionality for:
//! - Single-threaded, depth-first directory walking using walkdir
//! - Windowed content fingerprints (prefix, suffix, proportional, whole file)
//! - Selectable digest algorithms (MD5, SHA-1, SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal, per-file callbacks, and visit counters
//! - [`hasher`]: Window policy and digest computation with I/O accounting
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let stats = walker
//!     .walk(|file| println!("{}: {} bytes", file.path.display(), file.size))
//!     .unwrap();
//! println!("{} files in {} directories", stats.files, stats.directories);
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{
    hash_to_hex, Fingerprint, HashAlgorithm, Hasher, IoCounters, WindowPolicy,
    DEFAULT_WINDOW_SIZE,
};
pub use walker::Walker;

/// A file observed during traversal.
///
/// Identity is the absolute path. Everything else is captured once at visit
/// time and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Whether the entry is a regular file (not a symlink, socket, device...)
    pub is_regular: bool,
    /// Whether the file could be opened for reading when it was visited
    pub is_readable: bool,
}

impl VisitedFile {
    /// Create a regular, readable file entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_regular: true,
            is_readable: true,
        }
    }

    /// Whether the classifier should look at this file at all.
    #[must_use]
    pub fn is_classifiable(&self) -> bool {
        self.is_regular && self.is_readable
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Maximum recursion depth below the root. `None` walks the whole tree.
    pub max_depth: Option<usize>,
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `skip_hidden` - Whether to skip hidden files
    /// * `max_depth` - Optional depth limit
    #[must_use]
    pub fn new(skip_hidden: bool, max_depth: Option<usize>) -> Self {
        Self {
            skip_hidden,
            max_depth,
        }
    }
}

/// Counters produced by one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Number of file entries visited (directories and failed visits excluded)
    pub files: usize,
    /// Number of directories entered, including the root
    pub directories: usize,
    /// Number of entries that could not be visited
    pub failures: usize,
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur while fingerprinting a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The file has no bytes to hash.
    #[error("Refusing to hash empty window: {0}")]
    EmptyWindow(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Convert an I/O error into the matching variant for `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::EmptyWindow(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
