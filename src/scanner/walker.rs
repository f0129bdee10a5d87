//! Depth-first directory walker built on walkdir.
//!
//! # Overview
//!
//! The [`Walker`] visits every directory and file under a root exactly once,
//! in a stable pre-order: entries inside a directory are sorted by name and a
//! subdirectory is fully explored before its next sibling. Each visited file
//! is handed to a caller-supplied closure; entries that cannot be visited go
//! to a failure hook and the walk carries on.
//!
//! Symbolic links are never followed. A link is reported as a non-regular
//! file so it is counted but never classified.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let mut sizes = Vec::new();
//! let stats = walker.walk(|file| sizes.push(file.size)).unwrap();
//! assert_eq!(stats.files, sizes.len());
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{ScanError, VisitedFile, WalkStats, WalkerConfig};

/// Directory walker for sequential, deterministic file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root path as given at construction.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, logging entries that cannot be visited.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] only if the root itself is unusable.
    pub fn walk<F>(&self, visit_file: F) -> Result<WalkStats, ScanError>
    where
        F: FnMut(VisitedFile),
    {
        self.walk_with_failure_hook(visit_file, |error| {
            log::warn!("Unable to visit {}: {}", error.path().display(), error);
        })
    }

    /// Walk the tree with an explicit hook for entries that cannot be visited.
    ///
    /// `visit_file` is called once per non-directory entry and the file
    /// counter is incremented after it returns, whatever the callback did.
    /// `visit_failed` is called for entries whose metadata or directory
    /// listing could not be read; those are not counted as files.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`], [`ScanError::PermissionDenied`] or
    /// [`ScanError::NotADirectory`] when the root cannot be walked.
    pub fn walk_with_failure_hook<F, E>(
        &self,
        mut visit_file: F,
        mut visit_failed: E,
    ) -> Result<WalkStats, ScanError>
    where
        F: FnMut(VisitedFile),
        E: FnMut(ScanError),
    {
        let root = self.validate_root()?;
        let mut stats = WalkStats::default();

        let mut walk_dir = WalkDir::new(&root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));
        if let Some(depth) = self.config.max_depth {
            walk_dir = walk_dir.max_depth(depth);
        }

        let skip_hidden = self.config.skip_hidden;
        let entries = walk_dir
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)));

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    stats.failures += 1;
                    visit_failed(self.convert_walk_error(e));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.directories += 1;
                log::trace!("Entering directory: {}", entry.path().display());
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    stats.failures += 1;
                    visit_failed(self.convert_walk_error(e));
                    continue;
                }
            };

            let path = entry.into_path();
            let is_regular = file_type.is_file();
            let is_readable = is_regular && File::open(&path).is_ok();
            if is_regular && !is_readable {
                log::debug!("File is not readable: {}", path.display());
            }

            visit_file(VisitedFile {
                path,
                size: metadata.len(),
                is_regular,
                is_readable,
            });
            stats.files += 1;
        }

        log::debug!(
            "Walk of {} complete: {} files, {} directories, {} failures",
            root.display(),
            stats.files,
            stats.directories,
            stats.failures
        );

        Ok(stats)
    }

    /// Check the root and return its absolute form.
    fn validate_root(&self) -> Result<PathBuf, ScanError> {
        use std::io::ErrorKind;

        let metadata = std::fs::metadata(&self.root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScanError::NotFound(self.root.clone()),
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(self.root.clone()),
            _ => ScanError::Io {
                path: self.root.clone(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        std::path::absolute(&self.root).map_err(|e| ScanError::Io {
            path: self.root.clone(),
            source: e,
        })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn convert_walk_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
            Some(ErrorKind::NotFound) => {
                log::debug!("Entry vanished during walk: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                let message = error.to_string();
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message));
                ScanError::Io { path, source }
            }
        }
    }
}

/// Whether an entry's name starts with a dot.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
