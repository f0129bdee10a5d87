//! Copying scan results into a destination tree.
//!
//! # Overview
//!
//! Selected files are copied below a destination directory at the same
//! relative path they had below the scan root. Parent directories are
//! created on demand and an existing destination file is never replaced.
//!
//! A failed copy is logged and recorded; the batch always runs to the end.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::actions::copy::copy_batch;
//! use std::path::{Path, PathBuf};
//!
//! let files = vec![PathBuf::from("/photos/2021/beach.jpg")];
//! let result = copy_batch(&files, Path::new("/photos"), Path::new("/backup"));
//! println!("{}", result.summary());
//! ```

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for copy operations.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Source file was not found (deleted or moved since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied reading the source or writing the destination.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A file already exists at the destination.
    #[error("destination already exists: {0}")]
    AlreadyExists(PathBuf),

    /// The source does not live under the scan root.
    #[error("{path} is not below {root}")]
    OutsideRoot {
        /// Offending source path
        path: PathBuf,
        /// Scan root
        root: PathBuf,
    },

    /// Other I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a single successful copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyResult {
    /// File that was copied
    pub source: PathBuf,
    /// Where it was written
    pub destination: PathBuf,
    /// Bytes copied
    pub size: u64,
}

/// Result of a batch copy.
#[derive(Debug, Default)]
pub struct BatchCopyResult {
    /// Successful copies.
    pub successes: Vec<CopyResult>,
    /// Failed copies with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes copied.
    pub bytes_copied: u64,
}

impl BatchCopyResult {
    /// Number of successful copies.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed copies.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all copies succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let size = bytesize::ByteSize(self.bytes_copied);
        if self.all_succeeded() {
            format!("Copied {} file(s), {}", self.success_count(), size)
        } else {
            format!(
                "Copied {} file(s), {} failed, {}",
                self.success_count(),
                self.failure_count(),
                size
            )
        }
    }
}

/// Destination path for `source` when `source_root` is mirrored at `dest_root`.
///
/// # Errors
///
/// Returns [`CopyError::OutsideRoot`] if `source` is not below `source_root`.
pub fn destination_for(
    source: &Path,
    source_root: &Path,
    dest_root: &Path,
) -> Result<PathBuf, CopyError> {
    let relative = source
        .strip_prefix(source_root)
        .map_err(|_| CopyError::OutsideRoot {
            path: source.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;
    Ok(dest_root.join(relative))
}

/// Copy one file to its mirrored location below `dest_root`.
///
/// # Errors
///
/// Returns a [`CopyError`] if the source is outside the root, cannot be
/// read, or the destination exists or cannot be written.
pub fn copy_file(
    source: &Path,
    source_root: &Path,
    dest_root: &Path,
) -> Result<CopyResult, CopyError> {
    let destination = destination_for(source, source_root, dest_root)?;

    let mut reader = File::open(source).map_err(|e| CopyError::from_io(source, e))?;
    let permissions = reader
        .metadata()
        .map_err(|e| CopyError::from_io(source, e))?
        .permissions();

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::from_io(parent, e))?;
    }

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&destination)
        .map_err(|e| CopyError::from_io(&destination, e))?;

    let size = match io::copy(&mut reader, &mut writer) {
        Ok(size) => size,
        Err(e) => {
            drop(writer);
            if let Err(cleanup) = fs::remove_file(&destination) {
                log::debug!(
                    "Could not remove partial copy {}: {}",
                    destination.display(),
                    cleanup
                );
            }
            return Err(CopyError::from_io(&destination, e));
        }
    };

    if let Err(e) = fs::set_permissions(&destination, permissions) {
        log::debug!(
            "Could not copy permissions to {}: {}",
            destination.display(),
            e
        );
    }

    log::debug!("Copied {} -> {}", source.display(), destination.display());

    Ok(CopyResult {
        source: source.to_path_buf(),
        destination,
        size,
    })
}

/// Copy every path in `paths` below `dest_root`, mirroring `source_root`.
///
/// Failures are logged and collected; they do not stop the batch.
pub fn copy_batch(paths: &[PathBuf], source_root: &Path, dest_root: &Path) -> BatchCopyResult {
    let mut result = BatchCopyResult::default();

    log::info!(
        "Copying {} file(s) from {} to {}",
        paths.len(),
        source_root.display(),
        dest_root.display()
    );

    for path in paths {
        match copy_file(path, source_root, dest_root) {
            Ok(copied) => {
                result.bytes_copied += copied.size;
                result.successes.push(copied);
            }
            Err(e) => {
                let error_msg = e.to_string();
                log::warn!("Failed to copy {}: {}", path.display(), error_msg);
                result.failures.push((path.clone(), error_msg));
            }
        }
    }

    log::info!("{}", result.summary());

    result
}
