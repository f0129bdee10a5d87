//! Windowed content fingerprints.
//!
//! # Overview
//!
//! Instead of hashing whole files, the [`Hasher`] digests a bounded,
//! deterministic byte window chosen by a [`WindowPolicy`]:
//!
//! | Policy | Bytes read |
//! |---|---|
//! | `Prefix(n)` | first `min(n, len)` bytes |
//! | `Suffix(n)` | last `min(n, len)` bytes |
//! | `Proportional(p)` | first `ceil(len * p / 100)` bytes (at least one) |
//! | `WholeFile` | every byte |
//!
//! Small windows keep I/O low but two files that agree inside the window and
//! differ outside it produce the same fingerprint. That is a property of the
//! chosen window, not a bug: use `WholeFile` for correctness-critical runs.
//!
//! Zero-length files are never hashed. Asking for their fingerprint returns
//! [`HashError::EmptyWindow`].

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use digest::Digest;
use serde::{Deserialize, Serialize};

use super::HashError;

/// Default window size in bytes (4 KiB).
pub const DEFAULT_WINDOW_SIZE: u64 = 4096;

/// Buffer size for streaming reads.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm applied to the sampled window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 128-bit digest
    #[default]
    Md5,
    /// SHA-1, 160-bit digest
    Sha1,
    /// SHA-256, 256-bit digest
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha1 => write!(f, "sha1"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Which bytes of a file contribute to its fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// The first `n` bytes.
    Prefix(u64),
    /// The last `n` bytes. Catches trailers in container and archive formats.
    Suffix(u64),
    /// The first `percent`% of the file (1..=100).
    Proportional(u8),
    /// The entire file.
    WholeFile,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::Prefix(DEFAULT_WINDOW_SIZE)
    }
}

impl WindowPolicy {
    /// Byte range `(offset, length)` sampled from a file of `file_len` bytes.
    ///
    /// The length is clamped to the file and is zero only for empty files.
    #[must_use]
    pub fn range(&self, file_len: u64) -> (u64, u64) {
        if file_len == 0 {
            return (0, 0);
        }

        match *self {
            Self::Prefix(n) => (0, n.clamp(1, file_len)),
            Self::Suffix(n) => {
                let len = n.clamp(1, file_len);
                (file_len - len, len)
            }
            Self::Proportional(percent) => {
                let percent = u128::from(percent.clamp(1, 100));
                let len = (u128::from(file_len) * percent).div_ceil(100) as u64;
                (0, len.clamp(1, file_len))
            }
            Self::WholeFile => (0, file_len),
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(n) => write!(f, "prefix:{n}"),
            Self::Suffix(n) => write!(f, "suffix:{n}"),
            Self::Proportional(p) => write!(f, "proportional:{p}%"),
            Self::WholeFile => write!(f, "whole-file"),
        }
    }
}

/// Content fingerprint: file length plus the digest of its sampled window.
///
/// The length is part of the identity so that two files of different sizes
/// sharing a prefix never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// Length of the fingerprinted file
    pub size: u64,
    /// Digest of the sampled window
    pub digest: Vec<u8>,
}

impl Fingerprint {
    /// Digest as lowercase hex.
    #[must_use]
    pub fn hex(&self) -> String {
        hash_to_hex(&self.digest)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.size, self.hex())
    }
}

/// Convert digest bytes to a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    use fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Snapshot of the hasher's I/O accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounters {
    /// Number of fingerprints computed
    pub fingerprints: u64,
    /// Number of bytes read from disk while fingerprinting
    pub bytes_read: u64,
}

/// Windowed file hasher.
///
/// Holds the algorithm and window policy chosen at construction and counts
/// every fingerprint and byte it reads.
#[derive(Debug)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    window: WindowPolicy,
    fingerprints: AtomicU64,
    bytes_read: AtomicU64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default(), WindowPolicy::default())
    }
}

impl Hasher {
    /// Create a hasher for the given algorithm and window.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, window: WindowPolicy) -> Self {
        Self {
            algorithm,
            window,
            fingerprints: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
        }
    }

    /// Configured digest algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Configured window policy.
    #[must_use]
    pub fn window(&self) -> WindowPolicy {
        self.window
    }

    /// Current I/O counters.
    #[must_use]
    pub fn counters(&self) -> IoCounters {
        IoCounters {
            fingerprints: self.fingerprints.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }

    /// Fingerprint a file whose length is already known.
    ///
    /// The file handle lives only for the duration of this call.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::EmptyWindow`] for zero-length files (or files that
    /// were truncated to nothing after being measured) and an I/O variant if
    /// the file cannot be opened or read.
    pub fn fingerprint(&self, path: &Path, size: u64) -> Result<Fingerprint, HashError> {
        let (offset, len) = self.window.range(size);
        if len == 0 {
            return Err(HashError::EmptyWindow(path.to_path_buf()));
        }

        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset))
                .map_err(|e| HashError::from_io(path, e))?;
        }
        let window = file.take(len);

        let (digest, read) = match self.algorithm {
            HashAlgorithm::Md5 => digest_reader::<md5::Md5, _>(window),
            HashAlgorithm::Sha1 => digest_reader::<sha1::Sha1, _>(window),
            HashAlgorithm::Sha256 => digest_reader::<sha2::Sha256, _>(window),
        }
        .map_err(|e| HashError::from_io(path, e))?;

        self.bytes_read.fetch_add(read, Ordering::Relaxed);
        if read == 0 {
            return Err(HashError::EmptyWindow(path.to_path_buf()));
        }
        if read < len {
            log::debug!(
                "Short read for {}: expected {} bytes, got {}",
                path.display(),
                len,
                read
            );
        }

        self.fingerprints.fetch_add(1, Ordering::Relaxed);
        log::trace!(
            "Fingerprinted {} ({} {} bytes at offset {})",
            path.display(),
            self.algorithm,
            read,
            offset
        );

        Ok(Fingerprint { size, digest })
    }

    /// Fingerprint a file, reading its length from the filesystem first.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::fingerprint`], plus metadata lookup failures.
    pub fn fingerprint_path(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let size = std::fs::metadata(path)
            .map_err(|e| HashError::from_io(path, e))?
            .len();
        self.fingerprint(path, size)
    }
}

/// Stream `reader` through digest `D`, returning the digest and byte count.
fn digest_reader<D: Digest, R: Read>(mut reader: R) -> std::io::Result<(Vec<u8>, u64)> {
    let mut state = D::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        state.update(&buffer[..n]);
        total += n as u64;
    }

    Ok((state.finalize().to_vec(), total))
}
