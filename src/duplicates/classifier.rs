//! Streaming duplicate classification.
//!
//! # Overview
//!
//! The [`Classifier`] decides the fate of each file the moment the walker
//! hands it over. Files are filtered in three stages, cheapest first:
//!
//! 1. **Size bucket.** A file whose length has never been seen is unique and
//!    costs no I/O at all.
//! 2. **Windowed fingerprint.** A file whose length collides is hashed over
//!    its configured window. A fingerprint that is already known marks the
//!    file as a duplicate of whoever owns that fingerprint.
//! 3. **Verification.** A novel fingerprint may only be novel because the
//!    earlier same-length files were never hashed (they went through the
//!    fast path). Those earlier files are fingerprinted now and compared.
//!
//! Every file reaches a final verdict exactly once and is never reconsidered,
//! except that a file taking the fast path leaves the unique set as soon as a
//! later file turns up with the same length.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{Classification, Classifier, ClassifierConfig};
//! use dupescan::scanner::VisitedFile;
//! use std::path::PathBuf;
//!
//! let mut classifier = Classifier::new(ClassifierConfig::default());
//! let first = classifier.classify(VisitedFile::new(PathBuf::from("/a/one.txt"), 12));
//! assert_eq!(first, Classification::Unique);
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{
    Fingerprint, HashAlgorithm, HashError, Hasher, IoCounters, VisitedFile, WindowPolicy,
};

/// Hashing settings for a classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Which bytes of each file are hashed
    pub window: WindowPolicy,
}

impl ClassifierConfig {
    /// Create a configuration from an algorithm and a window policy.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, window: WindowPolicy) -> Self {
        Self { algorithm, window }
    }
}

/// Verdict for a single visited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not a readable regular file; ignored entirely.
    Skipped,
    /// First file of its length. No bytes were read.
    Unique,
    /// Length collided but no matching content was found.
    SizeCollision,
    /// Content matches an earlier file.
    Duplicate {
        /// The earlier file this one copies
        original: PathBuf,
    },
    /// Length collided but the file could not be fingerprinted.
    Failed,
}

/// A file confirmed to duplicate an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashDuplicate {
    /// The later copy
    pub path: PathBuf,
    /// The earliest visited file with the same fingerprint
    pub original: PathBuf,
    /// Length of both files in bytes
    pub size: u64,
}

/// Incremental duplicate classifier.
///
/// Files are stored once in visit order and referred to by index everywhere
/// else, so the size buckets, fingerprint map and result lists stay cheap.
#[derive(Debug)]
pub struct Classifier {
    hasher: Hasher,
    /// Every classified file, in visit order.
    files: Vec<PathBuf>,
    /// SizeSet: lengths seen so far.
    sizes: HashSet<u64>,
    /// Visit log: classified files per length, in visit order.
    by_size: HashMap<u64, Vec<usize>>,
    /// HashSet: fingerprint to the earliest file known to carry it.
    fingerprints: HashMap<Fingerprint, usize>,
    /// Fingerprints already computed, so no file is read twice.
    known: HashMap<usize, Fingerprint>,
    /// Files whose fingerprint could not be computed.
    excluded: HashSet<usize>,
    size_duplicates: Vec<usize>,
    hash_duplicates: Vec<(usize, usize, u64)>,
    /// Fast-path files in visit order; demoted ones are filtered on read.
    first_of_size: Vec<(u64, usize)>,
    errors: Vec<HashError>,
    skipped: usize,
}

impl Classifier {
    /// Create an empty classifier.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            hasher: Hasher::new(config.algorithm, config.window),
            files: Vec::new(),
            sizes: HashSet::new(),
            by_size: HashMap::new(),
            fingerprints: HashMap::new(),
            known: HashMap::new(),
            excluded: HashSet::new(),
            size_duplicates: Vec::new(),
            hash_duplicates: Vec::new(),
            first_of_size: Vec::new(),
            errors: Vec::new(),
            skipped: 0,
        }
    }

    /// Classify one visited file.
    ///
    /// Non-regular and unreadable files are skipped without touching any
    /// state other than the skip counter. A fingerprint failure is logged,
    /// recorded in [`errors`](Self::errors) and the file is excluded from
    /// later verification; classification continues with the next file.
    pub fn classify(&mut self, file: VisitedFile) -> Classification {
        if !file.is_classifiable() {
            log::trace!("Skipping non-classifiable entry: {}", file.path.display());
            self.skipped += 1;
            return Classification::Skipped;
        }

        let size = file.size;
        let idx = self.files.len();
        self.files.push(file.path);
        self.by_size.entry(size).or_default().push(idx);

        if self.sizes.insert(size) {
            log::trace!("Unique size {} for {}", size, self.files[idx].display());
            self.first_of_size.push((size, idx));
            return Classification::Unique;
        }

        self.size_duplicates.push(idx);
        log::trace!("Size collision at {} bytes: {}", size, self.files[idx].display());

        // Empty files cannot be hashed; equal length means equal content.
        if size == 0 {
            let original = self.by_size[&0][0];
            return self.record_duplicate(idx, original, size);
        }

        let fingerprint = match self.fingerprint_of(idx, size) {
            Ok(fp) => fp,
            Err(e) => return self.record_failure(idx, e),
        };

        match self.fingerprints.entry(fingerprint.clone()) {
            Entry::Occupied(entry) => {
                let original = *entry.get();
                self.record_duplicate(idx, original, size)
            }
            Entry::Vacant(entry) => {
                entry.insert(idx);
                match self.verify(idx, size, &fingerprint) {
                    Some(original) => self.record_duplicate(idx, original, size),
                    None => Classification::SizeCollision,
                }
            }
        }
    }

    /// Fingerprint earlier files of the same length that were never hashed
    /// and look for one matching `fingerprint`.
    ///
    /// Every fingerprint computed here is added to the fingerprint map so
    /// later files can match it directly.
    fn verify(&mut self, idx: usize, size: u64, fingerprint: &Fingerprint) -> Option<usize> {
        let earlier: Vec<usize> = self
            .by_size
            .get(&size)
            .map(|group| {
                group
                    .iter()
                    .copied()
                    .filter(|&i| i != idx && !self.excluded.contains(&i))
                    .collect()
            })
            .unwrap_or_default();

        for other in earlier {
            let other_fp = match self.fingerprint_of(other, size) {
                Ok(fp) => fp,
                Err(e) => {
                    log::warn!("Verification hash failed: {}", e);
                    self.excluded.insert(other);
                    self.errors.push(e);
                    continue;
                }
            };

            if other_fp == *fingerprint {
                // The earlier file owns the fingerprint from now on.
                self.fingerprints.insert(other_fp, other);
                return Some(other);
            }
            self.fingerprints.entry(other_fp).or_insert(other);
        }

        None
    }

    /// Fingerprint a file at most once.
    fn fingerprint_of(&mut self, idx: usize, size: u64) -> Result<Fingerprint, HashError> {
        if let Some(fp) = self.known.get(&idx) {
            return Ok(fp.clone());
        }
        let fp = self.hasher.fingerprint(&self.files[idx], size)?;
        self.known.insert(idx, fp.clone());
        Ok(fp)
    }

    fn record_duplicate(&mut self, idx: usize, original: usize, size: u64) -> Classification {
        log::debug!(
            "Duplicate: {} matches {}",
            self.files[idx].display(),
            self.files[original].display()
        );
        self.hash_duplicates.push((idx, original, size));
        Classification::Duplicate {
            original: self.files[original].clone(),
        }
    }

    fn record_failure(&mut self, idx: usize, error: HashError) -> Classification {
        log::warn!("Failed to hash {}: {}", self.files[idx].display(), error);
        self.excluded.insert(idx);
        self.errors.push(error);
        Classification::Failed
    }

    /// Number of files that reached a verdict other than [`Classification::Skipped`].
    #[must_use]
    pub fn classified_count(&self) -> usize {
        self.files.len()
    }

    /// Number of files skipped as non-regular or unreadable.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// SizeSet: every length seen so far.
    #[must_use]
    pub fn sizes(&self) -> &HashSet<u64> {
        &self.sizes
    }

    /// Number of distinct fingerprints in the fingerprint map.
    #[must_use]
    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }

    /// Whether a fingerprint has been recorded.
    #[must_use]
    pub fn contains_fingerprint(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprints.contains_key(fingerprint)
    }

    /// Files whose length matched an earlier file, in visit order.
    #[must_use]
    pub fn size_duplicates(&self) -> Vec<&Path> {
        self.size_duplicates
            .iter()
            .map(|&i| self.files[i].as_path())
            .collect()
    }

    /// Confirmed duplicates, in the order they were found.
    #[must_use]
    pub fn hash_duplicates(&self) -> Vec<HashDuplicate> {
        self.hash_duplicates
            .iter()
            .map(|&(idx, original, size)| HashDuplicate {
                path: self.files[idx].clone(),
                original: self.files[original].clone(),
                size,
            })
            .collect()
    }

    /// Files whose length no other classified file shares, in visit order.
    #[must_use]
    pub fn unique_files(&self) -> Vec<&Path> {
        self.first_of_size
            .iter()
            .filter(|(size, _)| self.by_size.get(size).is_some_and(|g| g.len() == 1))
            .map(|&(_, i)| self.files[i].as_path())
            .collect()
    }

    /// Every classified file that is not a confirmed later copy, in visit order.
    #[must_use]
    pub fn retained_files(&self) -> Vec<&Path> {
        let copies: HashSet<usize> = self.hash_duplicates.iter().map(|&(i, _, _)| i).collect();
        self.files
            .iter()
            .enumerate()
            .filter(|(i, _)| !copies.contains(i))
            .map(|(_, p)| p.as_path())
            .collect()
    }

    /// Fingerprint failures recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[HashError] {
        &self.errors
    }

    /// I/O counters of the underlying hasher.
    #[must_use]
    pub fn io_counters(&self) -> IoCounters {
        self.hasher.counters()
    }

    /// Consume the classifier and hand back its result lists.
    #[must_use]
    pub fn finish(self) -> ClassifierOutcome {
        ClassifierOutcome {
            size_duplicates: self.size_duplicates().into_iter().map(Path::to_path_buf).collect(),
            hash_duplicates: self.hash_duplicates(),
            unique: self.unique_files().into_iter().map(Path::to_path_buf).collect(),
            retained: self.retained_files().into_iter().map(Path::to_path_buf).collect(),
            classified: self.files.len(),
            skipped: self.skipped,
            fingerprints: self.fingerprints.len(),
            io: self.hasher.counters(),
            errors: self.errors,
        }
    }
}

/// Owned results of a finished classification pass.
#[derive(Debug)]
pub struct ClassifierOutcome {
    /// SizeDuplicateList
    pub size_duplicates: Vec<PathBuf>,
    /// HashDuplicateList
    pub hash_duplicates: Vec<HashDuplicate>,
    /// UniqueFileSet
    pub unique: Vec<PathBuf>,
    /// Classified files minus confirmed later copies
    pub retained: Vec<PathBuf>,
    /// Files that were classified
    pub classified: usize,
    /// Files skipped as non-regular or unreadable
    pub skipped: usize,
    /// Distinct fingerprints recorded
    pub fingerprints: usize,
    /// Hashing I/O
    pub io: IoCounters,
    /// Fingerprint failures
    pub errors: Vec<HashError>,
}
