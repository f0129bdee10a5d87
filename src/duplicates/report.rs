//! Scan results and summary statistics.
//!
//! A [`ScanReport`] is the complete product of one traversal: the four result
//! collections, the visit counters and the I/O spent on hashing. Which list
//! ends up on stdout is chosen with a [`ReportMode`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::HashDuplicate;
use crate::scanner::{HashError, ScanError};

/// Which result collection to print.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Later copies whose fingerprint matched an earlier file
    #[default]
    Duplicates,
    /// Every size collision followed by every confirmed copy, first occurrence kept
    Candidates,
    /// Files whose length no other file shares
    Unique,
    /// Every classified file that is not a confirmed later copy
    Retained,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicates => write!(f, "duplicates"),
            Self::Candidates => write!(f, "candidates"),
            Self::Unique => write!(f, "unique"),
            Self::Retained => write!(f, "retained"),
        }
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Non-directory entries visited (fileCount)
    pub files: usize,
    /// Directories entered, root included (directoryCount)
    pub directories: usize,
    /// Entries that could not be visited at all
    pub visit_failures: usize,
    /// Files that went through classification
    pub classified: usize,
    /// Symlinks, special files and unreadable files
    pub skipped: usize,
    /// Distinct file lengths seen
    pub distinct_sizes: usize,
    /// Size of the UniqueFileSet
    pub unique_files: usize,
    /// Size of the SizeDuplicateList
    pub size_duplicates: usize,
    /// Size of the HashDuplicateList
    pub hash_duplicates: usize,
    /// Files that could not be fingerprinted
    pub hash_failures: usize,
    /// Distinct fingerprints recorded
    pub fingerprints: usize,
    /// Fingerprint computations performed
    pub fingerprints_computed: u64,
    /// Bytes read while fingerprinting
    pub bytes_read: u64,
    /// Bytes held by confirmed later copies
    pub reclaimable_bytes: u64,
    /// Wall-clock time of the scan
    pub duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize(self.reclaimable_bytes).to_string()
    }

    /// Format hashed bytes as a human-readable string.
    #[must_use]
    pub fn bytes_read_display(&self) -> String {
        bytesize::ByteSize(self.bytes_read).to_string()
    }
}

/// Complete result of one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Absolute root of the traversal
    pub root: PathBuf,
    /// Files whose length matched an earlier file (SizeDuplicateList)
    pub size_duplicates: Vec<PathBuf>,
    /// Confirmed later copies (HashDuplicateList)
    pub hash_duplicates: Vec<HashDuplicate>,
    /// Files whose length no other file shares (UniqueFileSet)
    pub unique: Vec<PathBuf>,
    /// Classified files minus confirmed later copies
    pub retained: Vec<PathBuf>,
    /// Counters and timings
    pub summary: ScanSummary,
    /// Entries the walker could not visit
    pub walk_errors: Vec<ScanError>,
    /// Files that could not be fingerprinted
    pub hash_errors: Vec<HashError>,
}

impl ScanReport {
    /// Paths of confirmed later copies, in discovery order.
    #[must_use]
    pub fn duplicate_paths(&self) -> Vec<&Path> {
        self.hash_duplicates.iter().map(|d| d.path.as_path()).collect()
    }

    /// SizeDuplicateList followed by HashDuplicateList, each path once.
    #[must_use]
    pub fn candidate_paths(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        self.size_duplicates
            .iter()
            .map(PathBuf::as_path)
            .chain(self.hash_duplicates.iter().map(|d| d.path.as_path()))
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// The list selected by `mode`.
    #[must_use]
    pub fn paths(&self, mode: ReportMode) -> Vec<&Path> {
        match mode {
            ReportMode::Duplicates => self.duplicate_paths(),
            ReportMode::Candidates => self.candidate_paths(),
            ReportMode::Unique => self.unique.iter().map(PathBuf::as_path).collect(),
            ReportMode::Retained => self.retained.iter().map(PathBuf::as_path).collect(),
        }
    }

    /// Whether any confirmed duplicate was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.hash_duplicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dup(path: &str, original: &str, size: u64) -> HashDuplicate {
        HashDuplicate {
            path: PathBuf::from(path),
            original: PathBuf::from(original),
            size,
        }
    }

    fn sample_report() -> ScanReport {
        ScanReport {
            root: PathBuf::from("/root"),
            size_duplicates: vec![PathBuf::from("/root/b"), PathBuf::from("/root/c")],
            hash_duplicates: vec![dup("/root/c", "/root/a", 5)],
            unique: vec![PathBuf::from("/root/z")],
            retained: vec![
                PathBuf::from("/root/a"),
                PathBuf::from("/root/b"),
                PathBuf::from("/root/z"),
            ],
            ..ScanReport::default()
        }
    }

    #[test]
    fn test_duplicates_mode() {
        let report = sample_report();
        assert_eq!(report.paths(ReportMode::Duplicates), vec![Path::new("/root/c")]);
        assert!(report.has_duplicates());
    }

    #[test]
    fn test_candidates_mode_keeps_first_occurrence() {
        let report = sample_report();
        assert_eq!(
            report.paths(ReportMode::Candidates),
            vec![Path::new("/root/b"), Path::new("/root/c")]
        );
    }

    #[test]
    fn test_unique_and_retained_modes() {
        let report = sample_report();
        assert_eq!(report.paths(ReportMode::Unique), vec![Path::new("/root/z")]);
        assert_eq!(report.paths(ReportMode::Retained).len(), 3);
    }

    #[test]
    fn test_empty_report() {
        let report = ScanReport::default();
        assert!(report.paths(ReportMode::Candidates).is_empty());
        assert!(!report.has_duplicates());
    }

    #[test]
    fn test_summary_displays() {
        let summary = ScanSummary {
            reclaimable_bytes: 2048,
            bytes_read: 0,
            ..ScanSummary::default()
        };
        assert!(summary.reclaimable_display().contains('2'));
        assert_eq!(summary.bytes_read_display(), "0 B");
    }

    #[test]
    fn test_report_mode_names() {
        assert_eq!(ReportMode::default(), ReportMode::Duplicates);
        assert_eq!(ReportMode::Candidates.to_string(), "candidates");
        assert_eq!(
            serde_json::to_string(&ReportMode::Retained).unwrap(),
            "\"retained\""
        );
    }
}
