//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Streaming classification (size bucket, windowed fingerprint, verification)
//! - Orchestrating a single walk over a tree
//! - Scan reports and summary statistics

pub mod classifier;
pub mod finder;
pub mod report;

pub use classifier::{
    Classification, Classifier, ClassifierConfig, ClassifierOutcome, HashDuplicate,
};
pub use finder::{CopySearch, DuplicateFinder, FinderConfig, FinderError};
pub use report::{ReportMode, ScanReport, ScanSummary};
