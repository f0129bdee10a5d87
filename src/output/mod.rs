//! Output formatters for scan results.
//!
//! This module provides different output formats for scan results:
//! - Plain text, one absolute path per line, for pipes
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, ReportMode};
//! use dupescan::error::ExitCode;
//! use dupescan::output::{JsonOutput, TextOutput};
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! TextOutput::new(report.paths(ReportMode::Duplicates))
//!     .write_to(&mut std::io::stdout())
//!     .unwrap();
//!
//! let json = JsonOutput::new(&report, ReportMode::Unique, ExitCode::Success);
//! println!("{}", json.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonSearchOutput};
pub use text::TextOutput;
