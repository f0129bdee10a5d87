//! File actions module.
//!
//! Scan results can be copied into a destination tree that mirrors the
//! layout below the scan root:
//!
//! ```no_run
//! use dupescan::actions::copy::copy_file;
//! use std::path::Path;
//!
//! let result = copy_file(
//!     Path::new("/music/album/track.flac"),
//!     Path::new("/music"),
//!     Path::new("/backup"),
//! );
//! ```

pub mod copy;

pub use copy::{copy_batch, copy_file, destination_for, BatchCopyResult, CopyError, CopyResult};
