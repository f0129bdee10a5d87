//! Plain text output: one absolute path per line.
//!
//! This is the default format and the one meant for pipes:
//!
//! ```bash
//! dupescan scan ~/Downloads | xargs -d '\n' rm --
//! ```

use std::io::{self, Write};
use std::path::Path;

/// Newline-separated path list.
#[derive(Debug, Clone)]
pub struct TextOutput<'a> {
    paths: Vec<&'a Path>,
}

impl<'a> TextOutput<'a> {
    /// Wrap a list of paths for printing.
    #[must_use]
    pub fn new(paths: Vec<&'a Path>) -> Self {
        Self { paths }
    }

    /// Number of lines that will be written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether there is nothing to print.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Write every path followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for path in &self.paths {
            writeln!(writer, "{}", path.display())?;
        }
        writer.flush()
    }
}
