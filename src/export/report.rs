//! Export results and warnings handed back to the host.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::encoder::write_file;
use crate::util::Result;

/// Non-fatal condition met during an export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportWarning {
    /// Clip name had no `.` suffix and was stored whole.
    NamingFallback { source: String, stored: String },
    /// Vertices referenced by no polygon; their UV was written as (0, 0).
    UnreferencedVertices { count: usize, first: usize },
    /// A batch job was skipped.
    Skipped { name: String, reason: String },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamingFallback { source, stored } => write!(
                f,
                "Action {} has no second part. Will be named in file as \"{}\".",
                source, stored
            ),
            Self::UnreferencedVertices { count, first } => write!(
                f,
                "{} vertices (first: {}) belong to no polygon; UV set to (0, 0)",
                count, first
            ),
            Self::Skipped { name, reason } => write!(f, "Skipped {}: {}", name, reason),
        }
    }
}

/// A fully encoded file that has not been written yet.
#[derive(Clone, Debug, Default)]
pub struct EncodedFile {
    pub bytes: Vec<u8>,
    pub warnings: Vec<ExportWarning>,
}

impl EncodedFile {
    /// Write the payload to `directory/file_name`.
    pub fn write_to(self, directory: &Path, file_name: &str) -> Result<ExportReport> {
        let start = Instant::now();
        let path = write_file(directory, file_name, &self.bytes)?;
        tracing::debug!(
            path = %path.display(),
            bytes = self.bytes.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "file written"
        );
        Ok(ExportReport {
            path,
            bytes_written: self.bytes.len() as u64,
            warnings: self.warnings,
        })
    }
}

/// Result of one written file.
#[derive(Clone, Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes_written: u64,
    pub warnings: Vec<ExportWarning>,
}

impl ExportReport {
    /// Check if the export raised any warning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
