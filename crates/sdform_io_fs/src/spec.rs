//! Discovery/listing options and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{C_PATTERN_LOCK_FILE, C_PATTERN_WORKBOOK};

////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// File-name filters used when listing workbooks in a run directory.
#[derive(Debug, Clone)]
pub struct SpecListOptions {
    /// Glob patterns a file basename must match.
    pub patterns_include_files: Vec<String>,
    /// Glob patterns that drop a file basename.
    pub patterns_exclude_files: Vec<String>,
}

impl Default for SpecListOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: vec![C_PATTERN_WORKBOOK.to_string()],
            patterns_exclude_files: vec![C_PATTERN_LOCK_FILE.to_string()],
        }
    }
}

/// One path-scoped failure recorded in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFsError {
    /// Failed path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// "Top-level call failed" errors for discovery, run directories and archives.
#[derive(Debug, Error)]
pub enum FsError {
    /// None of the candidate input paths exists.
    #[error("Input file not found. Probed: {}", derive_paths_text(.candidates))]
    InputNotFound {
        /// Every probed path, in probe order.
        candidates: Vec<PathBuf>,
    },
    /// No run directory with at least one workbook was found.
    #[error("No {prefix}_* directory with workbooks found under: {}", derive_paths_text(.roots))]
    RunDirNotFound {
        /// Searched roots.
        roots: Vec<PathBuf>,
        /// Run directory name prefix.
        prefix: String,
    },
    /// Invalid include/exclude glob.
    #[error("Invalid pattern in include/exclude: {0}")]
    InvalidPattern(String),
    /// Directory could not be created or read.
    #[error("Failed to access directory {}: {message}", path.display())]
    DirectoryFailed {
        /// Directory path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Archive could not be created or finalized.
    #[error("Failed to write archive {}: {message}", path.display())]
    ArchiveFailed {
        /// Archive path.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },
}

fn derive_paths_text(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
