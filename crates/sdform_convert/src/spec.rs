//! Document formats, conversion options, results and errors.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::conf::{C_BIN_RENDERER, C_BIN_SOFFICE, DUR_CONVERT_TIMEOUT};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumDocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
    /// Standalone HTML page.
    Html,
}

impl EnumDocumentFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Html => "html",
        }
    }

    /// Prefix used for output directories and archives (`PDF`, `Word`, `HTML`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word",
            Self::Html => "HTML",
        }
    }
}

impl fmt::Display for EnumDocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// External tool settings shared by the default converter chains.
#[derive(Debug, Clone)]
pub struct SpecConvertOptions {
    /// Office suite binary name or path.
    pub bin_soffice: String,
    /// HTML to PDF renderer binary; `None` keeps the `.html` output.
    pub bin_renderer: Option<String>,
    /// Upper bound for one external tool run.
    pub timeout: Duration,
}

impl Default for SpecConvertOptions {
    fn default() -> Self {
        Self {
            bin_soffice: C_BIN_SOFFICE.to_string(),
            bin_renderer: Some(C_BIN_RENDERER.to_string()),
            timeout: DUR_CONVERT_TIMEOUT,
        }
    }
}

/// One produced document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecConverted {
    /// Source workbook.
    pub path_file_in: PathBuf,
    /// Produced document.
    pub path_file_out: PathBuf,
    /// Name of the converter that succeeded.
    pub converter: String,
}

/// One converter's failure inside a chain attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecConvertFailure {
    /// Converter name.
    pub converter: String,
    /// Failure text.
    pub message: String,
}

/// Single-converter failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The tool is missing or could not be started.
    #[error("{tool} unavailable: {message}")]
    Unavailable {
        /// Tool or binary name.
        tool: String,
        /// Reason.
        message: String,
    },
    /// The tool ran but produced no usable output, failed or timed out.
    #[error("conversion of {} failed: {message}", path.display())]
    Failed {
        /// Input file.
        path: PathBuf,
        /// Reason.
        message: String,
    },
    /// Local file access failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Every converter in a chain failed for one input.
#[derive(Debug, Error)]
#[error("all converters failed for {}: {}", path.display(), derive_failures_text(.failures))]
pub struct ConvertChainError {
    /// Input file.
    pub path: PathBuf,
    /// Per-converter failures in attempt order.
    pub failures: Vec<SpecConvertFailure>,
}

fn derive_failures_text(failures: &[SpecConvertFailure]) -> String {
    if failures.is_empty() {
        return "no converter configured".to_string();
    }
    failures
        .iter()
        .map(|f| format!("[{}] {}", f.converter, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
