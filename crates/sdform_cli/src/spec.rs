//! Pipeline options, run context, reports and errors.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use sdform_convert::{EnumDocumentFormat, ReportConvert, SpecConvertOptions};
use sdform_io_fs::conf::{
    C_RECORD_DIR, C_RUN_DIR_PREFIX, TUP_INPUT_CANDIDATES, TUP_RUN_DIR_ROOTS,
};
use sdform_io_fs::{FsError, ReportArchive, SpecListOptions};
use sdform_io_xlsx::conf::{C_SHEET_WORK_ORDERS, N_BATCH_SIZE_DEFAULT};
use sdform_io_xlsx::{FormError, SpecXlsxReport};
use thiserror::Error;

/// Default output workbook prefix.
pub const C_FILE_PREFIX: &str = "Blank_Security_Refund";

////////////////////////////////////////////////////////////////////////////////
// #region RunContext

/// Run timestamp and working root shared by every stage of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunContext {
    /// Timestamp used in directory and archive names.
    pub ts: NaiveDateTime,
    /// Root that relative inputs and outputs resolve against.
    pub path_dir_root: PathBuf,
}

impl SpecRunContext {
    /// Context for the current local time rooted at the working directory.
    pub fn now() -> Self {
        Self {
            ts: Local::now().naive_local(),
            path_dir_root: PathBuf::from("."),
        }
    }

    /// Resolve `path` against [`Self::path_dir_root`] unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.path_dir_root.join(path)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for `run_generate`.
#[derive(Debug, Clone)]
pub struct SpecGenerateOptions {
    /// Master workbook probe paths, in order.
    pub input_candidates: Vec<PathBuf>,
    /// Source sheet name.
    pub sheet_name: String,
    /// Work orders per output workbook.
    pub batch_size: usize,
    /// Output workbook name prefix.
    pub file_prefix: String,
    /// Run directory name prefix.
    pub dir_prefix: String,
    /// Maximum worker threads for the write stage.
    pub num_workers_max: Option<usize>,
}

impl Default for SpecGenerateOptions {
    fn default() -> Self {
        Self {
            input_candidates: TUP_INPUT_CANDIDATES.iter().map(PathBuf::from).collect(),
            sheet_name: C_SHEET_WORK_ORDERS.to_string(),
            batch_size: N_BATCH_SIZE_DEFAULT,
            file_prefix: C_FILE_PREFIX.to_string(),
            dir_prefix: C_RUN_DIR_PREFIX.to_string(),
            num_workers_max: None,
        }
    }
}

/// Input options for `run_export`.
#[derive(Debug, Clone)]
pub struct SpecExportOptions {
    /// Target document format.
    pub format: EnumDocumentFormat,
    /// Roots searched for run directories.
    pub search_roots: Vec<PathBuf>,
    /// Run directory name prefix.
    pub dir_prefix: String,
    /// Workbook listing filters.
    pub spec_list: SpecListOptions,
    /// External tool settings.
    pub spec_convert: SpecConvertOptions,
    /// Record root the documents and archive are filed under; `None` leaves
    /// them in the run root.
    pub path_dir_record: Option<PathBuf>,
}

impl SpecExportOptions {
    /// Defaults for `format`.
    pub fn for_format(format: EnumDocumentFormat) -> Self {
        Self {
            format,
            search_roots: TUP_RUN_DIR_ROOTS.iter().map(PathBuf::from).collect(),
            dir_prefix: C_RUN_DIR_PREFIX.to_string(),
            spec_list: SpecListOptions::default(),
            spec_convert: SpecConvertOptions::default(),
            path_dir_record: Some(PathBuf::from(C_RECORD_DIR)),
        }
    }
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self::for_format(EnumDocumentFormat::Pdf)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reports

/// Outcome of one generation run.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerate {
    /// Resolved master workbook.
    pub path_file_input: PathBuf,
    /// Created run directory.
    pub path_dir_run: PathBuf,
    /// Number of work orders read.
    pub cnt_records: u64,
    /// Year used in file names.
    pub year: u32,
    /// Per-workbook reports in batch order.
    pub files: Vec<SpecXlsxReport>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportGenerate {
    /// Warnings of the run and of every written workbook.
    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.files.iter().map(|f| f.warnings.len()).sum::<usize>()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} records={} batches={} year={} warnings={}",
            self.cnt_records,
            self.files.len(),
            self.year,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportGenerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[GENERATE]"))
    }
}

/// Outcome of one export run.
#[derive(Debug)]
pub struct ReportExport {
    /// Run directory that was exported.
    pub path_dir_run: PathBuf,
    /// Directory holding the produced documents.
    pub path_dir_out: PathBuf,
    /// Per-workbook conversion outcome.
    pub report_convert: ReportConvert,
    /// Archive of the produced documents.
    pub report_archive: ReportArchive,
}

impl fmt::Display for ReportExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.report_convert, self.report_archive)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Run-level failures; any of them ends the process with exit code 1.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Discovery, directory or archive failure.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// Loading or writing workbooks failed.
    #[error(transparent)]
    Form(#[from] FormError),
    /// The source sheet holds no work orders.
    #[error("No work orders found in {}", .0.display())]
    NoRecords(PathBuf),
    /// The run directory holds no workbooks.
    #[error("No workbooks found in {}", .0.display())]
    NoWorkbooks(PathBuf),
    /// Some strategies of the chain produce another document format.
    #[error("Converters {converters:?} do not produce {format} documents")]
    FormatMismatch {
        /// Requested format label.
        format: String,
        /// Offending strategy names.
        converters: Vec<String>,
    },
    /// Every workbook failed to convert.
    #[error("No documents were created ({cnt_errors} workbook(s) failed)")]
    NoDocuments {
        /// Number of failed workbooks.
        cnt_errors: usize,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
