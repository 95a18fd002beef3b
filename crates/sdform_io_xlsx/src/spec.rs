//! Shared work-order, form-page and XLSX specification models.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{EnumFieldLayout, SpecPrintSetup};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; every `None` falls back to the workbook default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkOrderSpecification

/// One row of the work-order master sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecWorkOrderRecord {
    /// Contractor name as written in the source, e.g. `M/s Sharma Constructions`.
    pub contractor_name: String,
    /// Agreement number, e.g. `123/2023-24`.
    pub agreement_number: String,
    /// Name of work.
    pub work_name: String,
    /// Every other source column keyed by its header text.
    pub extras: BTreeMap<String, String>,
}

impl SpecWorkOrderRecord {
    /// Build a record from the three core columns with no extras.
    pub fn new(
        contractor_name: impl Into<String>,
        agreement_number: impl Into<String>,
        work_name: impl Into<String>,
    ) -> Self {
        Self {
            contractor_name: contractor_name.into(),
            agreement_number: agreement_number.into(),
            work_name: work_name.into(),
            extras: BTreeMap::new(),
        }
    }
}

/// Order-preserving slice of the source records written as one workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecBatch {
    /// Records in source order.
    pub records: Vec<SpecWorkOrderRecord>,
    /// 1-based batch sequence number.
    pub batch_number: usize,
    /// Maximum number of records per batch.
    pub size_max: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormPageSpecification

/// One labeled field of a form page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFormField {
    /// 1-based ordinal printed in the label.
    pub n_index: usize,
    /// Printed label.
    pub label: String,
    /// Entered value; blank on generated pages.
    pub value: String,
    /// Cell arrangement.
    pub rule_layout: EnumFieldLayout,
    /// Zero-based sheet row.
    pub n_row: u32,
}

/// Rendered refund-order form for one work order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecFormPage {
    /// Sheet/page label derived from contractor and agreement number.
    pub page_title: String,
    /// The 17 standard fields in print order.
    pub fields: Vec<SpecFormField>,
    /// Deduction table body, four columns per row; the last row starts with `Total:`.
    pub deduction_rows: Vec<[String; 4]>,
    /// Print layout for the page.
    pub print_setup: SpecPrintSetup,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-workbook write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Output file.
    pub path_file_out: PathBuf,
    /// Sheet names actually written, in order.
    pub sheets: Vec<String>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures raised while loading work orders or writing form workbooks.
#[derive(Debug, Error)]
pub enum FormError {
    /// Input workbook path does not exist.
    #[error("Input file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Workbook could not be opened or the sheet is missing/unparseable.
    #[error("Cannot read sheet {sheet_name:?} from {}: {message} (available sheets: {sheets_available:?})", path.display())]
    SheetReadError {
        /// Workbook path.
        path: PathBuf,
        /// Requested sheet.
        sheet_name: String,
        /// Sheets present in the workbook, empty when it could not be opened.
        sheets_available: Vec<String>,
        /// Underlying reader error text.
        message: String,
    },
    /// Batch size below one.
    #[error("Batch size must be >= 1, got {0}.")]
    InvalidBatchSize(usize),
    /// Workbook persistence failed.
    #[error("Failed to write {}: {message}", path.display())]
    WriteError {
        /// Output path.
        path: PathBuf,
        /// Underlying writer error text.
        message: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
