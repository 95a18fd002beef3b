//! `sdform_convert` v1:
//! Workbook to document conversion.
//!
//! - `chain`   : `Converter` trait, fallback chain, per-file runs
//! - `soffice` : office suite command-line strategy
//! - `docx`    : in-process DOCX strategy
//! - `html`    : HTML strategy with optional PDF renderer
//! - `spec`    : formats/options/results/errors
//! - `report`  : conversion run report
//! - `conf`    : tool names and limits

pub mod chain;
pub mod conf;
pub mod docx;
pub mod html;
mod process;
pub mod report;
pub mod soffice;
pub mod spec;

pub use chain::{Converter, ConverterChain, convert_workbooks};
pub use docx::DocxConverter;
pub use html::HtmlConverter;
pub use report::ReportConvert;
pub use soffice::SofficeConverter;
pub use spec::{
    ConvertChainError, ConvertError, EnumDocumentFormat, SpecConvertFailure, SpecConvertOptions,
    SpecConverted,
};
