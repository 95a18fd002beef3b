//! `sdform_io_xlsx` v1:
//! Security-deposit refund form kernel.
//!
//! - `conf`   : constants, the form template table and default presets
//! - `spec`   : records/pages/reports/errors
//! - `util`   : pure helper functions (labels, sheet names, batches)
//! - `layout` : form row map, page rendering and page read-back
//! - `loader` : calamine readers for the master sheet and generated workbooks
//! - `writer` : rust_xlsxwriter form workbook writer
pub mod conf;
pub mod layout;
pub mod loader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_WORK_ORDERS, N_BATCH_SIZE_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, SPEC_PRINT_SETUP,
    TUP_EXCEL_ILLEGAL,
};
pub use layout::{SPEC_FORM_LAYOUT, SpecFormLayout, parse_page, render_page};
pub use loader::{load_work_orders, read_form_pages};
pub use spec::{
    FormError, SpecBatch, SpecCellFormat, SpecFormField, SpecFormPage, SpecWorkOrderRecord,
    SpecXlsxReport,
};
pub use util::{
    derive_agreement_year, derive_batch_file_name, derive_label, derive_unique_sheet_name,
    split_batches,
};
pub use writer::{XlsxFormWriter, write_batch};
