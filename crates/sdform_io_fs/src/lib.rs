//! `sdform_io_fs` v1:
//! Filesystem side of the form pipeline.
//!
//! - `conf`     : probe paths and naming formats
//! - `discover` : input discovery, run directories, workbook listing, filing
//! - `archive`  : zip archiving of converted documents
//! - `spec`     : enums/options/errors
//! - `report`   : archive report model
//! - `util`     : shared helper functions

pub mod archive;
pub mod conf;
pub mod discover;
pub mod report;
pub mod spec;
mod util;

pub use archive::create_zip_archive;
pub use discover::{
    create_run_dir, discover_input_file, find_latest_run_dir, list_workbooks, move_into_dir,
};
pub use report::ReportArchive;
pub use spec::{FsError, SpecFsError, SpecListOptions};
pub use util::{calculate_worker_limit, derive_archive_name, derive_run_dir_name};
