//! Filesystem naming constants.

/// Master workbook probe locations, in probe order.
pub const TUP_INPUT_CANDIDATES: [&str; 4] = [
    "work_order_master.xlsx",
    "../work_order_master.xlsx",
    "BLANK SD SHEETS/work_order_master.xlsx",
    "../../work_order_master.xlsx",
];

/// Default run directory prefix.
pub const C_RUN_DIR_PREFIX: &str = "BLANK_SD_SHEETS";
/// Run directory timestamp, e.g. `18-10-2026_14-05`.
pub const C_RUN_DIR_TS_FORMAT: &str = "%d-%m-%Y_%H-%M";
/// Archive timestamp, e.g. `18102026_1405`.
pub const C_ARCHIVE_TS_FORMAT: &str = "%d%m%Y_%H%M";

/// Roots searched for run directories when exporting.
pub const TUP_RUN_DIR_ROOTS: [&str; 2] = [".", "Output_Record/Excel_Files"];

/// Root that export results are filed under.
pub const C_RECORD_DIR: &str = "Output_Record";
/// Record subdirectory suffix for document folders, e.g. `PDF_Files`.
pub const C_RECORD_FILES_SUFFIX: &str = "Files";
/// Record subdirectory suffix for archives, e.g. `PDF_Archives`.
pub const C_RECORD_ARCHIVES_SUFFIX: &str = "Archives";

/// Workbook file pattern.
pub const C_PATTERN_WORKBOOK: &str = "*.xlsx";
/// Office lock file pattern.
pub const C_PATTERN_LOCK_FILE: &str = "~$*";
