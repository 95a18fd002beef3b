//! Converter defaults.

use std::time::Duration;

/// Office suite command-line binary.
pub const C_BIN_SOFFICE: &str = "soffice";
/// HTML to PDF renderer binary.
pub const C_BIN_RENDERER: &str = "weasyprint";
/// Upper bound for one external conversion.
pub const DUR_CONVERT_TIMEOUT: Duration = Duration::from_secs(300);
/// Poll interval while waiting on an external converter.
pub const DUR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// DOCX page margin in twentieths of a point (0.5 inch).
pub const N_DOCX_MARGIN_TWIPS: i32 = 720;
/// DOCX table grid widths in twips for sheet columns `A..=E`.
pub const TUP_DOCX_GRID_TWIPS: [usize; 5] = [3000, 500, 2500, 2500, 2500];
