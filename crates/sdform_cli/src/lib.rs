//! `sdform_cli` v1:
//! Pipeline drivers behind the `sdform_*` binaries.
//!
//! - `generate` : master sheet to batched blank-form workbooks
//! - `export`   : newest run directory to PDF/Word documents and a zip archive
//! - `spec`     : options/run context/reports/errors

pub mod export;
pub mod generate;
pub mod spec;

pub use export::run_export;
pub use generate::run_generate;
pub use spec::{
    C_FILE_PREFIX, PipelineError, ReportExport, ReportGenerate, SpecExportOptions,
    SpecGenerateOptions, SpecRunContext,
};

/// Width of the banner rule printed by the binaries.
pub const N_BANNER_WIDTH: usize = 80;

/// Print the per-document lines and the summary of an export run.
pub fn print_export_report(report: &ReportExport) {
    println!("Run directory: {}", report.path_dir_run.display());
    for spec_converted in &report.report_convert.converted {
        println!(
            "  ✓ {} [{}]",
            spec_converted.path_file_out.display(),
            spec_converted.converter
        );
    }
    for err in &report.report_convert.errors {
        println!("  ✗ {err}");
    }
    println!("\n{}", report.report_convert);
    println!("✓ Documents: {}", report.path_dir_out.display());
    println!("✓ Archive: {}", report.report_archive.path_file_zip.display());
}

/// Print a titled banner framed by `=` rules.
pub fn print_banner(title: &str) {
    let c_rule = "=".repeat(N_BANNER_WIDTH);
    println!("{c_rule}");
    println!("{title}");
    println!("{c_rule}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdform_convert::{ReportConvert, SpecConverted};
    use sdform_io_fs::ReportArchive;
    use std::path::PathBuf;

    #[test]
    fn print_export_report_accepts_partial_results() {
        let report = ReportExport {
            path_dir_run: PathBuf::from("BLANK_SD_SHEETS_01-02-2025_10-00"),
            path_dir_out: PathBuf::from("PDF_Output_BLANK_SD_SHEETS_01-02-2025_10-00"),
            report_convert: ReportConvert {
                cnt_scanned: 1,
                converted: vec![SpecConverted {
                    path_file_in: PathBuf::from("B_Batch_01_2024.xlsx"),
                    path_file_out: PathBuf::from("B_Batch_01_2024.pdf"),
                    converter: "soffice-pdf".to_string(),
                }],
                ..Default::default()
            },
            report_archive: ReportArchive::default(),
        };
        print_export_report(&report);
        assert_eq!(report.report_convert.converted_count(), 1);
    }
}
