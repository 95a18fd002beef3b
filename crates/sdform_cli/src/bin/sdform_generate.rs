//! Master sheet to batched blank-form workbooks.

use std::process::ExitCode;

use sdform_cli::{SpecGenerateOptions, SpecRunContext, print_banner, run_generate};

fn main() -> ExitCode {
    sdform_log::init_logging();
    print_banner("SECURITY DEPOSIT REFUND - BLANK FORM GENERATOR");

    let spec_options = SpecGenerateOptions::default();
    match run_generate(&spec_options, &SpecRunContext::now()) {
        Ok(report) => {
            println!("Input file: {}", report.path_file_input.display());
            println!("Work orders: {}", report.cnt_records);
            for spec_report in &report.files {
                println!(
                    "  ✓ {} ({} sheets)",
                    spec_report.path_file_out.display(),
                    spec_report.sheets.len()
                );
                for c_warning in &spec_report.warnings {
                    println!("    ! {c_warning}");
                }
            }
            println!(
                "\n✓ {} workbook(s) written to {}",
                report.files.len(),
                report.path_dir_run.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("✗ {e}");
            ExitCode::from(1)
        }
    }
}
