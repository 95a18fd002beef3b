//! Newest run directory to PDF documents and a zip archive.

use std::process::ExitCode;

use sdform_cli::{SpecExportOptions, SpecRunContext, print_banner, print_export_report, run_export};
use sdform_convert::{ConverterChain, EnumDocumentFormat};

fn main() -> ExitCode {
    sdform_log::init_logging();
    print_banner("SECURITY DEPOSIT REFUND - PDF EXPORT");

    let spec_options = SpecExportOptions::for_format(EnumDocumentFormat::Pdf);
    let chain = ConverterChain::default_pdf(&spec_options.spec_convert);
    match run_export(&spec_options, &chain, &SpecRunContext::now()) {
        Ok(report) => {
            print_export_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("✗ {e}");
            ExitCode::from(1)
        }
    }
}
