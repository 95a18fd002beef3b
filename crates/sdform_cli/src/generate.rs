//! Master sheet to batched blank-form workbooks.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use sdform_io_fs::{calculate_worker_limit, create_run_dir, discover_input_file};
use sdform_io_xlsx::{
    FormError, SpecBatch, SpecFormPage, SpecXlsxReport, derive_agreement_year,
    derive_batch_file_name, load_work_orders, render_page, split_batches, write_batch,
};
use tracing::{info, warn};

use crate::spec::{PipelineError, ReportGenerate, SpecGenerateOptions, SpecRunContext};

/// Load work orders, split them into batches and write one workbook per batch.
///
/// Writing is fail-fast: the first workbook error aborts the run.
pub fn run_generate(
    spec_options: &SpecGenerateOptions,
    spec_ctx: &SpecRunContext,
) -> Result<ReportGenerate, PipelineError> {
    let l_candidates: Vec<PathBuf> = spec_options
        .input_candidates
        .iter()
        .map(|path| spec_ctx.resolve(path))
        .collect();
    let path_file_input = discover_input_file(&l_candidates)?;

    let l_records = load_work_orders(&path_file_input, &spec_options.sheet_name)?;
    let Some(record_first) = l_records.first() else {
        return Err(PipelineError::NoRecords(path_file_input));
    };
    let year = derive_agreement_year(&record_first.agreement_number)
        .unwrap_or_else(|| spec_ctx.ts.year().unsigned_abs());
    let cnt_records = l_records.len() as u64;

    let l_batches = split_batches(l_records, spec_options.batch_size)?;
    let path_dir_run = create_run_dir(
        &spec_ctx.path_dir_root,
        &spec_options.dir_prefix,
        spec_ctx.ts,
    )?;
    info!(
        records = cnt_records,
        batches = l_batches.len(),
        year,
        dir = %path_dir_run.display(),
        "writing batches"
    );

    let mut report = ReportGenerate {
        path_file_input,
        cnt_records,
        year,
        ..Default::default()
    };
    report.files = write_batches(
        &l_batches,
        &path_dir_run,
        &spec_options.file_prefix,
        year,
        calculate_worker_limit(spec_options.num_workers_max),
        &mut report.warnings,
    )?;
    report.path_dir_run = path_dir_run;

    info!("{report}");
    Ok(report)
}

fn write_batches(
    l_batches: &[SpecBatch],
    path_dir_run: &Path,
    file_prefix: &str,
    year: u32,
    n_workers_max: usize,
    l_warnings: &mut Vec<String>,
) -> Result<Vec<SpecXlsxReport>, FormError> {
    let write_one = |batch: &SpecBatch| {
        let l_pages: Vec<SpecFormPage> = batch.records.iter().map(render_page).collect();
        let path_file_out =
            path_dir_run.join(derive_batch_file_name(file_prefix, batch.batch_number, year, "xlsx"));
        write_batch(&l_pages, &path_file_out)
    };

    if n_workers_max <= 1 || l_batches.len() <= 1 {
        return l_batches.iter().map(write_one).collect();
    }

    let thread_pool = ThreadPoolBuilder::new().num_threads(n_workers_max).build();
    let Ok(thread_pool) = thread_pool else {
        let c_msg = format!(
            "Failed to initialize thread pool (workers={n_workers_max}); fallback to serial write."
        );
        warn!("{c_msg}");
        l_warnings.push(c_msg);
        return l_batches.iter().map(write_one).collect();
    };
    thread_pool.install(|| l_batches.par_iter().map(write_one).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_xlsxwriter::Workbook;
    use sdform_io_xlsx::read_form_pages;

    fn spec_ctx(path_dir_root: &Path) -> SpecRunContext {
        SpecRunContext {
            ts: NaiveDate::from_ymd_opt(2025, 1, 15)
                .and_then(|d| d.and_hms_opt(8, 30, 0))
                .unwrap(),
            path_dir_root: path_dir_root.to_path_buf(),
        }
    }

    fn write_master(path: &Path, l_rows: &[[&str; 3]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Work Orders").unwrap();
        for (n_col, c_header) in ["Name of Contractor", "Agreement No.", "Name of Work"]
            .iter()
            .enumerate()
        {
            worksheet.write_string(0, n_col as u16, *c_header).unwrap();
        }
        for (n_row, row) in l_rows.iter().enumerate() {
            for (n_col, c_text) in row.iter().enumerate() {
                worksheet
                    .write_string(n_row as u32 + 1, n_col as u16, *c_text)
                    .unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn run_generate_writes_numbered_batches() {
        let tmp = tempfile::tempdir().unwrap();
        let l_names: Vec<String> = (0..5).map(|i| format!("M/s Firm{i} Ltd")).collect();
        let l_rows: Vec<[&str; 3]> = l_names
            .iter()
            .map(|name| [name.as_str(), "12/2023-24", "Lighting"])
            .collect();
        write_master(&tmp.path().join("work_order_master.xlsx"), &l_rows);

        let spec_options = SpecGenerateOptions {
            batch_size: 2,
            num_workers_max: Some(2),
            ..Default::default()
        };
        let report = run_generate(&spec_options, &spec_ctx(tmp.path())).unwrap();

        assert_eq!(report.cnt_records, 5);
        assert_eq!(report.year, 2023);
        assert_eq!(report.files.len(), 3);
        assert_eq!(
            report.path_dir_run,
            tmp.path().join("BLANK_SD_SHEETS_15-01-2025_08-30")
        );

        let l_sheet_counts: Vec<usize> = report.files.iter().map(|f| f.sheets.len()).collect();
        assert_eq!(l_sheet_counts, vec![2, 2, 1]);

        let path_last = report.path_dir_run.join("Blank_Security_Refund_Batch_03_2023.xlsx");
        assert_eq!(report.files[2].path_file_out, path_last);
        let l_pages = read_form_pages(&path_last).unwrap();
        assert_eq!(l_pages.len(), 1);
        assert_eq!(l_pages[0].page_title, "Firm4 12");
    }

    #[test]
    fn run_generate_falls_back_to_run_year() {
        let tmp = tempfile::tempdir().unwrap();
        write_master(
            &tmp.path().join("work_order_master.xlsx"),
            &[["Rao", "77-A", "Road"]],
        );
        let report =
            run_generate(&SpecGenerateOptions::default(), &spec_ctx(tmp.path())).unwrap();
        assert_eq!(report.year, 2025);
        assert!(
            report.files[0]
                .path_file_out
                .ends_with("Blank_Security_Refund_Batch_01_2025.xlsx")
        );
    }

    #[test]
    fn run_generate_reports_duplicate_labels() {
        let tmp = tempfile::tempdir().unwrap();
        write_master(
            &tmp.path().join("work_order_master.xlsx"),
            &[["Rao A", "5/2024", ""], ["Rao B", "5/2025", ""]],
        );
        let report =
            run_generate(&SpecGenerateOptions::default(), &spec_ctx(tmp.path())).unwrap();
        assert_eq!(report.files[0].sheets, vec!["Rao 5", "Rao 5__2"]);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn run_generate_without_records_fails() {
        let tmp = tempfile::tempdir().unwrap();
        write_master(&tmp.path().join("work_order_master.xlsx"), &[]);
        assert!(matches!(
            run_generate(&SpecGenerateOptions::default(), &spec_ctx(tmp.path())),
            Err(PipelineError::NoRecords(_))
        ));
    }

    #[test]
    fn run_generate_without_input_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let spec_options = SpecGenerateOptions {
            input_candidates: vec![PathBuf::from("absent.xlsx")],
            ..Default::default()
        };
        assert!(matches!(
            run_generate(&spec_options, &spec_ctx(tmp.path())),
            Err(PipelineError::Fs(_))
        ));
    }
}
