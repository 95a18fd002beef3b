//! Latest run directory to converted documents and a zip archive.

use std::path::PathBuf;

use sdform_convert::{ConverterChain, convert_workbooks};
use sdform_io_fs::conf::{C_RECORD_ARCHIVES_SUFFIX, C_RECORD_FILES_SUFFIX};
use sdform_io_fs::{
    create_zip_archive, derive_archive_name, find_latest_run_dir, list_workbooks, move_into_dir,
};
use tracing::info;

use crate::spec::{PipelineError, ReportExport, SpecExportOptions, SpecRunContext};

/// Convert every workbook of the newest run directory through `chain`, then
/// archive the produced documents.
///
/// Documents land in `{PDF|Word}_Output_{run_dir_name}`; the archive is
/// `{PDF|Word}_Export_{ddmmYYYY_HHMM}.zip`, both under the context root. With a
/// record root they are then moved into `{record}/{PDF|Word}_Files` and
/// `{record}/{PDF|Word}_Archives`.
pub fn run_export(
    spec_options: &SpecExportOptions,
    chain: &ConverterChain,
    spec_ctx: &SpecRunContext,
) -> Result<ReportExport, PipelineError> {
    let l_mismatched = chain.names_mismatched(spec_options.format);
    if !l_mismatched.is_empty() {
        return Err(PipelineError::FormatMismatch {
            format: spec_options.format.label().to_string(),
            converters: l_mismatched,
        });
    }

    let l_roots: Vec<PathBuf> = spec_options
        .search_roots
        .iter()
        .map(|path| spec_ctx.resolve(path))
        .collect();
    let path_dir_run = find_latest_run_dir(
        &l_roots,
        &spec_options.dir_prefix,
        &spec_options.spec_list,
    )?;

    let l_workbooks = list_workbooks(&path_dir_run, &spec_options.spec_list)?;
    if l_workbooks.is_empty() {
        return Err(PipelineError::NoWorkbooks(path_dir_run));
    }

    let c_label = spec_options.format.label();
    let name_dir_run = path_dir_run
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut path_dir_out = spec_ctx
        .path_dir_root
        .join(format!("{c_label}_Output_{name_dir_run}"));
    info!(
        workbooks = l_workbooks.len(),
        converters = ?chain.names(),
        dir = %path_dir_out.display(),
        "converting"
    );

    let mut report_convert = convert_workbooks(&l_workbooks, chain, &path_dir_out);
    if report_convert.converted.is_empty() {
        return Err(PipelineError::NoDocuments {
            cnt_errors: report_convert.error_count(),
        });
    }

    let l_documents: Vec<PathBuf> = report_convert
        .converted
        .iter()
        .map(|spec_converted| spec_converted.path_file_out.clone())
        .collect();
    let path_file_zip = spec_ctx
        .path_dir_root
        .join(derive_archive_name(c_label, spec_ctx.ts));
    let mut report_archive = create_zip_archive(&l_documents, &path_file_zip)?;

    if let Some(path_dir_record) = &spec_options.path_dir_record {
        let path_dir_record = spec_ctx.resolve(path_dir_record);
        path_dir_out = move_into_dir(
            &path_dir_out,
            &path_dir_record.join(format!("{c_label}_{C_RECORD_FILES_SUFFIX}")),
        )?;
        report_archive.path_file_zip = move_into_dir(
            &report_archive.path_file_zip,
            &path_dir_record.join(format!("{c_label}_{C_RECORD_ARCHIVES_SUFFIX}")),
        )?;
        for spec_converted in &mut report_convert.converted {
            if let Some(name_file) = spec_converted.path_file_out.file_name() {
                spec_converted.path_file_out = path_dir_out.join(name_file);
            }
        }
    }

    Ok(ReportExport {
        path_dir_run,
        path_dir_out,
        report_convert,
        report_archive,
    })
}
