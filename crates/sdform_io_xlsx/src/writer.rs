//! XLSX writer kernel that lays refund-form pages out as worksheets.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, warn};

use crate::conf::{
    C_DEDUCTION_HEADING, C_FORM_TITLE, C_LABEL_FALLBACK_PREFIX, C_SHEET_NAME_RESERVED,
    EnumFieldLayout, EnumFmtKey, N_COL_LAST, N_COL_VALUE, N_COL_VALUE_MERGED, N_ROW_HEIGHT,
    N_ROW_HEIGHT_CERT_WRAPPED, N_ROWS_HEIGHT_PADDING, SpecPrintSetup, TUP_CERTIFICATION,
    TUP_COL_WIDTHS, TUP_DEDUCTION_COL_SPANS, TUP_DEDUCTION_HEADERS, TUP_SIGNATURE_COLS,
    TUP_SIGNATURE_ROWS, derive_default_form_formats,
};
use crate::layout::SPEC_FORM_LAYOUT;
use crate::spec::{FormError, SpecCellFormat, SpecFormPage, SpecXlsxReport};
use crate::util::derive_unique_sheet_name;

/// Stateful workbook writer for one batch.
pub struct XlsxFormWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    dict_formats: BTreeMap<EnumFmtKey, Format>,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecXlsxReport,
    if_closed: bool,
}

impl XlsxFormWriter {
    /// Create writer bound to output path with the default form formats.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf) -> Self {
        Self::with_formats(path_file_out, derive_default_form_formats())
    }

    /// Create writer with custom format presets.
    pub fn with_formats(
        path_file_out: PathBuf,
        dict_format_specs: BTreeMap<EnumFmtKey, SpecCellFormat>,
    ) -> Self {
        let dict_formats = dict_format_specs
            .iter()
            .map(|(key, spec)| (*key, derive_rust_xlsx_format(spec)))
            .collect();
        Self {
            report: SpecXlsxReport {
                path_file_out: path_file_out.clone(),
                ..Default::default()
            },
            path_file_out,
            workbook: Workbook::new(),
            dict_formats,
            set_sheet_names_existing: BTreeSet::from([C_SHEET_NAME_RESERVED.to_string()]),
            if_closed: false,
        }
    }

    /// Return output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Return snapshot of the write report so far.
    pub fn report(&self) -> SpecXlsxReport {
        self.report.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<SpecXlsxReport, FormError> {
        if !self.if_closed {
            self.workbook
                .save(&self.path_file_out)
                .map_err(|e| derive_write_error(&self.path_file_out, e))?;
            self.if_closed = true;
        }
        Ok(self.report.clone())
    }

    /// Append one page as a new worksheet.
    ///
    /// A page title that collides with an earlier sheet (case-insensitively) is
    /// written under a `__n` suffixed name and reported as a warning.
    pub fn write_page(&mut self, page: &SpecFormPage) -> Result<(), FormError> {
        if self.if_closed {
            return Err(FormError::WriteError {
                path: self.path_file_out.clone(),
                message: "Cannot write after close().".to_string(),
            });
        }

        let sheet_name_unique = derive_unique_sheet_name(
            &derive_excel_safe_name(&page.page_title),
            &mut self.set_sheet_names_existing,
        );
        if sheet_name_unique != page.page_title {
            let c_msg = format!(
                "Page label {:?} is taken or invalid: written as {:?}.",
                page.page_title, sheet_name_unique
            );
            warn!(file = %self.path_file_out.display(), "{c_msg}");
            self.report.warn(c_msg);
        }

        let path_file_out = self.path_file_out.clone();
        let dict_formats = &self.dict_formats;
        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name_unique)
            .map_err(|e| derive_write_error(&path_file_out, e))?;
        write_form_sheet(worksheet, page, dict_formats)
            .map_err(|e| derive_write_error(&path_file_out, e))?;

        debug!(sheet = %sheet_name_unique, "form sheet written");
        self.report.sheets.push(sheet_name_unique);
        Ok(())
    }
}

/// Excel rejects names starting or ending with an apostrophe.
fn derive_excel_safe_name(page_title: &str) -> String {
    let c_name = page_title.trim_matches('\'').trim();
    if c_name.is_empty() {
        return C_LABEL_FALLBACK_PREFIX.to_string();
    }
    c_name.to_string()
}

/// Write `pages` into a fresh workbook at `path_file_out` and save it.
pub fn write_batch(
    pages: &[SpecFormPage],
    path_file_out: &Path,
) -> Result<SpecXlsxReport, FormError> {
    let mut writer = XlsxFormWriter::new(path_file_out.to_path_buf());
    for page in pages {
        writer.write_page(page)?;
    }
    writer.close()
}

////////////////////////////////////////////////////////////////////////////////
// #region SheetLayout

fn write_form_sheet(
    worksheet: &mut Worksheet,
    page: &SpecFormPage,
    dict_formats: &BTreeMap<EnumFmtKey, Format>,
) -> Result<(), XlsxError> {
    let fmt = |key: EnumFmtKey| dict_formats.get(&key).cloned().unwrap_or_default();
    let layout = SPEC_FORM_LAYOUT;

    worksheet.merge_range(
        layout.n_row_title,
        0,
        layout.n_row_title,
        N_COL_LAST,
        C_FORM_TITLE,
        &fmt(EnumFmtKey::Title),
    )?;

    for field in &page.fields {
        match field.rule_layout {
            EnumFieldLayout::LabelWide => {
                let c_text = if field.value.is_empty() {
                    field.label.clone()
                } else {
                    format!("{} {}", field.label, field.value)
                };
                worksheet.merge_range(
                    field.n_row,
                    0,
                    field.n_row,
                    N_COL_LAST,
                    &c_text,
                    &fmt(EnumFmtKey::LabelWrap),
                )?;
            }
            EnumFieldLayout::ValueMerged => {
                worksheet.write_string_with_format(
                    field.n_row,
                    0,
                    &field.label,
                    &fmt(EnumFmtKey::Label),
                )?;
                worksheet.merge_range(
                    field.n_row,
                    N_COL_VALUE_MERGED,
                    field.n_row,
                    N_COL_LAST,
                    &field.value,
                    &fmt(EnumFmtKey::ValueBox),
                )?;
            }
            EnumFieldLayout::ValueCell => {
                worksheet.write_string_with_format(
                    field.n_row,
                    0,
                    &field.label,
                    &fmt(EnumFmtKey::Label),
                )?;
                write_text_or_blank(
                    worksheet,
                    field.n_row,
                    N_COL_VALUE,
                    &field.value,
                    &fmt(EnumFmtKey::ValueBox),
                )?;
            }
        }
    }

    worksheet.write_string_with_format(
        layout.n_row_deduction_heading,
        0,
        C_DEDUCTION_HEADING,
        &fmt(EnumFmtKey::Heading),
    )?;
    write_table_row(
        worksheet,
        layout.n_row_deduction_header,
        &TUP_DEDUCTION_HEADERS.map(str::to_string),
        &fmt(EnumFmtKey::TableHeader),
    )?;
    for (n_idx, row) in page.deduction_rows.iter().enumerate() {
        write_table_row(
            worksheet,
            layout.n_row_deduction_body_start + n_idx as u32,
            row,
            &fmt(EnumFmtKey::TableCell),
        )?;
    }

    let n_idx_cert_last = TUP_CERTIFICATION.len() - 1;
    for (n_idx, c_text) in TUP_CERTIFICATION.iter().enumerate() {
        let n_row = layout.n_row_certification_start + n_idx as u32;
        if n_idx == 0 {
            worksheet.write_string_with_format(n_row, 0, *c_text, &fmt(EnumFmtKey::Heading))?;
        } else if n_idx == n_idx_cert_last {
            worksheet.merge_range(n_row, 0, n_row, N_COL_LAST, c_text, &fmt(EnumFmtKey::SmallWrap))?;
        } else {
            worksheet.write_string_with_format(n_row, 0, *c_text, &fmt(EnumFmtKey::Small))?;
        }
    }

    for (n_idx_row, row) in TUP_SIGNATURE_ROWS.iter().enumerate() {
        let n_row = layout.n_row_signature_start + n_idx_row as u32;
        for (c_text, n_col) in row.iter().zip(TUP_SIGNATURE_COLS) {
            if !c_text.is_empty() {
                worksheet.write_string_with_format(n_row, n_col, *c_text, &fmt(EnumFmtKey::Signature))?;
            }
        }
    }

    for (n_col, width) in TUP_COL_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(n_col as u16, *width)?;
    }
    for n_row in 0..layout.n_row_end + N_ROWS_HEIGHT_PADDING {
        worksheet.set_row_height(n_row, N_ROW_HEIGHT)?;
    }
    worksheet.set_row_height(
        layout.n_row_certification_start + n_idx_cert_last as u32,
        N_ROW_HEIGHT_CERT_WRAPPED,
    )?;

    apply_print_setup(worksheet, &page.print_setup);
    Ok(())
}

fn write_table_row(
    worksheet: &mut Worksheet,
    n_row: u32,
    row: &[String; 4],
    format: &Format,
) -> Result<(), XlsxError> {
    for (c_text, (n_col_first, n_col_last)) in row.iter().zip(TUP_DEDUCTION_COL_SPANS) {
        if n_col_first == n_col_last {
            write_text_or_blank(worksheet, n_row, n_col_first, c_text, format)?;
        } else {
            worksheet.merge_range(n_row, n_col_first, n_row, n_col_last, c_text, format)?;
        }
    }
    Ok(())
}

fn write_text_or_blank(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    c_text: &str,
    format: &Format,
) -> Result<(), XlsxError> {
    if c_text.is_empty() {
        worksheet.write_blank(n_row, n_col, format)?;
    } else {
        worksheet.write_string_with_format(n_row, n_col, c_text, format)?;
    }
    Ok(())
}

fn apply_print_setup(worksheet: &mut Worksheet, print_setup: &SpecPrintSetup) {
    worksheet.set_paper_size(print_setup.paper_size);
    if print_setup.if_portrait {
        worksheet.set_portrait();
    } else {
        worksheet.set_landscape();
    }
    let n_margin = print_setup.margin_inches;
    worksheet.set_margins(n_margin, n_margin, n_margin, n_margin, 0.3, 0.3);
    worksheet.set_print_fit_to_pages(print_setup.fit_width, print_setup.fit_height);
    worksheet.set_print_center_horizontally(print_setup.if_center_horizontally);
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatConversion

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn derive_write_error(path: &Path, err: XlsxError) -> FormError {
    FormError::WriteError {
        path: path.to_path_buf(),
        message: format!("xlsx write error: {err}"),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render_page;
    use crate::loader::read_form_pages;
    use crate::spec::SpecWorkOrderRecord;
    use crate::util::derive_label;

    #[test]
    fn write_batch_round_trip_keeps_page_count_and_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("batch.xlsx");
        let l_records = vec![
            SpecWorkOrderRecord::new("M/s Sharma Constructions", "123/2023", "Road"),
            SpecWorkOrderRecord::new("Verma Electricals", "45-2024", "Wiring"),
            SpecWorkOrderRecord::new("M/s. Gupta & Co", "9/2022", "Substation"),
        ];
        let l_pages: Vec<_> = l_records.iter().map(render_page).collect();

        let report = write_batch(&l_pages, &path_file).unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!(report.sheets, vec!["Sharma 123", "Verma 45", "Gupta 9"]);

        let l_pages_read = read_form_pages(&path_file).unwrap();
        assert_eq!(l_pages_read.len(), l_records.len());
        for (page, record) in l_pages_read.iter().zip(&l_records) {
            assert_eq!(
                page.page_title,
                derive_label(&record.contractor_name, &record.agreement_number)
            );
            assert!(page.fields.iter().all(|f| f.value.is_empty()));
            assert_eq!(page.deduction_rows[5][0], "Total:");
        }
    }

    #[test]
    fn write_batch_disambiguates_duplicate_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("dup.xlsx");
        let l_pages = vec![
            render_page(&SpecWorkOrderRecord::new("Sharma A", "1/2020", "")),
            render_page(&SpecWorkOrderRecord::new("Sharma B", "1/2021", "")),
            render_page(&SpecWorkOrderRecord::new("SHARMA C", "1-x", "")),
        ];

        let report = write_batch(&l_pages, &path_file).unwrap();
        assert_eq!(report.sheets, vec!["Sharma 1", "Sharma 1__2", "SHARMA 1__3"]);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(read_form_pages(&path_file).unwrap().len(), 3);
    }

    #[test]
    fn filled_values_survive_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("filled.xlsx");
        let mut page = render_page(&SpecWorkOrderRecord::new("Rao", "5/2023", ""));
        page.fields[0].value = "Rao Builders".to_string();
        page.fields[2].value = "Street lighting".to_string();
        page.fields[3].value = "5/2023".to_string();
        page.deduction_rows[0] = ["B-1".into(), "MB-7".into(), "SD".into(), "1200".into()];

        write_batch(std::slice::from_ref(&page), &path_file).unwrap();
        let l_pages_read = read_form_pages(&path_file).unwrap();

        assert_eq!(l_pages_read, vec![page]);
    }

    #[test]
    fn write_page_avoids_names_excel_rejects() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("names.xlsx");
        let mut page_quoted = render_page(&SpecWorkOrderRecord::new("'Rao'", "", ""));
        page_quoted.page_title = "'Rao'".to_string();
        let mut page_history = page_quoted.clone();
        page_history.page_title = "History".to_string();

        let report = write_batch(&[page_quoted, page_history], &path_file).unwrap();
        assert_eq!(report.sheets, vec!["Rao", "History__2"]);
    }

    #[test]
    fn write_after_close_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = XlsxFormWriter::new(tmp.path().join("closed.xlsx"));
        let page = render_page(&SpecWorkOrderRecord::new("Rao", "5/2023", ""));
        writer.write_page(&page).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert!(matches!(
            writer.write_page(&page),
            Err(FormError::WriteError { .. })
        ));
    }

    #[test]
    fn write_batch_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("missing").join("out.xlsx");
        let page = render_page(&SpecWorkOrderRecord::new("Rao", "5/2023", ""));
        assert!(matches!(
            write_batch(&[page], &path_file),
            Err(FormError::WriteError { .. })
        ));
    }
}
