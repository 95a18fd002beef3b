//! In-process DOCX rendering of form workbooks.

use std::fs::File;
use std::path::{Path, PathBuf};

use docx_rs::{
    AlignmentType, BreakType, Docx, PageMargin, Paragraph, Run, Table, TableCell, TableRow,
};
use sdform_io_xlsx::conf::{
    C_DEDUCTION_HEADING, C_FORM_TITLE, EnumFieldLayout, TUP_CERTIFICATION, TUP_DEDUCTION_HEADERS,
    TUP_SIGNATURE_ROWS,
};
use sdform_io_xlsx::{SpecFormPage, read_form_pages};

use crate::chain::Converter;
use crate::conf::{N_DOCX_MARGIN_TWIPS, TUP_DOCX_GRID_TWIPS};
use crate::process::derive_output_path;
use crate::spec::{ConvertError, EnumDocumentFormat};

/// Column spans (out of five) of the deduction table cells.
const TUP_DEDUCTION_SPANS: [usize; 4] = [2, 1, 1, 1];
/// Column spans of the three signature slots.
const TUP_SIGNATURE_SPANS: [usize; 3] = [2, 2, 1];

/// Reads the workbook back and writes one DOCX page per sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxConverter;

impl Converter for DocxConverter {
    fn name(&self) -> &str {
        "docx-native"
    }

    fn format(&self) -> EnumDocumentFormat {
        EnumDocumentFormat::Docx
    }

    fn convert(&self, path_file_in: &Path, path_dir_out: &Path) -> Result<PathBuf, ConvertError> {
        let l_pages = read_form_pages(path_file_in).map_err(|e| ConvertError::Failed {
            path: path_file_in.to_path_buf(),
            message: e.to_string(),
        })?;
        if l_pages.is_empty() {
            return Err(ConvertError::Failed {
                path: path_file_in.to_path_buf(),
                message: "workbook has no sheets".to_string(),
            });
        }

        let path_file_out = derive_output_path(path_file_in, path_dir_out, "docx");
        let file_out = File::create(&path_file_out).map_err(|source| ConvertError::Io {
            path: path_file_out.clone(),
            source,
        })?;
        render_docx(&l_pages)
            .build()
            .pack(file_out)
            .map_err(|e| ConvertError::Failed {
                path: path_file_in.to_path_buf(),
                message: format!("docx write error: {e}"),
            })?;
        Ok(path_file_out)
    }
}

/// Build the document; pages are separated by page breaks.
pub fn render_docx(pages: &[SpecFormPage]) -> Docx {
    let mut docx = Docx::new().page_margin(
        PageMargin::new()
            .top(N_DOCX_MARGIN_TWIPS)
            .bottom(N_DOCX_MARGIN_TWIPS)
            .left(N_DOCX_MARGIN_TWIPS)
            .right(N_DOCX_MARGIN_TWIPS),
    );
    for (n_idx, page) in pages.iter().enumerate() {
        if n_idx > 0 {
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
        docx = render_page(docx, page);
    }
    docx
}

fn render_page(docx: Docx, page: &SpecFormPage) -> Docx {
    let mut docx = docx
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(C_FORM_TITLE).bold().size(32).color("000080"))
                .align(AlignmentType::Center),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(&page.page_title).italic().size(18))
                .align(AlignmentType::Right),
        );

    let l_rows_fields = page
        .fields
        .iter()
        .map(|field| match field.rule_layout {
            EnumFieldLayout::LabelWide => {
                let c_text = if field.value.is_empty() {
                    field.label.clone()
                } else {
                    format!("{} {}", field.label, field.value)
                };
                TableRow::new(vec![create_cell(&c_text, 5, false)])
            }
            EnumFieldLayout::ValueMerged => TableRow::new(vec![
                create_cell(&field.label, 2, false),
                create_cell(&field.value, 3, false),
            ]),
            EnumFieldLayout::ValueCell => TableRow::new(vec![
                create_cell(&field.label, 4, false),
                create_cell(&field.value, 1, false),
            ]),
        })
        .collect();
    docx = docx.add_table(Table::new(l_rows_fields).set_grid(TUP_DOCX_GRID_TWIPS.to_vec()));

    docx = docx.add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(C_DEDUCTION_HEADING).bold().size(24)),
    );
    let mut l_rows_deduction = vec![create_table_row(
        &TUP_DEDUCTION_HEADERS.map(str::to_string),
        &TUP_DEDUCTION_SPANS,
        true,
    )];
    for row in &page.deduction_rows {
        l_rows_deduction.push(create_table_row(row, &TUP_DEDUCTION_SPANS, false));
    }
    docx = docx.add_table(Table::new(l_rows_deduction).set_grid(TUP_DOCX_GRID_TWIPS.to_vec()));

    for (n_idx, c_text) in TUP_CERTIFICATION.iter().enumerate() {
        let mut run = Run::new().add_text(*c_text).size(20);
        if n_idx == 0 {
            run = run.bold().size(24);
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(run));
    }

    docx = docx.add_paragraph(Paragraph::new());
    let l_rows_signature = TUP_SIGNATURE_ROWS
        .iter()
        .map(|row| create_table_row(&row.map(str::to_string), &TUP_SIGNATURE_SPANS, false))
        .collect();
    docx.add_table(Table::new(l_rows_signature).set_grid(TUP_DOCX_GRID_TWIPS.to_vec()))
}

fn create_table_row(l_texts: &[String], l_spans: &[usize], if_bold: bool) -> TableRow {
    TableRow::new(
        l_texts
            .iter()
            .zip(l_spans)
            .map(|(c_text, n_span)| create_cell(c_text, *n_span, if_bold))
            .collect(),
    )
}

fn create_cell(c_text: &str, n_span: usize, if_bold: bool) -> TableCell {
    let mut run = Run::new().add_text(c_text).size(22);
    if if_bold {
        run = run.bold();
    }
    let cell = TableCell::new().add_paragraph(Paragraph::new().add_run(run));
    if n_span > 1 { cell.grid_span(n_span) } else { cell }
}
