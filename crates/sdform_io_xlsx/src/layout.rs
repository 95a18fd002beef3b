//! Refund-form page layout: row map, page rendering and page read-back.

use crate::conf::{
    C_AGREEMENT_PLACEHOLDER, C_DEDUCTION_TOTAL, EnumFieldLayout, N_COL_VALUE, N_COL_VALUE_MERGED,
    N_DEDUCTION_BODY_ROWS, SPEC_PRINT_SETUP, TUP_CERTIFICATION, TUP_DEDUCTION_COL_SPANS,
    TUP_FORM_FIELDS, TUP_SIGNATURE_ROWS,
};
use crate::spec::{SpecFormField, SpecFormPage, SpecWorkOrderRecord};
use crate::util::derive_label;

/// Zero-based sheet rows of every form section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecFormLayout {
    /// Title banner.
    pub n_row_title: u32,
    /// First field row.
    pub n_row_fields_start: u32,
    /// `18. Details of Security Deposit` heading.
    pub n_row_deduction_heading: u32,
    /// Deduction table header.
    pub n_row_deduction_header: u32,
    /// First deduction body row.
    pub n_row_deduction_body_start: u32,
    /// `Certified That:-` heading.
    pub n_row_certification_start: u32,
    /// First signature row.
    pub n_row_signature_start: u32,
    /// One past the last written row.
    pub n_row_end: u32,
}

/// Row map derived from the template table; the title sits on row 0.
pub const SPEC_FORM_LAYOUT: SpecFormLayout = derive_form_layout();

const fn derive_form_layout() -> SpecFormLayout {
    let n_row_fields_start = 1;
    let n_row_deduction_heading = n_row_fields_start + TUP_FORM_FIELDS.len() as u32;
    let n_row_deduction_header = n_row_deduction_heading + 1;
    let n_row_deduction_body_start = n_row_deduction_header + 1;
    let n_row_certification_start = n_row_deduction_body_start + N_DEDUCTION_BODY_ROWS as u32;
    // One spacer row between certification and signatures.
    let n_row_signature_start = n_row_certification_start + TUP_CERTIFICATION.len() as u32 + 1;
    SpecFormLayout {
        n_row_title: 0,
        n_row_fields_start,
        n_row_deduction_heading,
        n_row_deduction_header,
        n_row_deduction_body_start,
        n_row_certification_start,
        n_row_signature_start,
        n_row_end: n_row_signature_start + TUP_SIGNATURE_ROWS.len() as u32,
    }
}

/// Page title used for `record`; blank agreements are labeled `NoAgreement`.
pub fn derive_page_title(record: &SpecWorkOrderRecord) -> String {
    let c_agreement = if record.agreement_number.trim().is_empty() {
        C_AGREEMENT_PLACEHOLDER
    } else {
        record.agreement_number.as_str()
    };
    derive_label(&record.contractor_name, c_agreement)
}

/// Render the blank refund-order page for one work order.
pub fn render_page(record: &SpecWorkOrderRecord) -> SpecFormPage {
    SpecFormPage {
        page_title: derive_page_title(record),
        fields: derive_blank_fields(),
        deduction_rows: derive_blank_deduction_rows(),
        print_setup: SPEC_PRINT_SETUP,
    }
}

fn derive_blank_fields() -> Vec<SpecFormField> {
    TUP_FORM_FIELDS
        .iter()
        .enumerate()
        .map(|(n_idx, template)| SpecFormField {
            n_index: n_idx + 1,
            label: template.label.to_string(),
            value: String::new(),
            rule_layout: template.rule_layout,
            n_row: SPEC_FORM_LAYOUT.n_row_fields_start + n_idx as u32,
        })
        .collect()
}

fn derive_blank_deduction_rows() -> Vec<[String; 4]> {
    (0..N_DEDUCTION_BODY_ROWS)
        .map(|n_idx| {
            let mut row: [String; 4] = Default::default();
            if n_idx + 1 == N_DEDUCTION_BODY_ROWS {
                row[0] = C_DEDUCTION_TOTAL.to_string();
            }
            row
        })
        .collect()
}

/// Rebuild a page from sheet cells, reading values at the template's value positions.
///
/// `read_cell(row, col)` returns the cell text or `""`.
pub fn parse_page<F>(page_title: &str, read_cell: F) -> SpecFormPage
where
    F: Fn(u32, u16) -> String,
{
    let mut fields = derive_blank_fields();
    for field in &mut fields {
        field.value = match field.rule_layout {
            EnumFieldLayout::ValueMerged => read_cell(field.n_row, N_COL_VALUE_MERGED),
            EnumFieldLayout::ValueCell => read_cell(field.n_row, N_COL_VALUE),
            EnumFieldLayout::LabelWide => {
                let c_text = read_cell(field.n_row, 0);
                c_text
                    .strip_prefix(field.label.as_str())
                    .unwrap_or("")
                    .trim()
                    .to_string()
            }
        }
        .trim()
        .to_string();
    }

    let deduction_rows = (0..N_DEDUCTION_BODY_ROWS)
        .map(|n_idx| {
            let n_row = SPEC_FORM_LAYOUT.n_row_deduction_body_start + n_idx as u32;
            let mut row: [String; 4] = Default::default();
            for (n_idx_col, (n_col_first, _)) in TUP_DEDUCTION_COL_SPANS.iter().enumerate() {
                row[n_idx_col] = read_cell(n_row, *n_col_first).trim().to_string();
            }
            row
        })
        .collect();

    SpecFormPage {
        page_title: page_title.to_string(),
        fields,
        deduction_rows,
        print_setup: SPEC_PRINT_SETUP,
    }
}
