//! XLSX constants, the refund-form template table and default preset factories.

use std::collections::BTreeMap;

use crate::spec::SpecCellFormat;

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];
/// Sheet name Excel reserves for itself, lowercase.
pub const C_SHEET_NAME_RESERVED: &str = "history";

/// Source sheet holding the work-order master table.
pub const C_SHEET_WORK_ORDERS: &str = "Work Orders";
/// Header of the contractor column.
pub const C_COL_CONTRACTOR: &str = "Name of Contractor";
/// Header of the agreement column, followed by accepted aliases.
pub const TUP_COL_AGREEMENT: [&str; 2] = ["Agreement No.", "Agreement No"];
/// Header of the work-name column.
pub const C_COL_WORK_NAME: &str = "Name of Work";

/// Default number of work orders per output workbook.
pub const N_BATCH_SIZE_DEFAULT: usize = 25;

/// Courtesy prefixes stripped from contractor names, longest first.
pub const TUP_CONTRACTOR_PREFIXES: [&str; 3] = ["M/s.", "M/s ", "M/s"];
/// Short name used when the contractor name is blank.
pub const C_LABEL_UNKNOWN: &str = "Unknown";
/// Fallback label prefix used when the derived label is blank.
pub const C_LABEL_FALLBACK_PREFIX: &str = "Work_";
/// Agreement placeholder used by the layout generator for blank agreements.
pub const C_AGREEMENT_PLACEHOLDER: &str = "NoAgreement";

/// Inclusive year range accepted when scanning agreement numbers.
pub const TUP_AGREEMENT_YEAR_RANGE: (u32, u32) = (2000, 2099);

////////////////////////////////////////////////////////////////////////////////
// #region FormTemplate

/// Form title written across the first row.
pub const C_FORM_TITLE: &str = "ORDER FOR REFUND OF SECURITY DEPOSIT [RWMF 119]";

/// How a form field occupies its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFieldLayout {
    /// Label in `A`, value box merged across `C:E`.
    ValueMerged,
    /// Label in `A`, value box in `E`.
    ValueCell,
    /// Label merged across `A:E` with wrapping; the value is written after the label.
    LabelWide,
}

/// One row of the field template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecFormFieldTemplate {
    /// Printed label including its ordinal.
    pub label: &'static str,
    /// Cell arrangement for the field row.
    pub rule_layout: EnumFieldLayout,
}

const fn field(label: &'static str, rule_layout: EnumFieldLayout) -> SpecFormFieldTemplate {
    SpecFormFieldTemplate { label, rule_layout }
}

/// The 17 standard fields, in print order.
pub const TUP_FORM_FIELDS: [SpecFormFieldTemplate; 17] = [
    field("1. Name of Contractor:", EnumFieldLayout::ValueMerged),
    field("2. Amount of Deposit: ₹", EnumFieldLayout::ValueCell),
    field("3. Name of Work:", EnumFieldLayout::LabelWide),
    field("4. Agreement No.:", EnumFieldLayout::ValueCell),
    field("5. Reference for granting refunds:", EnumFieldLayout::ValueCell),
    field("6. Date of Commencement:", EnumFieldLayout::ValueCell),
    field("7. Stipulated date of Completion:", EnumFieldLayout::ValueCell),
    field("8. Actual Date of Completion:", EnumFieldLayout::ValueCell),
    field("9. MB No.:", EnumFieldLayout::ValueCell),
    field("10. Date of Payment of final bill:", EnumFieldLayout::ValueCell),
    field("11. Date of Expiry of 3/6 months/DLP:", EnumFieldLayout::ValueCell),
    field("12. Was work satisfactory:", EnumFieldLayout::ValueCell),
    field("13. Any tools outstanding against contractor:", EnumFieldLayout::ValueCell),
    field(
        "14. Any recovery due from contractor after payment of final bill:",
        EnumFieldLayout::ValueCell,
    ),
    field("15. Extension of time limit sanctioned vide", EnumFieldLayout::ValueCell),
    field(
        "16. Assistant Engineer Signature's Recommending refund",
        EnumFieldLayout::ValueCell,
    ),
    field("17. Accountant's Remarks", EnumFieldLayout::ValueCell),
];

/// Heading above the deduction table.
pub const C_DEDUCTION_HEADING: &str = "18. Details of Security Deposit";
/// Deduction table column headers.
pub const TUP_DEDUCTION_HEADERS: [&str; 4] = ["Bill Num", "MB No.", "Ded. Type", "Amount (₹)"];
/// Number of body rows in the deduction table, including the total row.
pub const N_DEDUCTION_BODY_ROWS: usize = 6;
/// Label of the last deduction row.
pub const C_DEDUCTION_TOTAL: &str = "Total:";

/// Certification heading followed by the numbered statements.
pub const TUP_CERTIFICATION: [&str; 6] = [
    "Certified That:-",
    "1. The Work has been completed as per G-schedule.",
    "2. The work has been inspected by the undersigned as on and it stood satisfactory.",
    "3. No Defect found during DLP Period.",
    "4. The final time extension granted upto With/without compensation by the competent authority.",
    "5. The defects pointed out by higher authorities or other authorized authorities during inspection etc have been removed by the contractor and compliance has been refund.",
];

/// Signature block rows; columns map to sheet columns `A`, `C`, `E`.
pub const TUP_SIGNATURE_ROWS: [[&str; 3]; 2] = [
    ["Divisional Accountant", "Assistant Engineer", "Executive Engineer"],
    ["", "", "PWD Electric Div.- Udaipur"],
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetGeometry

/// Last used column index (`E`).
pub const N_COL_LAST: u16 = 4;
/// Column holding the value box of [`EnumFieldLayout::ValueCell`] fields (`E`).
pub const N_COL_VALUE: u16 = 4;
/// First column of the merged value box of [`EnumFieldLayout::ValueMerged`] fields (`C`).
pub const N_COL_VALUE_MERGED: u16 = 2;
/// Sheet column spans `(first, last)` of the four deduction table columns.
pub const TUP_DEDUCTION_COL_SPANS: [(u16, u16); 4] = [(0, 1), (2, 2), (3, 3), (4, 4)];
/// Sheet columns of the three signature slots.
pub const TUP_SIGNATURE_COLS: [u16; 3] = [0, 2, 4];

/// Column widths for `A..=E`.
pub const TUP_COL_WIDTHS: [f64; 5] = [30.0, 5.0, 25.0, 25.0, 25.0];
/// Default row height in points.
pub const N_ROW_HEIGHT: f64 = 20.0;
/// Height of the wrapped last certification statement.
pub const N_ROW_HEIGHT_CERT_WRAPPED: f64 = 40.0;
/// Rows below the signature block that still receive the default height.
pub const N_ROWS_HEIGHT_PADDING: u32 = 5;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PrintSetup

/// Print layout applied to every form sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecPrintSetup {
    /// Excel paper size code.
    pub paper_size: u8,
    /// Portrait orientation when `true`.
    pub if_portrait: bool,
    /// Left/right/top/bottom margins in inches.
    pub margin_inches: f64,
    /// Fit-to-page width count.
    pub fit_width: u16,
    /// Fit-to-page height count.
    pub fit_height: u16,
    /// Center the printed area horizontally.
    pub if_center_horizontally: bool,
}

/// Single A4 portrait page per form, centered, half-inch margins.
pub const SPEC_PRINT_SETUP: SpecPrintSetup = SpecPrintSetup {
    paper_size: 9,
    if_portrait: true,
    margin_inches: 0.5,
    fit_width: 1,
    fit_height: 1,
    if_center_horizontally: true,
};

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatPresets

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnumFmtKey {
    /// Form title banner.
    Title,
    /// Bold section heading.
    Heading,
    /// Deduction table header cell.
    TableHeader,
    /// Deduction table body cell.
    TableCell,
    /// Plain field label.
    Label,
    /// Wrapped label spanning the row.
    LabelWrap,
    /// Empty bordered value box.
    ValueBox,
    /// Certification statement.
    Small,
    /// Wrapped certification statement.
    SmallWrap,
    /// Centered signature text.
    Signature,
}

const C_COLOR_NAVY: &str = "#000080";
const C_COLOR_LAVENDER: &str = "#E6E6FA";

/// Build the named format presets used by [`crate::writer::XlsxFormWriter`].
pub fn derive_default_form_formats() -> BTreeMap<EnumFmtKey, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_size: Some(11),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };
    let cfg_centered = cfg_base_fmt_spec.with_(SpecCellFormat {
        align: Some("center".to_string()),
        ..Default::default()
    });

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumFmtKey::Title,
        cfg_centered.with_(SpecCellFormat {
            font_size: Some(16),
            bold: Some(true),
            font_color: Some(C_COLOR_NAVY.to_string()),
            bg_color: Some(C_COLOR_LAVENDER.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Heading,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(12),
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::TableHeader,
        cfg_centered.with_(SpecCellFormat {
            font_size: Some(12),
            bold: Some(true),
            border: Some(1),
            bg_color: Some(C_COLOR_LAVENDER.to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::TableCell,
        cfg_centered.with_(SpecCellFormat {
            border: Some(1),
            ..Default::default()
        }),
    );
    dict_fmt.insert(EnumFmtKey::Label, cfg_base_fmt_spec.clone());
    dict_fmt.insert(
        EnumFmtKey::LabelWrap,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            valign: Some("top".to_string()),
            text_wrap: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::ValueBox,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            border: Some(1),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Small,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(10),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::SmallWrap,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(10),
            valign: Some("top".to_string()),
            text_wrap: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(EnumFmtKey::Signature, cfg_centered);

    dict_fmt
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
