//! Workbook readers: the work-order master sheet and generated form workbooks.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::{debug, info, warn};

use crate::conf::{C_COL_CONTRACTOR, C_COL_WORK_NAME, TUP_COL_AGREEMENT};
use crate::layout::parse_page;
use crate::spec::{FormError, SpecFormPage, SpecWorkOrderRecord};

/// Load work-order records from `sheet_name` of the workbook at `path`.
///
/// The first row is the header row. Missing core columns degrade to empty
/// strings; every other column lands in [`SpecWorkOrderRecord::extras`].
pub fn load_work_orders(
    path: &Path,
    sheet_name: &str,
) -> Result<Vec<SpecWorkOrderRecord>, FormError> {
    let range = read_sheet_range(path, sheet_name)?;

    let mut iter_rows = range.rows();
    let Some(row_header) = iter_rows.next() else {
        info!(path = %path.display(), sheet = sheet_name, "sheet is empty: 0 rows read");
        return Ok(Vec::new());
    };
    let l_headers: Vec<String> = row_header.iter().map(derive_cell_text).collect();

    let n_idx_contractor = find_column(&l_headers, &[C_COL_CONTRACTOR]);
    let n_idx_agreement = find_column(&l_headers, &TUP_COL_AGREEMENT);
    let n_idx_work = find_column(&l_headers, &[C_COL_WORK_NAME]);
    for (c_col, n_idx) in [
        (C_COL_CONTRACTOR, n_idx_contractor),
        (TUP_COL_AGREEMENT[0], n_idx_agreement),
        (C_COL_WORK_NAME, n_idx_work),
    ] {
        if n_idx.is_none() {
            warn!(sheet = sheet_name, column = c_col, "column missing: values left blank");
        }
    }

    let mut l_records = Vec::new();
    for row in iter_rows {
        let l_cells: Vec<String> = row.iter().map(derive_cell_text).collect();
        if l_cells.iter().all(String::is_empty) {
            continue;
        }
        let cell_at = |n_idx: Option<usize>| {
            n_idx
                .and_then(|n| l_cells.get(n))
                .cloned()
                .unwrap_or_default()
        };

        let mut extras = BTreeMap::new();
        for (n_idx, c_header) in l_headers.iter().enumerate() {
            if c_header.is_empty()
                || [n_idx_contractor, n_idx_agreement, n_idx_work].contains(&Some(n_idx))
            {
                continue;
            }
            extras.insert(c_header.clone(), cell_at(Some(n_idx)));
        }

        l_records.push(SpecWorkOrderRecord {
            contractor_name: cell_at(n_idx_contractor),
            agreement_number: cell_at(n_idx_agreement),
            work_name: cell_at(n_idx_work),
            extras,
        });
    }

    info!(
        path = %path.display(),
        rows = l_records.len(),
        columns = ?l_headers,
        "work orders loaded"
    );
    Ok(l_records)
}

/// Read every sheet of a generated form workbook back into pages, in sheet order.
pub fn read_form_pages(path: &Path) -> Result<Vec<SpecFormPage>, FormError> {
    if !path.exists() {
        return Err(FormError::SourceNotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| FormError::SheetReadError {
        path: path.to_path_buf(),
        sheet_name: String::new(),
        sheets_available: Vec::new(),
        message: e.to_string(),
    })?;

    let l_sheet_names = workbook.sheet_names();
    let mut l_pages = Vec::with_capacity(l_sheet_names.len());
    for sheet_name in &l_sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| FormError::SheetReadError {
                path: path.to_path_buf(),
                sheet_name: sheet_name.clone(),
                sheets_available: l_sheet_names.clone(),
                message: e.to_string(),
            })?;
        l_pages.push(parse_page(sheet_name, |n_row, n_col| {
            range
                .get_value((n_row, u32::from(n_col)))
                .map(derive_cell_text)
                .unwrap_or_default()
        }));
    }
    debug!(path = %path.display(), pages = l_pages.len(), "form pages read");
    Ok(l_pages)
}

fn read_sheet_range(path: &Path, sheet_name: &str) -> Result<Range<Data>, FormError> {
    if !path.exists() {
        return Err(FormError::SourceNotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| FormError::SheetReadError {
        path: path.to_path_buf(),
        sheet_name: sheet_name.to_string(),
        sheets_available: Vec::new(),
        message: e.to_string(),
    })?;

    let l_sheet_names = workbook.sheet_names();
    if !l_sheet_names.iter().any(|name| name == sheet_name) {
        warn!(
            path = %path.display(),
            sheet = sheet_name,
            sheets_available = ?l_sheet_names,
            "sheet not found"
        );
        return Err(FormError::SheetReadError {
            path: path.to_path_buf(),
            sheet_name: sheet_name.to_string(),
            sheets_available: l_sheet_names,
            message: "sheet not found".to_string(),
        });
    }

    workbook
        .worksheet_range(sheet_name)
        .map_err(|e| FormError::SheetReadError {
            path: path.to_path_buf(),
            sheet_name: sheet_name.to_string(),
            sheets_available: l_sheet_names.clone(),
            message: e.to_string(),
        })
}

fn find_column(l_headers: &[String], l_names: &[&str]) -> Option<usize> {
    l_names
        .iter()
        .find_map(|name| l_headers.iter().position(|header| header == name))
}

/// Render one cell as trimmed text; integral floats drop their fraction.
fn derive_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(val) => val.trim().to_string(),
        Data::Float(val) if val.is_finite() && val.fract() == 0.0 => format!("{val:.0}"),
        Data::Int(val) => val.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_source(path: &Path, sheet_name: &str, l_rows: &[Vec<&str>]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).unwrap();
        for (n_row, row) in l_rows.iter().enumerate() {
            for (n_col, c_text) in row.iter().enumerate() {
                if !c_text.is_empty() {
                    worksheet
                        .write_string(n_row as u32, n_col as u16, *c_text)
                        .unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn load_work_orders_reads_core_columns_and_extras() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("master.xlsx");
        write_source(
            &path_file,
            "Work Orders",
            &[
                vec!["S.No", "Name of Contractor", "Agreement No.", "Name of Work"],
                vec!["1", " M/s Sharma Constructions ", "123/2023-24", "Road repair"],
                vec!["", "", "", ""],
                vec!["2", "Verma Bros", "45-2024", "Wiring"],
            ],
        );

        let l_records = load_work_orders(&path_file, "Work Orders").unwrap();
        assert_eq!(l_records.len(), 2);
        assert_eq!(l_records[0].contractor_name, "M/s Sharma Constructions");
        assert_eq!(l_records[0].agreement_number, "123/2023-24");
        assert_eq!(l_records[0].work_name, "Road repair");
        assert_eq!(l_records[0].extras.get("S.No").map(String::as_str), Some("1"));
        assert_eq!(l_records[1].agreement_number, "45-2024");
    }

    #[test]
    fn load_work_orders_accepts_agreement_alias_and_numbers() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("alias.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Work Orders").unwrap();
        worksheet.write_string(0, 0, "Name of Contractor").unwrap();
        worksheet.write_string(0, 1, "Agreement No").unwrap();
        worksheet.write_string(1, 0, "Rao").unwrap();
        worksheet.write_number(1, 1, 123.0).unwrap();
        workbook.save(&path_file).unwrap();

        let l_records = load_work_orders(&path_file, "Work Orders").unwrap();
        assert_eq!(l_records.len(), 1);
        assert_eq!(l_records[0].agreement_number, "123");
        assert_eq!(l_records[0].work_name, "");
    }

    #[test]
    fn load_work_orders_missing_sheet_lists_available() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("other.xlsx");
        write_source(&path_file, "Sheet1", &[vec!["Name of Contractor"]]);

        match load_work_orders(&path_file, "Work Orders") {
            Err(FormError::SheetReadError {
                sheets_available, ..
            }) => assert_eq!(sheets_available, vec!["Sheet1".to_string()]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_work_orders_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("absent.xlsx");
        assert!(matches!(
            load_work_orders(&path_file, "Work Orders"),
            Err(FormError::SourceNotFound(_))
        ));
    }

    #[test]
    fn load_work_orders_header_only_yields_no_records() {
        let tmp = tempfile::tempdir().unwrap();
        let path_file = tmp.path().join("header.xlsx");
        write_source(
            &path_file,
            "Work Orders",
            &[vec!["Name of Contractor", "Agreement No.", "Name of Work"]],
        );
        assert!(load_work_orders(&path_file, "Work Orders").unwrap().is_empty());
    }

    #[test]
    fn derive_cell_text_cases() {
        assert_eq!(derive_cell_text(&Data::Empty), "");
        assert_eq!(derive_cell_text(&Data::Float(123.0)), "123");
        assert_eq!(derive_cell_text(&Data::Float(12.5)), "12.5");
        assert_eq!(derive_cell_text(&Data::String("  x ".to_string())), "x");
        assert_eq!(derive_cell_text(&Data::Int(7)), "7");
    }
}
