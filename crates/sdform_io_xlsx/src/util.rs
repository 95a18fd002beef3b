//! Stateless helpers: page labels, sheet names, batching and file naming.

use std::collections::BTreeSet;

use crate::conf::{
    C_LABEL_FALLBACK_PREFIX, C_LABEL_UNKNOWN, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_AGREEMENT_YEAR_RANGE,
    TUP_CONTRACTOR_PREFIXES, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{FormError, SpecBatch, SpecWorkOrderRecord};

////////////////////////////////////////////////////////////////////////////////
// #region PageLabel

/// Derive the page label `"{short_name} {agreement_prefix}"` for one work order.
///
/// Total: blank inputs fall back to `Unknown` for the contractor and to
/// `Work_{agreement_prefix}` when nothing printable remains.
///
/// ```
/// use sdform_io_xlsx::derive_label;
/// assert_eq!(derive_label("M/s Sharma Constructions", "123/2023"), "Sharma 123");
/// ```
pub fn derive_label(contractor_name: &str, agreement_number: &str) -> String {
    let c_short_name = derive_contractor_short_name(contractor_name);
    let c_agreement_prefix = derive_agreement_prefix(agreement_number);

    let c_label = truncate_sheet_name(&strip_illegal_chars(&format!(
        "{c_short_name} {c_agreement_prefix}"
    )));
    if !c_label.trim().is_empty() {
        return c_label.trim().to_string();
    }

    truncate_sheet_name(&strip_illegal_chars(&format!(
        "{C_LABEL_FALLBACK_PREFIX}{c_agreement_prefix}"
    )))
    .trim()
    .to_string()
}

/// First word of the contractor name after removing one leading `M/s` prefix.
pub fn derive_contractor_short_name(contractor_name: &str) -> String {
    let mut c_name = contractor_name.trim();
    if let Some(c_prefix) = TUP_CONTRACTOR_PREFIXES
        .iter()
        .find(|c_prefix| c_name.starts_with(**c_prefix))
    {
        c_name = c_name[c_prefix.len()..].trim();
    }

    c_name
        .split_whitespace()
        .next()
        .unwrap_or(C_LABEL_UNKNOWN)
        .to_string()
}

/// Agreement number up to the first `/`, else up to the first `-`, else verbatim.
pub fn derive_agreement_prefix(agreement_number: &str) -> String {
    let c_agreement = agreement_number.trim();
    let c_prefix = match c_agreement.split_once('/') {
        Some((head, _)) => head,
        None => match c_agreement.split_once('-') {
            Some((head, _)) => head,
            None => c_agreement,
        },
    };
    c_prefix.to_string()
}

/// Remove every character Excel rejects in sheet names.
pub fn strip_illegal_chars(name: &str) -> String {
    name.chars()
        .filter(|c| !TUP_EXCEL_ILLEGAL.contains(c))
        .collect()
}

/// Cut to the Excel sheet name length limit, counting chars.
pub fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Create suffixed sheet name (`base__2`, `base__3`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, n_idx_suffix: usize) -> String {
    let c_sheet_name_suffix = format!("__{n_idx_suffix}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

/// Return `name` or the first free suffixed variant, and record it in `set_names_lower`.
///
/// Names are compared case-insensitively because Excel treats `ABC` and `abc` as the
/// same sheet.
pub fn derive_unique_sheet_name(name: &str, set_names_lower: &mut BTreeSet<String>) -> String {
    if set_names_lower.insert(name.to_lowercase()) {
        return name.to_string();
    }

    let mut n_idx = 2usize;
    loop {
        let candidate = create_sheet_identifier(name, n_idx);
        if set_names_lower.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n_idx += 1;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Batching

/// Generate `(row_start, row_len)` chunks for `n_rows_total`.
pub fn generate_row_chunks(n_rows_total: usize, size_rows_chunk: usize) -> Vec<(usize, usize)> {
    let mut l_chunks = Vec::new();
    let mut n_row_cursor = 0;
    while n_row_cursor < n_rows_total {
        let n_rows_per_chunk = usize::min(size_rows_chunk, n_rows_total - n_row_cursor);
        l_chunks.push((n_row_cursor, n_rows_per_chunk));
        n_row_cursor += n_rows_per_chunk;
    }
    l_chunks
}

/// Partition `records` into consecutive batches of `batch_size`, numbered from 1.
pub fn split_batches(
    records: Vec<SpecWorkOrderRecord>,
    batch_size: usize,
) -> Result<Vec<SpecBatch>, FormError> {
    if batch_size == 0 {
        return Err(FormError::InvalidBatchSize(batch_size));
    }

    let l_chunks = generate_row_chunks(records.len(), batch_size);
    let mut it_records = records.into_iter();
    Ok(l_chunks
        .into_iter()
        .enumerate()
        .map(|(n_idx_chunk, (_, n_rows_chunk))| SpecBatch {
            records: it_records.by_ref().take(n_rows_chunk).collect(),
            batch_number: n_idx_chunk + 1,
            size_max: batch_size,
        })
        .collect())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileNaming

/// First 4-digit window of `agreement_number` inside the accepted year range.
pub fn derive_agreement_year(agreement_number: &str) -> Option<u32> {
    let l_chars: Vec<char> = agreement_number.chars().collect();
    let (n_year_min, n_year_max) = TUP_AGREEMENT_YEAR_RANGE;
    l_chars.windows(4).find_map(|window| {
        if !window.iter().all(char::is_ascii_digit) {
            return None;
        }
        let n_year: u32 = window.iter().collect::<String>().parse().ok()?;
        (n_year_min..=n_year_max)
            .contains(&n_year)
            .then_some(n_year)
    })
}

/// `{prefix}_Batch_{nn}_{year}.{ext}` with a zero-padded two-digit batch number.
pub fn derive_batch_file_name(prefix: &str, batch_number: usize, year: u32, ext: &str) -> String {
    format!("{prefix}_Batch_{batch_number:02}_{year}.{ext}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<SpecWorkOrderRecord> {
        (0..n)
            .map(|i| SpecWorkOrderRecord::new(format!("M/s Firm{i} Ltd"), format!("{i}/2024"), ""))
            .collect()
    }

    #[test]
    fn derive_label_reference_case() {
        assert_eq!(
            derive_label("M/s Sharma Constructions", "123/2023"),
            "Sharma 123"
        );
    }

    #[test]
    fn derive_label_blank_inputs() {
        assert_eq!(derive_label("", ""), "Unknown");
        assert_eq!(derive_label("   ", "  "), "Unknown");
    }

    #[test]
    fn derive_label_blank_agreement_keeps_short_name() {
        assert_eq!(derive_label("ABC Co", ""), "ABC");
    }

    #[test]
    fn derive_label_falls_back_when_nothing_printable_remains() {
        assert_eq!(derive_label("M/s ***", ""), "Work_");
        assert_eq!(derive_label("[?]", "77-A"), "77");
        assert_eq!(derive_label("[?]", "**-A"), "Work_");
    }

    #[test]
    fn derive_label_prefix_variants() {
        assert_eq!(derive_label("M/s. Verma & Sons", "45/2022"), "Verma 45");
        assert_eq!(derive_label("M/sGupta Traders", "9"), "Gupta 9");
        assert_eq!(derive_label("Mehta M/s Works", "1"), "Mehta 1");
        // Case-sensitive: lowercase prefix is a regular word.
        assert_eq!(derive_label("m/s Rao", "2"), "ms 2");
    }

    #[test]
    fn derive_label_agreement_dash_and_verbatim() {
        assert_eq!(derive_label("Kumar", "TND-2023-11"), "Kumar TND");
        assert_eq!(derive_label("Kumar", "AGR88"), "Kumar AGR88");
        assert_eq!(derive_label("Kumar", "12-3/2020"), "Kumar 12-3");
    }

    #[test]
    fn derive_label_is_total_and_bounded() {
        let l_inputs = [
            ("", ""),
            ("M/s", "/"),
            ("M/s.", "-"),
            ("a:b*c?d", "[x]/y"),
            ("ЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖ", "1234567890123456789"),
            ("\\\\\\", "::::"),
        ];
        for (c_contractor, c_agreement) in l_inputs {
            let c_label = derive_label(c_contractor, c_agreement);
            assert!(c_label.chars().count() <= N_LEN_EXCEL_SHEET_NAME_MAX, "{c_label}");
            assert!(!c_label.chars().any(|c| TUP_EXCEL_ILLEGAL.contains(&c)), "{c_label}");
            assert!(!c_label.is_empty());
        }
    }

    #[test]
    fn derive_unique_sheet_name_suffixes_case_insensitively() {
        let mut set_names = BTreeSet::new();
        assert_eq!(derive_unique_sheet_name("Sharma 1", &mut set_names), "Sharma 1");
        assert_eq!(derive_unique_sheet_name("SHARMA 1", &mut set_names), "SHARMA 1__2");
        assert_eq!(derive_unique_sheet_name("Sharma 1", &mut set_names), "Sharma 1__3");

        let c_long = "X".repeat(31);
        let c_first = derive_unique_sheet_name(&c_long, &mut set_names);
        let c_second = derive_unique_sheet_name(&c_long, &mut set_names);
        assert_eq!(c_first, c_long);
        assert_eq!(c_second.chars().count(), 31);
        assert!(c_second.ends_with("__2"));
    }

    #[test]
    fn split_batches_52_by_25() {
        let l_batches = split_batches(records(52), 25).unwrap();
        let l_sizes: Vec<usize> = l_batches.iter().map(|b| b.records.len()).collect();
        let l_numbers: Vec<usize> = l_batches.iter().map(|b| b.batch_number).collect();
        assert_eq!(l_sizes, vec![25, 25, 2]);
        assert_eq!(l_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn split_batches_is_lossless_and_ordered() {
        for n_total in [1usize, 7, 25, 26, 50, 101] {
            for n_size in [1usize, 3, 25, 200] {
                let l_source = records(n_total);
                let l_batches = split_batches(l_source.clone(), n_size).unwrap();
                let l_joined: Vec<_> = l_batches
                    .iter()
                    .flat_map(|b| b.records.iter().cloned())
                    .collect();
                assert_eq!(l_joined, l_source);
                for batch in &l_batches[..l_batches.len() - 1] {
                    assert_eq!(batch.records.len(), n_size);
                }
            }
        }
    }

    #[test]
    fn split_batches_rejects_zero_and_accepts_empty() {
        assert!(matches!(
            split_batches(records(3), 0),
            Err(FormError::InvalidBatchSize(0))
        ));
        assert!(split_batches(Vec::new(), 25).unwrap().is_empty());
    }

    #[test]
    fn derive_agreement_year_cases() {
        assert_eq!(derive_agreement_year("123/2023-24"), Some(2023));
        assert_eq!(derive_agreement_year("TN/19992021"), Some(2021));
        assert_eq!(derive_agreement_year("45/23-24"), None);
        assert_eq!(derive_agreement_year(""), None);
    }

    #[test]
    fn derive_batch_file_name_cases() {
        assert_eq!(
            derive_batch_file_name("Blank_Security_Refund", 3, 2024, "xlsx"),
            "Blank_Security_Refund_Batch_03_2024.xlsx"
        );
        assert_eq!(
            derive_batch_file_name("P", 112, 2024, "xlsx"),
            "P_Batch_112_2024.xlsx"
        );
    }
}
