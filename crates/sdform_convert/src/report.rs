//! Conversion run report.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{ConvertChainError, SpecConverted};

/// Outcome of converting a list of workbooks; failures never stop the run.
#[derive(Debug, Default)]
pub struct ReportConvert {
    /// Number of workbooks attempted.
    pub cnt_scanned: u64,
    /// Produced documents in input order.
    pub converted: Vec<SpecConverted>,
    /// Per-workbook failures in input order.
    pub errors: Vec<ConvertChainError>,
}

impl ReportConvert {
    /// Number of produced documents.
    pub fn converted_count(&self) -> usize {
        self.converted.len()
    }

    /// Number of failed workbooks.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_converted".to_string(), self.converted_count() as u64);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} converted={} errors={}",
            dict_counts["cnt_scanned"], dict_counts["cnt_converted"], dict_counts["cnt_errors"]
        )
    }
}

impl fmt::Display for ReportConvert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[CONVERT]"))
    }
}
