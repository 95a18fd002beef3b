//! Name filters, path helpers, worker limits and run naming.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use filetime::FileTime;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::conf::{C_ARCHIVE_TS_FORMAT, C_RUN_DIR_TS_FORMAT};
use crate::spec::FsError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

/// Compiled include/exclude globs; an empty include list admits everything.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpecNamePatterns {
    pub(crate) patterns_include: Option<GlobSet>,
    pub(crate) patterns_exclude: Option<GlobSet>,
}

impl SpecNamePatterns {
    pub(crate) fn from_raw(
        patterns_include: &[String],
        patterns_exclude: &[String],
    ) -> Result<Self, FsError> {
        Ok(Self {
            patterns_include: _compile(patterns_include)?,
            patterns_exclude: _compile(patterns_exclude)?,
        })
    }

    pub(crate) fn is_selected(&self, value: &str) -> bool {
        let if_included = self
            .patterns_include
            .as_ref()
            .is_none_or(|p| p.is_match(value));
        let if_excluded = self
            .patterns_exclude
            .as_ref()
            .is_some_and(|p| p.is_match(value));
        if_included && !if_excluded
    }
}

fn _compile(patterns: &[String]) -> Result<Option<GlobSet>, FsError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|e| FsError::InvalidPattern(e.to_string()))?);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| FsError::InvalidPattern(e.to_string()))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

pub(crate) fn absolutize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

pub(crate) fn derive_mtime(path: &Path) -> Option<FileTime> {
    fs::metadata(path)
        .ok()
        .map(|meta| FileTime::from_last_modification_time(&meta))
}

pub(crate) fn derive_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Worker count for batch stages: `num_workers_max` clamped to the CPU count,
/// or the CPU count clamped to `1..=8`.
pub fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}

/// Run directory name, e.g. `BLANK_SD_SHEETS_18-10-2026_14-05`.
pub fn derive_run_dir_name(prefix: &str, ts: NaiveDateTime) -> String {
    format!("{prefix}_{}", ts.format(C_RUN_DIR_TS_FORMAT))
}

/// Archive file name, e.g. `PDF_Export_18102026_1405.zip`.
pub fn derive_archive_name(prefix: &str, ts: NaiveDateTime) -> String {
    format!("{prefix}_Export_{}.zip", ts.format(C_ARCHIVE_TS_FORMAT))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
