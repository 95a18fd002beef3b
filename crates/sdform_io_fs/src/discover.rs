//! Input discovery, run directory creation and latest-run lookup.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::spec::{FsError, SpecListOptions};
use crate::util::{
    SpecNamePatterns, absolutize_path, derive_file_name, derive_mtime, derive_run_dir_name,
};

/// Return the absolute path of the first existing candidate file.
///
/// Candidates are probed in order; relative paths resolve against the
/// current directory.
pub fn discover_input_file<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, FsError> {
    for candidate in candidates {
        let path_candidate = candidate.as_ref();
        if path_candidate.is_file() {
            let path_resolved = absolutize_path(path_candidate);
            info!(path = %path_resolved.display(), "input file found");
            return Ok(path_resolved);
        }
        debug!(path = %path_candidate.display(), "input candidate missing");
    }
    Err(FsError::InputNotFound {
        candidates: candidates
            .iter()
            .map(|c| absolutize_path(c.as_ref()))
            .collect(),
    })
}

/// Create `{prefix}_{DD-MM-YYYY_HH-MM}` under `path_dir_root` and return it.
///
/// Reusing an existing directory from the same minute is allowed.
pub fn create_run_dir(
    path_dir_root: &Path,
    prefix: &str,
    ts: NaiveDateTime,
) -> Result<PathBuf, FsError> {
    let path_dir_run = path_dir_root.join(derive_run_dir_name(prefix, ts));
    fs::create_dir_all(&path_dir_run).map_err(|e| FsError::DirectoryFailed {
        path: path_dir_run.clone(),
        message: e.to_string(),
    })?;
    info!(path = %path_dir_run.display(), "run directory ready");
    Ok(path_dir_run)
}

/// List workbook files directly inside `path_dir`, sorted by file name.
pub fn list_workbooks(
    path_dir: &Path,
    spec_list_options: &SpecListOptions,
) -> Result<Vec<PathBuf>, FsError> {
    let spec_pats = SpecNamePatterns::from_raw(
        &spec_list_options.patterns_include_files,
        &spec_list_options.patterns_exclude_files,
    )?;
    list_selected_files(path_dir, &spec_pats)
}

fn list_selected_files(
    path_dir: &Path,
    spec_pats: &SpecNamePatterns,
) -> Result<Vec<PathBuf>, FsError> {
    let iter_entries = fs::read_dir(path_dir).map_err(|e| FsError::DirectoryFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut l_files: Vec<PathBuf> = iter_entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && spec_pats.is_selected(&derive_file_name(path)))
        .collect();
    l_files.sort_by_key(|path| derive_file_name(path));
    Ok(l_files)
}

/// Find the most recently modified `{prefix}_*` directory holding at least one
/// workbook, searching every root. Ties resolve to the greater name.
pub fn find_latest_run_dir<P: AsRef<Path>>(
    roots: &[P],
    prefix: &str,
    spec_list_options: &SpecListOptions,
) -> Result<PathBuf, FsError> {
    let spec_pats = SpecNamePatterns::from_raw(
        &spec_list_options.patterns_include_files,
        &spec_list_options.patterns_exclude_files,
    )?;
    let c_dir_prefix = format!("{prefix}_");

    let mut l_candidates = Vec::new();
    for root in roots {
        let path_root = root.as_ref();
        let Ok(iter_entries) = fs::read_dir(path_root) else {
            debug!(root = %path_root.display(), "search root unreadable");
            continue;
        };
        for path_dir in iter_entries.filter_map(Result::ok).map(|e| e.path()) {
            let name_dir = derive_file_name(&path_dir);
            if !path_dir.is_dir() || !name_dir.starts_with(&c_dir_prefix) {
                continue;
            }
            match list_selected_files(&path_dir, &spec_pats) {
                Ok(l_files) if !l_files.is_empty() => {
                    if let Some(mtime) = derive_mtime(&path_dir) {
                        l_candidates.push((mtime, name_dir, path_dir));
                    }
                }
                Ok(_) => debug!(dir = %path_dir.display(), "run directory holds no workbooks"),
                Err(e) => warn!(dir = %path_dir.display(), "run directory unreadable: {e}"),
            }
        }
    }

    l_candidates
        .into_iter()
        .max_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)))
        .map(|(_, _, path_dir)| {
            info!(path = %path_dir.display(), "latest run directory");
            path_dir
        })
        .ok_or_else(|| FsError::RunDirNotFound {
            roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
            prefix: prefix.to_string(),
        })
}

/// Move the file or directory at `path` into `path_dir_dest`, keeping its name.
///
/// An entry of the same name already in `path_dir_dest` is replaced.
pub fn move_into_dir(path: &Path, path_dir_dest: &Path) -> Result<PathBuf, FsError> {
    let derive_dir_error = |path_err: &Path, e: std::io::Error| FsError::DirectoryFailed {
        path: path_err.to_path_buf(),
        message: e.to_string(),
    };

    fs::create_dir_all(path_dir_dest).map_err(|e| derive_dir_error(path_dir_dest, e))?;
    let path_target = path_dir_dest.join(derive_file_name(path));
    if path_target.is_dir() {
        warn!(path = %path_target.display(), "replacing previous directory");
        fs::remove_dir_all(&path_target).map_err(|e| derive_dir_error(&path_target, e))?;
    } else if path_target.exists() {
        warn!(path = %path_target.display(), "replacing previous file");
        fs::remove_file(&path_target).map_err(|e| derive_dir_error(&path_target, e))?;
    }

    fs::rename(path, &path_target).map_err(|e| derive_dir_error(path, e))?;
    info!(from = %path.display(), to = %path_target.display(), "filed");
    Ok(path_target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use filetime::{FileTime, set_file_mtime};

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, txt).expect("write text");
    }

    #[test]
    fn discover_input_file_checks_candidates_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path_first = tmp.path().join("a").join("work_order_master.xlsx");
        let path_second = tmp.path().join("b").join("work_order_master.xlsx");
        write_text(&path_second, "x");

        let path_found = discover_input_file(&[&path_first, &path_second]).unwrap();
        assert_eq!(path_found, fs::canonicalize(&path_second).unwrap());

        write_text(&path_first, "x");
        let path_found = discover_input_file(&[&path_first, &path_second]).unwrap();
        assert_eq!(path_found, fs::canonicalize(&path_first).unwrap());
    }

    #[test]
    fn discover_input_file_lists_every_candidate_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let l_candidates = [tmp.path().join("x.xlsx"), tmp.path().join("y.xlsx")];
        let err = discover_input_file(&l_candidates).unwrap_err();
        match &err {
            FsError::InputNotFound { candidates } => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        let txt = err.to_string();
        assert!(txt.contains("x.xlsx") && txt.contains("y.xlsx"));
    }

    #[test]
    fn create_run_dir_uses_timestamp_name() {
        let tmp = tempfile::tempdir().unwrap();
        let ts = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .unwrap();
        let path_dir = create_run_dir(tmp.path(), "BLANK_SD_SHEETS", ts).unwrap();
        assert!(path_dir.is_dir());
        assert_eq!(derive_file_name(&path_dir), "BLANK_SD_SHEETS_31-12-2024_23-59");
        assert_eq!(create_run_dir(tmp.path(), "BLANK_SD_SHEETS", ts).unwrap(), path_dir);
    }

    #[test]
    fn list_workbooks_skips_lock_files_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        write_text(&tmp.path().join("B_Batch_02_2023.xlsx"), "x");
        write_text(&tmp.path().join("B_Batch_01_2023.xlsx"), "x");
        write_text(&tmp.path().join("~$B_Batch_01_2023.xlsx"), "x");
        write_text(&tmp.path().join("readme.txt"), "x");
        fs::create_dir_all(tmp.path().join("sub.xlsx")).unwrap();

        let l_files = list_workbooks(tmp.path(), &SpecListOptions::default()).unwrap();
        let l_names: Vec<_> = l_files.iter().map(|p| derive_file_name(p)).collect();
        assert_eq!(l_names, vec!["B_Batch_01_2023.xlsx", "B_Batch_02_2023.xlsx"]);
    }

    #[test]
    fn find_latest_run_dir_prefers_newest_with_workbooks() {
        let tmp = tempfile::tempdir().unwrap();
        let path_root_a = tmp.path().join("root_a");
        let path_root_b = tmp.path().join("root_b");
        let path_old = path_root_a.join("BLANK_SD_SHEETS_01-01-2024_10-00");
        let path_new = path_root_b.join("BLANK_SD_SHEETS_02-01-2024_10-00");
        let path_empty = path_root_a.join("BLANK_SD_SHEETS_03-01-2024_10-00");
        let path_other = path_root_a.join("OTHER_04-01-2024_10-00");
        write_text(&path_old.join("a.xlsx"), "x");
        write_text(&path_new.join("b.xlsx"), "x");
        write_text(&path_empty.join("~$lock.xlsx"), "x");
        write_text(&path_other.join("c.xlsx"), "x");

        set_file_mtime(&path_old, FileTime::from_unix_time(1_000, 0)).unwrap();
        set_file_mtime(&path_new, FileTime::from_unix_time(2_000, 0)).unwrap();
        set_file_mtime(&path_empty, FileTime::from_unix_time(3_000, 0)).unwrap();
        set_file_mtime(&path_other, FileTime::from_unix_time(4_000, 0)).unwrap();

        let path_found = find_latest_run_dir(
            &[&path_root_a, &path_root_b],
            "BLANK_SD_SHEETS",
            &SpecListOptions::default(),
        )
        .unwrap();
        assert_eq!(path_found, path_new);
    }

    #[test]
    fn find_latest_run_dir_missing_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let err = find_latest_run_dir(
            &[tmp.path().join("nope")],
            "BLANK_SD_SHEETS",
            &SpecListOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FsError::RunDirNotFound { .. }));
    }

    #[test]
    fn move_into_dir_files_and_replaces_previous() {
        let tmp = tempfile::tempdir().unwrap();
        let path_dir_docs = tmp.path().join("PDF_Output_BLANK_SD_SHEETS_01-01-2024_10-00");
        write_text(&path_dir_docs.join("a.pdf"), "new");
        let path_file_zip = tmp.path().join("PDF_Export_01012024_1000.zip");
        write_text(&path_file_zip, "zip");

        let path_dir_files = tmp.path().join("Output_Record").join("PDF_Files");
        write_text(
            &path_dir_files
                .join("PDF_Output_BLANK_SD_SHEETS_01-01-2024_10-00")
                .join("old.pdf"),
            "old",
        );

        let path_moved = move_into_dir(&path_dir_docs, &path_dir_files).unwrap();
        assert!(!path_dir_docs.exists());
        assert!(path_moved.join("a.pdf").is_file());
        assert!(!path_moved.join("old.pdf").exists());

        let path_dir_archives = tmp.path().join("Output_Record").join("PDF_Archives");
        let path_zip_moved = move_into_dir(&path_file_zip, &path_dir_archives).unwrap();
        assert_eq!(path_zip_moved, path_dir_archives.join("PDF_Export_01012024_1000.zip"));
        assert!(path_zip_moved.is_file());
    }

    #[test]
    fn move_into_dir_missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            move_into_dir(&tmp.path().join("absent"), &tmp.path().join("dest")),
            Err(FsError::DirectoryFailed { .. })
        ));
    }
}
