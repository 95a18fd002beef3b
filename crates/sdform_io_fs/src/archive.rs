//! Zip archiving of converted documents.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::report::ReportArchive;
use crate::spec::FsError;
use crate::util::derive_file_name;

/// Store `files` flat (by file name) in a deflated zip at `path_file_zip`.
///
/// Unreadable inputs and duplicate names are recorded in the report and
/// skipped. Failing to create or finalize the archive itself is an error.
pub fn create_zip_archive<P: AsRef<Path>>(
    files: &[P],
    path_file_zip: &Path,
) -> Result<ReportArchive, FsError> {
    let derive_archive_error = |message: String| FsError::ArchiveFailed {
        path: path_file_zip.to_path_buf(),
        message,
    };

    let file_zip = File::create(path_file_zip).map_err(|e| derive_archive_error(e.to_string()))?;
    let mut zip = ZipWriter::new(file_zip);
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    let mut report = ReportArchive {
        path_file_zip: path_file_zip.to_path_buf(),
        ..Default::default()
    };
    let mut set_names = BTreeSet::new();
    for file in files {
        let path_file = file.as_ref();
        report.cnt_scanned += 1;

        let name_entry = derive_file_name(path_file);
        if !set_names.insert(name_entry.clone()) {
            let c_msg = format!("Duplicate archive entry {name_entry:?} skipped.");
            warn!(path = %path_file.display(), "{c_msg}");
            report.add_warning(c_msg);
            continue;
        }

        let mut file_in = match File::open(path_file) {
            Ok(v) => v,
            Err(e) => {
                warn!(path = %path_file.display(), "cannot read archive input: {e}");
                report.add_error(path_file.to_path_buf(), e.to_string());
                continue;
            }
        };
        zip.start_file(name_entry, options)
            .map_err(|e| derive_archive_error(e.to_string()))?;
        let n_bytes =
            io::copy(&mut file_in, &mut zip).map_err(|e| derive_archive_error(e.to_string()))?;
        report.cnt_added += 1;
        report.cnt_bytes += n_bytes;
    }
    zip.finish().map_err(|e| derive_archive_error(e.to_string()))?;

    info!(path = %path_file_zip.display(), "{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::PathBuf;
    use zip::ZipArchive;

    #[test]
    fn create_zip_archive_stores_given_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path_a = tmp.path().join("Batch_01.pdf");
        let path_b = tmp.path().join("Batch_02.pdf");
        std::fs::write(&path_a, "first").unwrap();
        std::fs::write(&path_b, "second").unwrap();
        std::fs::write(tmp.path().join("Batch_03.pdf"), "failed run leftover").unwrap();
        let path_zip = tmp.path().join("PDF_Export.zip");

        let report = create_zip_archive(&[&path_a, &path_b], &path_zip).unwrap();
        assert_eq!(report.cnt_added, 2);
        assert_eq!(report.cnt_bytes, 11);
        assert_eq!(report.error_count(), 0);

        let mut archive = ZipArchive::new(File::open(&path_zip).unwrap()).unwrap();
        let mut l_names: Vec<_> = archive.file_names().map(str::to_string).collect();
        l_names.sort();
        assert_eq!(l_names, vec!["Batch_01.pdf", "Batch_02.pdf"]);

        let mut txt = String::new();
        archive
            .by_name("Batch_02.pdf")
            .unwrap()
            .read_to_string(&mut txt)
            .unwrap();
        assert_eq!(txt, "second");
    }

    #[test]
    fn create_zip_archive_records_missing_and_duplicate_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let path_a = tmp.path().join("a").join("same.pdf");
        let path_b = tmp.path().join("b").join("same.pdf");
        std::fs::create_dir_all(path_a.parent().unwrap()).unwrap();
        std::fs::create_dir_all(path_b.parent().unwrap()).unwrap();
        std::fs::write(&path_a, "a").unwrap();
        std::fs::write(&path_b, "b").unwrap();
        let path_missing = tmp.path().join("missing.pdf");

        let report = create_zip_archive(
            &[&path_a, &path_b, &path_missing],
            &tmp.path().join("out.zip"),
        )
        .unwrap();
        assert_eq!(report.cnt_scanned, 3);
        assert_eq!(report.cnt_added, 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn create_zip_archive_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path_zip = tmp.path().join("nope").join("out.zip");
        let l_files: [PathBuf; 0] = [];
        assert!(matches!(
            create_zip_archive(&l_files, &path_zip),
            Err(FsError::ArchiveFailed { .. })
        ));
    }
}
