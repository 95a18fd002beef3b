//! Office suite command-line conversion.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::chain::Converter;
use crate::process::{
    derive_output_path, ensure_output, remove_stale_output, resolve_binary, run_with_timeout,
};
use crate::spec::{ConvertError, EnumDocumentFormat};

/// `soffice --headless --convert-to {ext} --outdir DIR FILE`.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    name: String,
    format: EnumDocumentFormat,
    bin: String,
    timeout: Duration,
}

impl SofficeConverter {
    /// Converter producing `format` with the office binary `bin`.
    pub fn new(format: EnumDocumentFormat, bin: &str, timeout: Duration) -> Self {
        Self {
            name: format!("soffice-{}", format.extension()),
            format,
            bin: bin.to_string(),
            timeout,
        }
    }
}

impl Converter for SofficeConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> EnumDocumentFormat {
        self.format
    }

    fn convert(&self, path_file_in: &Path, path_dir_out: &Path) -> Result<PathBuf, ConvertError> {
        let path_bin = resolve_binary(&self.bin)?;
        let path_file_in_abs =
            std::path::absolute(path_file_in).map_err(|source| ConvertError::Io {
                path: path_file_in.to_path_buf(),
                source,
            })?;

        let path_file_out =
            derive_output_path(path_file_in, path_dir_out, self.format.extension());
        remove_stale_output(&path_file_out)?;

        let mut command = Command::new(path_bin);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg(self.format.extension())
            .arg("--outdir")
            .arg(path_dir_out)
            .arg(&path_file_in_abs);
        run_with_timeout(command, path_file_in, self.timeout)?;

        ensure_output(path_file_in, path_file_out)
    }
}
