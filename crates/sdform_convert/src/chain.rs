//! Converter seam, fallback chain and per-file conversion runs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::docx::DocxConverter;
use crate::html::HtmlConverter;
use crate::report::ReportConvert;
use crate::soffice::SofficeConverter;
use crate::spec::{
    ConvertChainError, ConvertError, EnumDocumentFormat, SpecConvertFailure, SpecConvertOptions,
    SpecConverted,
};

/// File-in/file-out document converter.
pub trait Converter: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Format of the produced document.
    fn format(&self) -> EnumDocumentFormat;

    /// Convert `path_file_in` into a document inside `path_dir_out` and return its path.
    fn convert(&self, path_file_in: &Path, path_dir_out: &Path) -> Result<PathBuf, ConvertError>;
}

/// Ordered strategies; the first success wins.
#[derive(Default)]
pub struct ConverterChain {
    converters: Vec<Box<dyn Converter>>,
}

impl ConverterChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy.
    pub fn with(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.push(Box::new(converter));
        self
    }

    /// Default PDF chain: office suite, then HTML rendered by the configured renderer.
    pub fn default_pdf(spec_options: &SpecConvertOptions) -> Self {
        Self::new()
            .with(SofficeConverter::new(
                EnumDocumentFormat::Pdf,
                &spec_options.bin_soffice,
                spec_options.timeout,
            ))
            .with(HtmlConverter::new(
                spec_options.bin_renderer.clone(),
                spec_options.timeout,
            ))
    }

    /// Default Word chain: in-process DOCX, then office suite.
    pub fn default_word(spec_options: &SpecConvertOptions) -> Self {
        Self::new().with(DocxConverter).with(SofficeConverter::new(
            EnumDocumentFormat::Docx,
            &spec_options.bin_soffice,
            spec_options.timeout,
        ))
    }

    /// Default chain producing `format`.
    pub fn for_format(format: EnumDocumentFormat, spec_options: &SpecConvertOptions) -> Self {
        match format {
            EnumDocumentFormat::Pdf => Self::default_pdf(spec_options),
            EnumDocumentFormat::Docx => Self::default_word(spec_options),
            EnumDocumentFormat::Html => {
                Self::new().with(HtmlConverter::new(None, spec_options.timeout))
            }
        }
    }

    /// Strategy names in attempt order.
    pub fn names(&self) -> Vec<String> {
        self.converters.iter().map(|c| c.name().to_string()).collect()
    }

    /// Names of strategies whose documents are not `format`.
    pub fn names_mismatched(&self, format: EnumDocumentFormat) -> Vec<String> {
        self.converters
            .iter()
            .filter(|c| c.format() != format)
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Try each strategy in order for one input.
    pub fn convert(
        &self,
        path_file_in: &Path,
        path_dir_out: &Path,
    ) -> Result<SpecConverted, ConvertChainError> {
        let mut failures = Vec::new();
        for converter in &self.converters {
            match converter.convert(path_file_in, path_dir_out) {
                Ok(path_file_out) => {
                    info!(
                        converter = converter.name(),
                        input = %path_file_in.display(),
                        output = %path_file_out.display(),
                        "converted"
                    );
                    return Ok(SpecConverted {
                        path_file_in: path_file_in.to_path_buf(),
                        path_file_out,
                        converter: converter.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        converter = converter.name(),
                        input = %path_file_in.display(),
                        "converter failed: {e}"
                    );
                    failures.push(SpecConvertFailure {
                        converter: converter.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Err(ConvertChainError {
            path: path_file_in.to_path_buf(),
            failures,
        })
    }
}

/// Convert every file through `chain` into `path_dir_out`, isolating failures.
///
/// Files run one after another; office suites share a user profile and do not
/// tolerate concurrent instances.
pub fn convert_workbooks<P: AsRef<Path>>(
    files: &[P],
    chain: &ConverterChain,
    path_dir_out: &Path,
) -> ReportConvert {
    let mut report = ReportConvert::default();
    let res_dir = fs::create_dir_all(path_dir_out);

    for file in files {
        let path_file_in = file.as_ref();
        report.cnt_scanned += 1;

        if let Err(e) = &res_dir {
            report.errors.push(ConvertChainError {
                path: path_file_in.to_path_buf(),
                failures: vec![SpecConvertFailure {
                    converter: "setup".to_string(),
                    message: format!(
                        "cannot create output directory {}: {e}",
                        path_dir_out.display()
                    ),
                }],
            });
            continue;
        }

        match chain.convert(path_file_in, path_dir_out) {
            Ok(spec_converted) => report.converted.push(spec_converted),
            Err(e) => {
                warn!("{e}");
                report.errors.push(e);
            }
        }
    }

    info!(dir = %path_dir_out.display(), "{report}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeConverter {
        name: &'static str,
        if_ok: bool,
    }

    impl Converter for FakeConverter {
        fn name(&self) -> &str {
            self.name
        }

        fn format(&self) -> EnumDocumentFormat {
            EnumDocumentFormat::Pdf
        }

        fn convert(
            &self,
            path_file_in: &Path,
            path_dir_out: &Path,
        ) -> Result<PathBuf, ConvertError> {
            if !self.if_ok || path_file_in.to_string_lossy().contains("bad") {
                return Err(ConvertError::Unavailable {
                    tool: self.name.to_string(),
                    message: "not installed".to_string(),
                });
            }
            let path_file_out = path_dir_out.join(format!("{}.pdf", self.name));
            fs::write(&path_file_out, self.name).map_err(|source| ConvertError::Io {
                path: path_file_out.clone(),
                source,
            })?;
            Ok(path_file_out)
        }
    }

    #[test]
    fn chain_returns_first_success() {
        let tmp = tempfile::tempdir().unwrap();
        let chain = ConverterChain::new()
            .with(FakeConverter { name: "first", if_ok: false })
            .with(FakeConverter { name: "second", if_ok: true })
            .with(FakeConverter { name: "third", if_ok: true });

        let spec_converted = chain.convert(Path::new("a.xlsx"), tmp.path()).unwrap();
        assert_eq!(spec_converted.converter, "second");
        assert_eq!(spec_converted.path_file_out, tmp.path().join("second.pdf"));
        assert!(!tmp.path().join("third.pdf").exists());
    }

    #[test]
    fn chain_reports_every_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let chain = ConverterChain::new()
            .with(FakeConverter { name: "first", if_ok: false })
            .with(FakeConverter { name: "second", if_ok: false });

        let err = chain.convert(Path::new("a.xlsx"), tmp.path()).unwrap_err();
        assert_eq!(err.failures.len(), 2);
        assert_eq!(err.failures[0].converter, "first");
        assert_eq!(err.failures[1].converter, "second");
        assert!(err.to_string().contains("[second]"));
    }

    #[test]
    fn empty_chain_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ConverterChain::new()
            .convert(Path::new("a.xlsx"), tmp.path())
            .unwrap_err();
        assert!(err.failures.is_empty());
        assert!(err.to_string().contains("no converter configured"));
    }

    #[test]
    fn convert_workbooks_isolates_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let path_dir_out = tmp.path().join("out");
        let chain = ConverterChain::new().with(FakeConverter { name: "only", if_ok: true });

        let report = convert_workbooks(
            &["good_1.xlsx", "bad_2.xlsx", "good_3.xlsx"],
            &chain,
            &path_dir_out,
        );
        assert_eq!(report.cnt_scanned, 3);
        assert_eq!(report.converted_count(), 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].path, PathBuf::from("bad_2.xlsx"));
        assert_eq!(report.to_string(), "[CONVERT] scanned=3 converted=2 errors=1");
    }

    #[test]
    fn default_chains_order() {
        let spec_options = SpecConvertOptions::default();
        assert_eq!(
            ConverterChain::default_pdf(&spec_options).names(),
            vec!["soffice-pdf", "html-weasyprint"]
        );
        assert_eq!(
            ConverterChain::default_word(&spec_options).names(),
            vec!["docx-native", "soffice-docx"]
        );
    }

    #[test]
    fn names_mismatched_flags_other_formats() {
        let spec_options = SpecConvertOptions::default();
        for format in [
            EnumDocumentFormat::Pdf,
            EnumDocumentFormat::Docx,
            EnumDocumentFormat::Html,
        ] {
            assert!(
                ConverterChain::for_format(format, &spec_options)
                    .names_mismatched(format)
                    .is_empty()
            );
        }

        let chain = ConverterChain::default_pdf(&spec_options).with(DocxConverter);
        assert_eq!(chain.names_mismatched(EnumDocumentFormat::Pdf), vec!["docx-native"]);
    }
}
