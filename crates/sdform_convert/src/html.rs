//! HTML rendering of form workbooks, optionally printed to PDF by an external renderer.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use sdform_io_xlsx::conf::{
    C_DEDUCTION_HEADING, C_FORM_TITLE, EnumFieldLayout, TUP_CERTIFICATION, TUP_DEDUCTION_HEADERS,
    TUP_SIGNATURE_ROWS,
};
use sdform_io_xlsx::{SpecFormPage, read_form_pages};
use tracing::debug;

use crate::chain::Converter;
use crate::process::{
    derive_output_path, ensure_output, remove_stale_output, resolve_binary, run_with_timeout,
};
use crate::spec::{ConvertError, EnumDocumentFormat};

const C_HTML_STYLE: &str = r#"
@page { size: A4; margin: 1cm; }
body { font-family: Arial, sans-serif; font-size: 11px; line-height: 1.2; margin: 0; }
.page { page-break-after: always; }
.page:last-child { page-break-after: auto; }
.title { text-align: center; font-weight: bold; font-size: 16px; color: #000080;
  background-color: #E6E6FA; padding: 8px; border: 1px solid #000; }
.label { text-align: right; font-size: 9px; font-style: italic; }
.field { margin: 3px 0; }
.field-label { display: inline-block; width: 60%; }
.field-value { display: inline-block; width: 35%; min-height: 14px; border-bottom: 1px solid #000; }
.work-name { margin: 5px 0; }
.heading { font-weight: bold; margin-top: 12px; }
table { width: 100%; border-collapse: collapse; margin: 6px 0; }
th, td { border: 1px solid #000; padding: 5px; text-align: center; font-size: 10px; height: 14px; }
th { background-color: #E6E6FA; }
.certification { margin-top: 12px; font-size: 9px; }
.signatures { margin-top: 40px; display: flex; justify-content: space-between; }
.signature { width: 30%; text-align: center; border-top: 1px solid #000; padding-top: 5px; }
"#;

/// Renders every sheet as one HTML page; with a renderer binary the HTML is
/// printed to PDF and the intermediate file removed.
#[derive(Debug, Clone)]
pub struct HtmlConverter {
    name: String,
    bin_renderer: Option<String>,
    timeout: Duration,
}

impl HtmlConverter {
    /// `bin_renderer` is invoked as `bin_renderer IN.html OUT.pdf`.
    pub fn new(bin_renderer: Option<String>, timeout: Duration) -> Self {
        let name = match &bin_renderer {
            Some(bin) => {
                let c_stem = Path::new(bin)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| bin.clone());
                format!("html-{c_stem}")
            }
            None => "html".to_string(),
        };
        Self {
            name,
            bin_renderer,
            timeout,
        }
    }
}

impl Converter for HtmlConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> EnumDocumentFormat {
        if self.bin_renderer.is_some() {
            EnumDocumentFormat::Pdf
        } else {
            EnumDocumentFormat::Html
        }
    }

    fn convert(&self, path_file_in: &Path, path_dir_out: &Path) -> Result<PathBuf, ConvertError> {
        let path_bin = self.bin_renderer.as_deref().map(resolve_binary).transpose()?;

        let l_pages = read_form_pages(path_file_in).map_err(|e| ConvertError::Failed {
            path: path_file_in.to_path_buf(),
            message: e.to_string(),
        })?;
        let path_file_html = derive_output_path(path_file_in, path_dir_out, "html");
        fs::write(&path_file_html, render_html(&l_pages)).map_err(|source| ConvertError::Io {
            path: path_file_html.clone(),
            source,
        })?;

        let Some(path_bin) = path_bin else {
            return Ok(path_file_html);
        };
        let path_file_pdf = derive_output_path(path_file_in, path_dir_out, "pdf");
        remove_stale_output(&path_file_pdf)?;
        let mut command = Command::new(path_bin);
        command.arg(&path_file_html).arg(&path_file_pdf);
        let res_run = run_with_timeout(command, path_file_in, self.timeout);
        if let Err(e) = fs::remove_file(&path_file_html) {
            debug!(path = %path_file_html.display(), "intermediate html kept: {e}");
        }
        res_run?;
        ensure_output(path_file_in, path_file_pdf)
    }
}

/// Render `pages` into one standalone HTML document, one printed page per form.
pub fn render_html(pages: &[SpecFormPage]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(C_FORM_TITLE));
    let _ = writeln!(html, "<style>{C_HTML_STYLE}</style>\n</head>\n<body>");
    for page in pages {
        render_page(&mut html, page);
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn render_page(html: &mut String, page: &SpecFormPage) {
    let _ = writeln!(html, "<div class=\"page\">");
    let _ = writeln!(html, "<div class=\"title\">{}</div>", escape_html(C_FORM_TITLE));
    let _ = writeln!(html, "<div class=\"label\">{}</div>", escape_html(&page.page_title));

    for field in &page.fields {
        match field.rule_layout {
            EnumFieldLayout::LabelWide => {
                let _ = writeln!(
                    html,
                    "<div class=\"work-name\">{} {}</div>",
                    escape_html(&field.label),
                    escape_html(&field.value)
                );
            }
            EnumFieldLayout::ValueMerged | EnumFieldLayout::ValueCell => {
                let _ = writeln!(
                    html,
                    "<div class=\"field\"><span class=\"field-label\">{}</span>\
                     <span class=\"field-value\">{}</span></div>",
                    escape_html(&field.label),
                    escape_html(&field.value)
                );
            }
        }
    }

    let _ = writeln!(html, "<div class=\"heading\">{}</div>", escape_html(C_DEDUCTION_HEADING));
    html.push_str("<table>\n<tr>");
    for (n_idx, c_header) in TUP_DEDUCTION_HEADERS.iter().enumerate() {
        let c_span = if n_idx == 0 { " colspan=\"2\"" } else { "" };
        let _ = write!(html, "<th{c_span}>{}</th>", escape_html(c_header));
    }
    html.push_str("</tr>\n");
    for row in &page.deduction_rows {
        html.push_str("<tr>");
        for (n_idx, c_text) in row.iter().enumerate() {
            let c_span = if n_idx == 0 { " colspan=\"2\"" } else { "" };
            let _ = write!(html, "<td{c_span}>{}</td>", escape_html(c_text));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    html.push_str("<div class=\"certification\">\n");
    for (n_idx, c_text) in TUP_CERTIFICATION.iter().enumerate() {
        let c_tag = if n_idx == 0 { "b" } else { "span" };
        let _ = writeln!(html, "<div><{c_tag}>{}</{c_tag}></div>", escape_html(c_text));
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"signatures\">\n");
    for n_idx_col in 0..TUP_SIGNATURE_ROWS[0].len() {
        let l_lines: Vec<String> = TUP_SIGNATURE_ROWS
            .iter()
            .map(|row| row[n_idx_col])
            .filter(|c_text| !c_text.is_empty())
            .map(escape_html)
            .collect();
        let _ = writeln!(html, "<div class=\"signature\">{}</div>", l_lines.join("<br>"));
    }
    html.push_str("</div>\n</div>\n");
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
