//! # md2docx
//!
//! Converts Markdown into a .docx document that looks like a template.
//!
//! The template is an ordinary Word document whose paragraphs are written in
//! Markdown notation: a paragraph reading `# Heading` shows how level-one
//! headings should look, `- item` shows bullet items, and so on. The first
//! plain paragraph defines body text and the first table defines table
//! formatting. Generated paragraphs reuse the template's style ids; the rest
//! of the package (styles, numbering, headers, footers, media) is carried over
//! unchanged.
//!
//! ## Quick Start
//!
//! ```no_run
//! use md2docx::convert_file;
//!
//! fn main() -> md2docx::Result<()> {
//!     let output = convert_file("template.docx", "# Title\n\nBody text.")?;
//!     output.write_to("output.docx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `async`: Async I/O support with Tokio

pub mod classify;
pub mod detect;
pub mod docx;
pub mod error;
pub mod markdown;
pub mod model;
pub mod render;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use classify::classify;
pub use detect::{detect_format, detect_format_from_bytes, detect_format_from_path, FormatType};
pub use docx::{DocxTemplate, OutputDocument, DOCX_MIME_TYPE};
pub use error::{Error, Result};
pub use model::{LineAnalysis, Role, StyleRegistry, TemplateAnalysis};
pub use render::RenderOptions;

use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Analyzes a template file and returns what each paragraph was matched to.
///
/// # Example
///
/// ```no_run
/// let analysis = md2docx::analyze_template("template.docx")?;
/// for line in analysis.matched_lines() {
///     println!("{:?}: {}", line.role, line.text);
/// }
/// # Ok::<(), md2docx::Error>(())
/// ```
pub fn analyze_template(path: impl AsRef<Path>) -> Result<TemplateAnalysis> {
    let template = DocxTemplate::open(path)?;
    Ok(template.analysis().clone())
}

/// Converts Markdown using a template file, with default options.
pub fn convert_file(template: impl AsRef<Path>, markdown: &str) -> Result<OutputDocument> {
    convert_file_with_options(template, markdown, &RenderOptions::default())
}

/// Converts Markdown using a template file, with custom options.
///
/// # Example
///
/// ```no_run
/// use md2docx::{convert_file_with_options, RenderOptions};
///
/// let options = RenderOptions::new().with_page_setup(false);
/// let output = convert_file_with_options("template.docx", "# Title", &options)?;
/// std::fs::write("output.docx", &output.bytes)?;
/// # Ok::<(), md2docx::Error>(())
/// ```
pub fn convert_file_with_options(
    template: impl AsRef<Path>,
    markdown: &str,
    options: &RenderOptions,
) -> Result<OutputDocument> {
    DocxTemplate::open(template)?.convert(markdown, options)
}

/// Converts Markdown using template bytes, with default options.
pub fn convert_bytes(template: &[u8], markdown: &str) -> Result<OutputDocument> {
    DocxTemplate::from_bytes(template.to_vec())?.convert(markdown, &RenderOptions::default())
}

/// Conversion session holding the most recently loaded template.
///
/// A failed load clears the previous template, so a session never converts
/// with styles from a template other than the last one requested.
///
/// # Example
///
/// ```no_run
/// use md2docx::Md2Docx;
///
/// let mut session = Md2Docx::new().with_blank_paragraphs(false);
/// session.load_template("template.docx")?;
/// let output = session.convert("# Title\n\nBody text.")?;
/// output.write_to("output.docx")?;
/// # Ok::<(), md2docx::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Md2Docx {
    options: RenderOptions,
    template: Option<DocxTemplate>,
}

impl Md2Docx {
    /// Creates a session with default options and no template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Enables or disables empty paragraphs for blank lines.
    pub fn with_blank_paragraphs(mut self, enabled: bool) -> Self {
        self.options.blank_paragraphs = enabled;
        self
    }

    /// Enables or disables carrying the template's page setup.
    pub fn with_page_setup(mut self, enabled: bool) -> Self {
        self.options.preserve_page_setup = enabled;
        self
    }

    /// Current render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Loads and analyzes a template file.
    pub fn load_template(&mut self, path: impl AsRef<Path>) -> Result<&DocxTemplate> {
        let result = DocxTemplate::open(path);
        self.store(result)
    }

    /// Loads and analyzes a template from bytes.
    pub fn load_template_bytes(&mut self, data: Vec<u8>) -> Result<&DocxTemplate> {
        let result = DocxTemplate::from_bytes(data);
        self.store(result)
    }

    /// Loads and analyzes a template from a reader.
    pub fn load_template_reader<R: Read>(&mut self, reader: R) -> Result<&DocxTemplate> {
        let result = DocxTemplate::from_reader(reader);
        self.store(result)
    }

    fn store(&mut self, result: Result<DocxTemplate>) -> Result<&DocxTemplate> {
        match result {
            Ok(template) => {
                info!(roles = template.registry().len(), "template loaded");
                Ok(self.template.insert(template))
            }
            Err(e) => {
                warn!(error = %e, "template load failed");
                self.template = None;
                Err(e)
            }
        }
    }

    /// The loaded template, if any.
    pub fn template(&self) -> Option<&DocxTemplate> {
        self.template.as_ref()
    }

    /// Returns true if a template has been analyzed successfully.
    pub fn is_ready(&self) -> bool {
        self.template.is_some()
    }

    /// Converts Markdown with the loaded template.
    pub fn convert(&self, markdown: &str) -> Result<OutputDocument> {
        let template = self.template.as_ref().ok_or(Error::StyleNotReady)?;
        template.convert(markdown, &self.options)
    }

    /// Converts Markdown and writes the document to a file.
    pub fn convert_to_file(&self, markdown: &str, path: impl AsRef<Path>) -> Result<()> {
        self.convert(markdown)?.write_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{fixtures, DocxContainer};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    /// Heading1 plus an unstyled body paragraph, which resolves to Normal.
    fn simple_template() -> Vec<u8> {
        let body = concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t># Heading</w:t></w:r></w:p>"#,
            "<w:p><w:r><w:t>Body</w:t></w:r></w:p>"
        );
        fixtures::build_docx(&fixtures::document_xml(body))
    }

    fn document_xml(output: &OutputDocument) -> String {
        let mut container = DocxContainer::from_bytes(output.bytes.clone()).unwrap();
        container.read_document_xml().unwrap()
    }

    #[test]
    fn test_end_to_end_heading_and_body() {
        let output = convert_bytes(&simple_template(), "# Title\n\nBody text.").unwrap();
        let xml = document_xml(&output);

        let expected = concat!(
            "<w:body>",
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">Title</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:t xml:space="preserve">Body text.</w:t></w:r></w:p>"#,
            "</w:body>"
        );
        assert!(xml.contains(expected), "unexpected document: {xml}");
        assert_eq!(output.mime_type, DOCX_MIME_TYPE);
    }

    #[test]
    fn test_members_are_byte_identical() {
        let template = fixtures::sample_template();
        let output = convert_bytes(&template, "# Title\n\n| A | B |\n|---|---|\n| 1 | 2 |").unwrap();

        let mut before = ZipArchive::new(Cursor::new(template.as_slice())).unwrap();
        let mut after = ZipArchive::new(Cursor::new(output.bytes.as_slice())).unwrap();
        assert_eq!(before.len(), after.len());

        for index in 0..before.len() {
            let mut raw_before = Vec::new();
            let mut raw_after = Vec::new();
            let name = {
                let mut file = before.by_index_raw(index).unwrap();
                file.read_to_end(&mut raw_before).unwrap();
                file.name().to_string()
            };
            {
                let mut file = after.by_index_raw(index).unwrap();
                file.read_to_end(&mut raw_after).unwrap();
                assert_eq!(file.name(), name);
            }
            if name != "word/document.xml" {
                assert_eq!(raw_before, raw_after, "{name} changed");
            }
        }
    }

    #[test]
    fn test_full_template_roles() {
        let markdown = "## Part\n\n> quoted\n\n1. first\n2. second\n\n- bullet\n";
        let output = convert_bytes(&fixtures::sample_template(), markdown).unwrap();
        let xml = document_xml(&output);

        assert!(xml.contains(r#"<w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t xml:space="preserve">Part<"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Quote"/></w:pPr><w:r><w:t xml:space="preserve">quoted<"#));
        assert_eq!(xml.matches(r#"w:val="ListNumber""#).count(), 2);
        assert!(xml.contains(r#"<w:pStyle w:val="ListBullet"/></w:pPr><w:r><w:t xml:space="preserve">bullet<"#));
        assert!(xml.contains(r#"<w:headerReference w:type="default" r:id="rId7"/>"#));
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
    }

    #[test]
    fn test_session_requires_template() {
        let session = Md2Docx::new();
        assert!(!session.is_ready());
        assert!(matches!(session.convert("# Title"), Err(Error::StyleNotReady)));
        // Readiness is checked before input
        assert!(matches!(session.convert(""), Err(Error::StyleNotReady)));
    }

    #[test]
    fn test_session_rejects_blank_input() {
        let mut session = Md2Docx::new();
        session.load_template_bytes(simple_template()).unwrap();

        assert!(session.is_ready());
        assert!(matches!(session.convert("  \n\n "), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_failed_load_clears_template() {
        let mut session = Md2Docx::new();
        session.load_template_bytes(simple_template()).unwrap();

        let result = session.load_template_bytes(b"not a docx at all".to_vec());
        assert!(result.is_err());
        assert!(session.template().is_none());
        assert!(matches!(session.convert("# Title"), Err(Error::StyleNotReady)));
    }

    #[test]
    fn test_blank_line_becomes_body_paragraph() {
        let markdown = "# Title\n\nPara1\n\nPara2";
        let empty = r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr></w:p>"#;

        let output = convert_bytes(&simple_template(), markdown).unwrap();
        assert_eq!(document_xml(&output).matches(empty).count(), 1);

        let options = RenderOptions::new().with_space_blank_lines(2);
        let mut session = Md2Docx::new().with_options(options);
        session.load_template_bytes(simple_template()).unwrap();
        let output = session.convert(markdown).unwrap();
        assert_eq!(document_xml(&output).matches(empty).count(), 0);
    }

    #[test]
    fn test_session_options() {
        let mut session = Md2Docx::new().with_page_setup(false);
        session
            .load_template_reader(Cursor::new(fixtures::sample_template()))
            .unwrap();

        let xml = document_xml(&session.convert("text").unwrap());
        assert!(!xml.contains("w:sectPr"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.docx");
        let output_path = dir.path().join("output.docx");
        std::fs::write(&template_path, fixtures::sample_template()).unwrap();

        let analysis = analyze_template(&template_path).unwrap();
        assert_eq!(analysis.lines[0].role, Some(Role::H1));

        let mut session = Md2Docx::new();
        session.load_template(&template_path).unwrap();
        session.convert_to_file("# Saved", &output_path).unwrap();

        let written = std::fs::read(&output_path).unwrap();
        let output = convert_file(&template_path, "# Saved").unwrap();
        assert_eq!(
            DocxContainer::from_bytes(written).unwrap().read_document_xml().unwrap(),
            document_xml(&output)
        );
    }

    #[test]
    fn test_missing_template_file() {
        let result = convert_file("/nonexistent/template.docx", "# Title");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
