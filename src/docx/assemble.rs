//! Output document assembly.
//!
//! Splices a generated body into the template's `document.xml` and rewrites
//! the archive. Everything outside the `w:body` content region is left as is.

use super::container::{paths, DocxContainer};
use crate::error::{Error, Result};
use crate::model::PageSetup;
use crate::render::RenderOptions;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// MIME type of a WordprocessingML document.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const BODY_OPEN: &str = "<w:body";
const BODY_CLOSE: &str = "</w:body>";

static HEADER_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<w:headerReference[^>]+r:id="[^"]+"[^>]*/>"#).unwrap());

static FOOTER_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<w:footerReference[^>]+r:id="[^"]+"[^>]*/>"#).unwrap());

static PAGE_SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:pgSz[^>]*/>").unwrap());

static PAGE_MARGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:pgMar[^>]*/>").unwrap());

/// A finished .docx package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    /// Serialized archive
    pub bytes: Vec<u8>,
    /// Always [`DOCX_MIME_TYPE`]
    pub mime_type: &'static str,
}

impl OutputDocument {
    /// Wraps serialized archive bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: DOCX_MIME_TYPE,
        }
    }

    /// Writes the document to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Size of the serialized archive in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the document, returning the archive bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Assembles the output package from a generated body and the template archive.
pub fn assemble(
    generated_body: &str,
    container: &mut DocxContainer,
    options: &RenderOptions,
) -> Result<OutputDocument> {
    let document_xml = container.read_document_xml()?;
    let body = locate_body(&document_xml)?;

    let mut new_body = String::with_capacity(generated_body.len() + 512);
    new_body.push_str(generated_body);

    if options.preserve_page_setup {
        let page_setup = extract_page_setup(&document_xml[body.clone()]);
        match page_setup.section_xml() {
            Some(section) => {
                debug!(
                    headers = page_setup.header_refs.len(),
                    footers = page_setup.footer_refs.len(),
                    "carrying page setup"
                );
                new_body.push_str(&section);
            }
            None => warn!("template has no page setup; output omits w:sectPr"),
        }
    }

    let output_xml = replace_range(&document_xml, body, &new_body);
    let replacements = HashMap::from([(paths::DOCUMENT_XML, output_xml)]);
    let bytes = container.write_with(&replacements)?;

    debug!(bytes = bytes.len(), "archive serialized");
    Ok(OutputDocument::new(bytes))
}

/// Replaces the content of `w:body`, keeping the body tags themselves.
pub fn splice_body(document_xml: &str, new_body: &str) -> Result<String> {
    let body = locate_body(document_xml)?;
    Ok(replace_range(document_xml, body, new_body))
}

/// Extracts header/footer references and page geometry from body XML.
pub fn extract_page_setup(xml: &str) -> PageSetup {
    let find_all = |regex: &Regex| -> Vec<String> {
        regex
            .find_iter(xml)
            .map(|m| m.as_str().to_string())
            .collect()
    };
    let find_first = |regex: &Regex| -> String {
        regex
            .find(xml)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    PageSetup {
        header_refs: find_all(&HEADER_REF),
        footer_refs: find_all(&FOOTER_REF),
        page_size: find_first(&PAGE_SIZE),
        page_margin: find_first(&PAGE_MARGIN),
    }
}

/// Byte range of the content between the body start tag and the last `</w:body>`.
fn locate_body(xml: &str) -> Result<Range<usize>> {
    let open = xml
        .match_indices(BODY_OPEN)
        .map(|(index, _)| index)
        .find(|&index| {
            xml[index + BODY_OPEN.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c.is_whitespace())
        })
        .ok_or_else(|| Error::InvalidTemplate("missing <w:body> start tag".to_string()))?;

    let content_start = xml[open..]
        .find('>')
        .map(|offset| open + offset + 1)
        .ok_or_else(|| Error::InvalidTemplate("unterminated <w:body> start tag".to_string()))?;

    let content_end = xml
        .rfind(BODY_CLOSE)
        .filter(|&end| end >= content_start)
        .ok_or_else(|| Error::InvalidTemplate("missing </w:body> end tag".to_string()))?;

    Ok(content_start..content_end)
}

fn replace_range(xml: &str, range: Range<usize>, replacement: &str) -> String {
    let mut output = String::with_capacity(xml.len() - range.len() + replacement.len());
    output.push_str(&xml[..range.start]);
    output.push_str(replacement);
    output.push_str(&xml[range.end..]);
    output
}
