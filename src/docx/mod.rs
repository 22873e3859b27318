//! DOCX template support.
//!
//! A [`DocxTemplate`] is analyzed once when loaded; every conversion renders a
//! fresh body and writes a new archive from the untouched template bytes.

mod analyzer;
mod assemble;
mod container;

#[cfg(test)]
pub(crate) mod fixtures;

pub use analyzer::analyze_document;
pub use assemble::{assemble, extract_page_setup, splice_body, OutputDocument, DOCX_MIME_TYPE};
pub use container::DocxContainer;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{StyleRegistry, TemplateAnalysis};
use crate::render::{self, RenderOptions};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// WordprocessingML namespace URIs.
pub mod ns {
    /// Main WordprocessingML namespace (`w:`)
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Office document relationships namespace (`r:`)
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
}

/// An analyzed .docx template.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    data: Vec<u8>,
    analysis: TemplateAnalysis,
    registry: StyleRegistry,
}

impl DocxTemplate {
    /// Opens and analyzes a template file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening template");
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Reads and analyzes a template from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Analyzes a template from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect::ensure_docx(&data)?;

        let mut container = DocxContainer::from_bytes(data)?;
        let document_xml = container.read_document_xml()?;
        let analysis = analyze_document(&document_xml)?;
        let registry = StyleRegistry::build(&analysis);

        debug!(
            lines = analysis.lines.len(),
            matched = analysis.matched_lines().count(),
            table = analysis.table.is_some(),
            roles = registry.len(),
            "template analyzed"
        );

        Ok(Self {
            data: container.into_bytes(),
            analysis,
            registry,
        })
    }

    /// Line-by-line analysis of the template.
    pub fn analysis(&self) -> &TemplateAnalysis {
        &self.analysis
    }

    /// Styles harvested from the template.
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Raw template archive bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Renders Markdown to `w:body` content without assembling a package.
    pub fn render_body(&self, markdown: &str, options: &RenderOptions) -> String {
        render::render_body(markdown, &self.registry, options)
    }

    /// Converts Markdown into a new document styled like this template.
    pub fn convert(&self, markdown: &str, options: &RenderOptions) -> Result<OutputDocument> {
        if markdown.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let body = self.render_body(markdown, options);
        let mut container = DocxContainer::from_bytes(self.data.clone())?;
        let output = assemble(&body, &mut container, options)?;

        info!(bytes = output.len(), "document generated");
        Ok(output)
    }
}
