//! Rendering options for DOCX output.

use crate::markdown::SPACE_BLANK_LINES;

/// Options for body generation and assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether blank lines between Markdown blocks become empty paragraphs.
    /// Default: true
    pub blank_paragraphs: bool,

    /// Number of consecutive blank lines that makes an empty paragraph.
    /// Default: 1
    pub space_blank_lines: usize,

    /// Whether to append the template's page setup as a trailing `w:sectPr`.
    /// Default: true
    pub preserve_page_setup: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            blank_paragraphs: true,
            space_blank_lines: SPACE_BLANK_LINES,
            preserve_page_setup: true,
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables empty paragraphs for blank lines.
    pub fn with_blank_paragraphs(mut self, enabled: bool) -> Self {
        self.blank_paragraphs = enabled;
        self
    }

    /// Sets how many consecutive blank lines make an empty paragraph.
    pub fn with_space_blank_lines(mut self, lines: usize) -> Self {
        self.space_blank_lines = lines;
        self
    }

    /// Enables or disables carrying the template's page setup.
    pub fn with_page_setup(mut self, enabled: bool) -> Self {
        self.preserve_page_setup = enabled;
        self
    }

    /// Drops empty paragraphs for blank lines.
    pub fn without_blank_paragraphs(self) -> Self {
        self.with_blank_paragraphs(false)
    }
}
