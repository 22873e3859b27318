//! Template analysis records.

use super::{ParagraphStyle, Role, StyleInfo, TableStyle};
use serde::Serialize;

/// Label used for the synthetic line that represents the template's first table.
pub const TABLE_LINE_TEXT: &str = "[first table in template]";

/// One observation made while scanning the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAnalysis {
    /// Trimmed visible text of the paragraph
    pub text: String,
    /// Matched role, if any
    pub role: Option<Role>,
    /// Captured formatting, present whenever a role is present
    pub style: Option<StyleInfo>,
}

impl LineAnalysis {
    /// Creates a line that did not match any role.
    pub fn unmatched(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: None,
            style: None,
        }
    }

    /// Creates a paragraph line matched to a role.
    pub fn matched(role: Role, style: ParagraphStyle) -> Self {
        Self {
            text: style.source_text.clone(),
            role: Some(role),
            style: Some(StyleInfo::Paragraph(style)),
        }
    }

    /// Creates the table line.
    pub fn table(style: TableStyle) -> Self {
        Self {
            text: TABLE_LINE_TEXT.to_string(),
            role: Some(Role::Table),
            style: Some(StyleInfo::Table(style)),
        }
    }
}

/// Complete result of analyzing a template's document.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateAnalysis {
    /// Non-empty paragraphs in document order
    pub lines: Vec<LineAnalysis>,
    /// The first table, if the template has one
    pub table: Option<LineAnalysis>,
}

impl TemplateAnalysis {
    /// Creates an empty analysis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no text or table was found.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.table.is_none()
    }

    /// Iterates over the lines that were assigned a role.
    pub fn matched_lines(&self) -> impl Iterator<Item = &LineAnalysis> {
        self.lines.iter().filter(|line| line.role.is_some())
    }
}
