//! Style definitions harvested from the template.
//!
//! Formatting is carried as raw XML fragments copied from the template. The
//! fragments are never reparsed; they are stored and concatenated verbatim.

use super::{Role, TemplateAnalysis};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Style id used when the template offers no body-text paragraph.
pub const DEFAULT_STYLE_ID: &str = "Normal";

/// Source text recorded for the synthesized body-text style.
pub const FALLBACK_SOURCE_TEXT: &str = "(default fallback)";

static FALLBACK_PARAGRAPH: LazyLock<ParagraphStyle> = LazyLock::new(ParagraphStyle::fallback);

static EMPTY_TABLE: LazyLock<TableStyle> = LazyLock::new(TableStyle::default);

/// Paragraph-level formatting captured for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    /// Value of `w:pStyle/@w:val`
    pub style_id: String,
    /// Raw `<w:pPr>` fragment
    pub paragraph_props: String,
    /// Raw `<w:rPr>` fragment
    pub run_props: String,
    /// Template text the style was found on
    pub source_text: String,
}

impl ParagraphStyle {
    /// Creates a style with only a style id.
    pub fn with_id(style_id: impl Into<String>) -> Self {
        Self {
            style_id: style_id.into(),
            paragraph_props: String::new(),
            run_props: String::new(),
            source_text: String::new(),
        }
    }

    /// The synthesized body-text style.
    pub fn fallback() -> Self {
        Self {
            source_text: FALLBACK_SOURCE_TEXT.to_string(),
            ..Self::with_id(DEFAULT_STYLE_ID)
        }
    }
}

/// Table formatting captured from the template's first table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    /// Raw `<w:tblPr>` fragment
    pub table_props: String,
    /// Raw `<w:tcPr>` fragment of the first cell
    pub cell_props: String,
    /// Raw `<w:pPr>` fragment of the first cell's first paragraph
    pub cell_paragraph_props: String,
    /// Raw `<w:rPr>` fragment of the first cell's first paragraph
    pub cell_run_props: String,
}

/// Formatting captured for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StyleInfo {
    Paragraph(ParagraphStyle),
    Table(TableStyle),
}

/// Role to style mapping used during generation.
///
/// Built once per template by folding the analysis lines; the first line
/// claiming a role wins. A `paragraph` entry is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRegistry {
    styles: BTreeMap<Role, StyleInfo>,
}

impl StyleRegistry {
    /// Folds a template analysis into a registry.
    pub fn build(analysis: &TemplateAnalysis) -> Self {
        let mut styles = BTreeMap::new();

        let observations = analysis.lines.iter().chain(analysis.table.iter());
        for line in observations {
            if let (Some(role), Some(style)) = (line.role, line.style.as_ref()) {
                styles.entry(role).or_insert_with(|| style.clone());
            }
        }

        styles
            .entry(Role::Paragraph)
            .or_insert_with(|| StyleInfo::Paragraph(ParagraphStyle::fallback()));

        Self { styles }
    }

    /// Gets the raw style entry for a role.
    pub fn get(&self, role: Role) -> Option<&StyleInfo> {
        self.styles.get(&role)
    }

    /// Returns true if the template provided a style for the role.
    pub fn contains(&self, role: Role) -> bool {
        self.styles.contains_key(&role)
    }

    /// Gets the paragraph style registered for a role.
    pub fn paragraph_style(&self, role: Role) -> Option<&ParagraphStyle> {
        match self.styles.get(&role) {
            Some(StyleInfo::Paragraph(style)) => Some(style),
            _ => None,
        }
    }

    /// The body-text style.
    pub fn paragraph(&self) -> &ParagraphStyle {
        self.paragraph_style(Role::Paragraph)
            .unwrap_or(&FALLBACK_PARAGRAPH)
    }

    /// Gets the style for a role, falling back to the body-text style.
    pub fn resolve(&self, role: Role) -> &ParagraphStyle {
        self.paragraph_style(role).unwrap_or_else(|| self.paragraph())
    }

    /// The table style, or empty fragments when the template had no table.
    pub fn table(&self) -> &TableStyle {
        match self.styles.get(&Role::Table) {
            Some(StyleInfo::Table(style)) => style,
            _ => &EMPTY_TABLE,
        }
    }

    /// Iterates over registered styles in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &StyleInfo)> {
        self.styles.iter().map(|(role, style)| (*role, style))
    }

    /// Number of registered roles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns true if no roles are registered (never, after `build`).
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
