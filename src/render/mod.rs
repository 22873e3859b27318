//! DOCX body rendering from Markdown.

mod ooxml;
mod options;

pub use ooxml::OoxmlRenderer;
pub use options::RenderOptions;

use crate::markdown;
use crate::model::StyleRegistry;

/// Renders Markdown to `w:body` content.
pub fn render_body(markdown: &str, registry: &StyleRegistry, options: &RenderOptions) -> String {
    let tokens = markdown::lex_with(markdown, options.space_blank_lines);
    let renderer = OoxmlRenderer::new(registry, options.clone());
    renderer.render(&tokens)
}
