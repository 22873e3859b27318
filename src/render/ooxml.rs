//! WordprocessingML body generator.

use super::RenderOptions;
use crate::markdown::Token;
use crate::model::{Role, StyleRegistry};
use quick_xml::escape::escape;

/// Renders Markdown tokens to `w:body` content using template styles.
#[derive(Debug)]
pub struct OoxmlRenderer<'a> {
    registry: &'a StyleRegistry,
    options: RenderOptions,
}

impl<'a> OoxmlRenderer<'a> {
    /// Creates a new renderer over a style registry.
    pub fn new(registry: &'a StyleRegistry, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    /// Renders tokens in order. Tokens without a mapping produce nothing.
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut output = String::new();

        for token in tokens {
            match token {
                Token::Heading { depth, text } => {
                    let role = Role::heading(*depth).unwrap_or(Role::Paragraph);
                    self.render_paragraph(role, text, &mut output);
                }
                Token::Paragraph { text } => {
                    self.render_paragraph(Role::Paragraph, text, &mut output);
                }
                Token::Space => {
                    if self.options.blank_paragraphs {
                        self.render_empty_paragraph(&mut output);
                    }
                }
                Token::List { ordered, items } => {
                    let role = Role::list(*ordered);
                    for item in items {
                        self.render_paragraph(role, &item.text, &mut output);
                    }
                }
                Token::Blockquote { tokens } => {
                    for nested in tokens {
                        if let Token::Paragraph { text } = nested {
                            self.render_paragraph(Role::Blockquote, text, &mut output);
                        }
                    }
                }
                Token::Table { header, rows } => self.render_table(header, rows, &mut output),
                Token::Other => {}
            }
        }

        output
    }

    fn render_paragraph(&self, role: Role, text: &str, output: &mut String) {
        let style = self.registry.resolve(role);
        output.push_str("<w:p><w:pPr><w:pStyle w:val=\"");
        output.push_str(&escape(style.style_id.as_str()));
        output.push_str("\"/></w:pPr><w:r><w:t xml:space=\"preserve\">");
        output.push_str(&escape(text));
        output.push_str("</w:t></w:r></w:p>");
    }

    fn render_empty_paragraph(&self, output: &mut String) {
        let style = self.registry.paragraph();
        output.push_str("<w:p><w:pPr><w:pStyle w:val=\"");
        output.push_str(&escape(style.style_id.as_str()));
        output.push_str("\"/></w:pPr></w:p>");
    }

    /// Renders a table; every cell reuses the fragments of the template's first cell.
    fn render_table(&self, header: &[String], rows: &[Vec<String>], output: &mut String) {
        let style = self.registry.table();

        output.push_str("<w:tbl>");
        output.push_str(&style.table_props);

        for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
            output.push_str("<w:tr>");
            for cell in row {
                output.push_str("<w:tc>");
                output.push_str(&style.cell_props);
                output.push_str("<w:p>");
                output.push_str(&style.cell_paragraph_props);
                output.push_str("<w:r>");
                output.push_str(&style.cell_run_props);
                output.push_str("<w:t xml:space=\"preserve\">");
                output.push_str(&escape(cell.as_str()));
                output.push_str("</w:t></w:r></w:p></w:tc>");
            }
            output.push_str("</w:tr>");
        }

        output.push_str("</w:tbl>");
    }
}
