//! Markdown block tokenizer.
//!
//! Adapts the `pulldown-cmark` event stream into a flat sequence of block
//! tokens. Inline markup is flattened to its text; the generated document
//! takes all formatting from the template's styles.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::iter::Peekable;
use std::ops::Range;

/// Default number of blank lines after a block that produces a [`Token::Space`].
pub const SPACE_BLANK_LINES: usize = 1;

/// A Markdown block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// ATX or setext heading
    Heading { depth: u8, text: String },
    /// Plain paragraph
    Paragraph { text: String },
    /// Extra vertical space between blocks
    Space,
    /// Ordered or unordered list
    List { ordered: bool, items: Vec<ListItem> },
    /// Block quote with its nested blocks
    Blockquote { tokens: Vec<Token> },
    /// Table with header cells and body rows
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Any block the generator does not handle (code, HTML, rules, ...)
    Other,
}

/// A list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Item text with inline markup removed
    pub text: String,
}

impl ListItem {
    /// Creates a list item.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Splits Markdown text into block tokens.
///
/// Nested list items are flattened into the enclosing list in document order.
/// A [`Token::Space`] is emitted between two blocks separated by a blank
/// line, except after a heading.
pub fn lex(markdown: &str) -> Vec<Token> {
    lex_with(markdown, SPACE_BLANK_LINES)
}

/// Splits Markdown text into block tokens, emitting [`Token::Space`] only for
/// gaps of at least `space_blank_lines` blank lines (minimum 1).
pub fn lex_with(markdown: &str, space_blank_lines: usize) -> Vec<Token> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let events: Vec<_> = parser.into_offset_iter().collect();

    let mut lexer = Lexer {
        source: markdown,
        events: events.into_iter().peekable(),
        space_blank_lines: space_blank_lines.max(1),
    };
    lexer.blocks()
}

struct Lexer<'a> {
    source: &'a str,
    events: Peekable<std::vec::IntoIter<(Event<'a>, Range<usize>)>>,
    space_blank_lines: usize,
}

impl<'a> Lexer<'a> {
    /// Reads blocks until the end of input or the end of the enclosing container.
    fn blocks(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut previous_end: Option<usize> = None;

        while let Some((event, range)) = self.events.next() {
            let is_block = matches!(event, Event::Start(_) | Event::Rule);
            if is_block {
                // A heading swallows the blank lines that follow it
                let after_heading = matches!(tokens.last(), Some(Token::Heading { .. }));
                if let Some(end) = previous_end.filter(|_| !after_heading) {
                    if blank_lines_between(self.source, end, range.start) >= self.space_blank_lines
                    {
                        tokens.push(Token::Space);
                    }
                }
            }

            let token = match event {
                Event::End(_) => break,
                Event::Start(tag) => self.block(tag),
                Event::Rule => Token::Other,
                _ => continue,
            };
            previous_end = Some(range.end);
            tokens.push(token);
        }

        tokens
    }

    /// Reads one block whose start tag was just consumed.
    fn block(&mut self, tag: Tag<'a>) -> Token {
        match tag {
            Tag::Heading { level, .. } => Token::Heading {
                depth: heading_depth(level),
                text: self.text(),
            },
            Tag::Paragraph => Token::Paragraph { text: self.text() },
            Tag::BlockQuote { .. } => Token::Blockquote {
                tokens: self.blocks(),
            },
            Tag::List(start) => {
                let mut items = Vec::new();
                self.list_items(&mut items);
                Token::List {
                    ordered: start.is_some(),
                    items,
                }
            }
            Tag::Table(_) => self.table(),
            _ => {
                self.skip();
                Token::Other
            }
        }
    }

    /// Collects the text of the current element and consumes its end tag.
    fn text(&mut self) -> String {
        let mut text = String::new();
        let mut depth = 0usize;

        for (event, _) in self.events.by_ref() {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => break,
                Event::End(_) => depth -= 1,
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                _ => {}
            }
        }

        text
    }

    /// Consumes the current element without collecting anything.
    fn skip(&mut self) {
        self.text();
    }

    /// Reads the items of a list whose start tag was just consumed.
    fn list_items(&mut self, items: &mut Vec<ListItem>) {
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => self.list_item(items),
                Event::End(_) => break,
                _ => {}
            }
        }
    }

    fn list_item(&mut self, items: &mut Vec<ListItem>) {
        let index = items.len();
        items.push(ListItem::new(String::new()));

        let mut text = String::new();
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::End(TagEnd::Item) => break,
                Event::Start(Tag::List(_)) => self.list_items(items),
                Event::Start(
                    Tag::Emphasis
                    | Tag::Strong
                    | Tag::Strikethrough
                    | Tag::Link { .. }
                    | Tag::Image { .. },
                ) => text.push_str(&self.text()),
                Event::Start(_) => push_separated(&mut text, &self.text()),
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                _ => {}
            }
        }

        items[index].text = text.trim().to_string();
    }

    /// Reads a table whose start tag was just consumed.
    fn table(&mut self) -> Token {
        let mut header = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut in_head = false;

        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::TableHead) => in_head = true,
                Event::End(TagEnd::TableHead) => in_head = false,
                Event::Start(Tag::TableRow) if !in_head => rows.push(Vec::new()),
                Event::Start(Tag::TableCell) => {
                    let cell = self.text();
                    if in_head {
                        header.push(cell);
                    } else if let Some(row) = rows.last_mut() {
                        row.push(cell);
                    }
                }
                Event::End(TagEnd::Table) => break,
                _ => {}
            }
        }

        Token::Table { header, rows }
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Counts blank lines between the end of one block and the start of the next.
fn blank_lines_between(source: &str, end: usize, start: usize) -> usize {
    let end = end.min(start);
    // Block ranges may or may not include their trailing line breaks
    let content_end = source[..end].trim_end_matches(['\n', '\r']).len();
    source[content_end..start]
        .matches('\n')
        .count()
        .saturating_sub(1)
}

fn push_separated(text: &mut String, part: &str) {
    let part = part.trim();
    if part.is_empty() {
        return;
    }
    if !text.is_empty() && !text.ends_with(' ') {
        text.push(' ');
    }
    text.push_str(part);
}
