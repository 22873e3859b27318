//! Template analysis for DOCX `document.xml`.
//!
//! Scans every `w:p` in document order, classifies its visible text by
//! Markdown marker and captures the raw `w:pPr`/`w:rPr` fragments of the
//! paragraph. The first `w:tbl` is captured separately as the table style.
//!
//! Fragments are sliced out of the source text, so they are byte-identical to
//! what the template contains.

use super::ns;
use crate::classify::classify;
use crate::error::{Error, Result};
use crate::model::{
    LineAnalysis, ParagraphStyle, Role, TableStyle, TemplateAnalysis, DEFAULT_STYLE_ID,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::ops::Range;

/// Analyzes a template's `word/document.xml`.
///
/// The first non-empty paragraph without a Markdown marker becomes the
/// body-text paragraph; later unmarked paragraphs are reported unmatched.
pub fn analyze_document(xml: &str) -> Result<TemplateAnalysis> {
    let scan = DocumentScanner::new(xml).scan()?;
    Ok(build_analysis(scan.paragraphs, scan.table))
}

fn build_analysis(
    paragraphs: Vec<ScannedParagraph>,
    table: Option<TableStyle>,
) -> TemplateAnalysis {
    let mut analysis = TemplateAnalysis::new();
    let mut body_claimed = false;

    for paragraph in paragraphs {
        let text = trim_text(&paragraph.text);
        if text.is_empty() {
            continue;
        }

        let role = match classify(text) {
            Some(role) => Some(role),
            None if !body_claimed => {
                body_claimed = true;
                Some(Role::Paragraph)
            }
            None => None,
        };

        let line = match role {
            Some(role) => LineAnalysis::matched(
                role,
                ParagraphStyle {
                    style_id: paragraph
                        .style_id
                        .unwrap_or_else(|| DEFAULT_STYLE_ID.to_string()),
                    paragraph_props: paragraph.props,
                    run_props: paragraph.run_props,
                    source_text: text.to_string(),
                },
            ),
            None => LineAnalysis::unmatched(text),
        };
        analysis.lines.push(line);
    }

    analysis.table = table.map(LineAnalysis::table);
    analysis
}

/// WordprocessingML elements the scanner reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Paragraph,
    ParagraphProps,
    ParagraphStyle,
    Run,
    RunProps,
    Text,
    Table,
    TableProps,
    Cell,
    CellProps,
    Other,
}

impl Tag {
    fn resolve(namespace: &ResolveResult, local_name: &[u8]) -> Self {
        let in_main = matches!(
            namespace,
            ResolveResult::Bound(Namespace(uri)) if *uri == ns::W.as_bytes()
        );
        if !in_main {
            return Tag::Other;
        }

        match local_name {
            b"p" => Tag::Paragraph,
            b"pPr" => Tag::ParagraphProps,
            b"pStyle" => Tag::ParagraphStyle,
            b"r" => Tag::Run,
            b"rPr" => Tag::RunProps,
            b"t" => Tag::Text,
            b"tbl" => Tag::Table,
            b"tblPr" => Tag::TableProps,
            b"tc" => Tag::Cell,
            b"tcPr" => Tag::CellProps,
            _ => Tag::Other,
        }
    }
}

/// First occurrence of an element within some scope, captured as raw XML.
#[derive(Debug, Default)]
struct Fragment {
    /// Start offset and depth of the element while it is open
    open: Option<(usize, usize)>,
    xml: Option<String>,
}

impl Fragment {
    fn is_vacant(&self) -> bool {
        self.open.is_none() && self.xml.is_none()
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn begin(&mut self, start: usize, depth: usize) {
        if self.is_vacant() {
            self.open = Some((start, depth));
        }
    }

    fn capture(&mut self, source: &str, range: Range<usize>) {
        if self.is_vacant() {
            self.xml = Some(source[range].to_string());
        }
    }

    fn finish(&mut self, source: &str, depth: usize, end: usize) {
        if let Some((start, open_depth)) = self.open {
            if open_depth == depth {
                self.xml = Some(source[start..end].to_string());
                self.open = None;
            }
        }
    }

    fn into_string(self) -> String {
        self.xml.unwrap_or_default()
    }
}

/// Tracks the first occurrence of an element and whether it is still open.
#[derive(Debug, Default)]
struct Scope {
    depth: Option<usize>,
    seen: bool,
}

impl Scope {
    fn enter(&mut self, depth: usize) {
        if !self.seen {
            self.seen = true;
            self.depth = Some(depth);
        }
    }

    fn enter_empty(&mut self) {
        self.seen = true;
    }

    fn leave(&mut self, depth: usize) {
        if self.depth == Some(depth) {
            self.depth = None;
        }
    }

    fn is_open(&self) -> bool {
        self.depth.is_some()
    }
}

/// A paragraph whose end tag has not been reached yet.
struct OpenParagraph {
    slot: usize,
    depth: usize,
    /// Depth of the currently open direct-child run
    run_depth: Option<usize>,
    text: String,
    style_id: Option<String>,
    props: Fragment,
    run_props: Fragment,
}

impl OpenParagraph {
    fn new(slot: usize, depth: usize) -> Self {
        Self {
            slot,
            depth,
            run_depth: None,
            text: String::new(),
            style_id: None,
            props: Fragment::default(),
            run_props: Fragment::default(),
        }
    }

    fn into_scanned(self) -> ScannedParagraph {
        ScannedParagraph {
            text: self.text,
            style_id: self.style_id,
            props: self.props.into_string(),
            run_props: self.run_props.into_string(),
        }
    }
}

/// A closed paragraph with its raw captures.
#[derive(Debug)]
struct ScannedParagraph {
    text: String,
    style_id: Option<String>,
    props: String,
    run_props: String,
}

/// Captures of the first table.
#[derive(Debug, Default)]
struct TableScan {
    table: Scope,
    cell: Scope,
    paragraph: Scope,
    table_props: Fragment,
    cell_props: Fragment,
    paragraph_props: Fragment,
    run_props: Fragment,
}

impl TableScan {
    fn into_style(self) -> Option<TableStyle> {
        self.table.seen.then(|| TableStyle {
            table_props: self.table_props.into_string(),
            cell_props: self.cell_props.into_string(),
            cell_paragraph_props: self.paragraph_props.into_string(),
            cell_run_props: self.run_props.into_string(),
        })
    }
}

struct ScanResult {
    paragraphs: Vec<ScannedParagraph>,
    table: Option<TableStyle>,
}

/// document.xml scanner state machine.
struct DocumentScanner<'a> {
    source: &'a str,
    reader: NsReader<&'a [u8]>,
    depth: usize,
    /// Number of currently open `w:t` elements
    text_depth: usize,
    open: Vec<OpenParagraph>,
    /// Paragraph slots in start-tag order; nested paragraphs close first
    slots: Vec<Option<ScannedParagraph>>,
    table: TableScan,
}

impl<'a> DocumentScanner<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            source: xml,
            reader: NsReader::from_str(xml),
            depth: 0,
            text_depth: 0,
            open: Vec::new(),
            slots: Vec::new(),
            table: TableScan::default(),
        }
    }

    fn scan(mut self) -> Result<ScanResult> {
        loop {
            let (tag, event) = {
                let (namespace, event) = self.reader.read_resolved_event()?;
                let tag = match &event {
                    Event::Start(e) | Event::Empty(e) => {
                        Tag::resolve(&namespace, e.local_name().as_ref())
                    }
                    Event::End(e) => Tag::resolve(&namespace, e.local_name().as_ref()),
                    _ => Tag::Other,
                };
                (tag, event)
            };
            let end = self.reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    let start = self.tag_start(end);
                    self.open_element(tag, &e, start);
                    self.depth += 1;
                }
                Event::Empty(e) => {
                    let start = self.tag_start(end);
                    self.empty_element(tag, &e, start..end);
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    self.close_element(tag, end);
                }
                Event::Text(t) if self.text_depth > 0 => {
                    let text = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    for paragraph in &mut self.open {
                        if paragraph.run_depth.is_some() {
                            paragraph.text.push_str(&text);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !self.open.is_empty() {
            return Err(Error::XmlParse("unclosed <w:p> element".to_string()));
        }

        Ok(ScanResult {
            paragraphs: self.slots.into_iter().flatten().collect(),
            table: self.table.into_style(),
        })
    }

    /// Offset of the `<` that opened the tag ending at `end`.
    fn tag_start(&self, end: usize) -> usize {
        self.source[..end].rfind('<').unwrap_or(0)
    }

    fn open_element(&mut self, tag: Tag, e: &BytesStart, start: usize) {
        let depth = self.depth;

        match tag {
            Tag::Paragraph => {
                let slot = self.slots.len();
                self.slots.push(None);
                self.open.push(OpenParagraph::new(slot, depth));
                if self.table.cell.is_open() {
                    self.table.paragraph.enter(depth);
                }
            }
            Tag::ParagraphProps => {
                for paragraph in &mut self.open {
                    paragraph.props.begin(start, depth);
                }
                if self.table.paragraph.is_open() {
                    self.table.paragraph_props.begin(start, depth);
                }
            }
            Tag::ParagraphStyle => self.assign_style(e),
            Tag::Run => {
                for paragraph in &mut self.open {
                    if paragraph.depth + 1 == depth && paragraph.run_depth.is_none() {
                        paragraph.run_depth = Some(depth);
                    }
                }
            }
            Tag::RunProps => {
                for paragraph in &mut self.open {
                    paragraph.run_props.begin(start, depth);
                }
                if self.table.paragraph.is_open() {
                    self.table.run_props.begin(start, depth);
                }
            }
            Tag::Text => self.text_depth += 1,
            Tag::Table => self.table.table.enter(depth),
            Tag::TableProps => {
                if self.table.table.is_open() {
                    self.table.table_props.begin(start, depth);
                }
            }
            Tag::Cell => {
                if self.table.table.is_open() {
                    self.table.cell.enter(depth);
                }
            }
            Tag::CellProps => {
                if self.table.cell.is_open() {
                    self.table.cell_props.begin(start, depth);
                }
            }
            Tag::Other => {}
        }
    }

    fn empty_element(&mut self, tag: Tag, e: &BytesStart, range: Range<usize>) {
        let source = self.source;

        match tag {
            Tag::Paragraph => {
                if self.table.cell.is_open() {
                    self.table.paragraph.enter_empty();
                }
            }
            Tag::ParagraphProps => {
                for paragraph in &mut self.open {
                    paragraph.props.capture(source, range.clone());
                }
                if self.table.paragraph.is_open() {
                    self.table.paragraph_props.capture(source, range);
                }
            }
            Tag::ParagraphStyle => self.assign_style(e),
            Tag::RunProps => {
                for paragraph in &mut self.open {
                    paragraph.run_props.capture(source, range.clone());
                }
                if self.table.paragraph.is_open() {
                    self.table.run_props.capture(source, range);
                }
            }
            Tag::Table => self.table.table.enter_empty(),
            Tag::TableProps => {
                if self.table.table.is_open() {
                    self.table.table_props.capture(source, range);
                }
            }
            Tag::Cell => {
                if self.table.table.is_open() {
                    self.table.cell.enter_empty();
                }
            }
            Tag::CellProps => {
                if self.table.cell.is_open() {
                    self.table.cell_props.capture(source, range);
                }
            }
            Tag::Run | Tag::Text | Tag::Other => {}
        }
    }

    fn close_element(&mut self, tag: Tag, end: usize) {
        let depth = self.depth;
        let source = self.source;

        match tag {
            Tag::Paragraph => {
                if self.open.last().is_some_and(|p| p.depth == depth) {
                    if let Some(paragraph) = self.open.pop() {
                        let slot = paragraph.slot;
                        self.slots[slot] = Some(paragraph.into_scanned());
                    }
                }
                self.table.paragraph.leave(depth);
            }
            Tag::ParagraphProps => {
                for paragraph in &mut self.open {
                    paragraph.props.finish(source, depth, end);
                }
                self.table.paragraph_props.finish(source, depth, end);
            }
            Tag::Run => {
                for paragraph in &mut self.open {
                    if paragraph.run_depth == Some(depth) {
                        paragraph.run_depth = None;
                    }
                }
            }
            Tag::RunProps => {
                for paragraph in &mut self.open {
                    paragraph.run_props.finish(source, depth, end);
                }
                self.table.run_props.finish(source, depth, end);
            }
            Tag::Text => self.text_depth = self.text_depth.saturating_sub(1),
            Tag::Table => self.table.table.leave(depth),
            Tag::TableProps => self.table.table_props.finish(source, depth, end),
            Tag::Cell => self.table.cell.leave(depth),
            Tag::CellProps => self.table.cell_props.finish(source, depth, end),
            Tag::ParagraphStyle | Tag::Other => {}
        }
    }

    /// Records `w:pStyle/@w:val` for paragraphs whose first `w:pPr` is open.
    fn assign_style(&mut self, e: &BytesStart) {
        let Some(value) = get_val_attr(e) else {
            return;
        };

        for paragraph in &mut self.open {
            if paragraph.props.is_open() && paragraph.style_id.is_none() {
                paragraph.style_id = Some(value.clone());
            }
        }
    }
}

/// Trims whitespace and byte-order marks from paragraph text.
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn get_val_attr(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}
