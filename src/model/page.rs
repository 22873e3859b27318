//! Page setup carried over from the template.

use serde::Serialize;

/// Page setup fragments found in the template body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// `<w:headerReference .../>` elements in source order
    pub header_refs: Vec<String>,
    /// `<w:footerReference .../>` elements in source order
    pub footer_refs: Vec<String>,
    /// `<w:pgSz .../>` element, or empty
    pub page_size: String,
    /// `<w:pgMar .../>` element, or empty
    pub page_margin: String,
}

impl PageSetup {
    /// Returns true if none of the fragments were found.
    pub fn is_empty(&self) -> bool {
        self.header_refs.is_empty()
            && self.footer_refs.is_empty()
            && self.page_size.is_empty()
            && self.page_margin.is_empty()
    }

    /// Builds the closing `<w:sectPr>` fragment, or None if there is nothing to carry.
    pub fn section_xml(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut xml = String::from("<w:sectPr>");
        for fragment in self.header_refs.iter().chain(&self.footer_refs) {
            xml.push_str(fragment);
        }
        xml.push_str(&self.page_size);
        xml.push_str(&self.page_margin);
        xml.push_str("</w:sectPr>");
        Some(xml)
    }
}
