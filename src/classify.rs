//! Markdown line classification.
//!
//! Maps a line of template text to the [`Role`] its Markdown marker denotes.
//! Patterns are tried in a fixed priority order and the first match wins:
//! headings from level 6 down to level 1, then blockquote, ordered list and
//! unordered list. `^#{1}` also matches `###### x`, so the order is what
//! keeps deeper headings from collapsing into `h1`.

use crate::model::Role;
use regex::Regex;
use std::sync::LazyLock;

static PATTERNS: LazyLock<Vec<(Role, Regex)>> = LazyLock::new(|| {
    [
        (Role::H6, r"^#{6}\s*(.+)"),
        (Role::H5, r"^#{5}\s*(.+)"),
        (Role::H4, r"^#{4}\s*(.+)"),
        (Role::H3, r"^#{3}\s*(.+)"),
        (Role::H2, r"^#{2}\s*(.+)"),
        (Role::H1, r"^#{1}\s*(.+)"),
        (Role::Blockquote, r"^>\s*(.+)"),
        (Role::OrderedList, r"^[0-9]+\.\s*(.+)"),
        (Role::UnorderedList, r"^[*\-]\s*(.+)"),
    ]
    .into_iter()
    .map(|(role, pattern)| (role, Regex::new(pattern).unwrap()))
    .collect()
});

/// Classifies a line by its leading Markdown marker.
///
/// Returns None for plain text; the caller decides whether plain text becomes
/// the body-text paragraph.
pub fn classify(line: &str) -> Option<Role> {
    PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(line))
        .map(|(role, _)| *role)
}
