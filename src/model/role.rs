//! Semantic Markdown block roles.

use serde::Serialize;

/// Semantic block category shared by template analysis and Markdown generation.
///
/// The same enumeration keys both sides of the [`StyleRegistry`](super::StyleRegistry),
/// so a role discovered in the template is exactly the role looked up when a
/// Markdown token is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Role {
    #[serde(rename = "h1")]
    H1,
    #[serde(rename = "h2")]
    H2,
    #[serde(rename = "h3")]
    H3,
    #[serde(rename = "h4")]
    H4,
    #[serde(rename = "h5")]
    H5,
    #[serde(rename = "h6")]
    H6,
    #[serde(rename = "blockquote")]
    Blockquote,
    #[serde(rename = "ol")]
    OrderedList,
    #[serde(rename = "ul")]
    UnorderedList,
    #[serde(rename = "p")]
    Paragraph,
    #[serde(rename = "table")]
    Table,
}

impl Role {
    /// Returns the heading role for a level (1-6).
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Role::H1),
            2 => Some(Role::H2),
            3 => Some(Role::H3),
            4 => Some(Role::H4),
            5 => Some(Role::H5),
            6 => Some(Role::H6),
            _ => None,
        }
    }

    /// Returns the list role for an ordered or unordered list.
    pub fn list(ordered: bool) -> Self {
        if ordered {
            Role::OrderedList
        } else {
            Role::UnorderedList
        }
    }

    /// Returns the heading level, or None for non-heading roles.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Role::H1 => Some(1),
            Role::H2 => Some(2),
            Role::H3 => Some(3),
            Role::H4 => Some(4),
            Role::H5 => Some(5),
            Role::H6 => Some(6),
            _ => None,
        }
    }

    /// Short key used in reports (`h1`, `ol`, `p`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Role::H1 => "h1",
            Role::H2 => "h2",
            Role::H3 => "h3",
            Role::H4 => "h4",
            Role::H5 => "h5",
            Role::H6 => "h6",
            Role::Blockquote => "blockquote",
            Role::OrderedList => "ol",
            Role::UnorderedList => "ul",
            Role::Paragraph => "p",
            Role::Table => "table",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_roundtrip() {
        for level in 1..=6 {
            let role = Role::heading(level).unwrap();
            assert_eq!(role.heading_level(), Some(level));
        }
        assert!(Role::heading(0).is_none());
        assert!(Role::heading(7).is_none());
        assert!(Role::Paragraph.heading_level().is_none());
    }

    #[test]
    fn test_serialized_key_matches_display() {
        let json = serde_json::to_string(&Role::OrderedList).unwrap();
        assert_eq!(json, "\"ol\"");
        assert_eq!(Role::OrderedList.to_string(), "ol");
    }
}
