//! The five placeholder forms and the matcher shared by the validator and
//! the lexer.

use std::fmt;

/// The declared type of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// `?`: a scalar (null, boolean, integer, float or string).
    Generic,
    /// `?#`: an identifier or a list of identifiers.
    Identifier,
    /// `?d`: an integer.
    Integer,
    /// `?f`: a float.
    Float,
    /// `?a`: a list or a key/value list.
    ArrayExpansion,
}

/// Every recognized form, in the order they are documented.
pub const PLACEHOLDER_FORMS: [(&str, PlaceholderKind); 5] = [
    ("?", PlaceholderKind::Generic),
    ("?a", PlaceholderKind::ArrayExpansion),
    ("?#", PlaceholderKind::Identifier),
    ("?d", PlaceholderKind::Integer),
    ("?f", PlaceholderKind::Float),
];

impl PlaceholderKind {
    /// The template spelling of this placeholder.
    pub fn form(self) -> &'static str {
        match self {
            PlaceholderKind::Generic => "?",
            PlaceholderKind::Identifier => "?#",
            PlaceholderKind::Integer => "?d",
            PlaceholderKind::Float => "?f",
            PlaceholderKind::ArrayExpansion => "?a",
        }
    }

    /// Looks up a chunk that is exactly one placeholder form.
    pub fn from_form(s: &str) -> Option<Self> {
        PLACEHOLDER_FORMS
            .iter()
            .find(|(form, _)| *form == s)
            .map(|(_, kind)| *kind)
    }

    fn from_suffix(b: u8) -> Option<Self> {
        match b {
            b'd' => Some(PlaceholderKind::Integer),
            b'f' => Some(PlaceholderKind::Float),
            b'a' => Some(PlaceholderKind::ArrayExpansion),
            b'#' => Some(PlaceholderKind::Identifier),
            _ => None,
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form())
    }
}

/// Matches a placeholder starting at byte `pos` of `text`.
///
/// A `?` followed by `d`, `f`, `a` or `#` is a typed placeholder. A bare `?`
/// is a generic placeholder only when it is the last character of `text` or
/// is followed by whitespace; anywhere else it is literal text.
///
/// Returns the kind and the byte length of the match.
pub fn match_placeholder(text: &str, pos: usize) -> Option<(PlaceholderKind, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'?') {
        return None;
    }
    if let Some(kind) = bytes.get(pos + 1).copied().and_then(PlaceholderKind::from_suffix) {
        return Some((kind, 2));
    }
    match text[pos + 1..].chars().next() {
        None => Some((PlaceholderKind::Generic, 1)),
        Some(c) if c.is_whitespace() => Some((PlaceholderKind::Generic, 1)),
        Some(_) => None,
    }
}
