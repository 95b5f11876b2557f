//! Hand-written template tokenizer.
//!
//! The [`Lexer`] splits a template on runs of whitespace and turns every
//! chunk into literal text, placeholders and block braces. Each chunk is
//! followed by one [`Token::Separator`], so the assembled output has single
//! spaces between chunks no matter how the template was laid out.
//!
//! Placeholders and braces may be glued to punctuation: `(?d,?d)` lexes as
//! `(`, `?d`, `,`, `?d`, `)`.

use super::placeholder::{match_placeholder, PlaceholderKind};

/// A single template token. Literal text borrows from the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Verbatim template text.
    Literal(&'a str),
    /// A typed placeholder.
    Placeholder(PlaceholderKind),
    /// `{`, at the given byte offset of the template.
    BlockOpen { offset: usize },
    /// `}`, at the given byte offset of the template.
    BlockClose { offset: usize },
    /// The single space emitted after every whitespace-delimited chunk.
    Separator,
}

/// A template tokenizer.
///
/// Create one with [`Lexer::new`], then call [`Lexer::tokenize`] to obtain
/// the token stream. Tokenizing never fails: text that is not a placeholder
/// or a brace is literal.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given template.
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    /// Tokenize the entire template.
    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        while let Some((offset, chunk)) = self.next_chunk() {
            match whole_chunk_token(chunk, offset) {
                Some(tok) => tokens.push(tok),
                None => scan_chunk(chunk, offset, &mut tokens),
            }
            tokens.push(Token::Separator);
        }
        tracing::trace!(tokens = tokens.len(), "tokenized template");
        tokens
    }

    // -- helpers ------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// Returns the next whitespace-delimited chunk and its byte offset.
    fn next_chunk(&mut self) -> Option<(usize, &'a str)> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += len;
        Some((start, &rest[..len]))
    }
}

/// A chunk that is exactly one placeholder form or a lone brace.
fn whole_chunk_token(chunk: &str, offset: usize) -> Option<Token<'_>> {
    match chunk {
        "{" => Some(Token::BlockOpen { offset }),
        "}" => Some(Token::BlockClose { offset }),
        _ => PlaceholderKind::from_form(chunk).map(Token::Placeholder),
    }
}

/// Splits a chunk around embedded placeholders and braces.
fn scan_chunk<'a>(chunk: &'a str, base: usize, tokens: &mut Vec<Token<'a>>) {
    let bytes = chunk.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    // Every byte we split on is ASCII, so `i` is always a char boundary.
    while i < bytes.len() {
        let (tok, len) = match bytes[i] {
            b'{' => (Token::BlockOpen { offset: base + i }, 1),
            b'}' => (Token::BlockClose { offset: base + i }, 1),
            b'?' => match match_placeholder(chunk, i) {
                Some((kind, len)) => (Token::Placeholder(kind), len),
                None => {
                    i += 1;
                    continue;
                }
            },
            _ => {
                i += 1;
                continue;
            }
        };
        if literal_start < i {
            tokens.push(Token::Literal(&chunk[literal_start..i]));
        }
        tokens.push(tok);
        i += len;
        literal_start = i;
    }

    if literal_start < bytes.len() {
        tokens.push(Token::Literal(&chunk[literal_start..]));
    }
}

// ===========================================================================
// Tests
// ===========================================================================
