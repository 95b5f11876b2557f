//! Template front-end for sqlweave.
//!
//! This module contains the placeholder table, the placeholder-count
//! validator, the tokenizer and the block assembler that together turn a
//! template plus arguments into SQL text.

pub mod assembler;
pub mod lexer;
pub mod placeholder;
pub mod validator;

pub use assembler::assemble;
pub use lexer::{Lexer, Token};
pub use placeholder::{PlaceholderKind, PLACEHOLDER_FORMS};
pub use validator::{count_placeholders, validate};
