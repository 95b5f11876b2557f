//! Placeholder/argument count check, run before any tokenizing.

use super::placeholder::match_placeholder;
use crate::error::{CompileError, Result};

/// Counts the placeholders in a raw template.
///
/// Uses the same matcher as the lexer, so the count always equals the number
/// of [`super::Token::Placeholder`] tokens the lexer will produce.
pub fn count_placeholders(template: &str) -> usize {
    let mut count = 0;
    let mut i = 0;
    while let Some(found) = template[i..].find('?') {
        let pos = i + found;
        match match_placeholder(template, pos) {
            Some((_, len)) => {
                count += 1;
                i = pos + len;
            }
            None => i = pos + 1,
        }
    }
    count
}

/// Fails with [`CompileError::Validation`] unless the template holds exactly
/// `arguments` placeholders.
pub fn validate(template: &str, arguments: usize) -> Result<()> {
    let placeholders = count_placeholders(template);
    if placeholders != arguments {
        return Err(CompileError::Validation {
            template: template.to_string(),
            placeholders,
            arguments,
        });
    }
    Ok(())
}
