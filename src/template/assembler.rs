//! Block-aware substitution.
//!
//! The assembler walks the token stream once, binding arguments to
//! placeholders left to right. Conditional blocks are tracked with a
//! two-state machine:
//!
//! ```text
//!             BlockOpen
//!   Outside ─────────────▶ Inside { buffer, suppressed: false }
//!      ▲                        │
//!      │      BlockClose        │  placeholder bound to skip()
//!      └────────────────────────┤  ──▶ suppressed = true
//! ```
//!
//! Text produced while `Inside` goes to the block buffer, which is appended
//! to the result on `BlockClose` unless the block was suppressed. A
//! suppressed block keeps consuming arguments so later placeholders stay
//! aligned with their arguments.

use super::lexer::Token;
use crate::config::CompileOptions;
use crate::error::{CompileError, Result};
use crate::format::format_value;
use crate::types::Value;

#[derive(Debug)]
enum BlockState {
    Outside,
    Inside { buffer: String, suppressed: bool },
}

/// Substitutes `args` into `tokens`.
///
/// Expects `args` to hold exactly one value per placeholder token (the
/// validator's guarantee). Returns the assembled text with trailing
/// whitespace removed.
///
/// # Errors
///
/// - [`CompileError::NestedBlock`] for `{` inside an open block.
/// - [`CompileError::UnmatchedBlockClose`] for `}` with no open block.
/// - [`CompileError::SkipOutsideBlock`] when [`Value::Skip`] is bound to a
///   placeholder outside any block.
/// - Any formatter error for the bound value.
///
/// A block still open at the end of the stream is closed implicitly.
pub fn assemble(tokens: &[Token<'_>], args: &[Value], options: &CompileOptions) -> Result<String> {
    let mut result = String::new();
    let mut state = BlockState::Outside;
    let mut bound = args.iter().enumerate();

    for token in tokens {
        match *token {
            Token::BlockOpen { offset } => {
                if let BlockState::Inside { .. } = state {
                    return Err(CompileError::NestedBlock { offset });
                }
                state = BlockState::Inside {
                    buffer: String::new(),
                    suppressed: false,
                };
            }
            Token::BlockClose { offset } => {
                match std::mem::replace(&mut state, BlockState::Outside) {
                    BlockState::Inside { buffer, suppressed } => {
                        close_block(&mut result, buffer, suppressed)
                    }
                    BlockState::Outside => {
                        return Err(CompileError::UnmatchedBlockClose { offset })
                    }
                }
            }
            Token::Literal(text) => active_buffer(&mut state, &mut result).push_str(text),
            Token::Separator => active_buffer(&mut state, &mut result).push(' '),
            Token::Placeholder(kind) => {
                let (index, arg) = bound.next().ok_or_else(|| CompileError::Validation {
                    template: String::new(),
                    placeholders: tokens
                        .iter()
                        .filter(|t| matches!(t, Token::Placeholder(_)))
                        .count(),
                    arguments: args.len(),
                })?;

                if arg.is_skip() {
                    match &mut state {
                        BlockState::Inside { suppressed, .. } => *suppressed = true,
                        BlockState::Outside => {
                            return Err(CompileError::SkipOutsideBlock { index })
                        }
                    }
                    continue;
                }

                let text = format_value(kind, arg, options)?;
                active_buffer(&mut state, &mut result).push_str(&text);
            }
        }
    }

    if let BlockState::Inside { buffer, suppressed } = state {
        close_block(&mut result, buffer, suppressed);
    }

    result.truncate(result.trim_end().len());
    Ok(result)
}

fn active_buffer<'b>(state: &'b mut BlockState, result: &'b mut String) -> &'b mut String {
    match state {
        BlockState::Outside => result,
        BlockState::Inside { buffer, .. } => buffer,
    }
}

fn close_block(result: &mut String, buffer: String, suppressed: bool) {
    if suppressed {
        tracing::debug!(dropped = buffer.len(), "conditional block suppressed by skip");
    } else {
        result.push_str(&buffer);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
