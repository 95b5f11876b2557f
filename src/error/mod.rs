//! Unified error handling for sqlweave.
//!
//! This module defines [`CompileError`], the single error type returned by
//! every stage of template compilation: the placeholder-count validator, the
//! tokenizer, the block assembler and the value formatters.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, CompileError>`.
//!
//! Errors never carry partial output. A compile call either returns the whole
//! SQL text or one of these variants.

use thiserror::Error;

/// The canonical error type for all sqlweave operations.
///
/// Variants fall into two families. [`CompileError::Validation`] is raised
/// before any substitution starts; every other variant comes from the
/// substitution pass and describes the offending template position or
/// argument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The number of placeholders in the template differs from the number
    /// of supplied arguments.
    #[error(
        "placeholder count mismatch in template `{template}`: \
         {placeholders} placeholder(s), {arguments} argument(s)"
    )]
    Validation {
        template: String,
        placeholders: usize,
        arguments: usize,
    },

    /// An argument has a kind the placeholder does not accept.
    #[error("type error for `{placeholder}`: {message}")]
    Type {
        placeholder: &'static str,
        message: String,
    },

    /// An identifier passed to `?#` (or used as an `?a` key) cannot be
    /// quoted safely.
    #[error("invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// Strict numeric mode could not parse a numeric argument.
    #[error("invalid number for `{placeholder}`: {input:?}")]
    InvalidNumber {
        placeholder: &'static str,
        input: String,
    },

    /// A `{` was found while a conditional block was already open.
    #[error("nested conditional block at byte offset {offset}")]
    NestedBlock { offset: usize },

    /// A `}` was found with no open conditional block.
    #[error("unmatched `}}` at byte offset {offset}")]
    UnmatchedBlockClose { offset: usize },

    /// The skip sentinel was bound to a placeholder outside any block.
    #[error("skip sentinel used outside a conditional block (argument #{index})")]
    SkipOutsideBlock { index: usize },
}

impl CompileError {
    /// Returns `true` for the up-front placeholder/argument count failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, CompileError::Validation { .. })
    }

    /// Returns `true` for errors caused by an argument of a disallowed kind.
    pub fn is_type_error(&self) -> bool {
        matches!(self, CompileError::Type { .. })
    }

    pub(crate) fn type_error(placeholder: &'static str, message: impl Into<String>) -> Self {
        CompileError::Type {
            placeholder,
            message: message.into(),
        }
    }
}

/// A specialised [`Result`] type for sqlweave operations.
pub type Result<T> = std::result::Result<T, CompileError>;
