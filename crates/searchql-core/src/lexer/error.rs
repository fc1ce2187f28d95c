//! Lexer error type.

use crate::position::Position;

/// An error raised while scanning the raw character stream.
///
/// Only unterminated quoted strings and unterminated regexes are reported
/// this way; any other illegal input surfaces as an `ILLEGAL` token and is
/// turned into a `ParseError` by the parser.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    #[must_use]
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}
