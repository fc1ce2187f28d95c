//! Parser diagnostics.

use crate::position::Position;

/// A single recoverable parse problem. The parser never stops at the first
/// one: it records it, recovers, and keeps building the tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// The non-empty collection of [`ParseError`]s accumulated by one
/// [`super::Parser::parse`] call. Callers that want a hard failure (rather
/// than a best-effort tree) convert a non-empty error vec into this.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} parse error(s), first: {}", .0.len(), .0[0])]
pub struct ParseErrors(pub Vec<ParseError>);
