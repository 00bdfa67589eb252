//! Error types for fitband-types.

use thiserror::Error;

/// Errors raised while parsing request tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The activity type token does not name a known record type.
    #[error("unrecognized activity type: {0}")]
    UnknownActivityType(String),

    /// The calories kind token does not name a known kind.
    #[error("unrecognized calories kind: {0}")]
    UnknownCaloriesKind(String),
}

/// Result type alias for token parsing.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
