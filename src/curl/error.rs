//! Error types for cURL parsing and request normalization.

use thiserror::Error;

/// Errors that make a cURL command unusable.
///
/// Malformed pieces of a command (unknown flags, missing flag arguments, bad
/// numbers) never produce an error; they degrade to defaults. An error is
/// only returned when no usable request can be derived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input string is empty or contains only whitespace.
    #[error("Input is empty")]
    EmptyInput,

    /// No URL was found in the command and no base URL was supplied.
    #[error("No URL found in cURL command")]
    MissingUrl,

    /// A quote was left open and the tokenizer was told to reject it.
    /// `position` is a byte offset into the original input.
    #[error("Unterminated {quote} quote starting at byte {position}")]
    UnterminatedQuote { quote: char, position: usize },

    /// A supplied request payload does not have the request shape.
    #[error("Invalid request input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::InvalidInput(err.to_string())
    }
}
