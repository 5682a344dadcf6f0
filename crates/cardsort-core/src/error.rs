//! Error types for the cardsort core.

use thiserror::Error;

/// Core errors that can occur during document operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::EncodingError(e.to_string())
    }
}

/// Errors from parsing a prefixed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("expected prefix {expected:?}, got {id:?}")]
    WrongPrefix { expected: &'static str, id: String },

    #[error("id suffix must be exactly {expected} characters, got {got}")]
    WrongSuffixLength { expected: usize, got: usize },

    #[error("id suffix contains characters outside A-Za-z0-9_-")]
    InvalidCharacters,
}

/// A non-empty list of validation failures.
///
/// Validation never short-circuits: the caller gets every problem in the
/// document at once, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    /// The individual human-readable messages.
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}
