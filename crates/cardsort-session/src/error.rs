//! Error types for sorting sessions.

use cardsort_core::{CardId, CategoryId};
use thiserror::Error;

/// Errors that can occur during session operations.
///
/// Unknown-card and unknown-category failures indicate a defect in the
/// calling UI, not a user-recoverable condition; they are surfaced loudly
/// and never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Result generation was attempted with no template loaded.
    #[error("no template loaded")]
    NoTemplateLoaded,

    /// The card id does not exist in the loaded template.
    #[error("unknown card: {0}")]
    UnknownCard(CardId),

    /// The target category id does not exist in the loaded template.
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The completion gate is closed: cards remain unsorted.
    #[error("sort incomplete: {unsorted} card(s) still unsorted")]
    SortIncomplete { unsorted: usize },

    /// The session was already finalized; no further mutation is allowed.
    #[error("session already completed")]
    Completed,

    /// The template could not be serialized for checksum computation.
    #[error("template checksum could not be computed: {0}")]
    ChecksumUnavailable(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
