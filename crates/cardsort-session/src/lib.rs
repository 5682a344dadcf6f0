//! # cardsort-session
//!
//! The sorting-session state machine: card placements, undo history,
//! telemetry counters, the completion gate, and result derivation.
//!
//! ## Overview
//!
//! One [`SessionEngine`] instance owns one participant's session. The
//! engine is constructed by the embedding application and passed to the
//! presentation layer; there is no ambient singleton. All mutation goes
//! through its API so the undo stack and counters stay consistent.
//!
//! ## Lifecycle
//!
//! `Uninitialized -> Sorting -> Completed`. Loading a template computes
//! its checksum, creates one unsorted placement per card, and stamps the
//! start time. Generating a final result freezes the session; a partial
//! save does not.

pub mod engine;
pub mod error;
pub mod placement;

pub use engine::{SessionEngine, SessionEnv, SessionState};
pub use error::{Result, SessionError};
pub use placement::{CardLocation, CardPlacement, PlacementSet};
