//! # cardsort-core
//!
//! Pure primitives for the cardsort platform: the study domain model,
//! typed identifiers, canonical JSON, checksums, and document validation.
//!
//! This crate contains no I/O and no session state. It is pure computation
//! over study documents.
//!
//! ## Key Types
//!
//! - [`StudyTemplate`] - The authored, versioned, exportable study definition
//! - [`StudyResult`] - The write-once record of one participant's sort
//! - [`Sha256Checksum`] - Content checksum binding a result to its template
//! - [`TemplateId`], [`CategoryId`], [`CardId`] - Typed, prefixed identifiers
//!
//! ## Canonicalization
//!
//! Checksums are computed over canonical JSON (sorted keys, compact form),
//! so a template re-verifies after a JSON export/import round trip. See the
//! [`canonical`] module.

pub mod canonical;
pub mod checksum;
pub mod error;
pub mod ids;
pub mod model;
pub mod validation;

pub use canonical::{canonical_json_bytes, canonical_json_string};
pub use checksum::{compute_checksum, is_valid_checksum_format, verify_checksum, Sha256Checksum};
pub use error::{CoreError, IdError, ValidationErrors};
pub use ids::{CardId, CategoryId, EntityKind, ResultId, SessionId, TemplateId, ID_SUFFIX_LEN};
pub use model::{
    Card, Category, Output, OutputGroup, Participant, SessionInfo, SortType, Study, StudyResult,
    StudySettings, StudyTemplate, Telemetry, Viewport, SCHEMA_VERSION,
};
pub use validation::{
    validate_result, validate_template, MAX_CARDS, MAX_CATEGORIES, MAX_DESCRIPTION_LEN,
    MAX_LABEL_LEN,
};
