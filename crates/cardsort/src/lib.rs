//! # cardsort
//!
//! A client-side card-sorting study toolkit: author a deck of cards and
//! categories, run a drag-and-drop sorting session, and export structured,
//! checksummed JSON results.
//!
//! ## Overview
//!
//! - **Templates**: the versioned definition of a study (cards, categories,
//!   settings), exchanged as JSON and validated exhaustively on import.
//! - **Sessions**: one engine instance per participant tracks where every
//!   card is, supports undo, and enforces the completion gate.
//! - **Results**: write-once documents bound to the exact template content
//!   they came from via a SHA-256 checksum over canonical JSON.
//!
//! ## Usage
//!
//! ```rust
//! use cardsort::{import_template, export_result, SessionEnv, TemplateBuilder, Viewport};
//!
//! // Author a template
//! let mut builder = TemplateBuilder::new();
//! builder.study_mut().title = "Navigation sort".to_string();
//! let account = builder.add_category("Account");
//! let card = builder.add_card("Change password");
//! let template = builder.build().unwrap();
//!
//! // Run a session
//! let json = cardsort::export_template(&template).unwrap();
//! let mut engine = import_template(&json).unwrap().start_session().unwrap();
//! engine.move_card(&card, Some(&account), false).unwrap();
//!
//! // Export the result
//! let env = SessionEnv {
//!     timezone: "UTC".to_string(),
//!     user_agent: "docs".to_string(),
//!     viewport: Viewport { w: 1280, h: 720 },
//! };
//! let result = engine.generate_result("Alice", &env).unwrap();
//! let exported = export_result(&result).unwrap();
//! assert!(exported.contains("templateChecksumSha256"));
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `cardsort::core` - Domain model, ids, checksums, validation
//! - `cardsort::session` - The sorting-session state machine

pub mod builder;
pub mod io;

// Re-export component crates
pub use cardsort_core as core;
pub use cardsort_session as session;

// Re-export main types for convenience
pub use builder::TemplateBuilder;
pub use io::{
    export_result, export_template, import_result, import_template, verify_result_binding,
    ExportError, ImportError, LoadedTemplate,
};

// Re-export commonly used core and session types
pub use cardsort_core::{
    compute_checksum, is_valid_checksum_format, validate_result, validate_template,
    verify_checksum, Card, CardId, Category, CategoryId, EntityKind, Output, OutputGroup,
    Participant, ResultId, SessionId, SessionInfo, Sha256Checksum, SortType, Study, StudyResult,
    StudySettings, StudyTemplate, Telemetry, TemplateId, ValidationErrors, Viewport,
    SCHEMA_VERSION,
};
pub use cardsort_session::{
    CardLocation, CardPlacement, PlacementSet, SessionEngine, SessionEnv, SessionError,
    SessionState,
};
