//! # cardsort-testkit
//!
//! Testing utilities for the cardsort platform.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic templates, ids, and session environments
//! - **Generators**: proptest strategies for templates and move sequences
//! - **Golden vectors**: documents with known canonical forms and SHA-256
//!   digests, for cross-implementation verification of the checksum engine
//!
//! ## Fixtures
//!
//! ```rust
//! use cardsort_testkit::fixtures;
//!
//! let template = fixtures::template(2, 5, fixtures::strict_settings());
//! assert_eq!(template.cards.len(), 5);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cardsort_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn checksums_are_deterministic(tmpl in generators::template()) {
//!         let a = cardsort_core::compute_checksum(&tmpl).unwrap();
//!         let b = cardsort_core::compute_checksum(&tmpl).unwrap();
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    card, card_id, category, category_id, relaxed_settings, sample_env, strict_settings, template,
};
pub use generators::MoveOp;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
