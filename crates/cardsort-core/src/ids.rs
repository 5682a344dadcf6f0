//! Typed, prefixed identifiers.
//!
//! Every entity carries an id of the form `<prefix>_<suffix>` where the
//! suffix is 10 characters from the URL-safe alphabet `A-Za-z0-9_-`.
//! Ids are newtypes to prevent misuse at compile time: a `CardId` cannot
//! be passed where a `CategoryId` is expected.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IdError;

/// Length of the random suffix (excluding prefix).
pub const ID_SUFFIX_LEN: usize = 10;

/// The URL-safe alphabet suffixes are drawn from.
const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// The kind of entity an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Template,
    Category,
    Card,
    Session,
    Result,
}

impl EntityKind {
    /// The id prefix for this kind, including the trailing underscore.
    pub const fn prefix(self) -> &'static str {
        match self {
            EntityKind::Template => "tmpl_",
            EntityKind::Category => "cat_",
            EntityKind::Card => "card_",
            EntityKind::Session => "sess_",
            EntityKind::Result => "res_",
        }
    }

    /// Recover the entity kind from an id by its prefix.
    ///
    /// Used for defensive checks when imported data references ids whose
    /// type is not known from context. Returns `None` for unknown prefixes.
    pub fn classify(id: &str) -> Option<EntityKind> {
        const ALL: [EntityKind; 5] = [
            EntityKind::Template,
            EntityKind::Category,
            EntityKind::Card,
            EntityKind::Session,
            EntityKind::Result,
        ];
        ALL.into_iter().find(|kind| id.starts_with(kind.prefix()))
    }
}

/// Draw a fresh random suffix from the URL-safe alphabet.
///
/// `thread_rng` is a CSPRNG, so collisions are negligible at the expected
/// volumes (at most a few thousand entities per template).
fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Check a suffix against the expected length and alphabet.
fn check_suffix(suffix: &str) -> Result<(), IdError> {
    if suffix.len() != ID_SUFFIX_LEN {
        return Err(IdError::WrongSuffixLength {
            expected: ID_SUFFIX_LEN,
            got: suffix.len(),
        });
    }
    if !suffix
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(IdError::InvalidCharacters);
    }
    Ok(())
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// The entity kind this id type names.
            pub const KIND: EntityKind = $kind;

            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(format!("{}{}", Self::KIND.prefix(), random_suffix()))
            }

            /// Parse an id, checking prefix, suffix length, and alphabet.
            pub fn parse(s: &str) -> Result<Self, IdError> {
                let suffix = s.strip_prefix(Self::KIND.prefix()).ok_or_else(|| {
                    IdError::WrongPrefix {
                        expected: Self::KIND.prefix(),
                        id: s.to_string(),
                    }
                })?;
                check_suffix(suffix)?;
                Ok(Self(s.to_string()))
            }

            /// The full id string, prefix included.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a study template (`tmpl_` prefix).
    TemplateId,
    EntityKind::Template
);
entity_id!(
    /// Identifier of a category (`cat_` prefix).
    CategoryId,
    EntityKind::Category
);
entity_id!(
    /// Identifier of a card (`card_` prefix).
    CardId,
    EntityKind::Card
);
entity_id!(
    /// Identifier of a sorting session (`sess_` prefix).
    SessionId,
    EntityKind::Session
);
entity_id!(
    /// Identifier of an exported result (`res_` prefix).
    ResultId,
    EntityKind::Result
);
