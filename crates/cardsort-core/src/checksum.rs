//! SHA-256 checksums over canonical JSON.
//!
//! A result document carries the checksum of the template it was produced
//! from, so a consumer can detect template drift or tampering. Verification
//! is a query: it answers true or false, it never throws.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::canonical::canonical_json_bytes;
use crate::error::CoreError;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Checksum(pub [u8; 32]);

impl Sha256Checksum {
    /// Compute the checksum of a document's canonical JSON form.
    pub fn compute<T: Serialize>(doc: &T) -> Result<Self, CoreError> {
        let bytes = canonical_json_bytes(doc)?;
        let digest = Sha256::digest(&bytes);
        Ok(Self(digest.into()))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string. Rejects anything but exactly 64 lowercase
    /// hex characters.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        if !is_valid_checksum_format(s) {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let bytes = hex::decode(s)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Sha256Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Sha256Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Checksum {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Compute a document's checksum as a 64-character lowercase hex string.
pub fn compute_checksum<T: Serialize>(doc: &T) -> Result<String, CoreError> {
    Ok(Sha256Checksum::compute(doc)?.to_hex())
}

/// Verify a document against an expected checksum.
///
/// Returns false on mismatch, malformed expected string, or a document
/// that cannot be serialized. Comparison is constant time.
pub fn verify_checksum<T: Serialize>(doc: &T, expected: &str) -> bool {
    let Ok(expected) = Sha256Checksum::from_hex(expected) else {
        return false;
    };
    let Ok(actual) = Sha256Checksum::compute(doc) else {
        return false;
    };
    constant_time_eq(actual.as_bytes(), expected.as_bytes())
}

/// Check that a string is exactly 64 lowercase hex characters.
pub fn is_valid_checksum_format(s: &str) -> bool {
    s.len() == 64
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Constant-time equality over fixed-length digests.
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
