// crates/tuf-metadata/src/hashing.rs
// ============================================================================
// Module: Canonical Signed Bytes
// Description: RFC 8785 canonicalization and SHA-256 digests of signed payloads.
// Purpose: Give verifiers and audit records one stable byte form per document.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Signature verifiers check signatures over the canonical bytes of the
//! `signed` portion, and audit records identify a document by the digest of
//! those same bytes. Key order in the decoded payload does not affect either.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::error::MetadataError;

// ============================================================================
// SECTION: Digests
// ============================================================================

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

/// Content digest with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns RFC 8785 canonical JSON bytes for a value.
///
/// # Errors
///
/// Returns [`MetadataError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, MetadataError> {
    serde_jcs::to_vec(value).map_err(|err| MetadataError::Canonicalization(err.to_string()))
}

/// Hashes raw bytes with the given algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let digest = Sha256::digest(bytes);
            HashDigest {
                algorithm,
                value: hex_encode(&digest),
            }
        }
    }
}

/// Encodes bytes as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}
