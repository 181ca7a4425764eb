// crates/tuf-metadata/src/keys.rs
// ============================================================================
// Module: Key Identifiers and Records
// Description: Typed key identifiers and public key records.
// Purpose: Give verifiers a typed view of keys listed in trusted metadata.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Key identifiers are opaque strings. Key records are typed views over the
//! validated `keys` entries of root or delegating targets metadata; they are
//! copies and never alias the owning document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Key Identifier
// ============================================================================

/// Identifier of a signing key.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(String);

impl KeyId {
    /// Creates a new key identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for KeyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for KeyId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Key Record
// ============================================================================

/// Public key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Encoded public key.
    pub public: String,
}

/// Public key record listed under `keys`.
///
/// # Invariants
/// - Built only from payloads that passed the key record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Hash algorithms used to derive the key identifier.
    pub keyid_hash_algorithms: Vec<String>,
    /// Key type, e.g. `ed25519`.
    pub keytype: String,
    /// Public key material.
    pub keyval: KeyValue,
    /// Signature scheme, e.g. `ed25519`.
    pub scheme: String,
}
