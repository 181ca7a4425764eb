// crates/tuf-metadata/src/interfaces/mod.rs
// ============================================================================
// Module: Verification Interfaces
// Description: Backend-agnostic signature verification boundary.
// Purpose: Let callers plug in cryptography without this crate linking any.
// Dependencies: crate::metadata, thiserror
// ============================================================================

//! ## Overview
//! Signature verification is an external collaborator. A verifier sees the
//! untrusted document through its ungated surface (type tag, signature block,
//! canonical signed bytes) and decides whether the signing threshold is met.
//!
//! Security posture: verifiers must fail closed; any error keeps the document
//! untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::metadata::SignedDocument;

// ============================================================================
// SECTION: Signature Verifier
// ============================================================================

/// Verifies the signature block of an untrusted document.
pub trait SignatureVerifier {
    /// Checks the document's signatures against the expected role keys.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError`] when the document must stay untrusted.
    fn verify(&self, document: &SignedDocument) -> Result<(), VerificationError>;
}

/// Signature verification failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Fewer distinct valid signatures than the role threshold.
    #[error("signature threshold not met: {valid} of {required}")]
    ThresholdNotMet {
        /// Signatures required by the role.
        required: u64,
        /// Distinct valid signatures found.
        valid: u64,
    },
    /// A signature names a key the verifier does not know.
    #[error("unknown signing key: {0}")]
    UnknownKey(String),
    /// Verification failed for another reason.
    #[error("signature verification rejected: {0}")]
    Rejected(String),
}
