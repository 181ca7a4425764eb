// crates/tuf-metadata/src/trust.rs
// ============================================================================
// Module: Trust Promotion
// Description: Verify-then-promote helper with audit recording.
// Purpose: Make promotion the only path that couples verification and trust.
// Dependencies: crate::{audit, error, interfaces, metadata}, thiserror
// ============================================================================

//! ## Overview
//! [`promote`] asks a [`SignatureVerifier`] to check an untrusted document
//! and marks it trusted only on success. Every attempt is recorded to a
//! [`TrustAuditSink`]. Promotion takes `&mut` access to the document, so at
//! most one writer can promote it at a time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::audit::PromotionOutcome;
use crate::audit::TrustAuditEvent;
use crate::audit::TrustAuditEventParams;
use crate::audit::TrustAuditSink;
use crate::error::MetadataError;
use crate::interfaces::SignatureVerifier;
use crate::interfaces::VerificationError;
use crate::metadata::Metadata;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Promotion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionError {
    /// The verifier rejected the signatures; trust state is unchanged.
    #[error(transparent)]
    Verification(#[from] VerificationError),
    /// The document could not be promoted.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

// ============================================================================
// SECTION: Promotion
// ============================================================================

/// Verifies `metadata` and promotes it to trusted.
///
/// # Errors
///
/// Returns [`PromotionError::Verification`] when the verifier rejects the
/// document, or [`PromotionError::Metadata`] when it is already trusted.
pub fn promote<M: Metadata>(
    metadata: &mut M,
    verifier: &dyn SignatureVerifier,
    audit: &dyn TrustAuditSink,
) -> Result<(), PromotionError> {
    let result = verifier
        .verify(metadata.document())
        .map_err(PromotionError::from)
        .and_then(|()| metadata.mark_trusted().map_err(PromotionError::from));
    let (outcome, reason) = match &result {
        Ok(()) => (PromotionOutcome::Promoted, None),
        Err(err) => (PromotionOutcome::Rejected, Some(err.to_string())),
    };
    audit.record(&TrustAuditEvent::new(TrustAuditEventParams {
        metadata_type: M::TYPE,
        version: metadata.get_version(true).ok(),
        signed_digest: metadata.document().signed_digest().ok(),
        outcome,
        reason,
    }));
    result
}
