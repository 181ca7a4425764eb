// crates/tuf-metadata/src/error.rs
// ============================================================================
// Module: Metadata Errors
// Description: Error taxonomy for schema, trust-gate, and loader failures.
// Purpose: Give callers stable variants to abort trust establishment on.
// Dependencies: crate::{metadata, schema}, thiserror
// ============================================================================

//! ## Overview
//! Every failure here is final for the document that raised it. Nothing in
//! this crate retries, coerces, or substitutes defaults; callers decide
//! whether to abort the update check or fall back to prior trusted metadata.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::metadata::TrustState;
use crate::schema::SchemaViolation;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing or reading metadata.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Payload failed structural validation.
    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),
    /// A trust-gated accessor was called on untrusted metadata.
    #[error("cannot read untrusted {metadata_type} metadata")]
    UntrustedMetadataAccess {
        /// Type tag of the document.
        metadata_type: &'static str,
    },
    /// A trust promotion was redundant or out of order.
    #[error("invalid trust transition for {metadata_type} metadata: {from} -> {to}")]
    InvalidStateTransition {
        /// Type tag of the document.
        metadata_type: &'static str,
        /// State before the attempted transition.
        from: TrustState,
        /// Requested state.
        to: TrustState,
    },
    /// Raw bytes could not be decoded as JSON.
    #[error("metadata decode error: {0}")]
    Decode(String),
    /// Raw bytes exceed the configured size limit.
    #[error("metadata payload is {size} bytes, limit is {limit}")]
    PayloadTooLarge {
        /// Payload size in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },
    /// Canonical serialization of the signed payload failed.
    #[error("failed to canonicalize signed payload: {0}")]
    Canonicalization(String),
}
