// crates/tuf-metadata/src/lib.rs
// ============================================================================
// Module: TUF Metadata Library
// Description: Public API surface for trust-gated update metadata.
// Purpose: Expose schemas, metadata types, and the promotion boundary.
// Dependencies: crate::{audit, error, hashing, interfaces, keys, metadata, role, schema, trust}
// ============================================================================

//! ## Overview
//! Software-update metadata arrives as untrusted JSON. This crate validates
//! each document against one declarative schema per type, stores it
//! untrusted, and refuses to expose its content until an external signature
//! verifier has promoted it. Verifiers bootstrapping a new root may opt into
//! explicit untrusted access per call.
//!
//! Cryptography, downloading, and version ordering are out of scope; they
//! plug in through [`SignatureVerifier`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod error;
pub mod hashing;
pub mod interfaces;
pub mod keys;
pub mod metadata;
pub mod role;
pub mod schema;
pub mod trust;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileTrustAuditSink;
pub use audit::NoopTrustAuditSink;
pub use audit::PromotionOutcome;
pub use audit::StderrTrustAuditSink;
pub use audit::TrustAuditEvent;
pub use audit::TrustAuditSink;
pub use error::MetadataError;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use interfaces::SignatureVerifier;
pub use interfaces::VerificationError;
pub use keys::KeyId;
pub use keys::KeyRecord;
pub use metadata::FileMeta;
pub use metadata::Metadata;
pub use metadata::RootMetadata;
pub use metadata::Signature;
pub use metadata::SignedDocument;
pub use metadata::SnapshotMetadata;
pub use metadata::TargetFile;
pub use metadata::TargetsMetadata;
pub use metadata::TimestampMetadata;
pub use metadata::TrustState;
pub use role::DelegatedRole;
pub use role::Role;
pub use role::RoleName;
pub use schema::SchemaViolation;
pub use trust::PromotionError;
pub use trust::promote;
