// crates/tuf-metadata/src/metadata/mod.rs
// ============================================================================
// Module: Metadata Types
// Description: Signed document base and the concrete metadata types.
// Purpose: Group the trust-gated document types behind one module.
// Dependencies: crate::{error, schema}
// ============================================================================

//! ## Overview
//! Every concrete type wraps a [`SignedDocument`] and implements
//! [`Metadata`]. Types differ only in their signed schema and the accessors
//! they expose over it.

pub mod base;
pub mod files;
pub mod root;
pub mod snapshot;
pub mod targets;
pub mod timestamp;

pub use base::Metadata;
pub use base::Signature;
pub use base::SignedDocument;
pub use base::TrustState;
pub use base::base_signed_schema;
pub use files::FileMeta;
pub use files::TargetFile;
pub use root::RootMetadata;
pub use snapshot::SnapshotMetadata;
pub use targets::TargetsMetadata;
pub use timestamp::TimestampMetadata;
