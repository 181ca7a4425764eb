// crates/tuf-metadata/src/metadata/base.rs
// ============================================================================
// Module: Signed Document Base
// Description: Shared signed-document schema, payload storage, and trust gate.
// Purpose: Enforce that no semantic field is readable before trust promotion.
// Dependencies: crate::{error, hashing, keys, schema}, serde, serde_json, time
// ============================================================================

//! ## Overview
//! [`SignedDocument`] owns a validated payload and its [`TrustState`]. The
//! only way to reach the `signed` mapping from an accessor is
//! [`SignedDocument::get_signed`], which runs the trust guard first, so no
//! concrete type can expose content without passing through it.
//!
//! Concrete metadata types implement [`Metadata`], supplying their type tag
//! and one schema built by extending [`base_signed_schema`].
//!
//! Security posture: documents are untrusted until an external verifier
//! promotes them; promotion is one-way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::MetadataError;
use crate::hashing::HashAlgorithm;
use crate::hashing::HashDigest;
use crate::hashing::canonical_json_bytes;
use crate::hashing::hash_bytes;
use crate::keys::KeyId;
use crate::schema::Collection;
use crate::schema::Constraint;
use crate::schema::FieldPath;
use crate::schema::SchemaViolation;
use crate::schema::ValueKind;
use crate::schema::constraints::expires_constraint;
use crate::schema::constraints::hashes_constraint;
use crate::schema::constraints::signatures_constraint;
use crate::schema::constraints::spec_version_constraint;
use crate::schema::constraints::version_constraint;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Top-level field holding the signature block.
pub const SIGNATURES_FIELD: &str = "signatures";
/// Top-level field holding the signed payload.
pub const SIGNED_FIELD: &str = "signed";

// ============================================================================
// SECTION: Trust State
// ============================================================================

/// Trust state of a signed document.
///
/// # Invariants
/// - Documents start `Untrusted`; the only transition is to `Trusted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustState {
    /// Structurally valid but not yet signature-verified.
    Untrusted,
    /// Promoted after external signature verification. Terminal.
    Trusted,
}

impl TrustState {
    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Untrusted => "untrusted",
            Self::Trusted => "trusted",
        }
    }
}

impl fmt::Display for TrustState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Signatures
// ============================================================================

/// One entry of the signature block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Identifier of the signing key.
    #[serde(rename = "keyid")]
    pub key_id: KeyId,
    /// Encoded signature value.
    pub sig: String,
}

// ============================================================================
// SECTION: Schemas
// ============================================================================

/// Returns the signed-payload fields shared by every metadata type.
#[must_use]
pub fn base_signed_schema(metadata_type: &'static str) -> Collection {
    Collection::new()
        .required(
            "_type",
            vec![Constraint::Type(ValueKind::String), Constraint::EqualTo(Value::from(metadata_type))],
        )
        .required("spec_version", spec_version_constraint())
        .required("version", version_constraint())
        .required("expires", expires_constraint())
        .optional("hashes", hashes_constraint())
        .allow_extra_fields()
}

/// Wraps a signed-payload schema with the top-level document envelope.
#[must_use]
pub fn document_schema(signed_schema: Collection) -> Collection {
    Collection::new()
        .required(SIGNATURES_FIELD, signatures_constraint())
        .required(SIGNED_FIELD, vec![Constraint::Collection(signed_schema)])
}

// ============================================================================
// SECTION: Signed Document
// ============================================================================

/// Validated metadata payload with its trust state.
///
/// # Invariants
/// - `signed` passed the owning type's schema at construction.
/// - `trust` only moves from `Untrusted` to `Trusted`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedDocument {
    /// Type tag the payload was validated against.
    metadata_type: &'static str,
    /// Signature block.
    signatures: Vec<Signature>,
    /// Validated signed payload in source order.
    signed: Map<String, Value>,
    /// Current trust state.
    trust: TrustState,
}

impl SignedDocument {
    /// Validates a decoded document and stores it untrusted.
    pub(crate) fn construct(
        raw: Value,
        metadata_type: &'static str,
        signed_schema: Collection,
    ) -> Result<Self, MetadataError> {
        document_schema(signed_schema).validate(&raw)?;
        let Value::Object(mut fields) = raw else {
            return Err(SchemaViolation::single(FieldPath::root(), "expected mapping").into());
        };
        let signatures_path = FieldPath::root().child(SIGNATURES_FIELD);
        let signatures = fields
            .get(SIGNATURES_FIELD)
            .map(|value| decode_validated::<Vec<Signature>>(value, &signatures_path))
            .transpose()?
            .unwrap_or_default();
        let Some(Value::Object(signed)) = fields.remove(SIGNED_FIELD) else {
            let path = FieldPath::root().child(SIGNED_FIELD);
            return Err(SchemaViolation::single(path, "expected mapping").into());
        };
        Ok(Self {
            metadata_type,
            signatures,
            signed,
            trust: TrustState::Untrusted,
        })
    }

    /// Returns the type tag.
    #[must_use]
    pub const fn metadata_type(&self) -> &'static str {
        self.metadata_type
    }

    /// Returns the current trust state.
    #[must_use]
    pub const fn trust_state(&self) -> TrustState {
        self.trust
    }

    /// Returns the signature block. Readable before trust for verification.
    #[must_use]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Promotes the document to trusted.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidStateTransition`] when already trusted.
    pub fn mark_trusted(&mut self) -> Result<(), MetadataError> {
        match self.trust {
            TrustState::Untrusted => {
                self.trust = TrustState::Trusted;
                Ok(())
            }
            TrustState::Trusted => Err(MetadataError::InvalidStateTransition {
                metadata_type: self.metadata_type,
                from: TrustState::Trusted,
                to: TrustState::Trusted,
            }),
        }
    }

    /// Guards access to semantic content.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when the document is
    /// untrusted and `allow_untrusted_access` is false.
    pub fn ensure_is_trusted(&self, allow_untrusted_access: bool) -> Result<(), MetadataError> {
        if self.trust == TrustState::Untrusted && !allow_untrusted_access {
            return Err(MetadataError::UntrustedMetadataAccess {
                metadata_type: self.metadata_type,
            });
        }
        Ok(())
    }

    /// Returns the validated signed payload after the trust guard passes.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] as for
    /// [`Self::ensure_is_trusted`].
    pub(crate) fn get_signed(
        &self,
        allow_untrusted_access: bool,
    ) -> Result<&Map<String, Value>, MetadataError> {
        self.ensure_is_trusted(allow_untrusted_access)?;
        Ok(&self.signed)
    }

    /// Returns RFC 8785 canonical bytes of the signed payload.
    ///
    /// These are the bytes signatures are checked over, so they are available
    /// before trust.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Canonicalization`] when serialization fails.
    pub fn canonical_signed_bytes(&self) -> Result<Vec<u8>, MetadataError> {
        canonical_json_bytes(&self.signed)
    }

    /// Returns the SHA-256 digest of the canonical signed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Canonicalization`] when serialization fails.
    pub fn signed_digest(&self) -> Result<HashDigest, MetadataError> {
        Ok(hash_bytes(HashAlgorithm::Sha256, &self.canonical_signed_bytes()?))
    }
}

// ============================================================================
// SECTION: Metadata Trait
// ============================================================================

/// Restricts [`Metadata`] to the document types defined in this crate.
pub(crate) mod sealed {
    use super::SignedDocument;
    use crate::error::MetadataError;

    /// Construction and promotion hooks available only inside the crate.
    ///
    /// There is no mutable access to the wrapped document, so a promoted
    /// instance can neither be reset nor given another type's payload.
    pub trait Sealed {
        /// Wraps a document validated against this type's schema.
        fn from_document(document: SignedDocument) -> Self;

        /// Moves the wrapped document from untrusted to trusted.
        ///
        /// # Errors
        ///
        /// Returns [`MetadataError::InvalidStateTransition`] when already trusted.
        fn promote_document(&mut self) -> Result<(), MetadataError>;
    }
}

/// Common behavior of every concrete metadata type.
///
/// The wrapped document is only ever lent out immutably; promotion through
/// [`Metadata::mark_trusted`] is the single mutation:
///
/// ```compile_fail
/// use tuf_metadata::Metadata;
/// use tuf_metadata::RootMetadata;
///
/// fn reset(root: &mut RootMetadata, pristine: &RootMetadata) {
///     *root.document_mut() = pristine.document().clone();
/// }
/// ```
pub trait Metadata: sealed::Sealed + Sized {
    /// Type tag expected in `signed._type`.
    const TYPE: &'static str;

    /// Returns the one authoritative signed-payload schema for this type.
    ///
    /// The default is the shared base schema; types with their own fields
    /// extend [`base_signed_schema`].
    #[must_use]
    fn signed_schema() -> Collection {
        base_signed_schema(Self::TYPE)
    }

    /// Returns the underlying document.
    fn document(&self) -> &SignedDocument;

    /// Validates a decoded payload and constructs an untrusted instance.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SchemaViolation`] listing every violated field.
    fn from_value(raw: Value) -> Result<Self, MetadataError> {
        let document = SignedDocument::construct(raw, Self::TYPE, Self::signed_schema())?;
        Ok(Self::from_document(document))
    }

    /// Decodes JSON bytes and constructs an untrusted instance.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Decode`] for malformed JSON, otherwise as
    /// [`Metadata::from_value`].
    fn from_json_slice(bytes: &[u8]) -> Result<Self, MetadataError> {
        let raw: Value =
            serde_json::from_slice(bytes).map_err(|err| MetadataError::Decode(err.to_string()))?;
        Self::from_value(raw)
    }

    /// Like [`Metadata::from_json_slice`], rejecting payloads above `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::PayloadTooLarge`] before decoding oversized
    /// input, otherwise as [`Metadata::from_json_slice`].
    fn from_json_slice_with_limit(bytes: &[u8], limit: usize) -> Result<Self, MetadataError> {
        if bytes.len() > limit {
            return Err(MetadataError::PayloadTooLarge {
                size: bytes.len(),
                limit,
            });
        }
        Self::from_json_slice(bytes)
    }

    /// Returns the type tag.
    #[must_use]
    fn get_type(&self) -> &'static str {
        Self::TYPE
    }

    /// Returns true once the document has been promoted.
    #[must_use]
    fn is_trusted(&self) -> bool {
        self.document().trust_state() == TrustState::Trusted
    }

    /// Promotes the document to trusted.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidStateTransition`] when already trusted.
    fn mark_trusted(&mut self) -> Result<(), MetadataError> {
        self.promote_document()
    }

    /// Guards access to semantic content.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when untrusted and
    /// `allow_untrusted_access` is false.
    fn ensure_is_trusted(&self, allow_untrusted_access: bool) -> Result<(), MetadataError> {
        self.document().ensure_is_trusted(allow_untrusted_access)
    }

    /// Returns the signature block.
    #[must_use]
    fn get_signatures(&self) -> &[Signature] {
        self.document().signatures()
    }

    /// Returns the document version.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    fn get_version(&self, allow_untrusted_access: bool) -> Result<u64, MetadataError> {
        let signed = self.document().get_signed(allow_untrusted_access)?;
        required_field(signed, "version")?.as_u64().ok_or_else(|| {
            MetadataError::from(SchemaViolation::single(signed_path("version"), "expected integer"))
        })
    }

    /// Returns the expiration time.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    fn get_expires(&self, allow_untrusted_access: bool) -> Result<OffsetDateTime, MetadataError> {
        let signed = self.document().get_signed(allow_untrusted_access)?;
        let path = signed_path("expires");
        let text = required_field(signed, "expires")?.as_str().ok_or_else(|| {
            MetadataError::from(SchemaViolation::single(path.clone(), "expected string"))
        })?;
        OffsetDateTime::parse(text, &Rfc3339)
            .map_err(|err| SchemaViolation::single(path, err.to_string()).into())
    }
}

// ============================================================================
// SECTION: Payload Helpers
// ============================================================================

/// Returns the path of a field inside `signed`.
pub(crate) fn signed_path(name: &str) -> FieldPath {
    FieldPath::root().child(SIGNED_FIELD).child(name)
}

/// Returns a field that the schema declared required.
pub(crate) fn required_field<'a>(
    signed: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Value, MetadataError> {
    signed.get(name).ok_or_else(|| {
        MetadataError::from(SchemaViolation::single(signed_path(name), "required field is missing"))
    })
}

/// Returns a field that the schema declared to be a mapping.
pub(crate) fn mapping_field<'a>(
    signed: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Map<String, Value>, MetadataError> {
    required_field(signed, name)?.as_object().ok_or_else(|| {
        MetadataError::from(SchemaViolation::single(signed_path(name), "expected mapping"))
    })
}

/// Decodes an already validated value into a typed view.
pub(crate) fn decode_validated<T: DeserializeOwned>(
    value: &Value,
    path: &FieldPath,
) -> Result<T, MetadataError> {
    T::deserialize(value).map_err(|err| SchemaViolation::single(path.clone(), err.to_string()).into())
}
