// crates/tuf-metadata/src/metadata/root.rs
// ============================================================================
// Module: Root Metadata
// Description: Root-of-trust document with key table, roles, and snapshot policy.
// Purpose: Expose the authoritative keys and role thresholds behind the trust gate.
// Dependencies: crate::{error, keys, metadata, role, schema}, serde_json
// ============================================================================

//! ## Overview
//! Root metadata lists every trusted public key, the key set and threshold of
//! each top-level role, and whether the repository uses consistent snapshots.
//!
//! Verifiers reading the current root to validate the next root version call
//! the role and key accessors with `allow_untrusted_access = true`; every
//! other caller must wait for promotion. Consistent-snapshot support has no
//! override.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::error::MetadataError;
use crate::keys::KeyId;
use crate::keys::KeyRecord;
use crate::metadata::base::Metadata;
use crate::metadata::base::SignedDocument;
use crate::metadata::base::base_signed_schema;
use crate::metadata::base::decode_validated;
use crate::metadata::base::mapping_field;
use crate::metadata::base::required_field;
use crate::metadata::base::sealed;
use crate::metadata::base::signed_path;
use crate::role::Role;
use crate::role::RoleName;
use crate::schema::Collection;
use crate::schema::Constraint;
use crate::schema::SchemaViolation;
use crate::schema::ValueKind;
use crate::schema::constraints::key_table_constraint;
use crate::schema::constraints::role_constraints;

// ============================================================================
// SECTION: Root Metadata
// ============================================================================

/// Root metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct RootMetadata {
    /// Validated document and trust state.
    document: SignedDocument,
}

impl sealed::Sealed for RootMetadata {
    fn from_document(document: SignedDocument) -> Self {
        Self {
            document,
        }
    }

    fn promote_document(&mut self) -> Result<(), MetadataError> {
        self.document.mark_trusted()
    }
}

impl Metadata for RootMetadata {
    const TYPE: &'static str = "root";

    fn signed_schema() -> Collection {
        let mut roles = Collection::new();
        for name in RoleName::ALL {
            let rules = vec![Constraint::Collection(role_constraints())];
            roles = if name.is_required() {
                roles.required(name.as_str(), rules)
            } else {
                roles.optional(name.as_str(), rules)
            };
        }
        base_signed_schema(Self::TYPE)
            .required("keys", key_table_constraint(1))
            .required("roles", vec![Constraint::Collection(roles)])
            .required("consistent_snapshot", vec![Constraint::Type(ValueKind::Boolean)])
    }

    fn document(&self) -> &SignedDocument {
        &self.document
    }
}

impl RootMetadata {
    /// Returns every role defined by the document, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_roles(
        &self,
        allow_untrusted_access: bool,
    ) -> Result<BTreeMap<RoleName, Role>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        let mut roles = BTreeMap::new();
        for (name, role_info) in mapping_field(signed, "roles")? {
            let role_name = RoleName::parse(name).ok_or_else(|| {
                MetadataError::from(SchemaViolation::single(
                    signed_path("roles").child(name),
                    "unexpected field",
                ))
            })?;
            roles.insert(role_name, Role::create_from_metadata(role_info, role_name)?);
        }
        Ok(roles)
    }

    /// Returns one role, or `None` when it is not defined (only `mirror` may
    /// be absent).
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_role(
        &self,
        name: RoleName,
        allow_untrusted_access: bool,
    ) -> Result<Option<Role>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        mapping_field(signed, "roles")?
            .get(name.as_str())
            .map(|role_info| Role::create_from_metadata(role_info, name))
            .transpose()
    }

    /// Returns the validated key table verbatim, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_keys(
        &self,
        allow_untrusted_access: bool,
    ) -> Result<&Map<String, Value>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        mapping_field(signed, "keys")
    }

    /// Returns the typed record for one key identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_key(
        &self,
        key_id: &KeyId,
        allow_untrusted_access: bool,
    ) -> Result<Option<KeyRecord>, MetadataError> {
        let keys = self.get_keys(allow_untrusted_access)?;
        keys.get(key_id.as_str())
            .map(|record| decode_validated(record, &signed_path("keys").child(key_id.as_str())))
            .transpose()
    }

    /// Returns whether the repository publishes consistent snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] until promoted.
    pub fn supports_consistent_snapshots(&self) -> Result<bool, MetadataError> {
        let signed = self.document.get_signed(false)?;
        required_field(signed, "consistent_snapshot")?.as_bool().ok_or_else(|| {
            MetadataError::from(SchemaViolation::single(
                signed_path("consistent_snapshot"),
                "expected boolean",
            ))
        })
    }
}
