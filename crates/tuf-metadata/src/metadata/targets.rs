// crates/tuf-metadata/src/metadata/targets.rs
// ============================================================================
// Module: Targets Metadata
// Description: Target file listing with optional role delegations.
// Purpose: Expose target hashes, lengths, and delegations behind the trust gate.
// Dependencies: crate::{error, metadata, role, schema}, serde_json
// ============================================================================

//! ## Overview
//! Targets metadata maps target paths to their length and hashes, and may
//! delegate trust for path patterns to further roles with their own keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::error::MetadataError;
use crate::metadata::base::Metadata;
use crate::metadata::base::SignedDocument;
use crate::metadata::base::base_signed_schema;
use crate::metadata::base::decode_validated;
use crate::metadata::base::mapping_field;
use crate::metadata::base::sealed;
use crate::metadata::base::signed_path;
use crate::metadata::files::TargetFile;
use crate::role::DelegatedRole;
use crate::schema::Collection;
use crate::schema::Constraint;
use crate::schema::SchemaViolation;
use crate::schema::ValueKind;
use crate::schema::constraints::hashes_constraint;
use crate::schema::constraints::key_table_constraint;
use crate::schema::constraints::length_constraint;
use crate::schema::constraints::non_blank_string;
use crate::schema::constraints::role_constraints;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field listing target files.
const TARGETS_FIELD: &str = "targets";
/// Field holding delegations.
const DELEGATIONS_FIELD: &str = "delegations";

// ============================================================================
// SECTION: Schemas
// ============================================================================

/// Schema for one target file entry.
fn target_file_constraints() -> Collection {
    Collection::new()
        .required("length", length_constraint(0))
        .required("hashes", hashes_constraint())
        .optional("custom", vec![Constraint::Type(ValueKind::Mapping)])
        .allow_extra_fields()
}

/// Schema for the `delegations` block.
fn delegations_constraints() -> Collection {
    let role = role_constraints()
        .required("name", non_blank_string())
        .optional(
            "paths",
            vec![
                Constraint::Type(ValueKind::Sequence),
                Constraint::All(vec![Constraint::Type(ValueKind::String)]),
            ],
        )
        .required("terminating", vec![Constraint::Type(ValueKind::Boolean)]);
    Collection::new()
        .required("keys", key_table_constraint(0))
        .required(
            "roles",
            vec![
                Constraint::Type(ValueKind::Sequence),
                Constraint::All(vec![Constraint::Collection(role)]),
            ],
        )
        .allow_extra_fields()
}

// ============================================================================
// SECTION: Targets Metadata
// ============================================================================

/// Targets metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetsMetadata {
    /// Validated document and trust state.
    document: SignedDocument,
}

impl sealed::Sealed for TargetsMetadata {
    fn from_document(document: SignedDocument) -> Self {
        Self {
            document,
        }
    }

    fn promote_document(&mut self) -> Result<(), MetadataError> {
        self.document.mark_trusted()
    }
}

impl Metadata for TargetsMetadata {
    const TYPE: &'static str = "targets";

    fn signed_schema() -> Collection {
        base_signed_schema(Self::TYPE)
            .required(
                TARGETS_FIELD,
                vec![
                    Constraint::Type(ValueKind::Mapping),
                    Constraint::All(vec![Constraint::Collection(target_file_constraints())]),
                ],
            )
            .optional(DELEGATIONS_FIELD, vec![Constraint::Collection(delegations_constraints())])
    }

    fn document(&self) -> &SignedDocument {
        &self.document
    }
}

impl TargetsMetadata {
    /// Returns the description of one target file.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_target(
        &self,
        target: &str,
        allow_untrusted_access: bool,
    ) -> Result<Option<TargetFile>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        mapping_field(signed, TARGETS_FIELD)?
            .get(target)
            .map(|entry| decode_validated(entry, &signed_path(TARGETS_FIELD).child(target)))
            .transpose()
    }

    /// Returns true when the target is listed.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn has_target(&self, target: &str, allow_untrusted_access: bool) -> Result<bool, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        Ok(mapping_field(signed, TARGETS_FIELD)?.contains_key(target))
    }

    /// Returns the hashes of a listed target.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SchemaViolation`] when the target is not
    /// listed, or [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_hashes(
        &self,
        target: &str,
        allow_untrusted_access: bool,
    ) -> Result<BTreeMap<String, String>, MetadataError> {
        Ok(self.listed_target(target, allow_untrusted_access)?.hashes)
    }

    /// Returns the byte length of a listed target.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SchemaViolation`] when the target is not
    /// listed, or [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_length(&self, target: &str, allow_untrusted_access: bool) -> Result<u64, MetadataError> {
        Ok(self.listed_target(target, allow_untrusted_access)?.length)
    }

    /// Returns the delegated key table, if the document delegates.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_delegated_keys(
        &self,
        allow_untrusted_access: bool,
    ) -> Result<Option<&Map<String, Value>>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        if !signed.contains_key(DELEGATIONS_FIELD) {
            return Ok(None);
        }
        let keys = mapping_field(signed, DELEGATIONS_FIELD)?.get("keys").and_then(Value::as_object);
        Ok(keys)
    }

    /// Returns the delegated roles in source order; empty without delegations.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_delegated_roles(
        &self,
        allow_untrusted_access: bool,
    ) -> Result<Vec<DelegatedRole>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        if !signed.contains_key(DELEGATIONS_FIELD) {
            return Ok(Vec::new());
        }
        let Some(roles) = mapping_field(signed, DELEGATIONS_FIELD)?.get("roles").and_then(Value::as_array)
        else {
            return Ok(Vec::new());
        };
        roles
            .iter()
            .enumerate()
            .map(|(index, role_info)| DelegatedRole::create_from_metadata(role_info, index))
            .collect()
    }

    /// Returns a listed target or a violation naming it.
    fn listed_target(
        &self,
        target: &str,
        allow_untrusted_access: bool,
    ) -> Result<TargetFile, MetadataError> {
        self.get_target(target, allow_untrusted_access)?.ok_or_else(|| {
            MetadataError::from(SchemaViolation::single(
                signed_path(TARGETS_FIELD).child(target),
                "target is not listed",
            ))
        })
    }
}
