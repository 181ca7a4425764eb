// crates/tuf-metadata/src/metadata/snapshot.rs
// ============================================================================
// Module: Snapshot Metadata
// Description: Listing of every current targets metadata version.
// Purpose: Expose metadata file descriptions behind the trust gate.
// Dependencies: crate::{error, metadata, schema}
// ============================================================================

//! ## Overview
//! Snapshot metadata pins the version of each targets metadata file. Length
//! and hashes are optional per entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::MetadataError;
use crate::metadata::base::Metadata;
use crate::metadata::base::SignedDocument;
use crate::metadata::base::base_signed_schema;
use crate::metadata::base::decode_validated;
use crate::metadata::base::mapping_field;
use crate::metadata::base::sealed;
use crate::metadata::base::signed_path;
use crate::metadata::files::FileMeta;
use crate::schema::Collection;
use crate::schema::Constraint;
use crate::schema::Presence;
use crate::schema::ValueKind;
use crate::schema::constraints::file_meta_constraints;

// ============================================================================
// SECTION: Snapshot Metadata
// ============================================================================

/// Snapshot metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotMetadata {
    /// Validated document and trust state.
    document: SignedDocument,
}

impl sealed::Sealed for SnapshotMetadata {
    fn from_document(document: SignedDocument) -> Self {
        Self {
            document,
        }
    }

    fn promote_document(&mut self) -> Result<(), MetadataError> {
        self.document.mark_trusted()
    }
}

impl Metadata for SnapshotMetadata {
    const TYPE: &'static str = "snapshot";

    fn signed_schema() -> Collection {
        let entry = file_meta_constraints(Presence::Optional, Presence::Optional);
        base_signed_schema(Self::TYPE).required(
            "meta",
            vec![
                Constraint::Type(ValueKind::Mapping),
                Constraint::MinCount(1),
                Constraint::All(vec![Constraint::Collection(entry)]),
            ],
        )
    }

    fn document(&self) -> &SignedDocument {
        &self.document
    }
}

impl SnapshotMetadata {
    /// Returns the description of a listed metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_file_meta_info(
        &self,
        name: &str,
        allow_untrusted_access: bool,
    ) -> Result<Option<FileMeta>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        mapping_field(signed, "meta")?
            .get(name)
            .map(|entry| decode_validated(entry, &signed_path("meta").child(name)))
            .transpose()
    }

    /// Returns the listed file names in source order.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_file_names(&self, allow_untrusted_access: bool) -> Result<Vec<String>, MetadataError> {
        let signed = self.document.get_signed(allow_untrusted_access)?;
        Ok(mapping_field(signed, "meta")?.keys().cloned().collect())
    }
}
