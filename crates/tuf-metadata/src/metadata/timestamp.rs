// crates/tuf-metadata/src/metadata/timestamp.rs
// ============================================================================
// Module: Timestamp Metadata
// Description: Freshness document pointing at the current snapshot.
// Purpose: Expose the snapshot file description behind the trust gate.
// Dependencies: crate::{error, metadata, schema}
// ============================================================================

//! ## Overview
//! Timestamp metadata lists exactly the information needed to fetch the
//! current snapshot: its version, length, and hashes. Unlike root, hashes are
//! mandatory here.

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
use crate::schema::SchemaViolation;
use crate::schema::ValueKind;
use crate::schema::constraints::file_meta_constraints;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the snapshot metadata described by the timestamp.
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

// ============================================================================
// SECTION: Timestamp Metadata
// ============================================================================

/// Timestamp metadata document.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampMetadata {
    /// Validated document and trust state.
    document: SignedDocument,
}

impl sealed::Sealed for TimestampMetadata {
    fn from_document(document: SignedDocument) -> Self {
        Self {
            document,
        }
    }

    fn promote_document(&mut self) -> Result<(), MetadataError> {
        self.document.mark_trusted()
    }
}

impl Metadata for TimestampMetadata {
    const TYPE: &'static str = "timestamp";

    fn signed_schema() -> Collection {
        let listing = Collection::new().required(SNAPSHOT_FILE_NAME, Vec::new()).allow_extra_fields();
        let entry = file_meta_constraints(Presence::Required, Presence::Required);
        base_signed_schema(Self::TYPE).required(
            "meta",
            vec![
                Constraint::Type(ValueKind::Mapping),
                Constraint::Collection(listing),
                Constraint::All(vec![Constraint::Collection(entry)]),
            ],
        )
    }

    fn document(&self) -> &SignedDocument {
        &self.document
    }
}

impl TimestampMetadata {
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

    /// Returns the description of the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UntrustedMetadataAccess`] when gated.
    pub fn get_snapshot_meta(&self, allow_untrusted_access: bool) -> Result<FileMeta, MetadataError> {
        self.get_file_meta_info(SNAPSHOT_FILE_NAME, allow_untrusted_access)?.ok_or_else(|| {
            MetadataError::from(SchemaViolation::single(
                signed_path("meta").child(SNAPSHOT_FILE_NAME),
                "required field is missing",
            ))
        })
    }
}
