// crates/tuf-metadata/src/schema/constraints.rs
// ============================================================================
// Module: Field Constraint Library
// Description: Reusable rule sets shared by every metadata type schema.
// Purpose: Define hashes, version, key, role, and file rules exactly once.
// Dependencies: crate::schema
// ============================================================================

//! ## Overview
//! Each function returns a fresh rule list or collection. Metadata schemas
//! compose these values instead of restating them, so a fix to one rule
//! applies to every document type that uses it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::schema::Collection;
use crate::schema::Constraint;
use crate::schema::Presence;
use crate::schema::StringFormat;
use crate::schema::ValueKind;

// ============================================================================
// SECTION: Primitive Rules
// ============================================================================

/// Rules for a `hashes` field: a non-empty mapping of algorithm name to a
/// non-blank digest string. Algorithm names are open-ended and not checked.
#[must_use]
pub fn hashes_constraint() -> Vec<Constraint> {
    vec![
        Constraint::Type(ValueKind::Mapping),
        Constraint::MinCount(1),
        Constraint::All(non_blank_string()),
    ]
}

/// Rules for a `version` field: an integer >= 1.
#[must_use]
pub fn version_constraint() -> Vec<Constraint> {
    vec![Constraint::Type(ValueKind::Integer), Constraint::GreaterThanOrEqual(1)]
}

/// Rules for a signature `threshold` field: an integer >= 1.
#[must_use]
pub fn threshold_constraint() -> Vec<Constraint> {
    vec![Constraint::Type(ValueKind::Integer), Constraint::GreaterThanOrEqual(1)]
}

/// Rules for a byte `length` field with the given lower bound.
#[must_use]
pub fn length_constraint(min: i64) -> Vec<Constraint> {
    vec![Constraint::Type(ValueKind::Integer), Constraint::GreaterThanOrEqual(min)]
}

/// Rules for a non-blank string.
#[must_use]
pub fn non_blank_string() -> Vec<Constraint> {
    vec![Constraint::Type(ValueKind::String), Constraint::NotBlank]
}

/// Rules for a non-empty sequence of non-blank strings.
#[must_use]
pub fn string_list_constraint() -> Vec<Constraint> {
    vec![
        Constraint::Type(ValueKind::Sequence),
        Constraint::MinCount(1),
        Constraint::All(non_blank_string()),
    ]
}

/// Rules for the RFC 3339 `expires` field.
#[must_use]
pub fn expires_constraint() -> Vec<Constraint> {
    vec![Constraint::Type(ValueKind::String), Constraint::Format(StringFormat::DateTime)]
}

/// Rules for the `spec_version` field.
#[must_use]
pub fn spec_version_constraint() -> Vec<Constraint> {
    vec![
        Constraint::Type(ValueKind::String),
        Constraint::NotBlank,
        Constraint::Format(StringFormat::SpecVersion),
    ]
}

// ============================================================================
// SECTION: Structured Rules
// ============================================================================

/// Rules for the top-level `signatures` block.
#[must_use]
pub fn signatures_constraint() -> Vec<Constraint> {
    let signature = Collection::new()
        .required("keyid", non_blank_string())
        .required("sig", non_blank_string())
        .allow_extra_fields();
    vec![
        Constraint::Type(ValueKind::Sequence),
        Constraint::MinCount(1),
        Constraint::All(vec![Constraint::Collection(signature)]),
    ]
}

/// Schema for one public key record.
#[must_use]
pub fn key_constraints() -> Collection {
    let keyval = Collection::new().required("public", non_blank_string()).allow_extra_fields();
    Collection::new()
        .required("keyid_hash_algorithms", string_list_constraint())
        .required("keytype", non_blank_string())
        .required("keyval", vec![Constraint::Collection(keyval)])
        .required("scheme", non_blank_string())
        .allow_extra_fields()
}

/// Rules for a mapping of key identifier to key record.
#[must_use]
pub fn key_table_constraint(min_entries: usize) -> Vec<Constraint> {
    vec![
        Constraint::Type(ValueKind::Mapping),
        Constraint::MinCount(min_entries),
        Constraint::All(vec![Constraint::Collection(key_constraints())]),
    ]
}

/// Schema for one role's signing parameters.
#[must_use]
pub fn role_constraints() -> Collection {
    Collection::new()
        .required("keyids", string_list_constraint())
        .required("threshold", threshold_constraint())
        .allow_extra_fields()
}

/// Schema for one entry of a `meta` listing.
#[must_use]
pub fn file_meta_constraints(length: Presence, hashes: Presence) -> Collection {
    let collection = Collection::new().required("version", version_constraint());
    let collection = match length {
        Presence::Required => collection.required("length", length_constraint(1)),
        Presence::Optional => collection.optional("length", length_constraint(1)),
    };
    let collection = match hashes {
        Presence::Required => collection.required("hashes", hashes_constraint()),
        Presence::Optional => collection.optional("hashes", hashes_constraint()),
    };
    collection.allow_extra_fields()
}
