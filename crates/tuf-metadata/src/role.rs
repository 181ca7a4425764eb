// crates/tuf-metadata/src/role.rs
// ============================================================================
// Module: Role Value Objects
// Description: Immutable role trust parameters derived from validated metadata.
// Purpose: Hand signature verifiers key sets and thresholds in typed form.
// Dependencies: crate::{error, keys, metadata, schema}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Role`] names one top-level responsibility (root, targets, snapshot,
//! timestamp, mirror) with the key identifiers allowed to sign for it and the
//! number of signatures required. A [`DelegatedRole`] is the targets-level
//! variant with an open-ended name and path patterns.
//!
//! Both re-check their input against the role schema before extracting
//! values, so data that bypassed document validation is still rejected.
//! `threshold <= keyids.len()` is a verifier concern and is not checked here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::MetadataError;
use crate::keys::KeyId;
use crate::metadata::base::decode_validated;
use crate::schema::FieldPath;
use crate::schema::SchemaViolation;
use crate::schema::constraints::role_constraints;

// ============================================================================
// SECTION: Role Names
// ============================================================================

/// Top-level role names recognised in root metadata.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// Root of trust.
    Root,
    /// Target file listing.
    Targets,
    /// Snapshot of metadata versions.
    Snapshot,
    /// Freshness timestamp.
    Timestamp,
    /// Mirror list (optional).
    Mirror,
}

impl RoleName {
    /// All role names in declaration order.
    pub const ALL: [Self; 5] =
        [Self::Root, Self::Targets, Self::Snapshot, Self::Timestamp, Self::Mirror];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Targets => "targets",
            Self::Snapshot => "snapshot",
            Self::Timestamp => "timestamp",
            Self::Mirror => "mirror",
        }
    }

    /// Returns true when root metadata must define this role.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Mirror)
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Role
// ============================================================================

/// Raw role parameters shared by top-level and delegated roles.
#[derive(Deserialize)]
struct RoleParams {
    /// Authorized key identifiers.
    keyids: Vec<KeyId>,
    /// Required signature count.
    threshold: NonZeroU64,
}

/// Checks role data against the role schema and extracts its parameters.
fn role_params(role_info: &Value, path: &FieldPath) -> Result<RoleParams, MetadataError> {
    role_constraints().validate_at(role_info, path)?;
    decode_validated(role_info, path)
}

/// Trust parameters of one top-level role.
///
/// # Invariants
/// - `key_ids` is non-empty and keeps source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Role name.
    name: RoleName,
    /// Authorized key identifiers.
    key_ids: Vec<KeyId>,
    /// Required number of distinct valid signatures.
    threshold: NonZeroU64,
}

impl Role {
    /// Builds a role from validated `roles.<name>` data.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SchemaViolation`] when `role_info` does not
    /// match the role schema.
    pub fn create_from_metadata(role_info: &Value, name: RoleName) -> Result<Self, MetadataError> {
        let path = FieldPath::from("signed.roles").child(name.as_str());
        let params = role_params(role_info, &path)?;
        Ok(Self {
            name,
            key_ids: params.keyids,
            threshold: params.threshold,
        })
    }

    /// Returns the role name.
    #[must_use]
    pub const fn name(&self) -> RoleName {
        self.name
    }

    /// Returns the authorized key identifiers in source order.
    #[must_use]
    pub fn key_ids(&self) -> &[KeyId] {
        &self.key_ids
    }

    /// Returns the signature threshold.
    #[must_use]
    pub const fn threshold(&self) -> NonZeroU64 {
        self.threshold
    }

    /// Returns true when `key_id` may sign for this role.
    #[must_use]
    pub fn is_key_id_acceptable(&self, key_id: &KeyId) -> bool {
        self.key_ids.contains(key_id)
    }
}

// ============================================================================
// SECTION: Delegated Role
// ============================================================================

/// Raw delegated-role fields beyond the shared role parameters.
#[derive(Deserialize)]
struct DelegationParams {
    /// Delegated role name.
    name: String,
    /// Target path patterns.
    #[serde(default)]
    paths: Vec<String>,
    /// Whether lookup stops at this delegation.
    terminating: bool,
}

/// Trust parameters of a role delegated by targets metadata.
///
/// # Invariants
/// - `name` is non-blank; `key_ids` is non-empty and keeps source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegatedRole {
    /// Delegated role name.
    name: String,
    /// Authorized key identifiers.
    key_ids: Vec<KeyId>,
    /// Required number of distinct valid signatures.
    threshold: NonZeroU64,
    /// Target path patterns this role is trusted for.
    paths: Vec<String>,
    /// Whether lookup stops at this delegation.
    terminating: bool,
}

impl DelegatedRole {
    /// Builds a delegated role from one validated `delegations.roles` entry.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::SchemaViolation`] when the entry does not
    /// match the delegated role schema.
    pub fn create_from_metadata(role_info: &Value, index: usize) -> Result<Self, MetadataError> {
        let path = FieldPath::from("signed.delegations.roles").index(index);
        let params = role_params(role_info, &path)?;
        let delegation: DelegationParams = decode_validated(role_info, &path)?;
        if delegation.name.trim().is_empty() {
            return Err(SchemaViolation::single(path.child("name"), "value must not be blank").into());
        }
        Ok(Self {
            name: delegation.name,
            key_ids: params.keyids,
            threshold: params.threshold,
            paths: delegation.paths,
            terminating: delegation.terminating,
        })
    }

    /// Returns the delegated role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the authorized key identifiers in source order.
    #[must_use]
    pub fn key_ids(&self) -> &[KeyId] {
        &self.key_ids
    }

    /// Returns the signature threshold.
    #[must_use]
    pub const fn threshold(&self) -> NonZeroU64 {
        self.threshold
    }

    /// Returns the target path patterns.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Returns true when lookup stops at this delegation.
    #[must_use]
    pub const fn is_terminating(&self) -> bool {
        self.terminating
    }

    /// Returns true when `key_id` may sign for this role.
    #[must_use]
    pub fn is_key_id_acceptable(&self, key_id: &KeyId) -> bool {
        self.key_ids.contains(key_id)
    }
}
