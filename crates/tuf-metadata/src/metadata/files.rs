// crates/tuf-metadata/src/metadata/files.rs
// ============================================================================
// Module: File Descriptions
// Description: Typed views of metadata-file and target-file entries.
// Purpose: Return copies of validated `meta` and `targets` entries.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Timestamp and snapshot metadata describe other metadata files by version,
//! length, and hashes; targets metadata describes target files by length and
//! hashes. These views are decoded from already validated entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: File Views
// ============================================================================

/// Description of one metadata file listed under `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Version of the described metadata file.
    pub version: u64,
    /// Length in bytes, when listed.
    #[serde(default)]
    pub length: Option<u64>,
    /// Digests keyed by algorithm, when listed.
    #[serde(default)]
    pub hashes: Option<BTreeMap<String, String>>,
}

/// Description of one target file listed under `targets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFile {
    /// Length in bytes.
    pub length: u64,
    /// Digests keyed by algorithm.
    pub hashes: BTreeMap<String, String>,
    /// Opaque application data.
    #[serde(default)]
    pub custom: Option<Map<String, Value>>,
}
