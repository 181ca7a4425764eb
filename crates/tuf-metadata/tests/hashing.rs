// crates/tuf-metadata/tests/hashing.rs
// ============================================================================
// Module: Hashing Tests
// Description: Tests for canonical signed bytes and digests.
// ============================================================================
//! ## Overview
//! Validates that signed payload digests use RFC 8785 canonicalization and
//! are independent of source key order.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use serde_json::json;
use tuf_metadata::HashAlgorithm;
use tuf_metadata::Metadata;
use tuf_metadata::RootMetadata;
use tuf_metadata::hashing::canonical_json_bytes;
use tuf_metadata::hashing::hash_bytes;

use crate::common::root_json;

// ============================================================================
// SECTION: Canonical Hashing
// ============================================================================

/// Tests canonical bytes sort keys and drop whitespace.
#[test]
fn test_canonical_bytes_are_sorted() {
    let bytes = canonical_json_bytes(&json!({"b": 1, "a": [true, null]})).unwrap();
    assert_eq!(bytes, br#"{"a":[true,null],"b":1}"#);
}

/// Tests the known SHA-256 digest of an empty input.
#[test]
fn test_sha256_empty_digest() {
    let digest = hash_bytes(HashAlgorithm::Sha256, b"");
    assert_eq!(digest.value, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
}

/// Tests the signed digest ignores source key order.
#[test]
fn test_signed_digest_ignores_source_order() {
    let original = root_json(1);
    let mut reordered = serde_json::Map::new();
    let signed = original["signed"].as_object().unwrap();
    for (key, value) in signed.iter().rev() {
        reordered.insert(key.clone(), value.clone());
    }
    let reordered_doc = json!({"signatures": original["signatures"].clone(), "signed": reordered});

    let first = RootMetadata::from_value(original).unwrap();
    let second = RootMetadata::from_value(reordered_doc).unwrap();
    assert_eq!(
        first.document().signed_digest().unwrap(),
        second.document().signed_digest().unwrap()
    );
}

/// Tests the signed digest changes with the payload.
#[test]
fn test_signed_digest_tracks_content() {
    let first = RootMetadata::from_value(root_json(1)).unwrap();
    let second = RootMetadata::from_value(root_json(2)).unwrap();
    assert_ne!(
        first.document().signed_digest().unwrap(),
        second.document().signed_digest().unwrap()
    );
}
