// crates/tuf-metadata/tests/trust_gate.rs
// ============================================================================
// Module: Trust Gate Tests
// Description: Tests for untrusted access denial and one-way promotion.
// ============================================================================
//! ## Overview
//! Every semantic accessor must refuse untrusted documents unless the caller
//! opts in, and promotion must happen at most once.

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

use tuf_metadata::KeyId;
use tuf_metadata::Metadata;
use tuf_metadata::MetadataError;
use tuf_metadata::RoleName;
use tuf_metadata::RootMetadata;
use tuf_metadata::SnapshotMetadata;
use tuf_metadata::TargetsMetadata;
use tuf_metadata::TimestampMetadata;
use tuf_metadata::TrustState;

use crate::common::KEY_ID;
use crate::common::root_json;
use crate::common::snapshot_json;
use crate::common::targets_json;
use crate::common::timestamp_json;

/// Asserts the error is an untrusted-access denial for the given type.
fn assert_denied<T: std::fmt::Debug>(result: Result<T, MetadataError>, metadata_type: &str) {
    match result {
        Err(MetadataError::UntrustedMetadataAccess {
            metadata_type: actual,
        }) => assert_eq!(actual, metadata_type),
        other => panic!("expected untrusted access error, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Denial
// ============================================================================

/// Tests every root accessor is denied before trust.
#[test]
fn test_root_accessors_denied_before_trust() {
    let root = RootMetadata::from_value(root_json(1)).unwrap();
    assert_denied(root.get_version(false), "root");
    assert_denied(root.get_expires(false), "root");
    assert_denied(root.get_roles(false), "root");
    assert_denied(root.get_role(RoleName::Root, false), "root");
    assert_denied(root.get_keys(false), "root");
    assert_denied(root.get_key(&KeyId::from(KEY_ID), false), "root");
    assert_denied(root.supports_consistent_snapshots(), "root");
    assert_denied(root.ensure_is_trusted(false), "root");
}

/// Tests sibling type accessors are denied before trust.
#[test]
fn test_sibling_accessors_denied_before_trust() {
    let timestamp = TimestampMetadata::from_value(timestamp_json()).unwrap();
    assert_denied(timestamp.get_snapshot_meta(false), "timestamp");
    assert_denied(timestamp.get_file_meta_info("snapshot.json", false), "timestamp");

    let snapshot = SnapshotMetadata::from_value(snapshot_json()).unwrap();
    assert_denied(snapshot.get_file_meta_info("targets.json", false), "snapshot");
    assert_denied(snapshot.get_file_names(false), "snapshot");

    let targets = TargetsMetadata::from_value(targets_json()).unwrap();
    let name = "packages/empty.txt";
    assert_denied(targets.get_target(name, false), "targets");
    assert_denied(targets.has_target(name, false), "targets");
    assert_denied(targets.get_hashes(name, false), "targets");
    assert_denied(targets.get_length(name, false), "targets");
    assert_denied(targets.get_delegated_keys(false), "targets");
    assert_denied(targets.get_delegated_roles(false), "targets");
}

/// Tests the untrusted-access error message names the type.
#[test]
fn test_denial_message() {
    let targets = TargetsMetadata::from_value(targets_json()).unwrap();
    let err = targets.get_version(false).unwrap_err();
    assert_eq!(err.to_string(), "cannot read untrusted targets metadata");
}

// ============================================================================
// SECTION: Explicit Untrusted Access
// ============================================================================

/// Tests explicit untrusted access reads content without promoting.
#[test]
fn test_explicit_untrusted_access() {
    let root = RootMetadata::from_value(root_json(4)).unwrap();
    assert_eq!(root.get_version(true).unwrap(), 4);
    assert_eq!(root.get_expires(true).unwrap().unix_timestamp(), 1_893_456_000);
    assert_eq!(root.get_roles(true).unwrap().len(), 4);
    root.ensure_is_trusted(true).unwrap();
    assert!(!root.is_trusted());
    assert_eq!(root.document().trust_state(), TrustState::Untrusted);
}

/// Tests ungated surfaces stay readable before trust.
#[test]
fn test_ungated_surface() {
    let root = RootMetadata::from_value(root_json(1)).unwrap();
    assert_eq!(root.get_type(), "root");
    assert_eq!(root.get_signatures().len(), 1);
    let bytes = root.document().canonical_signed_bytes().unwrap();
    assert!(bytes.starts_with(b"{\"_type\":\"root\""));
    let digest = root.document().signed_digest().unwrap();
    assert_eq!(digest.value.len(), 64);
}

// ============================================================================
// SECTION: Promotion
// ============================================================================

/// Tests promotion is one-way and a second promotion fails.
#[test]
fn test_second_promotion_fails() {
    let mut root = RootMetadata::from_value(root_json(1)).unwrap();
    root.mark_trusted().unwrap();
    assert!(root.is_trusted());
    let err = root.mark_trusted().unwrap_err();
    assert_eq!(
        err,
        MetadataError::InvalidStateTransition {
            metadata_type: "root",
            from: TrustState::Trusted,
            to: TrustState::Trusted,
        }
    );
    assert!(root.is_trusted());
}

/// Tests a promoted document stays trusted and bound to its own payload.
#[test]
fn test_promoted_document_cannot_be_reset() {
    let pristine = RootMetadata::from_value(root_json(1)).unwrap();
    let mut root = pristine.clone();
    root.mark_trusted().unwrap();

    let mut detached = root.document().clone();
    assert_eq!(detached.trust_state(), TrustState::Trusted);
    assert!(detached.mark_trusted().is_err());
    assert_eq!(detached.trust_state(), TrustState::Trusted);

    let copy = root.clone();
    assert!(copy.is_trusted());
    assert!(!pristine.is_trusted());
    assert!(root.is_trusted());
    assert_eq!(root.document().metadata_type(), "root");
    assert_eq!(root.document().trust_state(), TrustState::Trusted);

    let timestamp = TimestampMetadata::from_value(timestamp_json()).unwrap();
    assert_eq!(timestamp.document().metadata_type(), "timestamp");
    assert_eq!(root.get_roles(false).unwrap().len(), 4);
}

/// Tests trusted reads return exactly the source content.
#[test]
fn test_round_trip_after_promotion() {
    let source = root_json(3);
    let mut root = RootMetadata::from_value(source.clone()).unwrap();
    root.mark_trusted().unwrap();
    assert_eq!(root.get_version(false).unwrap(), 3);
    assert_eq!(root.get_keys(false).unwrap(), source["signed"]["keys"].as_object().unwrap());
    let roles = root.get_roles(false).unwrap();
    let targets = &roles[&RoleName::Targets];
    assert_eq!(targets.threshold().get(), 1);
    assert_eq!(targets.key_ids(), &[KeyId::from(KEY_ID)]);
    assert!(root.supports_consistent_snapshots().unwrap());
}

/// Tests repeated reads return equal values and leave state unchanged.
#[test]
fn test_reads_are_idempotent() {
    let mut root = RootMetadata::from_value(root_json(2)).unwrap();
    root.mark_trusted().unwrap();
    let before = root.clone();
    let first = root.get_roles(false).unwrap();
    let second = root.get_roles(false).unwrap();
    assert_eq!(first, second);
    assert_eq!(root.get_keys(false).unwrap(), root.get_keys(false).unwrap());
    assert_eq!(root, before);
}

/// Tests documents constructed from the same bytes are independent.
#[test]
fn test_independent_instances() {
    let bytes = serde_json::to_vec(&root_json(1)).unwrap();
    let mut first = RootMetadata::from_json_slice(&bytes).unwrap();
    let second = RootMetadata::from_json_slice(&bytes).unwrap();
    first.mark_trusted().unwrap();
    assert!(first.is_trusted());
    assert!(!second.is_trusted());
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Tests malformed JSON and oversized payloads are rejected before validation.
#[test]
fn test_loader_errors() {
    let err = RootMetadata::from_json_slice(b"{not json").unwrap_err();
    assert!(matches!(err, MetadataError::Decode(_)));

    let bytes = serde_json::to_vec(&root_json(1)).unwrap();
    let err = RootMetadata::from_json_slice_with_limit(&bytes, 16).unwrap_err();
    assert_eq!(
        err,
        MetadataError::PayloadTooLarge {
            size: bytes.len(),
            limit: 16,
        }
    );
    RootMetadata::from_json_slice_with_limit(&bytes, bytes.len()).unwrap();
}
