// crates/tuf-metadata/tests/promotion.rs
// ============================================================================
// Module: Promotion Tests
// Description: Tests for verifier-gated promotion and audit recording.
// ============================================================================
//! ## Overview
//! Promotion must only mark documents trusted after the verifier accepts
//! them, and every attempt must leave one audit event.

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

use tuf_metadata::FileTrustAuditSink;
use tuf_metadata::Metadata;
use tuf_metadata::MetadataError;
use tuf_metadata::NoopTrustAuditSink;
use tuf_metadata::PromotionError;
use tuf_metadata::PromotionOutcome;
use tuf_metadata::RootMetadata;
use tuf_metadata::TargetsMetadata;
use tuf_metadata::VerificationError;
use tuf_metadata::promote;

use crate::common::AcceptAll;
use crate::common::KEY_ID;
use crate::common::RecordingSink;
use crate::common::ThresholdVerifier;
use crate::common::root_json;
use crate::common::targets_json;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Tests an accepted document is promoted and audited.
#[test]
fn test_promote_accepted() {
    let mut root = RootMetadata::from_value(root_json(5)).unwrap();
    let sink = RecordingSink::default();
    promote(&mut root, &AcceptAll, &sink).unwrap();
    assert!(root.is_trusted());

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "trust_promotion");
    assert_eq!(events[0].metadata_type, "root");
    assert_eq!(events[0].version, Some(5));
    assert_eq!(events[0].outcome, PromotionOutcome::Promoted);
    assert_eq!(events[0].reason, None);
    assert_eq!(events[0].signed_digest, Some(root.document().signed_digest().unwrap()));
}

/// Tests a rejected document stays untrusted and the rejection is audited.
#[test]
fn test_promote_rejected_threshold() {
    let mut targets = TargetsMetadata::from_value(targets_json()).unwrap();
    let verifier = ThresholdVerifier {
        known_keys: vec![KEY_ID.to_string()],
        threshold: 2,
    };
    let sink = RecordingSink::default();
    let err = promote(&mut targets, &verifier, &sink).unwrap_err();
    assert_eq!(
        err,
        PromotionError::Verification(VerificationError::ThresholdNotMet {
            required: 2,
            valid: 1,
        })
    );
    assert!(!targets.is_trusted());

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, PromotionOutcome::Rejected);
    assert_eq!(events[0].reason.as_deref(), Some("signature threshold not met: 1 of 2"));
}

/// Tests unknown signing keys are rejected.
#[test]
fn test_promote_rejects_unknown_key() {
    let mut root = RootMetadata::from_value(root_json(1)).unwrap();
    let verifier = ThresholdVerifier {
        known_keys: vec!["other".to_string()],
        threshold: 1,
    };
    let err = promote(&mut root, &verifier, &NoopTrustAuditSink).unwrap_err();
    assert_eq!(err, PromotionError::Verification(VerificationError::UnknownKey(KEY_ID.to_string())));
    assert!(!root.is_trusted());
}

/// Tests promoting twice fails and records the second attempt as rejected.
#[test]
fn test_promote_twice() {
    let mut root = RootMetadata::from_value(root_json(1)).unwrap();
    let sink = RecordingSink::default();
    promote(&mut root, &AcceptAll, &sink).unwrap();
    let err = promote(&mut root, &AcceptAll, &sink).unwrap_err();
    assert!(matches!(err, PromotionError::Metadata(MetadataError::InvalidStateTransition { .. })));
    assert!(root.is_trusted());
    let outcomes: Vec<PromotionOutcome> = sink.events().iter().map(|event| event.outcome).collect();
    assert_eq!(outcomes, vec![PromotionOutcome::Promoted, PromotionOutcome::Rejected]);
}

// ============================================================================
// SECTION: File Sink
// ============================================================================

/// Tests the file sink appends one JSON line per attempt.
#[test]
fn test_file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trust-audit.jsonl");
    let sink = FileTrustAuditSink::new(&path).unwrap();

    let mut first = RootMetadata::from_value(root_json(1)).unwrap();
    promote(&mut first, &AcceptAll, &sink).unwrap();
    let mut second = RootMetadata::from_value(root_json(2)).unwrap();
    let verifier = ThresholdVerifier {
        known_keys: Vec::new(),
        threshold: 1,
    };
    promote(&mut second, &verifier, &sink).unwrap_err();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["outcome"], "promoted");
    assert_eq!(lines[0]["version"], 1);
    assert_eq!(lines[1]["outcome"], "rejected");
    assert_eq!(lines[1]["signed_digest"]["algorithm"], "sha256");
}
