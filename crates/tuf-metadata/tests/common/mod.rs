// crates/tuf-metadata/tests/common/mod.rs
// =============================================================================
// Module: Metadata Test Helpers
// Description: Shared fixtures, verifiers, and audit sinks for metadata tests.
// Purpose: Reduce duplication across integration tests for tuf-metadata.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use tuf_metadata::SignedDocument;
use tuf_metadata::TrustAuditEvent;
use tuf_metadata::TrustAuditSink;
use tuf_metadata::VerificationError;
use tuf_metadata::interfaces::SignatureVerifier;

/// Key identifier used throughout the fixtures.
pub const KEY_ID: &str = "4e777de0d275f9d28588dd9a1606cc748e548f9e22b6795b7cb3f63f98035fcb";

/// Returns one valid key record.
pub fn key_record() -> Value {
    json!({
        "keyid_hash_algorithms": ["sha256", "sha512"],
        "keytype": "ed25519",
        "keyval": {
            "public": "72378e5bc588793e58f81c8533da64a2e8f1565c1fcc7f253496394ffc52542c"
        },
        "scheme": "ed25519"
    })
}

/// Returns one valid role entry.
pub fn role_entry(threshold: u64) -> Value {
    json!({"keyids": [KEY_ID], "threshold": threshold})
}

/// Returns a valid signature block.
pub fn signatures() -> Value {
    json!([{"keyid": KEY_ID, "sig": "d1f9ee4f5861ad7b8be61c6c2b0bd4a3"}])
}

/// Returns a valid root document at the given version.
pub fn root_json(version: u64) -> Value {
    json!({
        "signatures": signatures(),
        "signed": {
            "_type": "root",
            "spec_version": "1.0.0",
            "version": version,
            "expires": "2030-01-01T00:00:00Z",
            "consistent_snapshot": true,
            "keys": { KEY_ID: key_record() },
            "roles": {
                "root": role_entry(1),
                "targets": role_entry(1),
                "snapshot": role_entry(1),
                "timestamp": role_entry(1)
            }
        }
    })
}

/// Returns a valid timestamp document.
pub fn timestamp_json() -> Value {
    json!({
        "signatures": signatures(),
        "signed": {
            "_type": "timestamp",
            "spec_version": "1.0.0",
            "version": 12,
            "expires": "2030-01-01T00:00:00Z",
            "meta": {
                "snapshot.json": {
                    "version": 7,
                    "length": 515,
                    "hashes": {"sha256": "8f88e2ba48b412c3843e9bb26e1b6f8fc9e98aceb0fbaa97ba37b4c98717d7ab"}
                }
            }
        }
    })
}

/// Returns a valid snapshot document.
pub fn snapshot_json() -> Value {
    json!({
        "signatures": signatures(),
        "signed": {
            "_type": "snapshot",
            "spec_version": "1.0.0",
            "version": 7,
            "expires": "2030-01-01T00:00:00Z",
            "meta": {
                "targets.json": {"version": 3},
                "project.json": {
                    "version": 1,
                    "length": 604,
                    "hashes": {"sha256": "1f812e378264c3085bb69ec5f6663ed21e5882bbece3c3f8a0e8479f205ffb91"}
                }
            }
        }
    })
}

/// Returns a valid targets document with one delegation.
pub fn targets_json() -> Value {
    json!({
        "signatures": signatures(),
        "signed": {
            "_type": "targets",
            "spec_version": "1.0.0",
            "version": 3,
            "expires": "2030-01-01T00:00:00Z",
            "targets": {
                "packages/example-1.0.0.tar.gz": {
                    "length": 31,
                    "hashes": {"sha256": "65b8c67f51c993d898250f40aa57a317d854900b3a04895464313e48785440da"},
                    "custom": {"channel": "stable"}
                },
                "packages/empty.txt": {
                    "length": 0,
                    "hashes": {"sha256": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"}
                }
            },
            "delegations": {
                "keys": { KEY_ID: key_record() },
                "roles": [
                    {
                        "name": "packages",
                        "keyids": [KEY_ID],
                        "threshold": 1,
                        "paths": ["packages/*"],
                        "terminating": true
                    },
                    {
                        "name": "fallback",
                        "keyids": [KEY_ID],
                        "threshold": 2,
                        "terminating": false
                    }
                ]
            }
        }
    })
}

/// Sets a nested field, creating nothing: every parent must already exist.
pub fn set_field(document: &mut Value, path: &[&str], value: Value) {
    let (last, parents) = path.split_last().expect("non-empty path");
    let mut cursor = document;
    for segment in parents {
        cursor = cursor.get_mut(*segment).expect("parent exists");
    }
    cursor.as_object_mut().expect("parent is a mapping").insert((*last).to_string(), value);
}

/// Removes a nested field.
pub fn remove_field(document: &mut Value, path: &[&str]) {
    let (last, parents) = path.split_last().expect("non-empty path");
    let mut cursor = document;
    for segment in parents {
        cursor = cursor.get_mut(*segment).expect("parent exists");
    }
    cursor.as_object_mut().expect("parent is a mapping").remove(*last);
}

/// Verifier that accepts every document.
pub struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    fn verify(&self, _document: &SignedDocument) -> Result<(), VerificationError> {
        Ok(())
    }
}

/// Verifier that requires a fixed number of signatures from known keys.
pub struct ThresholdVerifier {
    /// Keys the verifier accepts.
    pub known_keys: Vec<String>,
    /// Required signature count.
    pub threshold: u64,
}

impl SignatureVerifier for ThresholdVerifier {
    fn verify(&self, document: &SignedDocument) -> Result<(), VerificationError> {
        let mut valid = 0_u64;
        for signature in document.signatures() {
            if !self.known_keys.iter().any(|key| key == signature.key_id.as_str()) {
                return Err(VerificationError::UnknownKey(signature.key_id.to_string()));
            }
            valid += 1;
        }
        if valid < self.threshold {
            return Err(VerificationError::ThresholdNotMet {
                required: self.threshold,
                valid,
            });
        }
        Ok(())
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Recorded events in arrival order.
    pub events: Mutex<Vec<TrustAuditEvent>>,
}

impl RecordingSink {
    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<TrustAuditEvent> {
        self.events.lock().expect("sink lock").clone()
    }
}

impl TrustAuditSink for RecordingSink {
    fn record(&self, event: &TrustAuditEvent) {
        self.events.lock().expect("sink lock").push(event.clone());
    }
}
