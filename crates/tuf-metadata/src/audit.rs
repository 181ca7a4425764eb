// crates/tuf-metadata/src/audit.rs
// ============================================================================
// Module: Trust Audit Logging
// Description: Structured audit events for trust promotion attempts.
// Purpose: Record every promotion outcome without hard logging dependencies.
// Dependencies: crate::hashing, serde, serde_json
// ============================================================================

//! ## Overview
//! Trust promotion is the only auditable event in this crate. Each attempt
//! made through [`crate::trust::promote`] produces one [`TrustAuditEvent`]
//! routed to a [`TrustAuditSink`]. Sinks write JSON lines and swallow their own
//! I/O failures so auditing never changes the promotion result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::hashing::HashDigest;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a promotion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionOutcome {
    /// Document moved to trusted.
    Promoted,
    /// Document stayed untrusted.
    Rejected,
}

/// Trust promotion audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Type tag of the document.
    pub metadata_type: &'static str,
    /// Document version when readable.
    pub version: Option<u64>,
    /// Digest of the canonical signed payload when computable.
    pub signed_digest: Option<HashDigest>,
    /// Attempt outcome.
    pub outcome: PromotionOutcome,
    /// Failure reason for rejected attempts.
    pub reason: Option<String>,
}

/// Inputs required to construct an audit event.
pub struct TrustAuditEventParams {
    /// Type tag of the document.
    pub metadata_type: &'static str,
    /// Document version when readable.
    pub version: Option<u64>,
    /// Digest of the canonical signed payload when computable.
    pub signed_digest: Option<HashDigest>,
    /// Attempt outcome.
    pub outcome: PromotionOutcome,
    /// Failure reason for rejected attempts.
    pub reason: Option<String>,
}

impl TrustAuditEvent {
    /// Builds a new audit event stamped with the current time.
    #[must_use]
    pub fn new(params: TrustAuditEventParams) -> Self {
        Self {
            event: "trust_promotion",
            timestamp_ms: now_millis(),
            metadata_type: params.metadata_type,
            version: params.version,
            signed_digest: params.signed_digest,
            outcome: params.outcome,
            reason: params.reason,
        }
    }
}

/// Returns milliseconds since the Unix epoch, or zero for a clock before it.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|duration| duration.as_millis()).unwrap_or(0)
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for trust promotion events.
pub trait TrustAuditSink: Send + Sync {
    /// Records one promotion attempt.
    fn record(&self, event: &TrustAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrTrustAuditSink;

impl TrustAuditSink for StderrTrustAuditSink {
    fn record(&self, event: &TrustAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileTrustAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileTrustAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl TrustAuditSink for FileTrustAuditSink {
    fn record(&self, event: &TrustAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopTrustAuditSink;

impl TrustAuditSink for NoopTrustAuditSink {
    fn record(&self, _event: &TrustAuditEvent) {}
}
