// crates/tuf-metadata-config/src/lib.rs
// ============================================================================
// Module: TUF Metadata Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for tuf-metadata.toml semantics.
// Dependencies: serde, toml, tuf-metadata
// ============================================================================

//! ## Overview
//! `tuf-metadata-config` defines the configuration model for the
//! tuf-metadata tooling: payload size limits and the trust audit sink. It
//! provides strict, fail-closed validation.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
