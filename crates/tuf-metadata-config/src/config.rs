// crates/tuf-metadata-config/src/config.rs
// ============================================================================
// Module: TUF Metadata Configuration
// Description: Configuration loading and validation for tuf-metadata tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml, tuf-metadata
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no path is given and the default file is absent, defaults apply; a
//! named file that cannot be read is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tuf_metadata::FileTrustAuditSink;
use tuf_metadata::NoopTrustAuditSink;
use tuf_metadata::StderrTrustAuditSink;
use tuf_metadata::TrustAuditSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "tuf-metadata.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TUF_METADATA_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum metadata payload size in bytes.
pub const DEFAULT_MAX_METADATA_BYTES: usize = 4 * 1024 * 1024;
/// Smallest accepted metadata payload limit in bytes.
pub const MIN_MAX_METADATA_BYTES: usize = 1024;
/// Largest accepted metadata payload limit in bytes.
pub const MAX_MAX_METADATA_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level tuf-metadata configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TufMetadataConfig {
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Trust audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl TufMetadataConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.display())));
            }
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.audit.validate()
    }
}

/// Input size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum metadata payload size in bytes.
    #[serde(default = "default_max_metadata_bytes")]
    pub max_metadata_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_metadata_bytes: DEFAULT_MAX_METADATA_BYTES,
        }
    }
}

impl LimitsConfig {
    /// Validates limit bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MAX_METADATA_BYTES ..= MAX_MAX_METADATA_BYTES).contains(&self.max_metadata_bytes) {
            return Err(ConfigError::Invalid(format!(
                "limits.max_metadata_bytes must be between {MIN_MAX_METADATA_BYTES} and \
                 {MAX_MAX_METADATA_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Default for [`LimitsConfig::max_metadata_bytes`].
const fn default_max_metadata_bytes() -> usize {
    DEFAULT_MAX_METADATA_BYTES
}

/// Trust audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// Append-only JSON lines file.
    File,
}

/// Trust audit configuration.
///
/// Only consumers that run promotion use it through
/// [`AuditConfig::build_sink`]; the `tuf-metadata` CLI validates the section
/// but never promotes, so it records nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving promotion events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates sink and path consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when audit.sink = \"file\"".to_string()))
            }
            (AuditSinkKind::None | AuditSinkKind::Stderr, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only allowed when audit.sink = \"file\"".to_string(),
            )),
            (AuditSinkKind::None | AuditSinkKind::Stderr, None) => Ok(()),
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid or the audit
    /// file cannot be opened.
    pub fn build_sink(&self) -> Result<Box<dyn TrustAuditSink>, ConfigError> {
        self.validate()?;
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileTrustAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("{path}: {err}")))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrTrustAuditSink)),
            (AuditSinkKind::None | AuditSinkKind::File, _) => Ok(Box::new(NoopTrustAuditSink)),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// Returns the path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
