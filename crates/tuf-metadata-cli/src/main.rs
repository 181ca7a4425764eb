// crates/tuf-metadata-cli/src/main.rs
// ============================================================================
// Module: TUF Metadata CLI
// Description: CLI entrypoint for validating and inspecting metadata files.
// Purpose: Run structural validation and explicit untrusted inspection locally.
// Dependencies: clap, serde, serde_json, tuf-metadata, tuf-metadata-config
// ============================================================================

//! ## Overview
//! `tuf-metadata validate` checks a metadata file against the schema of its
//! type and prints a JSON report. `tuf-metadata inspect` prints semantic
//! content, which requires `--allow-untrusted` because this tool never
//! verifies signatures.
//! Security posture: metadata files are untrusted input; reads are size
//! limited by configuration.
//!
//! The CLI never promotes metadata, so the `[audit]` config section is
//! validated but no sink is built and no audit event is written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tuf_metadata::FileMeta;
use tuf_metadata::HashDigest;
use tuf_metadata::Metadata;
use tuf_metadata::MetadataError;
use tuf_metadata::Role;
use tuf_metadata::RoleName;
use tuf_metadata::RootMetadata;
use tuf_metadata::SnapshotMetadata;
use tuf_metadata::TargetsMetadata;
use tuf_metadata::TimestampMetadata;
use tuf_metadata_config::ConfigError;
use tuf_metadata_config::TufMetadataConfig;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// TUF metadata CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "tuf-metadata", about = "Validate and inspect TUF metadata files.")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a metadata file against the schema of its type.
    Validate {
        /// Metadata type of the file.
        #[arg(long = "type", value_enum)]
        metadata_type: MetadataKind,
        /// Metadata file to validate.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Config file path (defaults to tuf-metadata.toml).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the content of an unverified metadata file.
    Inspect {
        /// Metadata type of the file.
        #[arg(long = "type", value_enum)]
        metadata_type: MetadataKind,
        /// Metadata file to inspect.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Read content without signature verification.
        #[arg(long)]
        allow_untrusted: bool,
        /// Config file path (defaults to tuf-metadata.toml).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Metadata types accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetadataKind {
    /// Root metadata.
    Root,
    /// Timestamp metadata.
    Timestamp,
    /// Snapshot metadata.
    Snapshot,
    /// Targets metadata.
    Targets,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Metadata file could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Metadata was rejected or access was denied.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// Report could not be written.
    #[error("failed to write output: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Structural validation report.
#[derive(Debug, Serialize)]
struct ValidationReport {
    /// Type tag of the document.
    metadata_type: &'static str,
    /// Whether the document passed validation.
    valid: bool,
    /// Number of entries in the signature block.
    signature_count: usize,
    /// Digest of the canonical signed payload.
    signed_digest: HashDigest,
}

/// Untrusted view of root metadata.
#[derive(Debug, Serialize)]
struct RootReport {
    /// Document version.
    version: u64,
    /// Role table keyed by role name.
    roles: BTreeMap<RoleName, Role>,
    /// Key identifiers in source order.
    key_ids: Vec<String>,
}

/// Untrusted view of timestamp metadata.
#[derive(Debug, Serialize)]
struct TimestampReport {
    /// Document version.
    version: u64,
    /// Description of the current snapshot.
    snapshot: FileMeta,
}

/// Untrusted view of snapshot metadata.
#[derive(Debug, Serialize)]
struct SnapshotReport {
    /// Document version.
    version: u64,
    /// Listed metadata files in source order.
    meta: Vec<String>,
}

/// Untrusted view of targets metadata.
#[derive(Debug, Serialize)]
struct TargetsReport {
    /// Document version.
    version: u64,
    /// Delegated role names in source order.
    delegated_roles: Vec<String>,
}

// ============================================================================
// SECTION: CLI Execution
// ============================================================================

/// CLI entrypoint.
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Executes the CLI command.
fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            metadata_type,
            file,
            config,
        } => {
            let input = read_metadata(&file, config.as_deref())?;
            let report = match metadata_type {
                MetadataKind::Root => validation_report::<RootMetadata>(&input)?,
                MetadataKind::Timestamp => validation_report::<TimestampMetadata>(&input)?,
                MetadataKind::Snapshot => validation_report::<SnapshotMetadata>(&input)?,
                MetadataKind::Targets => validation_report::<TargetsMetadata>(&input)?,
            };
            write_json(&report)
        }
        Command::Inspect {
            metadata_type,
            file,
            allow_untrusted,
            config,
        } => {
            let input = read_metadata(&file, config.as_deref())?;
            match metadata_type {
                MetadataKind::Root => write_json(&inspect_root(&input, allow_untrusted)?),
                MetadataKind::Timestamp => {
                    write_json(&inspect_timestamp(&input, allow_untrusted)?)
                }
                MetadataKind::Snapshot => write_json(&inspect_snapshot(&input, allow_untrusted)?),
                MetadataKind::Targets => write_json(&inspect_targets(&input, allow_untrusted)?),
            }
        }
    }
}

/// Reports CLI errors to stderr and returns a failure exit code.
fn report_error(err: &CliError) -> ExitCode {
    let mut stderr = std::io::stderr();
    if let CliError::Metadata(MetadataError::SchemaViolation(violation)) = err {
        let items = violation.violations();
        let _ = writeln!(stderr, "schema violation: {} field(s) rejected", items.len());
        for item in items {
            let _ = writeln!(stderr, "  {item}");
        }
    } else {
        let _ = writeln!(stderr, "{err}");
    }
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Metadata bytes read under the configured size limit.
struct MetadataInput {
    /// Raw file bytes, at most one byte past `limit`.
    bytes: Vec<u8>,
    /// Configured `limits.max_metadata_bytes`.
    limit: usize,
}

impl MetadataInput {
    /// Decodes and validates the bytes as metadata of type `M`.
    fn decode<M: Metadata>(&self) -> Result<M, CliError> {
        Ok(M::from_json_slice_with_limit(&self.bytes, self.limit)?)
    }
}

/// Loads configuration and reads a metadata file within the size limit.
///
/// The read stops one byte past the limit, so a file that grows after it was
/// opened is still rejected by the decoder.
fn read_metadata(file: &Path, config: Option<&Path>) -> Result<MetadataInput, CliError> {
    let config = TufMetadataConfig::load(config)?;
    let limit = config.limits.max_metadata_bytes;
    let io_error = |err: std::io::Error| CliError::Io {
        path: file.display().to_string(),
        message: err.to_string(),
    };
    let max_read = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    File::open(file).map_err(io_error)?.take(max_read).read_to_end(&mut bytes).map_err(io_error)?;
    Ok(MetadataInput {
        bytes,
        limit,
    })
}

/// Validates input as metadata of type `M`.
fn validation_report<M: Metadata>(input: &MetadataInput) -> Result<ValidationReport, CliError> {
    let metadata: M = input.decode()?;
    Ok(ValidationReport {
        metadata_type: metadata.get_type(),
        valid: true,
        signature_count: metadata.get_signatures().len(),
        signed_digest: metadata.document().signed_digest()?,
    })
}

/// Builds the root report.
fn inspect_root(input: &MetadataInput, allow_untrusted: bool) -> Result<RootReport, CliError> {
    let root: RootMetadata = input.decode()?;
    Ok(RootReport {
        version: root.get_version(allow_untrusted)?,
        roles: root.get_roles(allow_untrusted)?,
        key_ids: root.get_keys(allow_untrusted)?.keys().cloned().collect(),
    })
}

/// Builds the timestamp report.
fn inspect_timestamp(input: &MetadataInput, allow_untrusted: bool) -> Result<TimestampReport, CliError> {
    let timestamp: TimestampMetadata = input.decode()?;
    Ok(TimestampReport {
        version: timestamp.get_version(allow_untrusted)?,
        snapshot: timestamp.get_snapshot_meta(allow_untrusted)?,
    })
}

/// Builds the snapshot report.
fn inspect_snapshot(input: &MetadataInput, allow_untrusted: bool) -> Result<SnapshotReport, CliError> {
    let snapshot: SnapshotMetadata = input.decode()?;
    Ok(SnapshotReport {
        version: snapshot.get_version(allow_untrusted)?,
        meta: snapshot.get_file_names(allow_untrusted)?,
    })
}

/// Builds the targets report.
fn inspect_targets(input: &MetadataInput, allow_untrusted: bool) -> Result<TargetsReport, CliError> {
    let targets: TargetsMetadata = input.decode()?;
    let delegated_roles = targets
        .get_delegated_roles(allow_untrusted)?
        .iter()
        .map(|role| role.name().to_string())
        .collect();
    Ok(TargetsReport {
        version: targets.get_version(allow_untrusted)?,
        delegated_roles,
    })
}

/// Writes a pretty JSON value to stdout.
fn write_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{payload}").map_err(|err| CliError::Output(err.to_string()))
}
