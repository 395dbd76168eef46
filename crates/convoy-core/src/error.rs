//! Error types for the orchestrator core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in orchestrator operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A container lookup failed.
    #[error("container {0} not found")]
    ContainerNotFound(String),

    /// A registry name conflict.
    #[error("container name {name} is already bound to {existing_id}")]
    NameConflict { name: String, existing_id: String },

    /// A caller-supplied value failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// An RPC was attempted against a container with no endpoint.
    #[error("container {0} has no agent endpoint")]
    NoEndpoint(String),

    /// Dialing an agent endpoint failed.
    #[error("dial {endpoint}: {source}")]
    Dial {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// An RPC returned a failure status.
    #[error(transparent)]
    Rpc(#[from] tonic::Status),

    /// Archive production or extraction failed.
    #[error(transparent)]
    Archive(#[from] convoy_archive::ArchiveError),

    /// Runtime driver failure.
    #[error("runtime: {0}")]
    Runtime(String),

    /// Composite failure after a copy fan-out.
    #[error("one or more copy operations failed")]
    CopyFailed,

    /// A copy stream ended without delivering its result frame.
    #[error("copy stream ended unexpectedly: {0}")]
    CopyProtocol(String),

    #[error("read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("resolve home dir: HOME is not set")]
    NoHomeDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
