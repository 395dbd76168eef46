//! Error types for archive operations.

use thiserror::Error;

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while packing or extracting tar streams.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// An entry path would resolve outside the destination root.
    #[error("invalid tar entry path: {0}")]
    PathTraversal(String),

    /// A symlink entry carried no link target.
    #[error("symlink entry {0} has no link target")]
    MissingLinkTarget(String),

    /// I/O error from the filesystem or the tar stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
