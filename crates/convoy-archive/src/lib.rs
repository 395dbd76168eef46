//! # convoy-archive
//!
//! Tar streaming support for Convoy copy operations.
//!
//! Copy RPCs move file trees as tar archives framed into 32 KiB chunks. This
//! crate provides the pieces both ends share:
//!
//! - [`pack`] - walk a file or directory tree into a tar stream
//! - [`unpack`] - extract a tar stream below a destination root, rejecting
//!   entries that would escape it
//! - [`pipe`] - adapters bridging bounded chunk channels to the blocking
//!   `Read`/`Write` interfaces the `tar` crate works with
//!
//! The `tar` crate is synchronous; callers drive [`pack`] and [`unpack`] from
//! `tokio::task::spawn_blocking` and shuttle chunks over the [`pipe`]
//! adapters.

mod error;
pub mod pack;
pub mod pipe;
pub mod unpack;

pub use error::{ArchiveError, Result};

/// Chunk size used when framing tar streams for the wire.
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Byte and entry counters accumulated while packing or extracting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Payload bytes of regular files.
    pub total_bytes: u64,
    /// Entries materialized or emitted (directories, files, symlinks).
    pub file_count: u32,
}
