//! Tar stream production.
//!
//! A directory source is walked recursively and entries are named relative to
//! the source root (the root itself is skipped). A file or symlink source
//! becomes a single entry under its base name. Symlink targets are recorded in
//! the entry's link name; directories and symlinks are header-only.

use std::fs::{self, File, Metadata};
use std::io::Write;
use std::path::Path;

use tar::{Builder, EntryType, Header};
use tracing::debug;

use crate::{ArchiveStats, Result};

/// Packs `src` into a tar stream written to `writer`.
///
/// Returns the accumulated byte/entry counters. The writer is flushed before
/// returning.
///
/// # Errors
///
/// Returns an error when the source cannot be read or the writer fails.
pub fn pack_tree<W: Write>(writer: W, src: &Path) -> Result<ArchiveStats> {
    let mut stats = ArchiveStats::default();
    let mut builder = Builder::new(writer);
    builder.follow_symlinks(false);

    let meta = fs::metadata(src)?;
    if meta.is_dir() {
        append_dir_entries(&mut builder, src, Path::new(""), &mut stats)?;
    } else {
        let name = src.file_name().map(Path::new).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("source {} has no file name", src.display()),
            )
        })?;
        // The root is stat'ed (symlinks followed), matching what the walk does
        // for explicitly named sources.
        append_entry(&mut builder, src, name, &fs::symlink_metadata(src)?, &mut stats)?;
    }

    builder.finish()?;
    let mut writer = builder.into_inner()?;
    writer.flush()?;

    Ok(stats)
}

fn append_dir_entries<W: Write>(
    builder: &mut Builder<W>,
    dir: &Path,
    rel: &Path,
    stats: &mut ArchiveStats,
) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let rel_path = rel.join(entry.file_name());
        let meta = fs::symlink_metadata(&path)?;

        append_entry(builder, &path, &rel_path, &meta, stats)?;

        if meta.is_dir() {
            append_dir_entries(builder, &path, &rel_path, stats)?;
        }
    }

    Ok(())
}

fn append_entry<W: Write>(
    builder: &mut Builder<W>,
    path: &Path,
    rel_path: &Path,
    meta: &Metadata,
    stats: &mut ArchiveStats,
) -> Result<()> {
    let file_type = meta.file_type();

    if file_type.is_dir() {
        builder.append_dir(rel_path, path)?;
        stats.file_count += 1;
    } else if file_type.is_symlink() {
        let target = fs::read_link(path)?;
        let mut header = Header::new_gnu();
        header.set_metadata(meta);
        header.set_entry_type(EntryType::Symlink);
        header.set_size(0);
        builder.append_link(&mut header, rel_path, &target)?;
        stats.file_count += 1;
    } else if file_type.is_file() {
        let mut file = File::open(path)?;
        builder.append_file(rel_path, &mut file)?;
        stats.total_bytes += meta.len();
        stats.file_count += 1;
    } else {
        debug!(path = %path.display(), "skipping special file");
    }

    Ok(())
}
