//! Tar stream extraction.
//!
//! Every entry path is resolved below the destination root before anything is
//! written; `..` segments reject the transfer. Directory, regular-file, and
//! symlink entries are materialized, everything else is skipped.

use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Component, Path, PathBuf};

use tar::{Archive, EntryType};
use tracing::debug;

use crate::{ArchiveError, ArchiveStats, Result};

/// Extracts a tar stream below `dest_root`.
///
/// The root is expected to exist. Returns byte/entry counters.
///
/// # Errors
///
/// Returns [`ArchiveError::PathTraversal`] when an entry would escape the
/// root, and I/O errors from the stream or the filesystem. Entries processed
/// before the failure remain on disk.
pub fn unpack_stream<R: Read>(reader: R, dest_root: &Path, overwrite: bool) -> Result<ArchiveStats> {
    let mut archive = Archive::new(reader);
    let mut stats = ArchiveStats::default();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.into_owned();
        let target = safe_join(dest_root, &name)?;

        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(&target)?;
                set_mode(&target, entry.header().mode().unwrap_or(0o755));
                stats.file_count += 1;
            }
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut file = File::create(&target)?;
                let written = io::copy(&mut entry, &mut file)?;
                set_mode(&target, entry.header().mode().unwrap_or(0o644));
                stats.total_bytes += written;
                stats.file_count += 1;
            }
            EntryType::Symlink => {
                let link = entry
                    .link_name()?
                    .ok_or_else(|| ArchiveError::MissingLinkTarget(name.display().to_string()))?
                    .into_owned();
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                if overwrite {
                    let _ = fs::remove_file(&target);
                }
                symlink(&link, &target)?;
                stats.file_count += 1;
            }
            other => {
                debug!(path = %name.display(), entry_type = ?other, "skipping entry type");
            }
        }
    }

    Ok(stats)
}

/// Joins an archive entry name onto the destination root.
///
/// Absolute entry names are taken relative to the root; `.` segments are
/// dropped; `..` segments are rejected outright.
fn safe_join(root: &Path, name: &Path) -> Result<PathBuf> {
    let mut target = root.to_path_buf();
    for component in name.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                return Err(ArchiveError::PathTraversal(name.display().to_string()));
            }
        }
    }
    Ok(target)
}

fn set_mode(path: &Path, mode: u32) {
    // Mode bits come from the producer's stat; failure to apply them is not
    // fatal to the transfer.
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        debug!(path = %path.display(), %err, "failed to set permissions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::pack_tree;
    use std::io::Write;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    /// Builds a tar whose entry names bypass the `tar` crate's own relative
    /// path validation, the way a hostile producer would.
    fn build_raw_name_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, content) in entries {
            let mut header = tar::Header::new_gnu();
            {
                let gnu = header.as_gnu_mut().unwrap();
                gnu.name[..path.len()].copy_from_slice(path.as_bytes());
            }
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, *content).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn unpack_creates_directories_and_files() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_path("dir/").unwrap();
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append(&header, io::empty()).unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_path("dir/file.txt").unwrap();
        header.set_size(1);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, &b"X"[..]).unwrap();
        let data = builder.into_inner().unwrap();

        let stats = unpack_stream(data.as_slice(), &dest, false).unwrap();

        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_bytes, 1);
        assert_eq!(fs::read(dest.join("dir/file.txt")).unwrap(), b"X");
    }

    #[test]
    fn unpack_rejects_parent_dir_escape() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let data = build_raw_name_tar(&[("../escape.txt", b"nope")]);
        let err = unpack_stream(data.as_slice(), &dest, false).unwrap_err();

        assert!(matches!(err, ArchiveError::PathTraversal(_)));
        assert!(!dir.path().join("escape.txt").exists());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0, "dest must stay untouched");
    }

    #[test]
    fn unpack_takes_absolute_names_relative_to_root() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let data = build_raw_name_tar(&[("/etc/passwd", b"root")]);
        unpack_stream(data.as_slice(), &dest, false).unwrap();

        assert!(dest.join("etc/passwd").exists());
    }

    #[test]
    fn unpack_symlink_overwrite_policy() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        symlink("old-target", dest.join("link")).unwrap();

        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(EntryType::Symlink);
        header.set_size(0);
        header.set_mode(0o777);
        header.set_cksum();
        builder
            .append_link(&mut header, "link", "new-target")
            .unwrap();
        let data = builder.into_inner().unwrap();

        // Without overwrite the existing entry makes symlink creation fail.
        assert!(unpack_stream(data.as_slice(), &dest, false).is_err());

        unpack_stream(data.as_slice(), &dest, true).unwrap();
        assert_eq!(
            fs::read_link(dest.join("link")).unwrap(),
            PathBuf::from("new-target")
        );
    }

    #[test]
    fn pack_then_unpack_roundtrips_tree() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("nested/deeper")).unwrap();
        fs::write(src.join("top.txt"), b"top").unwrap();
        fs::write(src.join("nested/data.bin"), vec![0u8, 1, 2, 3]).unwrap();
        symlink("../top.txt", src.join("nested/link")).unwrap();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(src.join("nested/deeper/script.sh"))
            .unwrap();
        file.write_all(b"#!/bin/sh\n").unwrap();
        drop(file);
        fs::set_permissions(
            src.join("nested/deeper/script.sh"),
            fs::Permissions::from_mode(0o755),
        )
        .unwrap();

        let mut buf = Vec::new();
        let pack_stats = pack_tree(&mut buf, &src).unwrap();

        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        let unpack_stats = unpack_stream(buf.as_slice(), &dest, false).unwrap();

        assert_eq!(pack_stats, unpack_stats);
        assert_eq!(fs::read(dest.join("top.txt")).unwrap(), b"top");
        assert_eq!(fs::read(dest.join("nested/data.bin")).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(
            fs::read_link(dest.join("nested/link")).unwrap(),
            PathBuf::from("../top.txt")
        );
        let mode = fs::metadata(dest.join("nested/deeper/script.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
