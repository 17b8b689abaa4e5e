//! Atomic file write helpers.
//!
//! Uses a temp file + rename pattern so a crash mid-write leaves either the
//! previous file or the new one, never a truncated mix. On Windows, rename-over-existing
//! fails, so we use a backup-and-restore fallback to avoid data loss when overwriting.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct AtomicWriteOptions {
    /// File sync policy for the temp file before persisting.
    pub file_sync: FileSyncPolicy,
    /// Parent directory sync policy after the file has been persisted.
    pub parent_dir_sync: ParentDirSyncPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSyncPolicy {
    SyncAll,
    SkipSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentDirSyncPolicy {
    SyncBestEffort,
    SkipSync,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self {
        Self {
            file_sync: FileSyncPolicy::SyncAll,
            parent_dir_sync: ParentDirSyncPolicy::SyncBestEffort,
        }
    }
}

/// Recover from incomplete atomic writes by restoring `.bak` files.
///
/// If `path` does not exist but `path.bak` does, a crash occurred during the
/// backup-rename window in [`atomic_write_with_options`]. Rename the backup
/// back to the canonical path so the caller can proceed.
pub fn recover_bak_file(path: &Path) {
    let backup = path.with_extension("bak");
    if !path.exists() && backup.exists() {
        match fs::rename(&backup, path) {
            Ok(()) => {
                tracing::warn!(
                    path = %path.display(),
                    "Recovered .bak file from interrupted atomic write"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to recover .bak file: {e}"
                );
            }
        }
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with_options(path, bytes, AtomicWriteOptions::default())
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: AtomicWriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_dir(path);

    let mut tmp = NamedTempFile::new_in(parent)?;

    // Keep the mode of the file being replaced; tempfile creates 0o600.
    #[cfg(unix)]
    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), existing.permissions())?;
    }

    tmp.write_all(bytes)?;
    if matches!(options.file_sync, FileSyncPolicy::SyncAll) {
        tmp.as_file().sync_all()?;
    }

    // Persist (rename) - handle Windows where rename fails if target exists.
    if let Err(err) = tmp.persist(path) {
        if path.exists() {
            let backup_path = path.with_extension("bak");
            let _ = fs::remove_file(&backup_path);
            fs::rename(path, &backup_path)?;

            if let Err(rename_err) = err.file.persist(path) {
                let _ = fs::rename(&backup_path, path);
                return Err(rename_err.error);
            }
            if let Err(e) = fs::remove_file(&backup_path) {
                tracing::warn!(
                    path = %backup_path.display(),
                    "Failed to remove .bak after atomic write: {e}"
                );
            }
        } else {
            return Err(err.error);
        }
    }

    if matches!(options.parent_dir_sync, ParentDirSyncPolicy::SyncBestEffort) {
        best_effort_sync_parent_dir(parent);
    }

    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn best_effort_sync_parent_dir(parent: &Path) {
    #[cfg(unix)]
    {
        if let Err(e) = File::open(parent).and_then(|d| d.sync_all()) {
            debug!(path = %parent.display(), "Parent directory sync_all failed (best-effort): {e}");
        }
    }

    #[cfg(not(unix))]
    {
        let _ = parent;
        debug!("Parent directory sync skipped on this platform");
    }
}
