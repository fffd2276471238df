//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::perms::{self, FileAttributes};
use crate::{Error, Result};

/// Tuning knobs for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up
    pub lock_timeout: Duration,
    /// Flush the temporary file to disk before renaming it into place
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    target.with_file_name(temp_name)
}

fn lock_with_retry(file: &fs::File, target: &Path, timeout: Duration) -> Result<()> {
    let policy = ExponentialBackoff {
        current_interval: Duration::from_millis(10),
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(250),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };

    backoff::retry(policy, || {
        file.try_lock_exclusive().map_err(backoff::Error::transient)
    })
    .map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })
}

/// The file a write to `path` should actually land on.
///
/// An existing symlink is followed so the rename replaces its target and
/// the link itself survives. Paths that do not exist yet are used as given.
fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(resolved) => {
                tracing::debug!(
                    link = %path.display(),
                    target = %resolved.display(),
                    "Writing through symlink"
                );
                resolved
            }
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Write content atomically to a file with locking.
///
/// Missing parent directories are created with `attrs.dir_mode`. The content
/// goes to a temporary sibling first; mode and ownership are stamped onto
/// that temporary file, and only then is it renamed over `path`. Readers
/// see either the old file or the complete new one.
///
/// A symlink at `path` is written through. Without `attrs.ownership` an
/// existing file keeps its uid and gid.
pub fn write_atomic(
    path: &Path,
    content: &[u8],
    attrs: &FileAttributes,
    config: RobustnessConfig,
) -> Result<()> {
    let target = resolve_target(path);
    if let Some(parent) = target.parent() {
        perms::create_dir_all_with_mode(parent, attrs.dir_mode)?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_path = temp_path_for(&target);

    let result = write_temp_and_rename(&target, &temp_path, content, attrs, config);
    if result.is_err() && temp_path.exists() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp_and_rename(
    path: &Path,
    temp_path: &Path,
    content: &[u8],
    attrs: &FileAttributes,
    config: RobustnessConfig,
) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    // Restrict before any content lands on disk
    if let Some(mode) = attrs.mode {
        perms::set_mode(temp_path, mode)?;
    }

    lock_with_retry(&temp_file, path, config.lock_timeout)?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if config.enable_fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    drop(temp_file);

    attrs.apply(temp_path)?;
    if attrs.ownership.is_none() {
        perms::copy_ownership(path, temp_path)?;
    }

    fs::rename(temp_path, path).map_err(|e| Error::Rename {
        from: temp_path.to_path_buf(),
        to: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file atomically");

    Ok(())
}

/// Rename `source` onto `destination`, replacing it if present.
///
/// Creates the destination's parent directory first. This is a single
/// `rename(2)`: it never falls back to copy-then-delete, so a cross-device
/// move fails instead of risking a truncated destination.
pub fn atomic_replace(source: &Path, destination: &Path) -> Result<()> {
    let move_error = |source_err: std::io::Error| Error::Move {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: source_err,
    };

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent).map_err(move_error)?;
        }
    }

    fs::rename(source, destination).map_err(move_error)?;
    tracing::debug!(
        from = %source.display(),
        to = %destination.display(),
        "Renamed file"
    );
    Ok(())
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::Remove {
        path: path.to_path_buf(),
        source: e,
    })
}
