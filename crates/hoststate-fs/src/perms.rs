//! Permission and ownership application
//!
//! Unix modes and `chown` are applied by path. On non-Unix targets both are
//! accepted and ignored.

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Requested file ownership, by user and group name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub user: String,
    pub group: String,
}

impl Ownership {
    /// Build an ownership request only when both halves are present.
    ///
    /// A lone owner or a lone group yields `None`; callers skip the
    /// `chown` entirely in that case.
    pub fn from_parts(user: Option<&str>, group: Option<&str>) -> Option<Self> {
        match (user, group) {
            (Some(user), Some(group)) => Some(Self {
                user: user.to_string(),
                group: group.to_string(),
            }),
            _ => None,
        }
    }

    #[cfg(unix)]
    fn resolve(&self) -> Result<(nix::unistd::Uid, nix::unistd::Gid)> {
        use nix::unistd::{Group, User};

        let user = User::from_name(&self.user)
            .ok()
            .flatten()
            .ok_or_else(|| Error::UnknownUser {
                name: self.user.clone(),
            })?;
        let group = Group::from_name(&self.group)
            .ok()
            .flatten()
            .ok_or_else(|| Error::UnknownGroup {
                name: self.group.clone(),
            })?;
        Ok((user.uid, group.gid))
    }

    /// Change ownership of `path` to this user and group.
    #[cfg(unix)]
    pub fn apply(&self, path: &Path) -> Result<()> {
        let (uid, gid) = self.resolve()?;
        nix::unistd::chown(path, Some(uid), Some(gid)).map_err(|errno| Error::Ownership {
            path: path.to_path_buf(),
            source: std::io::Error::from(errno),
        })?;
        tracing::debug!(path = %path.display(), user = %self.user, group = %self.group, "Changed ownership");
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn apply(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "Ownership is not supported on this platform");
        Ok(())
    }
}

/// Mode and ownership to stamp onto a written file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
    /// Permission bits for the file (e.g. `0o600`)
    pub mode: Option<u32>,
    /// Permission bits for any parent directory that has to be created
    pub dir_mode: Option<u32>,
    /// Optional owner and group
    pub ownership: Option<Ownership>,
}

impl FileAttributes {
    /// Apply mode then ownership to `path`.
    pub fn apply(&self, path: &Path) -> Result<()> {
        if let Some(mode) = self.mode {
            set_mode(path, mode)?;
        }
        if let Some(ownership) = &self.ownership {
            ownership.apply(path)?;
        }
        Ok(())
    }
}

/// Give `replacement` the uid and gid of `existing`.
///
/// Does nothing when `existing` is absent or the ids already match. When
/// the caller may not hand the file over (unprivileged `EPERM`), the
/// replacement keeps the caller's ownership and a warning is logged.
#[cfg(unix)]
pub fn copy_ownership(existing: &Path, replacement: &Path) -> Result<()> {
    use nix::errno::Errno;
    use nix::unistd::{Gid, Uid};
    use std::os::unix::fs::MetadataExt;

    let wanted = match fs::metadata(existing) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(existing, e)),
    };
    let current = fs::metadata(replacement).map_err(|e| Error::io(replacement, e))?;
    if (current.uid(), current.gid()) == (wanted.uid(), wanted.gid()) {
        return Ok(());
    }

    match nix::unistd::chown(
        replacement,
        Some(Uid::from_raw(wanted.uid())),
        Some(Gid::from_raw(wanted.gid())),
    ) {
        Ok(()) => {
            tracing::debug!(
                path = %existing.display(),
                uid = wanted.uid(),
                gid = wanted.gid(),
                "Kept existing ownership"
            );
            Ok(())
        }
        Err(Errno::EPERM) => {
            tracing::warn!(
                path = %existing.display(),
                uid = wanted.uid(),
                gid = wanted.gid(),
                "Not permitted to keep existing ownership"
            );
            Ok(())
        }
        Err(errno) => Err(Error::Ownership {
            path: replacement.to_path_buf(),
            source: std::io::Error::from(errno),
        }),
    }
}

#[cfg(not(unix))]
pub fn copy_ownership(_existing: &Path, _replacement: &Path) -> Result<()> {
    Ok(())
}

/// Set the permission bits of `path`.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Create `dir` and any missing ancestors, giving new directories `mode`.
pub fn create_dir_all_with_mode(dir: &Path, mode: Option<u32>) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        if let Some(mode) = mode {
            builder.mode(mode);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(dir).map_err(|e| Error::io(dir, e))?;
    tracing::debug!(dir = %dir.display(), "Created directory");
    Ok(())
}
