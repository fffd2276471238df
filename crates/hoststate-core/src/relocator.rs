//! Idempotent file relocation
//!
//! Decides from the existence (and, when validating, the content) of the
//! source and destination whether a file still has to be moved.

use std::fs;
use std::path::Path;

use hoststate_fs::{atomic_replace, hash_file, remove_file};

use crate::report::{MoveAction, MoveReport};
use crate::request::MoveRequest;
use crate::{Reconciler, Result};

/// Reconciles [`MoveRequest`]s.
#[derive(Debug, Default)]
pub struct FileRelocator;

/// True when both paths resolve to the same file on disk.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl FileRelocator {
    pub fn new() -> Self {
        Self
    }

    /// Inspect the filesystem and decide what to do, without mutating it.
    pub fn plan(&self, request: &MoveRequest) -> Result<MoveAction> {
        let src_exists = request.src.exists();
        let dest_exists = request.dest.exists();

        let action = match (src_exists, dest_exists, request.validate) {
            (false, _, _) => MoveAction::Noop,
            (true, false, _) => MoveAction::Move,
            (true, true, false) => MoveAction::Noop,
            (true, true, true) if same_file(&request.src, &request.dest) => MoveAction::Noop,
            (true, true, true) => {
                let src_sum = hash_file(&request.src)?;
                let dest_sum = hash_file(&request.dest)?;
                tracing::debug!(%src_sum, %dest_sum, "Compared checksums");
                if src_sum == dest_sum {
                    MoveAction::RemoveSource
                } else {
                    MoveAction::Replace
                }
            }
        };

        tracing::debug!(
            src = %request.src.display(),
            dest = %request.dest.display(),
            src_exists,
            dest_exists,
            validate = request.validate,
            ?action,
            "Planned relocation"
        );
        Ok(action)
    }

    /// Carry out a previously planned action.
    pub fn apply(&self, request: &MoveRequest, action: MoveAction) -> Result<()> {
        match action {
            MoveAction::Move | MoveAction::Replace => {
                atomic_replace(&request.src, &request.dest)?;
                tracing::info!(
                    src = %request.src.display(),
                    dest = %request.dest.display(),
                    "Moved file"
                );
            }
            MoveAction::RemoveSource => {
                remove_file(&request.src)?;
                tracing::info!(src = %request.src.display(), "Removed duplicate source");
            }
            MoveAction::Noop => {}
        }
        Ok(())
    }

    /// Plan and, unless `dry_run`, apply.
    pub fn reconcile(&self, request: &MoveRequest, dry_run: bool) -> Result<MoveReport> {
        request.validate()?;
        let action = self.plan(request)?;

        if dry_run {
            tracing::info!(?action, "Dry run, not touching files");
        } else {
            self.apply(request, action)?;
        }

        Ok(MoveReport::from_action(action))
    }
}

impl Reconciler for FileRelocator {
    type Request = MoveRequest;
    type Report = MoveReport;

    fn reconcile(&self, request: &MoveRequest, dry_run: bool) -> Result<MoveReport> {
        FileRelocator::reconcile(self, request, dry_run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_with_validate_never_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only.txt");
        fs::write(&path, "data").unwrap();

        let request = MoveRequest::new(&path, &path).with_validate(true);
        let report = FileRelocator::new().reconcile(&request, false).unwrap();

        assert!(!report.changed);
        assert_eq!(report.action, MoveAction::Noop);
        assert_eq!(fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn plan_does_not_mutate() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::write(&src, "x").unwrap();

        let action = FileRelocator::new().plan(&MoveRequest::new(&src, &dest)).unwrap();

        assert_eq!(action, MoveAction::Move);
        assert!(src.exists());
        assert!(!dest.exists());
    }
}
