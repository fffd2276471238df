//! Host configuration document reconciliation
//!
//! Merges a caller's change set into a flat JSON document. Existing values
//! win unless the caller asks for an override; new keys are always added.
//!
//! `changed` tracks the override decision, not the bytes on disk: a merge
//! without override reports `changed = false` even when it wrote new keys.

use hoststate_fs::{FileAttributes, JsonObject, Ownership, RobustnessConfig};
use hoststate_fs::{read_json_object, write_json_object};

use crate::report::{ConfigReport, DiffRecord};
use crate::request::ConfigRequest;
use crate::{Reconciler, Result};

pub const MSG_CREATED: &str = "Configuration created";
pub const MSG_READ: &str = "Configuration read";
pub const MSG_UPDATED: &str = "Configuration updated";

/// Merge `desired` into `before`.
///
/// Keys only in `desired` are added. For keys in both, the existing value
/// is kept unless `override_existing` is set.
pub fn merge(before: &JsonObject, desired: &JsonObject, override_existing: bool) -> JsonObject {
    let mut merged = before.clone();
    for (key, value) in desired {
        if override_existing || !before.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Reconciles [`ConfigRequest`]s against JSON documents on disk.
#[derive(Debug, Default)]
pub struct ConfigStore {
    robustness: RobustnessConfig,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_robustness(robustness: RobustnessConfig) -> Self {
        Self { robustness }
    }

    fn attributes(request: &ConfigRequest) -> FileAttributes {
        let ownership = Ownership::from_parts(request.owner.as_deref(), request.group.as_deref());
        if ownership.is_none() && (request.owner.is_some() || request.group.is_some()) {
            tracing::warn!(
                file = %request.file.display(),
                "Owner and group must both be given; skipping ownership change"
            );
        }

        FileAttributes {
            mode: Some(request.mode),
            dir_mode: Some(request.dir_mode),
            ownership,
        }
    }

    /// Bring the document at `request.file` in line with the request.
    ///
    /// With `dry_run` the report is computed exactly as for a real run but
    /// nothing is written.
    pub fn reconcile(&self, request: &ConfigRequest, dry_run: bool) -> Result<ConfigReport> {
        request.validate()?;
        let path = &request.file;

        let existed = path.exists();
        let (before, changed, msg) = if existed {
            let before = read_json_object(path)?;
            let (changed, msg) = if request.override_existing {
                (true, MSG_UPDATED)
            } else {
                (false, MSG_READ)
            };
            (before, changed, msg)
        } else {
            (JsonObject::new(), true, MSG_CREATED)
        };

        let after = merge(&before, &request.content, request.override_existing);
        tracing::debug!(
            file = %path.display(),
            existing = before.len(),
            desired = request.content.len(),
            merged = after.len(),
            changed,
            "Planned configuration"
        );

        let written = !dry_run;
        if written {
            write_json_object(path, &after, &Self::attributes(request), self.robustness)?;
        } else {
            tracing::info!(file = %path.display(), "Dry run, not writing configuration");
        }

        Ok(ConfigReport {
            changed,
            msg: msg.to_string(),
            value: after.clone(),
            proposed: request.content.clone(),
            diff: DiffRecord {
                before,
                after,
                existed,
            },
            written,
        })
    }
}

impl Reconciler for ConfigStore {
    type Request = ConfigRequest;
    type Report = ConfigReport;

    fn reconcile(&self, request: &ConfigRequest, dry_run: bool) -> Result<ConfigReport> {
        ConfigStore::reconcile(self, request, dry_run)
    }
}
