//! Idempotent state reconciliation for hoststate
//!
//! Two reconcilers share one contract: inspect the current state on disk,
//! decide whether a mutation is needed, apply it unless running dry, and
//! report what changed.
//!
//! - [`ConfigStore`] merges a key/value change set into a JSON document
//! - [`FileRelocator`] moves a file into place, optionally comparing content
//!
//! # Architecture
//!
//! ```text
//!        hoststate-cli
//!              |
//!       hoststate-core
//!              |
//!        hoststate-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use hoststate_core::{ConfigRequest, ConfigStore};
//! use serde_json::json;
//!
//! let content = json!({"backup_cron_hour": "4"}).as_object().cloned().unwrap_or_default();
//! let request = ConfigRequest::new("/etc/ansible_local.json", content);
//! let report = ConfigStore::new().reconcile(&request, false)?;
//! println!("{}: {}", report.changed, report.msg);
//! # Ok::<(), hoststate_core::Error>(())
//! ```

pub mod config_store;
pub mod error;
pub mod relocator;
pub mod report;
pub mod request;

pub use config_store::{ConfigStore, merge};
pub use error::{Error, ErrorKind, Result};
pub use relocator::FileRelocator;
pub use report::{ConfigReport, DiffRecord, MoveAction, MoveReport};
pub use request::{ConfigRequest, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, MoveRequest, parse_mode};

/// A reconciler turns a desired-state request into a report, mutating the
/// filesystem only when needed and never when `dry_run` is set.
pub trait Reconciler {
    type Request;
    type Report;

    fn reconcile(&self, request: &Self::Request, dry_run: bool) -> Result<Self::Report>;
}
