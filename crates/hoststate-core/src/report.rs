//! Reconciliation results

use hoststate_fs::JsonObject;
use serde::Serialize;
use serde_json::{Value, json};
use similar::TextDiff;

/// Before/after snapshot of a configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DiffRecord {
    /// Document as found on disk (empty when it did not exist)
    pub before: JsonObject,
    /// Document as written, or as it would be written in dry-run
    pub after: JsonObject,
    /// Whether a document was on disk before reconciling
    #[serde(skip)]
    pub existed: bool,
}

fn render(object: &JsonObject) -> String {
    serde_json::to_string_pretty(object)
        .map(|s| s + "\n")
        .unwrap_or_default()
}

impl DiffRecord {
    /// Whether reconciling creates the document or alters its content.
    pub fn has_changes(&self) -> bool {
        !self.existed || self.before != self.after
    }

    /// Render a unified diff of the pretty-printed documents.
    ///
    /// An absent document renders as no lines at all; an existing empty one
    /// renders as `{}`.
    pub fn unified(&self, label: &str) -> String {
        let old = if self.existed {
            render(&self.before)
        } else {
            String::new()
        };
        let new = render(&self.after);

        let old_header = format!("{label} (before)");
        let new_header = format!("{label} (after)");
        TextDiff::from_lines(&old, &new)
            .unified_diff()
            .context_radius(3)
            .header(&old_header, &new_header)
            .to_string()
    }
}

/// Outcome of a configuration document reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigReport {
    pub changed: bool,
    pub msg: String,
    /// Final mapping (after merge)
    pub value: JsonObject,
    /// The caller's change set exactly as supplied
    pub proposed: JsonObject,
    pub diff: DiffRecord,
    /// Whether the document was actually written
    #[serde(skip)]
    pub written: bool,
}

impl ConfigReport {
    /// Result object for the invocation boundary.
    ///
    /// `diff` is included only when the caller asked for it.
    pub fn to_output(&self, include_diff: bool) -> Value {
        let mut output = json!({
            "changed": self.changed,
            "msg": self.msg,
            "value": self.value,
            "proposed": self.proposed,
        });
        if include_diff {
            output["diff"] = json!(self.diff);
        }
        output
    }
}

/// What the relocator decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    /// Destination absent: rename source onto it
    Move,
    /// Destination differs: rename source over it
    Replace,
    /// Destination already identical: delete the duplicate source
    RemoveSource,
    /// Nothing to do
    Noop,
}

impl MoveAction {
    pub fn is_change(self) -> bool {
        matches!(self, Self::Move | Self::Replace)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Move => "Destination file doesnt exists, moving src to dest",
            Self::Replace => "File exists, but is different, moving src to dest",
            Self::RemoveSource => "File exists and src and dest are the same, removing source",
            Self::Noop => "File already moved",
        }
    }
}

/// Outcome of a file relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub changed: bool,
    pub msg: String,
    #[serde(skip)]
    pub action: MoveAction,
}

impl MoveReport {
    pub fn from_action(action: MoveAction) -> Self {
        Self {
            changed: action.is_change(),
            msg: action.message().to_string(),
            action,
        }
    }

    pub fn to_output(&self) -> Value {
        json!({
            "changed": self.changed,
            "msg": self.msg,
        })
    }
}
