//! Flat JSON object documents on disk

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::io::{self, RobustnessConfig};
use crate::perms::FileAttributes;
use crate::{Error, Result};

/// A single-level JSON object, the on-disk shape of a configuration document.
pub type JsonObject = Map<String, Value>;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and parse a JSON object from `path`.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::Parse`] if the content is not valid JSON
/// - [`Error::NotAnObject`] if the top-level value is not an object
pub fn read_json_object(path: &Path) -> Result<JsonObject> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::NotAnObject {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
    }
}

/// Serialize `object` and write it atomically to `path`.
///
/// Output is pretty-printed with a trailing newline.
pub fn write_json_object(
    path: &Path,
    object: &JsonObject,
    attrs: &FileAttributes,
    config: RobustnessConfig,
) -> Result<()> {
    let mut content = serde_json::to_string_pretty(object).map_err(|e| Error::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    content.push('\n');

    io::write_atomic(path, content.as_bytes(), attrs, config)?;
    tracing::info!(path = %path.display(), keys = object.len(), "Wrote configuration");
    Ok(())
}
