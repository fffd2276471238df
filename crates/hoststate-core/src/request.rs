//! Caller-supplied desired state for each reconciler
//!
//! Requests deserialize from the module argument object used by the
//! `invoke` protocol, and can also be built directly.

use std::path::{Path, PathBuf};

use hoststate_fs::JsonObject;
use serde::{Deserialize, Deserializer};

use crate::{Error, Result};

/// Default permission bits for a configuration file
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Default permission bits for directories created to hold it
pub const DEFAULT_DIR_MODE: u32 = 0o700;

/// Parse a permission mode written in octal.
///
/// Accepts `"0600"`, `"600"` and `"0o600"`.
pub fn parse_mode(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0o")
        .or_else(|| trimmed.strip_prefix("0O"))
        .unwrap_or(trimmed);

    let mode = u32::from_str_radix(digits, 8)
        .map_err(|_| Error::invalid_argument(format!("mode '{input}' is not an octal number")))?;
    check_mode(mode)
}

fn check_mode(mode: u32) -> Result<u32> {
    if mode > 0o7777 {
        return Err(Error::invalid_argument(format!(
            "mode {mode:#o} is out of range"
        )));
    }
    Ok(mode)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMode {
    Int(u32),
    Text(String),
}

fn deserialize_mode<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    // Integers arrive already decoded (YAML `0600` becomes 384)
    let mode = match RawMode::deserialize(deserializer)? {
        RawMode::Int(mode) => check_mode(mode),
        RawMode::Text(text) => parse_mode(&text),
    };
    mode.map_err(serde::de::Error::custom)
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

fn require_absolute(name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_argument(format!("{name} must not be empty")));
    }
    if !path.is_absolute() {
        return Err(Error::invalid_argument(format!(
            "{name} must be an absolute path, got '{}'",
            path.display()
        )));
    }
    Ok(())
}

/// Desired state of a host configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRequest {
    /// Location of the JSON document
    pub file: PathBuf,
    /// Keys and values the caller wants present
    pub content: JsonObject,
    /// Replace values of keys that already exist
    #[serde(default, rename = "override")]
    pub override_existing: bool,
    pub owner: Option<String>,
    pub group: Option<String>,
    #[serde(default = "default_file_mode", deserialize_with = "deserialize_mode")]
    pub mode: u32,
    #[serde(default = "default_dir_mode", deserialize_with = "deserialize_mode")]
    pub dir_mode: u32,
}

impl ConfigRequest {
    /// A request with default modes, no override and no ownership.
    pub fn new(file: impl Into<PathBuf>, content: JsonObject) -> Self {
        Self {
            file: file.into(),
            content,
            override_existing: false,
            owner: None,
            group: None,
            mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_absolute("file", &self.file)
    }
}

/// Desired location of a file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveRequest {
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Compare content when both paths exist
    #[serde(default)]
    pub validate: bool,
}

impl MoveRequest {
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            validate: false,
        }
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_absolute("src", &self.src)?;
        require_absolute("dest", &self.dest)
    }
}
