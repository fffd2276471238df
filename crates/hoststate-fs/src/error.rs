//! Error types for hoststate-fs

use std::path::PathBuf;

/// Result type for hoststate-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hoststate-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not move file {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not rename temporary file {from} onto {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not remove src file {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON config at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Config at {path} must contain a JSON object, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Failed to serialize JSON config for {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    #[error("Unknown user: {name}")]
    UnknownUser { name: String },

    #[error("Unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("Could not change ownership of {path}: {source}")]
    Ownership {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from reading a malformed document rather
    /// than from the filesystem itself.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::NotAnObject { .. })
    }
}
