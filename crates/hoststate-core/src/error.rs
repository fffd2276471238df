//! Error types for hoststate-core

/// Result type for hoststate-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input is missing or malformed
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Filesystem error from hoststate-fs
    #[error(transparent)]
    Fs(#[from] hoststate_fs::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An existing document is not a valid JSON object
    Parse,
    /// A filesystem operation failed
    Io,
    /// Input was rejected before touching the filesystem
    InvalidArgument,
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Fs(e) if e.is_parse() => ErrorKind::Parse,
            Self::Fs(_) => ErrorKind::Io,
        }
    }
}
