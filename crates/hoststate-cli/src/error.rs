//! Error types for hoststate-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from hoststate-core
    #[error(transparent)]
    Core(#[from] hoststate_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Create an invalid-argument error routed through the core taxonomy
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::Core(hoststate_core::Error::invalid_argument(message))
    }

    /// Short classification used in machine-readable failures
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Core(e) => match e.kind() {
                hoststate_core::ErrorKind::Parse => "parse",
                hoststate_core::ErrorKind::Io => "io",
                hoststate_core::ErrorKind::InvalidArgument => "invalid_argument",
            },
            Self::Io(_) => "io",
            Self::Json(_) | Self::User { .. } => "invalid_argument",
        }
    }
}
