//! Error types for recon-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from the reconciliation engine
    #[error(transparent)]
    Core(#[from] recon_core::Error),

    /// Error from local persistence
    #[error(transparent)]
    Store(#[from] recon_store::Error),

    /// Error building an API client
    #[error(transparent)]
    Client(#[from] recon_client::Error),

    /// Error talking to an instance
    #[error("Remote request failed: {0}")]
    Remote(#[from] recon_core::RemoteError),

    #[error("JSON error: {0}")]
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
}
