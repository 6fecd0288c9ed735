//! Error types for recon-client

/// Result type for recon-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing a client.
///
/// Failures of individual calls are reported as
/// [`RemoteError`](recon_core::RemoteError).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid base URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
