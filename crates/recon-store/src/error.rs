//! Error types for recon-store

use std::path::PathBuf;

/// Result type for recon-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recon-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} file at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} file at {path}: {message}")]
    Serialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Instance not found: {id}")]
    InstanceNotFound { id: String },

    #[error("Instance already exists: {id}")]
    InstanceExists { id: String },

    #[error("Invalid instance id '{id}': {reason}")]
    InvalidInstanceId { id: String, reason: String },

    #[error("Invalid instance URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
