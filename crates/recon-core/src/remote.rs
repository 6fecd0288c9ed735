//! Remote content collaborator contract
//!
//! The executor only talks to a destination through [`RemoteContent`]. The
//! HTTP implementation lives in `recon-client`; tests use in-memory fakes.

use async_trait::async_trait;

use crate::record::Record;
use crate::record_type::RecordType;

/// Result type for remote calls
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Failure reported by a remote content client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Http { status, .. } => *status >= 500,
            RemoteError::Transport(_) => true,
            RemoteError::InvalidResponse(_) => false,
        }
    }
}

/// Live access to one instance's content records
#[async_trait]
pub trait RemoteContent: Send + Sync {
    /// Fetch the full collection of a record type
    async fn list(&self, record_type: RecordType) -> RemoteResult<Vec<Record>>;

    /// Create a record, returning the stored version
    async fn create(&self, record_type: RecordType, record: &Record) -> RemoteResult<Record>;

    /// Replace the record with primary key `id`, returning the stored version
    async fn update(&self, record_type: RecordType, id: &str, record: &Record)
    -> RemoteResult<Record>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RemoteError::Http { status: 503, message: String::new() }, true)]
    #[case(RemoteError::Http { status: 500, message: String::new() }, true)]
    #[case(RemoteError::Http { status: 404, message: String::new() }, false)]
    #[case(RemoteError::Transport("reset".into()), true)]
    #[case(RemoteError::InvalidResponse("eof".into()), false)]
    fn test_transient_classification(#[case] error: RemoteError, #[case] transient: bool) {
        assert_eq!(error.is_transient(), transient);
    }

    #[test]
    fn test_http_error_message_carries_status_and_body() {
        let error = RemoteError::Http {
            status: 400,
            message: "URL key for specified store already exists".into(),
        };
        assert_eq!(
            error.to_string(),
            "HTTP 400: URL key for specified store already exists"
        );
    }
}
