//! Error types for recon-core

use crate::record_type::RecordType;
use crate::remote::RemoteError;

/// Result type for recon-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recon-core operations
///
/// Comparison and diffing never fail; these cover lookups, parsing of
/// user-supplied names, and the single upfront destination listing of a sync.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record with the identifier exists on either side
    #[error("Item with identifier '{identifier}' not found in either collection")]
    RecordNotFound { identifier: String },

    #[error("Invalid record type: {value} (expected 'blocks' or 'pages')")]
    InvalidRecordType { value: String },

    #[error("Invalid sync action: {value} (expected 'create' or 'update')")]
    InvalidAction { value: String },

    #[error("Invalid comparison outcome: {value}")]
    InvalidOutcome { value: String },

    /// A JSON value that is not an object was offered as a record
    #[error("Expected a JSON object for a record, got {found}")]
    InvalidRecord { found: String },

    /// The destination collection could not be fetched before a sync
    #[error("Failed to list {record_type} from destination: {source}")]
    DestinationListing {
        record_type: RecordType,
        #[source]
        source: RemoteError,
    },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
