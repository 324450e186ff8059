//! Error types for paystore
//!
//! Provides a unified error type for all store operations. Nothing in the
//! storage layer retries or recovers; every error reaches the caller as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for paystore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// Missing key, or a bucket that has never been written
    #[error("item not found")]
    NotFound,

    #[error("invalid id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("invalid bucket name {0:?}")]
    InvalidBucket(String),

    // -------------------------------------------------------------------------
    // Engine / Transaction Errors
    // -------------------------------------------------------------------------
    #[error("failed to open store at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("sequence exhausted for bucket {0:?}")]
    SequenceExhausted(String),

    #[error("store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    // -------------------------------------------------------------------------
    // Unsupported Operations
    // -------------------------------------------------------------------------
    #[error("not implemented yet: {0}")]
    Unsupported(&'static str),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for a missing key or a never-created bucket
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

// redb reports each phase with its own error type; they all fold into
// `redb::Error` so callers see a single storage failure class.
macro_rules! storage_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StoreError {
                fn from(e: $ty) -> Self {
                    StoreError::Storage(e.into())
                }
            }
        )*
    };
}

storage_error_from!(
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
    redb::CompactionError,
);
