//! Error types for nullifier storage.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by nullifier storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Errors coming from the blob store.
    #[error("blob store error: {0}")]
    BlobStore(String),

    /// File system failures.
    #[error("io error ({context}): {message}")]
    Io {
        /// Operation that failed.
        context: String,
        /// Underlying error message.
        message: String,
    },

    /// Serialization/deserialization failures.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unsupported record version.
    #[error("unsupported record version: {0}")]
    UnsupportedRecordVersion(u32),

    /// A stored record does not belong to the key it was read from.
    #[error("corrupted record: {0}")]
    CorruptedRecord(String),

    /// A switch was marked on a nullifier that has never been bound.
    #[error("nullifier not bound: {0}")]
    NullifierNotBound(String),

    /// Incrementing the burn count would overflow.
    #[error("burn count overflow")]
    BurnCountOverflow,
}

impl StorageError {
    pub(crate) fn io(context: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }
}
