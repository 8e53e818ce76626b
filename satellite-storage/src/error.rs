//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A filter or row names a column the table does not have.
    #[error("unknown column `{column}` in table `{table}`")]
    UnknownColumn { table: String, column: String },

    /// A value cannot be stored in a column.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A migration could not be applied.
    #[error("migration error: {0}")]
    Migration(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("connection lock poisoned")]
    LockPoisoned,
}
