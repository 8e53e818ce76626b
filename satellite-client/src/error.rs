//! Error types for the client.

use satellite_auth::AuthError;
use satellite_model::ValidationError;
use satellite_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Setup cannot proceed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read migrations file {}: {source}", path.display())]
    ReadMigrations {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse migrations file {}: {source}", path.display())]
    ParseMigrations {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("migrations file {} has no `migrations` array", path.display())]
    MissingMigrations { path: PathBuf },

    #[error("table `{0}` is not declared in the schema registry")]
    UnknownTable(String),
}

/// Errors surfaced by the client. Causes are kept intact; nothing is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad migrations file or schema wiring. Fatal.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Credential issuance or verification failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A write or filter violated the table schema. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store reported a fault.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The replicator refused or failed a request.
    #[error("replication error: {0}")]
    Replication(String),

    /// A record could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A blocking store task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
