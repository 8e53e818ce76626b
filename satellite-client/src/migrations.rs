//! Loading the migrations file.

use crate::error::{ClientResult, ConfigError};
use satellite_types::MigrationDescriptor;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Reads `path` and returns its `migrations` array, entries unchanged.
///
/// # Errors
///
/// Any failure is a [`ConfigError`]: the database cannot be bootstrapped
/// without its migrations.
pub fn read_migrations(path: impl AsRef<Path>) -> ClientResult<Vec<MigrationDescriptor>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ConfigError::ReadMigrations {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Value =
        serde_json::from_slice(&data).map_err(|source| ConfigError::ParseMigrations {
            path: path.to_path_buf(),
            source,
        })?;

    let migrations = match document.get_mut("migrations").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => {
            return Err(ConfigError::MissingMigrations {
                path: path.to_path_buf(),
            }
            .into());
        }
    };

    debug!("Read {} migrations from {}", migrations.len(), path.display());
    Ok(migrations.into_iter().map(MigrationDescriptor::new).collect())
}
