//! Migration descriptors.
//!
//! The client never interprets a migration: it reads the list from the
//! migrations file and hands each entry, unchanged, to the store that
//! bootstraps the database.

use serde::{Deserialize, Serialize};

/// One entry of the `migrations` array, kept as the raw JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationDescriptor(serde_json::Value);

impl MigrationDescriptor {
    /// Wraps a raw JSON value.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the raw JSON value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the descriptor, returning the raw JSON value.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for MigrationDescriptor {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
