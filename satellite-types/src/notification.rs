//! Change-notification payloads.
//!
//! A database handle emits three kinds of notifications:
//! - auth-state changes, whenever the replication connection is
//!   (re)authenticated or dropped
//! - potential data changes, as soon as a local write commits
//! - confirmed data changes, once the replicator acknowledges the write
//!
//! The payloads are plain data so observers can log or serialize them.

use crate::ClientId;
use serde::{Deserialize, Serialize};

/// The replication connection's authentication state changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStateNotification {
    pub client_id: ClientId,
    /// True once the replicator accepted the credential.
    pub connected: bool,
}

/// Local tables were written; the change is not yet acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialChangeNotification {
    pub db_name: String,
    pub tables: Vec<String>,
}

/// The replicator acknowledged one or more changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChangeNotification {
    pub db_name: String,
    pub changes: Vec<Change>,
}

/// A single acknowledged change to one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub table: String,
    pub kind: ChangeKind,
    pub record_ids: Vec<String>,
}

/// What happened to the records of a [`Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Delete,
}

impl Change {
    /// Builds an insert change for the given table.
    pub fn insert(table: impl Into<String>, record_ids: Vec<String>) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Insert,
            record_ids,
        }
    }

    /// Builds a delete change for the given table.
    pub fn delete(table: impl Into<String>, record_ids: Vec<String>) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Delete,
            record_ids,
        }
    }

    /// Returns true if the change touches no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_ids.is_empty()
    }
}
