//! Replica identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a local database replica as seen by the replication service.
///
/// Generated once per database file and persisted by the store, so the same
/// file always authenticates as the same client. Its string form is the
/// subject (`user_id`) of the access tokens issued to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// A fresh random (v4) id for a database opened for the first time.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a persisted id.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Returns true if a token subject names this client, in any UUID
    /// spelling (hyphenated, simple, upper case).
    #[must_use]
    pub fn is_subject(&self, subject: &str) -> bool {
        Uuid::parse_str(subject).is_ok_and(|uuid| uuid == self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}
