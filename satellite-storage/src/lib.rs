//! SQLite record store for the satellite test client.
//!
//! Plays the storage side of the replicated database: it holds the local
//! copy of every table the replication engine syncs.
//!
//! # Architecture
//!
//! - Record tables are created from the schema registry on bootstrap, one
//!   typed column per declared field
//! - Migrations are recorded in a ledger and applied at most once
//! - The client id that identifies this replica is generated on first open
//!   and persisted alongside the data
//!
//! Every method is blocking; async callers run them on a blocking thread.

mod error;
mod record_store;

pub use error::{StorageError, StorageResult};
pub use record_store::{RecordStore, Row};
