//! Test client for a replicated local database.
//!
//! Opens a local store, bootstraps it from a migrations file, authenticates
//! to the replication service with a mock-issued credential, and exposes a
//! typed data-access façade over the `items` and `other_items` tables.
//!
//! # Architecture
//!
//! - **Dal**: one [`Table`] per record kind with `find_many`, `create_many`
//!   and `delete_many`; every write is schema-validated first
//! - **Notifier**: observer registration for auth-state, potential-change and
//!   confirmed-change events
//! - **Replicator**: the collaborator that authenticates and acknowledges
//!   writes; [`LoopbackReplicator`] keeps everything in-process
//! - **Helpers**: the key-based operations integration scenarios drive
//!
//! # Example
//!
//! ```no_run
//! use satellite_client::{get_items, insert_items, open_database, read_migrations};
//!
//! # async fn run() -> satellite_client::ClientResult<()> {
//! let migrations = read_migrations("migrations.json")?;
//! let db = open_database("client.db", "localhost", 5133, migrations).await?;
//! insert_items(&db, &["a", "b"]).await?;
//! assert_eq!(get_items(&db).await?.len(), 2);
//! # Ok(())
//! # }
//! ```

mod config;
mod dal;
mod database;
mod error;
mod helpers;
mod migrations;
mod notifier;
mod replication;

pub use config::{ElectricConfig, ReplicationConfig, DEFAULT_APP, DEFAULT_ENV};
pub use dal::Table;
pub use database::{open_database, open_database_with, Dal, ElectricClient, OpenOptions};
pub use error::{ClientError, ClientResult, ConfigError};
pub use helpers::{
    delete_items, delete_other_items, get_items, get_other_items, insert_items,
    insert_other_items, register_subscribers,
};
pub use migrations::read_migrations;
pub use notifier::{Notifier, SubscriptionKey};
pub use replication::{LoopbackReplicator, Replicator};

pub use satellite_auth::{AuthConfig, ConsoleClient, MockConsoleClient, TokenRequest, TokenResponse};
pub use satellite_model::{Filter, Item, OtherItem, Record};
pub use satellite_types::{
    AuthStateNotification, Change, ChangeKind, ClientId, DataChangeNotification,
    MigrationDescriptor, PotentialChangeNotification,
};
