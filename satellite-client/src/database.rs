//! Opening a database handle.
//!
//! Opening runs the whole bootstrap in order: open the store, apply the
//! migrations, create the registry tables, load the client id, obtain a
//! credential from the console client, and connect the replicator. Any
//! failure aborts the open.

use crate::config::{ElectricConfig, ReplicationConfig};
use crate::dal::{DalContext, Table};
use crate::error::ClientResult;
use crate::notifier::Notifier;
use crate::replication::{LoopbackReplicator, Replicator};
use satellite_auth::{AuthConfig, ConsoleClient, MockConsoleClient, TokenRequest};
use satellite_model::{db_schema, Item, OtherItem};
use satellite_storage::{RecordStore, StorageResult};
use satellite_types::{AuthStateNotification, ClientId, MigrationDescriptor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// The typed tables of a handle.
pub struct Dal {
    pub items: Table<Item>,
    pub other_items: Table<OtherItem>,
}

/// How to open a database handle.
pub struct OpenOptions {
    pub path: PathBuf,
    pub config: ElectricConfig,
    pub console: Arc<dyn ConsoleClient>,
    pub replicator: Arc<dyn Replicator>,
}

impl OpenOptions {
    /// Mock console client and loopback replicator, both using the default
    /// [`AuthConfig`].
    pub fn new(path: impl Into<PathBuf>, config: ElectricConfig) -> Self {
        Self {
            path: path.into(),
            config,
            console: Arc::new(MockConsoleClient::default()),
            replicator: Arc::new(LoopbackReplicator::default()),
        }
    }

    /// Signs and verifies credentials with `auth` instead of the defaults.
    #[must_use]
    pub fn with_auth_config(mut self, auth: AuthConfig) -> Self {
        self.console = Arc::new(MockConsoleClient::new(auth.clone()));
        self.replicator = Arc::new(LoopbackReplicator::new(auth));
        self
    }

    #[must_use]
    pub fn with_console(mut self, console: Arc<dyn ConsoleClient>) -> Self {
        self.console = console;
        self
    }

    #[must_use]
    pub fn with_replicator(mut self, replicator: Arc<dyn Replicator>) -> Self {
        self.replicator = replicator;
        self
    }
}

/// An open, replicated database.
pub struct ElectricClient {
    pub dal: Dal,
    pub notifier: Arc<Notifier>,
    ctx: Arc<DalContext>,
    config: ElectricConfig,
    console: Arc<dyn ConsoleClient>,
    client_id: ClientId,
}

/// Opens the database at `name`, replicating to `host:port` without TLS.
///
/// Uses the mock console client and the loopback replicator with the
/// default signing configuration.
pub async fn open_database(
    name: &str,
    host: &str,
    port: u16,
    migrations: Vec<MigrationDescriptor>,
) -> ClientResult<ElectricClient> {
    let config = ElectricConfig::new(migrations, ReplicationConfig::new(host, port));
    open_database_with(OpenOptions::new(name, config)).await
}

/// Opens a database with explicit collaborators.
pub async fn open_database_with(options: OpenOptions) -> ClientResult<ElectricClient> {
    let OpenOptions {
        path,
        config,
        console,
        replicator,
    } = options;
    info!("config: {}", serde_json::to_string(&config)?);

    let db_name = path.display().to_string();
    let migrations = config.migrations.clone();
    let (store, client_id) =
        tokio::task::spawn_blocking(move || -> StorageResult<(RecordStore, ClientId)> {
            let store = RecordStore::open(&path)?;
            store.apply_migrations(&migrations)?;
            store.bootstrap(db_schema())?;
            let client_id = store.client_id()?;
            Ok((store, client_id))
        })
        .await??;

    let notifier = Arc::new(Notifier::new());
    let ctx = Arc::new(DalContext {
        db_name,
        store,
        notifier: Arc::clone(&notifier),
        replicator,
    });
    let dal = Dal {
        items: Table::new(Arc::clone(&ctx))?,
        other_items: Table::new(Arc::clone(&ctx))?,
    };

    let client = ElectricClient {
        dal,
        notifier,
        ctx,
        config,
        console,
        client_id,
    };
    client.authenticate().await?;
    Ok(client)
}

impl ElectricClient {
    /// The id this replica authenticates as.
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// The name (path) the database was opened with.
    pub fn db_name(&self) -> &str {
        &self.ctx.db_name
    }

    pub fn config(&self) -> &ElectricConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.ctx.replicator.is_connected()
    }

    /// Obtains a fresh credential and reconnects the replicator.
    pub async fn reauthenticate(&self) -> ClientResult<()> {
        self.authenticate().await
    }

    /// Disconnects the replicator. Local data stays readable.
    pub async fn close(&self) -> ClientResult<()> {
        self.ctx.replicator.disconnect().await?;
        self.notifier.auth_state_changed(&AuthStateNotification {
            client_id: self.client_id,
            connected: false,
        });
        Ok(())
    }

    async fn authenticate(&self) -> ClientResult<()> {
        let request = TokenRequest {
            app: self.config.app.clone(),
            env: self.config.env.clone(),
            client_id: self.client_id.to_string(),
        };
        let response = self.console.token(&request).await?;
        self.ctx
            .replicator
            .connect(&self.config.replication, self.client_id, &response.token)
            .await?;

        self.notifier.auth_state_changed(&AuthStateNotification {
            client_id: self.client_id,
            connected: true,
        });
        Ok(())
    }
}
