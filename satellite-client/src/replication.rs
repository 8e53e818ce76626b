//! Replication collaborator.
//!
//! The data-access layer hands every committed local change to a
//! [`Replicator`] and only reports the change as confirmed once the
//! replicator acknowledges it. The wire protocol lives behind this trait.

use crate::config::ReplicationConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use satellite_auth::{verify_access_token, AuthConfig};
use satellite_types::{Change, ClientId};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// A connection to the replication service.
#[async_trait]
pub trait Replicator: Send + Sync {
    /// Authenticates with `token` and opens (or re-opens) the connection.
    async fn connect(
        &self,
        config: &ReplicationConfig,
        client_id: ClientId,
        token: &str,
    ) -> ClientResult<()>;

    /// Sends committed local changes and waits for the acknowledgement.
    async fn replicate(&self, changes: &[Change]) -> ClientResult<()>;

    /// Closes the connection.
    async fn disconnect(&self) -> ClientResult<()>;

    /// Returns whether the connection is open.
    fn is_connected(&self) -> bool;
}

#[derive(Debug, Default)]
struct LoopbackState {
    endpoint: Option<String>,
    client_id: Option<ClientId>,
    acknowledged: Vec<Change>,
}

/// A replicator that authenticates like the service but never leaves the
/// process: every change is acknowledged as soon as it is sent.
#[derive(Debug)]
pub struct LoopbackReplicator {
    auth: AuthConfig,
    state: Mutex<LoopbackState>,
}

impl Default for LoopbackReplicator {
    fn default() -> Self {
        Self::new(AuthConfig::default())
    }
}

impl LoopbackReplicator {
    /// Accepts tokens signed with `auth`.
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            auth,
            state: Mutex::new(LoopbackState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The endpoint of the current connection, if any.
    pub fn endpoint(&self) -> Option<String> {
        self.state().endpoint.clone()
    }

    /// The client authenticated on the current connection, if any.
    pub fn client_id(&self) -> Option<ClientId> {
        self.state().client_id
    }

    /// Changes acknowledged since the last [`take_acknowledged`], in order.
    ///
    /// [`take_acknowledged`]: LoopbackReplicator::take_acknowledged
    pub fn acknowledged(&self) -> Vec<Change> {
        self.state().acknowledged.clone()
    }

    /// Drains the acknowledgement log.
    pub fn take_acknowledged(&self) -> Vec<Change> {
        std::mem::take(&mut self.state().acknowledged)
    }
}

#[async_trait]
impl Replicator for LoopbackReplicator {
    async fn connect(
        &self,
        config: &ReplicationConfig,
        client_id: ClientId,
        token: &str,
    ) -> ClientResult<()> {
        let claims = verify_access_token(token, &self.auth)?;
        if !client_id.is_subject(&claims.user_id) {
            return Err(ClientError::Replication(format!(
                "credential issued to {} presented by client {}",
                claims.user_id, client_id
            )));
        }

        let mut state = self.state();
        state.endpoint = Some(config.address());
        state.client_id = Some(client_id);
        info!(
            "Client {} connected to {} (ssl={})",
            client_id,
            config.address(),
            config.ssl
        );
        Ok(())
    }

    async fn replicate(&self, changes: &[Change]) -> ClientResult<()> {
        let mut state = self.state();
        if state.endpoint.is_none() {
            return Err(ClientError::Replication("not connected".into()));
        }
        state.acknowledged.extend_from_slice(changes);
        debug!("Acknowledged {} changes", changes.len());
        Ok(())
    }

    async fn disconnect(&self) -> ClientResult<()> {
        let mut state = self.state();
        if let Some(endpoint) = state.endpoint.take() {
            info!("Disconnected from {}", endpoint);
        }
        state.client_id = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state().endpoint.is_some()
    }
}
