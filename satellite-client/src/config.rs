//! Configuration handed to the replication engine.

use satellite_types::MigrationDescriptor;
use serde::{Deserialize, Serialize};

/// App name reported in token requests.
pub const DEFAULT_APP: &str = "satellite_client";

/// Environment name reported in token requests.
pub const DEFAULT_ENV: &str = "default";

/// Where the replication service listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationConfig {
    pub host: String,
    pub port: u16,
    /// Always false for the integration-test service.
    pub ssl: bool,
}

impl ReplicationConfig {
    /// An unencrypted endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ssl: false,
        }
    }

    /// `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything the database handle needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricConfig {
    pub app: String,
    pub env: String,
    pub migrations: Vec<MigrationDescriptor>,
    pub replication: ReplicationConfig,
    pub debug: bool,
}

impl ElectricConfig {
    pub fn new(migrations: Vec<MigrationDescriptor>, replication: ReplicationConfig) -> Self {
        Self {
            app: DEFAULT_APP.to_string(),
            env: DEFAULT_ENV.to_string(),
            migrations,
            replication,
            debug: true,
        }
    }
}
