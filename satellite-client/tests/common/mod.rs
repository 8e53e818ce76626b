//! Shared test helpers for client tests.

#![allow(dead_code)]

use satellite_client::{
    open_database_with, ElectricClient, ElectricConfig, LoopbackReplicator, MigrationDescriptor,
    OpenOptions, ReplicationConfig,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// An open database in a temporary directory, with its replicator exposed.
pub struct TestDb {
    pub db: ElectricClient,
    pub replicator: Arc<LoopbackReplicator>,
    pub dir: TempDir,
}

impl TestDb {
    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("client.db")
    }
}

pub fn config(migrations: Vec<MigrationDescriptor>) -> ElectricConfig {
    ElectricConfig::new(migrations, ReplicationConfig::new("localhost", 5133))
}

/// Opens a fresh database with no migrations.
pub async fn open_test_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let replicator = Arc::new(LoopbackReplicator::default());
    let options = OpenOptions::new(dir.path().join("client.db"), config(Vec::new()))
        .with_replicator(replicator.clone());
    let db = open_database_with(options).await.unwrap();
    TestDb {
        db,
        replicator,
        dir,
    }
}

/// Collects event descriptions in arrival order.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}
