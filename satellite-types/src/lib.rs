//! Shared type definitions for the satellite test client.
//!
//! This crate holds the small plain-data types that every other crate
//! in the workspace passes around:
//! - The client identifier a replica authenticates with
//! - Migration descriptors, carried verbatim from the migrations file
//! - Change-notification payloads emitted by a database handle

mod client_id;
mod migration;
mod notification;

pub use client_id::ClientId;
pub use migration::MigrationDescriptor;
pub use notification::{
    AuthStateNotification, Change, ChangeKind, DataChangeNotification,
    PotentialChangeNotification,
};
