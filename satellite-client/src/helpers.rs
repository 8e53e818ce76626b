//! Convenience operations used by integration scenarios.
//!
//! Inserts generate a fresh random id per key and store the key as the
//! record's `content`. Deletes remove records by `content`, one key at a
//! time.

use crate::database::ElectricClient;
use crate::dal::Table;
use crate::error::ClientResult;
use crate::notifier::SubscriptionKey;
use satellite_model::{Filter, Item, OtherItem, Record};
use tracing::{info, warn};

/// Logs every auth-state, potential-change and data-change event of `db`.
///
/// Returns the three subscription keys in that order.
pub fn register_subscribers(db: &ElectricClient) -> [SubscriptionKey; 3] {
    let notifier = &db.notifier;
    let auth = notifier.subscribe_to_auth_state_changes(|event| {
        info!("auth state changes: {:?}", event);
    });
    let potential = notifier.subscribe_to_potential_data_changes(|event| {
        info!("potential data change: {:?}", event);
    });
    let data = notifier.subscribe_to_data_changes(|event| match serde_json::to_string(event) {
        Ok(json) => info!("data changes: {}", json),
        Err(e) => warn!("data changes (unserializable: {}): {:?}", e, event),
    });
    [auth, potential, data]
}

pub async fn get_items(db: &ElectricClient) -> ClientResult<Vec<Item>> {
    db.dal.items.find_many(Filter::all()).await
}

/// Creates one item per key in a single batch.
pub async fn insert_items<S: AsRef<str>>(db: &ElectricClient, keys: &[S]) -> ClientResult<usize> {
    let items: Vec<Item> = keys.iter().map(|k| Item::new(k.as_ref())).collect();
    db.dal.items.create_many(&items).await
}

/// Deletes items by content, in key order. Stops at the first failure;
/// earlier deletions stay applied.
pub async fn delete_items<S: AsRef<str>>(db: &ElectricClient, keys: &[S]) -> ClientResult<usize> {
    delete_by_content(&db.dal.items, keys).await
}

pub async fn get_other_items(db: &ElectricClient) -> ClientResult<Vec<OtherItem>> {
    db.dal.other_items.find_many(Filter::all()).await
}

/// Creates one other item per key in a single batch.
pub async fn insert_other_items<S: AsRef<str>>(
    db: &ElectricClient,
    keys: &[S],
) -> ClientResult<usize> {
    let items: Vec<OtherItem> = keys.iter().map(|k| OtherItem::new(k.as_ref())).collect();
    db.dal.other_items.create_many(&items).await
}

/// Deletes other items by content. Same ordering and failure rules as
/// [`delete_items`].
pub async fn delete_other_items<S: AsRef<str>>(
    db: &ElectricClient,
    keys: &[S],
) -> ClientResult<usize> {
    delete_by_content(&db.dal.other_items, keys).await
}

async fn delete_by_content<T: Record, S: AsRef<str>>(
    table: &Table<T>,
    keys: &[S],
) -> ClientResult<usize> {
    let mut removed = 0;
    for key in keys {
        removed += table.delete_many(Filter::content(key.as_ref())).await?;
    }
    Ok(removed)
}
