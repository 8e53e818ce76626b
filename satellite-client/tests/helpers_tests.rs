//! Tests for helpers.rs: key-based scenario operations.

mod common;

use common::{open_test_db, Recorder};
use pretty_assertions::assert_eq;
use satellite_client::{
    delete_items, delete_other_items, get_items, get_other_items, insert_items,
    insert_other_items, register_subscribers, ChangeKind,
};
use std::collections::BTreeSet;

fn contents<'a>(values: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    values.map(str::to_string).collect()
}

#[tokio::test]
async fn insert_then_delete_leaves_remaining_key() {
    let t = open_test_db().await;
    assert_eq!(insert_items(&t.db, &["a", "b"]).await.unwrap(), 2);
    assert_eq!(delete_items(&t.db, &["a"]).await.unwrap(), 1);

    let items = get_items(&t.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "b");
}

#[tokio::test]
async fn inserted_keys_round_trip_with_distinct_ids() {
    let t = open_test_db().await;
    let keys: Vec<String> = (0..10).map(|i| format!("key-{i}")).collect();
    insert_items(&t.db, &keys).await.unwrap();

    let items = get_items(&t.db).await.unwrap();
    assert_eq!(
        contents(items.iter().map(|i| i.content.as_str())),
        contents(keys.iter().map(String::as_str))
    );
    let ids: BTreeSet<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), keys.len());
}

#[tokio::test]
async fn deleting_absent_key_is_noop() {
    let t = open_test_db().await;
    insert_items(&t.db, &["a"]).await.unwrap();

    assert_eq!(delete_items(&t.db, &["missing"]).await.unwrap(), 0);
    assert_eq!(get_items(&t.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_key_lists_are_noops() {
    let t = open_test_db().await;
    let none: [&str; 0] = [];
    assert_eq!(insert_items(&t.db, &none).await.unwrap(), 0);
    assert_eq!(delete_items(&t.db, &none).await.unwrap(), 0);
    assert!(t.replicator.acknowledged().is_empty());
}

#[tokio::test]
async fn delete_issues_one_call_per_key_in_order() {
    let t = open_test_db().await;
    insert_items(&t.db, &["a", "b", "c"]).await.unwrap();
    let items = get_items(&t.db).await.unwrap();

    delete_items(&t.db, &["c", "missing", "a"]).await.unwrap();

    let deletes: Vec<_> = t
        .replicator
        .acknowledged()
        .into_iter()
        .filter(|c| c.kind == ChangeKind::Delete)
        .collect();
    assert_eq!(deletes.len(), 2);
    assert_eq!(deletes[0].record_ids, vec![items[2].id.clone()]);
    assert_eq!(deletes[1].record_ids, vec![items[0].id.clone()]);
}

#[tokio::test]
async fn delete_stops_at_first_failure() {
    let t = open_test_db().await;
    insert_items(&t.db, &["a", "b", "c"]).await.unwrap();
    delete_items(&t.db, &["a"]).await.unwrap();

    // Once disconnected, the first matching key fails to replicate and the
    // remaining keys are never attempted.
    t.db.close().await.unwrap();
    assert!(delete_items(&t.db, &["b", "c"]).await.is_err());

    let remaining = get_items(&t.db).await.unwrap();
    assert_eq!(
        contents(remaining.iter().map(|i| i.content.as_str())),
        contents(["c"].into_iter())
    );
}

#[tokio::test]
async fn other_items_helpers() {
    let t = open_test_db().await;
    insert_other_items(&t.db, &["x", "y", "z"]).await.unwrap();
    assert_eq!(delete_other_items(&t.db, &["x", "z"]).await.unwrap(), 2);

    let others = get_other_items(&t.db).await.unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].content, "y");
    assert!(get_items(&t.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn register_subscribers_observes_every_kind() {
    let t = open_test_db().await;
    let keys = register_subscribers(&t.db);
    assert_eq!(t.db.notifier.subscriber_count(), 3);

    // Logging observers coexist with other observers.
    let recorder = Recorder::default();
    let r = recorder.clone();
    t.db.notifier.subscribe_to_data_changes(move |_| r.push("data"));
    insert_items(&t.db, &["a"]).await.unwrap();
    assert_eq!(recorder.events(), vec!["data"]);

    for key in keys {
        assert!(t.db.notifier.unsubscribe(key));
    }
    assert_eq!(t.db.notifier.subscriber_count(), 1);
}
