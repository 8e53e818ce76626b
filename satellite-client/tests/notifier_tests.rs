//! Tests for notifier.rs: observer registration and delivery.

mod common;

use common::Recorder;
use pretty_assertions::assert_eq;
use satellite_client::{
    AuthStateNotification, Change, ClientId, DataChangeNotification, Notifier,
    PotentialChangeNotification,
};
use std::sync::Arc;

fn potential(table: &str) -> PotentialChangeNotification {
    PotentialChangeNotification {
        db_name: "test.db".into(),
        tables: vec![table.into()],
    }
}

fn data(table: &str) -> DataChangeNotification {
    DataChangeNotification {
        db_name: "test.db".into(),
        changes: vec![Change::insert(table, vec!["1".into()])],
    }
}

#[test]
fn each_kind_reaches_only_its_observers() {
    let notifier = Notifier::new();
    let recorder = Recorder::default();

    let r = recorder.clone();
    notifier.subscribe_to_auth_state_changes(move |e| r.push(format!("auth {}", e.connected)));
    let r = recorder.clone();
    notifier.subscribe_to_potential_data_changes(move |e| {
        r.push(format!("potential {}", e.tables[0]));
    });
    let r = recorder.clone();
    notifier.subscribe_to_data_changes(move |e| r.push(format!("data {}", e.changes[0].table)));

    notifier.data_changed(&data("items"));
    notifier.auth_state_changed(&AuthStateNotification {
        client_id: ClientId::generate(),
        connected: true,
    });
    notifier.potential_data_changed(&potential("other_items"));

    assert_eq!(
        recorder.events(),
        vec!["data items", "auth true", "potential other_items"]
    );
}

#[test]
fn every_event_delivered_once_in_order() {
    let notifier = Notifier::new();
    let recorder = Recorder::default();
    let r = recorder.clone();
    notifier.subscribe_to_potential_data_changes(move |e| r.push(e.tables[0].clone()));

    for table in ["a", "b", "c"] {
        notifier.potential_data_changed(&potential(table));
    }
    assert_eq!(recorder.events(), vec!["a", "b", "c"]);
}

#[test]
fn observers_called_in_registration_order() {
    let notifier = Notifier::new();
    let recorder = Recorder::default();
    for name in ["first", "second"] {
        let r = recorder.clone();
        notifier.subscribe_to_data_changes(move |_| r.push(name));
    }

    notifier.data_changed(&data("items"));
    assert_eq!(recorder.events(), vec!["first", "second"]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let notifier = Notifier::new();
    let recorder = Recorder::default();
    let r = recorder.clone();
    let key = notifier.subscribe_to_data_changes(move |_| r.push("data"));
    assert_eq!(notifier.subscriber_count(), 1);

    assert!(notifier.unsubscribe(key));
    assert!(!notifier.unsubscribe(key));
    assert_eq!(notifier.subscriber_count(), 0);

    notifier.data_changed(&data("items"));
    assert!(recorder.events().is_empty());
}

#[test]
fn keys_are_distinct_across_kinds() {
    let notifier = Notifier::new();
    let a = notifier.subscribe_to_auth_state_changes(|_| {});
    let b = notifier.subscribe_to_potential_data_changes(|_| {});
    let c = notifier.subscribe_to_data_changes(|_| {});
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
    assert_eq!(notifier.subscriber_count(), 3);
}

#[test]
fn observer_may_unsubscribe_itself() {
    let notifier = Arc::new(Notifier::new());
    let recorder = Recorder::default();
    let key = Arc::new(std::sync::Mutex::new(None));

    let (n, r, k) = (Arc::clone(&notifier), recorder.clone(), Arc::clone(&key));
    let subscribed = notifier.subscribe_to_data_changes(move |_| {
        r.push("once");
        if let Some(key) = k.lock().unwrap().take() {
            n.unsubscribe(key);
        }
    });
    *key.lock().unwrap() = Some(subscribed);

    notifier.data_changed(&data("items"));
    notifier.data_changed(&data("items"));
    assert_eq!(recorder.events(), vec!["once"]);
}

#[test]
fn emit_without_observers_is_noop() {
    let notifier = Notifier::default();
    notifier.data_changed(&data("items"));
    notifier.potential_data_changed(&potential("items"));
    assert_eq!(notifier.subscriber_count(), 0);
}
