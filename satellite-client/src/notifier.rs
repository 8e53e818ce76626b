//! Change-notification bridge.
//!
//! Observers register a callback per event kind and are invoked
//! synchronously, once per event, in the order events are emitted. There is
//! no buffering and no backpressure: a slow observer delays the emitter.
//!
//! Registration lists are locked only to add, remove or snapshot callbacks;
//! no lock is held while an observer runs, so observers may subscribe or
//! unsubscribe from inside a callback.

use satellite_types::{AuthStateNotification, DataChangeNotification, PotentialChangeNotification};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey(u64);

struct Listeners<T> {
    entries: Mutex<Vec<(SubscriptionKey, Callback<T>)>>,
}

impl<T> Listeners<T> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, key: SubscriptionKey, callback: Callback<T>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key, callback));
    }

    fn remove(&self, key: SubscriptionKey) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(k, _)| *k != key);
        entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn emit(&self, event: &T) {
        let snapshot: Vec<Callback<T>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }
}

/// Fans out auth-state, potential-change and data-change events.
pub struct Notifier {
    next_key: AtomicU64,
    auth_state: Listeners<AuthStateNotification>,
    potential_changes: Listeners<PotentialChangeNotification>,
    data_changes: Listeners<DataChangeNotification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("auth_state", &self.auth_state.len())
            .field("potential_changes", &self.potential_changes.len())
            .field("data_changes", &self.data_changes.len())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            next_key: AtomicU64::new(1),
            auth_state: Listeners::new(),
            potential_changes: Listeners::new(),
            data_changes: Listeners::new(),
        }
    }

    fn next_key(&self) -> SubscriptionKey {
        SubscriptionKey(self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    // ── Subscriptions ────────────────────────────────────────────

    /// Calls `callback` whenever the replication connection authenticates
    /// or disconnects.
    pub fn subscribe_to_auth_state_changes(
        &self,
        callback: impl Fn(&AuthStateNotification) + Send + Sync + 'static,
    ) -> SubscriptionKey {
        let key = self.next_key();
        self.auth_state.add(key, Arc::new(callback));
        key
    }

    /// Calls `callback` whenever a local write commits.
    pub fn subscribe_to_potential_data_changes(
        &self,
        callback: impl Fn(&PotentialChangeNotification) + Send + Sync + 'static,
    ) -> SubscriptionKey {
        let key = self.next_key();
        self.potential_changes.add(key, Arc::new(callback));
        key
    }

    /// Calls `callback` whenever the replicator acknowledges a change.
    pub fn subscribe_to_data_changes(
        &self,
        callback: impl Fn(&DataChangeNotification) + Send + Sync + 'static,
    ) -> SubscriptionKey {
        let key = self.next_key();
        self.data_changes.add(key, Arc::new(callback));
        key
    }

    /// Removes a subscription of any kind. Returns false if the key was
    /// unknown or already removed.
    pub fn unsubscribe(&self, key: SubscriptionKey) -> bool {
        self.auth_state.remove(key)
            || self.potential_changes.remove(key)
            || self.data_changes.remove(key)
    }

    /// Total number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.auth_state.len() + self.potential_changes.len() + self.data_changes.len()
    }

    // ── Emission ─────────────────────────────────────────────────

    pub fn auth_state_changed(&self, notification: &AuthStateNotification) {
        self.auth_state.emit(notification);
    }

    pub fn potential_data_changed(&self, notification: &PotentialChangeNotification) {
        self.potential_changes.emit(notification);
    }

    pub fn data_changed(&self, notification: &DataChangeNotification) {
        self.data_changes.emit(notification);
    }
}
