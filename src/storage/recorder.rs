//! Observer adapter persisting snapshots to a history store.
//!
//! `HistoryRecorder` bridges the session API's `persist` notifications to
//! a `HistoryStore`. Storage failures are logged and swallowed: a broken
//! disk must not break the running content.

use serde_json::Value;
use tracing::warn;

use crate::api::RteObserver;
use crate::storage::{HistoryEntry, HistoryStore};

/// Appends each persisted snapshot to an attempt's history.
#[derive(Debug)]
pub struct HistoryRecorder<S: HistoryStore> {
    store: S,
    key: String,
}

impl<S: HistoryStore> HistoryRecorder<S> {
    /// Create a recorder writing to `store` under the attempt `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The attempt key this recorder writes under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: HistoryStore> RteObserver for HistoryRecorder<S> {
    fn on_persist(&mut self, snapshot: &Value) {
        let entry = HistoryEntry::new(snapshot.clone());
        if let Err(err) = self.store.append(&self.key, &entry) {
            warn!(key = %self.key, error = %err, "failed to record attempt snapshot");
        }
    }
}
