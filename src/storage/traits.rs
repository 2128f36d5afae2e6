//! Attempt-history storage traits.
//!
//! The storage collaborator receives persist snapshots and appends them to
//! an ordered, timestamped history keyed by package/attempt identity. This
//! module defines the `HistoryStore` trait that contract lives behind.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// One persisted CMI snapshot with its capture time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// When the snapshot was captured.
    pub timestamp: DateTime<Utc>,
    /// The exported CMI snapshot.
    pub cmi: Value,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(cmi: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            cmi,
        }
    }

    /// Create an entry with an explicit timestamp.
    pub fn at(timestamp: DateTime<Utc>, cmi: Value) -> Self {
        Self { timestamp, cmi }
    }
}

/// Trait for attempt-history storage backends.
///
/// History is append-only during a session: entries are ordered oldest
/// first and a key's history only ever grows until it is cleared.
pub trait HistoryStore: Send + Sync {
    /// Append an entry to the history for `key`.
    fn append(&self, key: &str, entry: &HistoryEntry) -> Result<()>;

    /// All entries for `key`, oldest first. Unknown keys yield an empty
    /// history.
    fn list(&self, key: &str) -> Result<Vec<HistoryEntry>>;

    /// The most recent entry for `key`, if any.
    fn last(&self, key: &str) -> Result<Option<HistoryEntry>> {
        let mut entries = self.list(key)?;
        Ok(entries.pop())
    }

    /// Remove the history for `key`. Succeeds even if no history exists.
    fn clear(&self, key: &str) -> Result<()>;
}

/// Blanket implementation of HistoryStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: HistoryStore` is expected, which
/// is useful for sharing a store between a recorder and assertions.
impl<T: HistoryStore + ?Sized> HistoryStore for Arc<T> {
    fn append(&self, key: &str, entry: &HistoryEntry) -> Result<()> {
        (**self).append(key, entry)
    }

    fn list(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        (**self).list(key)
    }

    fn last(&self, key: &str) -> Result<Option<HistoryEntry>> {
        (**self).last(key)
    }

    fn clear(&self, key: &str) -> Result<()> {
        (**self).clear(key)
    }
}

/// Test utilities for HistoryStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use serde_json::json;

    /// Test helper to verify HistoryStore implementations.
    pub fn test_history_store_contract<S: HistoryStore>(store: &S) {
        let key = "attempt-1";

        // Empty history to start
        assert!(store.list(key).unwrap().is_empty());
        assert!(store.last(key).unwrap().is_none());

        // Append two entries
        store
            .append(key, &HistoryEntry::new(json!({ "location": "a" })))
            .unwrap();
        store
            .append(key, &HistoryEntry::new(json!({ "location": "b" })))
            .unwrap();

        // Ordered oldest first, last() returns the newest
        let entries = store.list(key).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].cmi["location"], "a");
        assert_eq!(entries[1].cmi["location"], "b");
        assert_eq!(store.last(key).unwrap().unwrap().cmi["location"], "b");

        // Keys are independent
        assert!(store.list("attempt-2").unwrap().is_empty());

        // Clear removes the history; clearing again still succeeds
        store.clear(key).unwrap();
        assert!(store.list(key).unwrap().is_empty());
        store.clear(key).unwrap();
    }
}
