//! In-memory attempt history for testing.
//!
//! Thread-safe implementation of the `HistoryStore` trait backed by a
//! `RwLock<HashMap>`. Entries are lost when the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::storage::{HistoryEntry, HistoryStore};

/// In-memory history store for testing.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    histories: RwLock<HashMap<String, Vec<HistoryEntry>>>,
}

impl MemoryHistoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys with recorded history.
    pub fn len(&self) -> usize {
        self.histories.read().unwrap().len()
    }

    /// Check if the store holds no history at all.
    pub fn is_empty(&self) -> bool {
        self.histories.read().unwrap().is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, key: &str, entry: &HistoryEntry) -> Result<()> {
        let mut histories = self.histories.write().unwrap();
        histories
            .entry(key.to_string())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    fn list(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        let histories = self.histories.read().unwrap();
        Ok(histories.get(key).cloned().unwrap_or_default())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let mut histories = self.histories.write().unwrap();
        histories.remove(key);
        Ok(())
    }
}
