//! File-based attempt history.
//!
//! Each attempt key maps to one JSON file holding its entry array, stored
//! under the configured history directory. Atomic writes are achieved via
//! the temp file + rename pattern.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::{history_dir, Config};
use crate::error::{Result, RteError};
use crate::storage::{HistoryEntry, HistoryStore};

/// File-based history store.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    /// Directory where history files are stored.
    dir: PathBuf,
}

impl FileHistoryStore {
    /// Create a store over the configured history directory.
    pub fn new(config: &Config) -> Result<Self> {
        let dir = history_dir(config).ok_or_else(|| {
            RteError::config("Could not determine history directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a store over a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| RteError::storage(&dir, e))?;
        }

        Ok(Self { dir })
    }

    /// Path of the history file for a key. Keys must be simple
    /// identifiers; path separators would escape the history directory.
    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(RteError::storage(
                &self.dir,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid history key: {key:?}"),
                ),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.json.tmp"))
    }

    /// Write a key's full history atomically using temp file + rename.
    fn atomic_write(&self, key: &str, entries: &[HistoryEntry]) -> Result<()> {
        let final_path = self.entry_path(key)?;
        let temp_path = self.temp_path(key);

        let json = serde_json::to_string_pretty(entries)?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| RteError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| RteError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| RteError::storage(&temp_path, e))?;
        }

        fs::rename(&temp_path, &final_path).map_err(|e| RteError::storage(&final_path, e))?;

        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn append(&self, key: &str, entry: &HistoryEntry) -> Result<()> {
        let mut entries = self.list(key)?;
        entries.push(entry.clone());
        self.atomic_write(key, &entries)
    }

    fn list(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        let path = self.entry_path(key)?;

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| RteError::storage(&path, e))?;
        let entries: Vec<HistoryEntry> = serde_json::from_str(&content)?;

        Ok(entries)
    }

    fn clear(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RteError::storage(&path, e)),
        }
    }
}
