//! History command.
//!
//! Lists, inspects, and prunes the stored attempt history for a key,
//! useful for checking what a content package actually reported.

use serde::{Deserialize, Serialize};

use crate::storage::{HistoryEntry, HistoryStore};

/// Action to perform on an attempt's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    /// Show all stored snapshots.
    List,
    /// Show only the most recent snapshot.
    Last,
    /// Remove the stored history.
    Clean,
}

/// Options for the history command.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of entries to show (most recent last).
    pub limit: Option<usize>,
}

/// Summary of a single history entry for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Capture timestamp (ISO 8601).
    pub timestamp: String,
    /// Completion status reported in the snapshot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_status: Option<String>,
    /// The full snapshot.
    pub cmi: serde_json::Value,
}

impl From<&HistoryEntry> for EntrySummary {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            timestamp: entry.timestamp.to_rfc3339(),
            completion_status: entry
                .cmi
                .get("completion_status")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            cmi: entry.cmi.clone(),
        }
    }
}

/// Output format for the history command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The attempt key.
    pub key: String,
    /// Entries selected by the action.
    pub entries: Vec<EntrySummary>,
    /// Informational message (e.g. after clean).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryOutput {
    /// Create a successful output.
    pub fn success(key: impl Into<String>, entries: Vec<EntrySummary>) -> Self {
        Self {
            success: true,
            key: key.into(),
            entries,
            message: None,
            error: None,
        }
    }

    /// Create a successful output with a message instead of entries.
    pub fn message(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            key: key.into(),
            entries: vec![],
            message: Some(message.into()),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(key: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            key: key.into(),
            entries: vec![],
            message: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "History failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        if let Some(message) = &self.message {
            return message.clone();
        }

        if self.entries.is_empty() {
            return format!("No history for {}.", self.key);
        }

        let mut lines = vec![format!(
            "History for {} ({} entries):",
            self.key,
            self.entries.len()
        )];
        lines.push(String::new());

        for entry in &self.entries {
            let status = entry.completion_status.as_deref().unwrap_or("-");
            // Truncate the timestamp to date and time
            let timestamp: String = entry.timestamp.chars().take(19).collect();
            lines.push(format!("{:<20}  completion_status={}", timestamp, status));
        }

        lines.join("\n")
    }
}

/// The history command implementation.
pub struct HistoryCommand<S: HistoryStore> {
    store: S,
}

impl<S: HistoryStore> HistoryCommand<S> {
    /// Create a new history command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the history command.
    pub fn run(&self, action: HistoryAction, key: &str, options: &HistoryOptions) -> HistoryOutput {
        match action {
            HistoryAction::List => match self.store.list(key) {
                Ok(mut entries) => {
                    if let Some(limit) = options.limit {
                        let skip = entries.len().saturating_sub(limit);
                        entries.drain(..skip);
                    }
                    HistoryOutput::success(key, entries.iter().map(EntrySummary::from).collect())
                }
                Err(e) => HistoryOutput::failure(key, format!("Failed to list history: {}", e)),
            },
            HistoryAction::Last => match self.store.last(key) {
                Ok(Some(entry)) => {
                    HistoryOutput::success(key, vec![EntrySummary::from(&entry)])
                }
                Ok(None) => HistoryOutput::success(key, vec![]),
                Err(e) => HistoryOutput::failure(key, format!("Failed to read history: {}", e)),
            },
            HistoryAction::Clean => match self.store.clear(key) {
                Ok(()) => HistoryOutput::message(key, format!("History cleared for {}.", key)),
                Err(e) => HistoryOutput::failure(key, format!("Failed to clear history: {}", e)),
            },
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &HistoryOutput, options: &HistoryOptions) -> String {
        if options.quiet {
            return String::new();
        }
        if options.json {
            serde_json::to_string_pretty(output)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            output.format_text()
        }
    }
}
