//! scorm-rte - SCORM 2004 Run-Time Environment core
//!
//! Implements the RTE call surface (Initialize/Terminate/GetValue/SetValue/
//! Commit plus the error queries) over the standardized CMI data-model
//! tree: a typed, dot-path-addressed attribute store with per-field
//! read/write policies, lazily-created collection entries, and the numeric
//! error-code taxonomy. Persistence stays outside the core: Terminate and
//! Commit emit snapshot notifications that the attempt-history storage in
//! this crate (or any other observer) consumes.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod seed;
pub mod storage;

pub use api::{CallRecord, ErrorCode, RteApi, RteObserver, SessionState};
pub use config::Config;
pub use error::{DataModelError, Result, RteError};
pub use model::CmiTree;
pub use storage::{
    FileHistoryStore, HistoryEntry, HistoryRecorder, HistoryStore, MemoryHistoryStore,
};

// CLI commands
pub use cli::{HistoryAction, HistoryCommand, HistoryOptions, HistoryOutput};
