//! CLI commands for the player.
//!
//! One command family: `history`, for inspecting and pruning stored
//! attempt snapshots.

pub mod history;

pub use history::{HistoryAction, HistoryCommand, HistoryOptions, HistoryOutput};
