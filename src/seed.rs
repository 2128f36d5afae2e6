//! Seed construction helpers for a new attempt.
//!
//! The package loader hands the core a seed snapshot; these helpers build
//! the pieces of it that come from outside the data model itself: the
//! objective ids extracted from package metadata and the `entry` value
//! derived from how the previous attempt ended.

use serde_json::{json, Value};

/// Build a seed snapshot pre-populating `cmi.objectives` from package
/// metadata objective ids.
pub fn objectives(ids: &[&str]) -> Value {
    json!({
        "objectives": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
    })
}

/// The `entry` value for a new attempt, given the previous attempt's
/// exported snapshot.
///
/// No previous attempt means a fresh start (`ab-initio`). A previous
/// attempt that exited with `suspend` resumes; an explicit `logout` starts
/// over; otherwise the `suspend_all` launch setting decides, defaulting to
/// an empty entry.
pub fn initial_entry(previous: Option<&Value>, suspend_all: bool) -> &'static str {
    let Some(previous) = previous else {
        return "ab-initio";
    };
    match previous.get("exit").and_then(Value::as_str) {
        Some("suspend") => "resume",
        Some("logout") => "ab-initio",
        _ if suspend_all => "resume",
        _ => "",
    }
}
