//! Observer notifications emitted by the session API.
//!
//! Observers registered on an [`crate::api::RteApi`] are notified
//! synchronously, in registration order, before the triggering RTE call
//! returns. Per invocation the order is fixed: `on_persist` (Terminate and
//! Commit success only), then `on_error_code` (only when the code actually
//! changed), then `on_call` (every function, success or failure).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error_code::ErrorCode;

/// Record of one RTE call: name, arguments, return value, failure flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRecord {
    pub function: String,
    pub args: Vec<String>,
    pub result: String,
    pub is_error: bool,
}

impl CallRecord {
    /// Create a new call record.
    pub fn new(
        function: impl Into<String>,
        args: &[&str],
        result: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self {
            function: function.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            result: result.into(),
            is_error,
        }
    }
}

/// Observer for session API notifications.
///
/// All methods have empty defaults; implement only what you consume.
/// Observers must be `Send` so a host can move the session between
/// threads, but notifications themselves are always synchronous.
pub trait RteObserver: Send {
    /// A call completed (every function, including the error queries).
    fn on_call(&mut self, _call: &CallRecord) {}

    /// The session's last-error code changed.
    fn on_error_code(&mut self, _code: ErrorCode) {}

    /// Terminate or Commit exported a snapshot for persistence.
    fn on_persist(&mut self, _snapshot: &Value) {}
}
