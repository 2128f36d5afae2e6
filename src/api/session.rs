//! The RTE session: state machine and call surface.
//!
//! `RteApi` owns a CMI tree for one Initialize→Terminate lifespan and
//! exposes the standardized string-in/string-out functions. Internal
//! data-model errors are mapped to numeric codes here and never escape to
//! the caller; failures surface only through return values and
//! `GetLastError`.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::api::error_code::ErrorCode;
use crate::api::events::{CallRecord, RteObserver};
use crate::error::{DataModelError, Result};
use crate::model::{CmiTree, ROOT_NAME};

/// Session lifecycle state. Transitions are monotonic: once terminated, a
/// session never runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    NotInitialized,
    Running,
    Terminated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NotInitialized => "not-initialized",
            SessionState::Running => "running",
            SessionState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The SCORM 2004 run-time environment API for one session.
pub struct RteApi {
    state: SessionState,
    last_error: ErrorCode,
    cmi: CmiTree,
    observers: Vec<Box<dyn RteObserver>>,
}

impl Default for RteApi {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RteApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RteApi")
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl RteApi {
    /// Create a session over an empty CMI tree.
    pub fn new() -> Self {
        Self {
            state: SessionState::NotInitialized,
            last_error: ErrorCode::NoError,
            cmi: CmiTree::new(),
            observers: Vec::new(),
        }
    }

    /// Create a session pre-populated from a seed snapshot.
    ///
    /// Fails synchronously when an eagerly-validated seed value (an
    /// enumerated token or the completion threshold) is invalid.
    pub fn with_seed(seed: &Value) -> Result<Self> {
        Ok(Self {
            state: SessionState::NotInitialized,
            last_error: ErrorCode::NoError,
            cmi: CmiTree::with_seed(seed)?,
            observers: Vec::new(),
        })
    }

    /// Register an observer. Notification order follows registration order.
    pub fn observe(&mut self, observer: impl RteObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The sticky last-error code, without the call-surface ceremony.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    /// Export the current CMI snapshot without emitting events.
    pub fn snapshot(&self) -> Value {
        self.cmi.export()
    }

    // =========================================================================
    // RTE call surface
    // =========================================================================

    /// `Initialize("")`: not-initialized → running.
    pub fn initialize(&mut self, param: &str) -> &'static str {
        let code = if !param.is_empty() {
            ErrorCode::GeneralArgumentError
        } else {
            match self.state {
                SessionState::Running => ErrorCode::AlreadyInitialized,
                SessionState::Terminated => ErrorCode::ContentInstanceTerminated,
                SessionState::NotInitialized => {
                    self.state = SessionState::Running;
                    ErrorCode::NoError
                }
            }
        };
        self.finish_bool("Initialize", &[param], code)
    }

    /// `Terminate("")`: running → terminated, persisting a final snapshot.
    pub fn terminate(&mut self, param: &str) -> &'static str {
        let code = if !param.is_empty() {
            ErrorCode::GeneralArgumentError
        } else {
            match self.state {
                SessionState::NotInitialized => ErrorCode::TerminationBeforeInitialization,
                SessionState::Terminated => ErrorCode::TerminationAfterTermination,
                SessionState::Running => {
                    self.persist();
                    self.state = SessionState::Terminated;
                    ErrorCode::NoError
                }
            }
        };
        self.finish_bool("Terminate", &[param], code)
    }

    /// `Commit("")`: persist a snapshot without changing state.
    pub fn commit(&mut self, param: &str) -> &'static str {
        let code = if !param.is_empty() {
            ErrorCode::GeneralArgumentError
        } else {
            match self.state {
                SessionState::NotInitialized => ErrorCode::CommitBeforeInitialization,
                SessionState::Terminated => ErrorCode::CommitAfterTermination,
                SessionState::Running => {
                    self.persist();
                    ErrorCode::NoError
                }
            }
        };
        self.finish_bool("Commit", &[param], code)
    }

    /// `GetValue(element)`: read a data-model element, `""` on failure.
    pub fn get_value(&mut self, element: &str) -> String {
        let (result, code) = match self.state {
            SessionState::NotInitialized => {
                (String::new(), ErrorCode::RetrieveDataBeforeInitialization)
            }
            SessionState::Terminated => (String::new(), ErrorCode::RetrieveDataAfterTermination),
            SessionState::Running => match split_element(element) {
                None => (String::new(), ErrorCode::UndefinedDataModelElement),
                Some(path) => match self.cmi.get(&path) {
                    Ok(value) => (value, ErrorCode::NoError),
                    Err(err) => (String::new(), map_get_error(err)),
                },
            },
        };
        self.set_error(code);
        self.emit_call(
            "GetValue",
            &[element],
            &result,
            code != ErrorCode::NoError,
        );
        result
    }

    /// `SetValue(element, value)`: write a data-model element.
    pub fn set_value(&mut self, element: &str, value: &str) -> &'static str {
        let code = match self.state {
            SessionState::NotInitialized => ErrorCode::StoreDataBeforeInitialization,
            SessionState::Terminated => ErrorCode::StoreDataAfterTermination,
            SessionState::Running => match split_element(element) {
                None => ErrorCode::UndefinedDataModelElement,
                Some(path) => match self.cmi.set(&path, value) {
                    Ok(()) => ErrorCode::NoError,
                    Err(err) => map_set_error(err),
                },
            },
        };
        self.finish_bool("SetValue", &[element, value], code)
    }

    /// `GetLastError()`: the sticky code of the most recent call.
    pub fn get_last_error(&mut self) -> &'static str {
        let result = self.last_error.as_str();
        self.emit_call("GetLastError", &[], result, false);
        result
    }

    /// `GetErrorString(code)`: the standard name for a known code.
    pub fn get_error_string(&mut self, code: &str) -> String {
        let result = match ErrorCode::from_code(code) {
            Some(known) => known.message().to_string(),
            None => format!("Unknown error code: {code}"),
        };
        self.emit_call("GetErrorString", &[code], &result, false);
        result
    }

    /// `GetDiagnostic(code)`: reserved; no vendor diagnostics are defined.
    pub fn get_diagnostic(&mut self, code: &str) -> &'static str {
        self.emit_call("GetDiagnostic", &[code], "", false);
        ""
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn finish_bool(
        &mut self,
        function: &'static str,
        args: &[&str],
        code: ErrorCode,
    ) -> &'static str {
        let ok = code == ErrorCode::NoError;
        let result = if ok { "true" } else { "false" };
        self.set_error(code);
        self.emit_call(function, args, result, !ok);
        result
    }

    fn set_error(&mut self, code: ErrorCode) {
        if self.last_error != code {
            self.last_error = code;
            for observer in &mut self.observers {
                observer.on_error_code(code);
            }
        }
    }

    fn emit_call(&mut self, function: &str, args: &[&str], result: &str, is_error: bool) {
        debug!(
            function,
            ?args,
            result,
            code = self.last_error.as_str(),
            "rte call"
        );
        let record = CallRecord::new(function, args, result, is_error);
        for observer in &mut self.observers {
            observer.on_call(&record);
        }
    }

    fn persist(&mut self) {
        let snapshot = self.cmi.export();
        for observer in &mut self.observers {
            observer.on_persist(&snapshot);
        }
    }
}

/// Split a dot-path element into segments below the `cmi` root, or `None`
/// when the root segment is not `cmi`.
fn split_element(element: &str) -> Option<Vec<&str>> {
    let (root, rest) = match element.split_once('.') {
        Some((root, rest)) => (root, rest),
        None => (element, ""),
    };
    if root != ROOT_NAME {
        return None;
    }
    Some(if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('.').collect()
    })
}

// Mapping of internal structural errors to the standardized codes. A
// variant that cannot occur on a path is a programming defect and fails
// loudly instead of being coded as a generic failure.

fn map_get_error(err: DataModelError) -> ErrorCode {
    match err {
        DataModelError::Undefined => ErrorCode::UndefinedDataModelElement,
        DataModelError::WriteOnly => ErrorCode::DataModelElementIsWriteOnly,
        DataModelError::ValueNotInitialized => ErrorCode::DataModelElementValueNotInitialized,
        DataModelError::OutOfBound => ErrorCode::GeneralGetFailure,
        err @ (DataModelError::ReadOnly
        | DataModelError::TypeMismatch { .. }
        | DataModelError::DuplicatedObjectiveId { .. }
        | DataModelError::InvalidPattern
        | DataModelError::TargetNotCreatable) => {
            unreachable!("unexpected data-model error on get: {err}")
        }
    }
}

fn map_set_error(err: DataModelError) -> ErrorCode {
    match err {
        DataModelError::Undefined => ErrorCode::UndefinedDataModelElement,
        DataModelError::ReadOnly => ErrorCode::DataModelElementIsReadOnly,
        DataModelError::TypeMismatch { .. } => ErrorCode::DataModelElementTypeMismatch,
        DataModelError::OutOfBound
        | DataModelError::DuplicatedObjectiveId { .. }
        | DataModelError::InvalidPattern => ErrorCode::GeneralSetFailure,
        DataModelError::TargetNotCreatable => ErrorCode::DataModelDependencyNotEstablished,
        err @ (DataModelError::WriteOnly | DataModelError::ValueNotInitialized) => {
            unreachable!("unexpected data-model error on set: {err}")
        }
    }
}
