//! Error types for the SCORM run-time environment.
//!
//! Errors come in two layers. `DataModelError` is the internal structural
//! taxonomy raised by the CMI tree; it never escapes the session API, which
//! maps each variant to a standardized numeric code. `RteError` is the
//! crate-level surface for everything outside a running call: seed
//! validation at construction, attempt-history storage, and configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Structural errors raised by CMI tree access.
///
/// These carry no numeric codes themselves; the session API owns the
/// mapping to the standardized error-code table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataModelError {
    /// The element does not exist in the data model.
    #[error("undefined data model element")]
    Undefined,

    /// Write attempted on a read-only element.
    #[error("element is read-only")]
    ReadOnly,

    /// Read attempted on a write-only element.
    #[error("element is write-only")]
    WriteOnly,

    /// Read of an element that has never been set.
    #[error("element value is not initialized")]
    ValueNotInitialized,

    /// The value is outside the element's declared domain.
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// Collection index is negative, non-numeric, or past the append point.
    #[error("collection index out of bounds")]
    OutOfBound,

    /// The objective id is already used by a sibling item.
    #[error("duplicated objective id: {id}")]
    DuplicatedObjectiveId { id: String },

    /// The correct-response pattern is invalid for the interaction type.
    #[error("invalid correct-response pattern")]
    InvalidPattern,

    /// The write depends on state that has not been established, either a
    /// non-creatable child of a missing collection item or a pattern write
    /// before the interaction type is set.
    #[error("target not creatable: dependency not established")]
    TargetNotCreatable,
}

impl DataModelError {
    /// Create a type-mismatch error.
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a duplicated-objective-id error.
    pub fn duplicated_objective_id(id: impl Into<String>) -> Self {
        Self::DuplicatedObjectiveId { id: id.into() }
    }
}

/// The main error type for operations outside a running RTE call.
#[derive(Error, Debug)]
pub enum RteError {
    /// A seed snapshot value failed eager validation at construction.
    #[error("invalid seed value for {element}: {message}")]
    Seed { element: String, message: String },

    /// I/O errors from attempt-history file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for RTE operations.
pub type Result<T> = std::result::Result<T, RteError>;

impl RteError {
    /// Create a seed validation error.
    pub fn seed(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Seed {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for RteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}
