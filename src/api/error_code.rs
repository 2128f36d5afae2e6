//! The standardized numeric error-code taxonomy.
//!
//! Codes are three-digit decimal strings grouped by band: 0 no error,
//! 100s lifecycle, 200s syntax, 300s general RTS failures, 400s data-model
//! errors. `GetLastError` reports these; `GetErrorString` maps them to the
//! standard's human-readable names.

use std::fmt;

/// A standardized RTE error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    #[default]
    NoError,
    GeneralException,
    GeneralInitializationFailure,
    AlreadyInitialized,
    ContentInstanceTerminated,
    GeneralTerminationFailure,
    TerminationBeforeInitialization,
    TerminationAfterTermination,
    RetrieveDataBeforeInitialization,
    RetrieveDataAfterTermination,
    StoreDataBeforeInitialization,
    StoreDataAfterTermination,
    CommitBeforeInitialization,
    CommitAfterTermination,
    GeneralArgumentError,
    GeneralGetFailure,
    GeneralSetFailure,
    GeneralCommitFailure,
    UndefinedDataModelElement,
    UnimplementedDataModelElement,
    DataModelElementValueNotInitialized,
    DataModelElementIsReadOnly,
    DataModelElementIsWriteOnly,
    DataModelElementTypeMismatch,
    DataModelElementValueOutOfRange,
    DataModelDependencyNotEstablished,
}

/// Every defined code, in numeric order.
pub const ALL_CODES: &[ErrorCode] = &[
    ErrorCode::NoError,
    ErrorCode::GeneralException,
    ErrorCode::GeneralInitializationFailure,
    ErrorCode::AlreadyInitialized,
    ErrorCode::ContentInstanceTerminated,
    ErrorCode::GeneralTerminationFailure,
    ErrorCode::TerminationBeforeInitialization,
    ErrorCode::TerminationAfterTermination,
    ErrorCode::RetrieveDataBeforeInitialization,
    ErrorCode::RetrieveDataAfterTermination,
    ErrorCode::StoreDataBeforeInitialization,
    ErrorCode::StoreDataAfterTermination,
    ErrorCode::CommitBeforeInitialization,
    ErrorCode::CommitAfterTermination,
    ErrorCode::GeneralArgumentError,
    ErrorCode::GeneralGetFailure,
    ErrorCode::GeneralSetFailure,
    ErrorCode::GeneralCommitFailure,
    ErrorCode::UndefinedDataModelElement,
    ErrorCode::UnimplementedDataModelElement,
    ErrorCode::DataModelElementValueNotInitialized,
    ErrorCode::DataModelElementIsReadOnly,
    ErrorCode::DataModelElementIsWriteOnly,
    ErrorCode::DataModelElementTypeMismatch,
    ErrorCode::DataModelElementValueOutOfRange,
    ErrorCode::DataModelDependencyNotEstablished,
];

impl ErrorCode {
    /// The numeric code string handed back over the call surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoError => "0",
            ErrorCode::GeneralException => "101",
            ErrorCode::GeneralInitializationFailure => "102",
            ErrorCode::AlreadyInitialized => "103",
            ErrorCode::ContentInstanceTerminated => "104",
            ErrorCode::GeneralTerminationFailure => "111",
            ErrorCode::TerminationBeforeInitialization => "112",
            ErrorCode::TerminationAfterTermination => "113",
            ErrorCode::RetrieveDataBeforeInitialization => "122",
            ErrorCode::RetrieveDataAfterTermination => "123",
            ErrorCode::StoreDataBeforeInitialization => "132",
            ErrorCode::StoreDataAfterTermination => "133",
            ErrorCode::CommitBeforeInitialization => "142",
            ErrorCode::CommitAfterTermination => "143",
            ErrorCode::GeneralArgumentError => "201",
            ErrorCode::GeneralGetFailure => "301",
            ErrorCode::GeneralSetFailure => "351",
            ErrorCode::GeneralCommitFailure => "391",
            ErrorCode::UndefinedDataModelElement => "401",
            ErrorCode::UnimplementedDataModelElement => "402",
            ErrorCode::DataModelElementValueNotInitialized => "403",
            ErrorCode::DataModelElementIsReadOnly => "404",
            ErrorCode::DataModelElementIsWriteOnly => "405",
            ErrorCode::DataModelElementTypeMismatch => "406",
            ErrorCode::DataModelElementValueOutOfRange => "407",
            ErrorCode::DataModelDependencyNotEstablished => "408",
        }
    }

    /// Parse a numeric code string back to a known code.
    pub fn from_code(code: &str) -> Option<Self> {
        ALL_CODES.iter().copied().find(|c| c.as_str() == code)
    }

    /// The standard's human-readable name for this code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::NoError => "No Error",
            ErrorCode::GeneralException => "General Exception",
            ErrorCode::GeneralInitializationFailure => "General Initialization Failure",
            ErrorCode::AlreadyInitialized => "Already Initialized",
            ErrorCode::ContentInstanceTerminated => "Content Instance Terminated",
            ErrorCode::GeneralTerminationFailure => "General Termination Failure",
            ErrorCode::TerminationBeforeInitialization => "Termination Before Initialization",
            ErrorCode::TerminationAfterTermination => "Termination After Termination",
            ErrorCode::RetrieveDataBeforeInitialization => "Retrieve Data Before Initialization",
            ErrorCode::RetrieveDataAfterTermination => "Retrieve Data After Termination",
            ErrorCode::StoreDataBeforeInitialization => "Store Data Before Initialization",
            ErrorCode::StoreDataAfterTermination => "Store Data After Termination",
            ErrorCode::CommitBeforeInitialization => "Commit Before Initialization",
            ErrorCode::CommitAfterTermination => "Commit After Termination",
            ErrorCode::GeneralArgumentError => "General Argument Error",
            ErrorCode::GeneralGetFailure => "General Get Failure",
            ErrorCode::GeneralSetFailure => "General Set Failure",
            ErrorCode::GeneralCommitFailure => "General Commit Failure",
            ErrorCode::UndefinedDataModelElement => "Undefined Data Model Element",
            ErrorCode::UnimplementedDataModelElement => "Unimplemented Data Model Element",
            ErrorCode::DataModelElementValueNotInitialized => {
                "Data Model Element Value Not Initialized"
            }
            ErrorCode::DataModelElementIsReadOnly => "Data Model Element Is Read Only",
            ErrorCode::DataModelElementIsWriteOnly => "Data Model Element Is Write Only",
            ErrorCode::DataModelElementTypeMismatch => "Data Model Element Type Mismatch",
            ErrorCode::DataModelElementValueOutOfRange => "Data Model Element Value Out Of Range",
            ErrorCode::DataModelDependencyNotEstablished => {
                "Data Model Dependency Not Established"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
