//! The RTE session API.
//!
//! The stateful façade content calls into: the session state machine, the
//! string-in/string-out call surface, the standardized error-code table,
//! and the observer notifications external collaborators consume.

pub mod error_code;
pub mod events;
pub mod session;

pub use error_code::{ErrorCode, ALL_CODES};
pub use events::{CallRecord, RteObserver};
pub use session::{RteApi, SessionState};
