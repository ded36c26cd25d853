// nfcservice/src/error.rs

use thiserror::Error;

use crate::types::{CallerToken, TagTechnology};

/// Common error type for the service core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Another power transition is still in flight.
    #[error("a power transition is already in flight")]
    Busy,

    /// The wait budget elapsed first.
    #[error("operation timed out")]
    Timeout,

    /// The controller reported failure.
    #[error("controller hardware failure: {0}")]
    HardwareFailure(String),

    /// The tag does not advertise the technology.
    #[error("technology {0} is not available on this tag")]
    Unsupported(TagTechnology),

    /// The caller may not use this listener type.
    #[error("caller {caller} is not permitted to use listener type '{event_type}'")]
    Unauthorized {
        /// Rejected caller
        caller: CallerToken,
        /// Requested listener type
        event_type: String,
    },

    /// The tag left the field.
    #[error("tag is no longer in the field")]
    TagLost,

    /// The builder was given no host.
    #[error("no controller host was provided")]
    HostMissing,

    /// A listener callback reported an error.
    #[error("state callback failed: {0}")]
    Callback(String),

    /// The task worker could not run or finish the task.
    #[error("task worker unavailable: {0}")]
    Worker(String),
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Integer error surface handed to the binding layer.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// Operation completed.
    Success = 0,
    /// Rejected, a transition is in flight.
    Busy = 1,
    /// Technology not available.
    Unsupported = 2,
    /// Wait budget elapsed.
    Timeout = 3,
    /// Controller or worker failure.
    HardwareFailure = 4,
    /// Caller not permitted.
    Unauthorized = 5,
    /// Tag left the field.
    TagLost = 6,
}

impl ErrorCode {
    /// Value handed across the binding layer.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// `Success` for `Ok`, otherwise the error's code.
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ErrorCode::Success,
            Err(e) => e.code(),
        }
    }
}

impl Error {
    /// Map this error onto the integer surface.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Busy => ErrorCode::Busy,
            Error::Timeout => ErrorCode::Timeout,
            Error::Unsupported(_) => ErrorCode::Unsupported,
            Error::Unauthorized { .. } => ErrorCode::Unauthorized,
            Error::TagLost => ErrorCode::TagLost,
            Error::HardwareFailure(_)
            | Error::HostMissing
            | Error::Callback(_)
            | Error::Worker(_) => ErrorCode::HardwareFailure,
        }
    }
}
