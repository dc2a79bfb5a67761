//! Handle errors and their C status codes.

use std::fmt;
use thiserror::Error;

use crate::registry::RawHandle;

/// Error type for handle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// The caller passed the null handle (0).
    #[error("Null handle")]
    NullHandle,

    /// The handle was never issued, or has already been destroyed.
    #[error("Invalid handle: 0x{handle:x}")]
    InvalidHandle { handle: RawHandle },

    /// Every handle value has been issued once.
    #[error("Handle space exhausted")]
    Exhausted,
}

impl HandleError {
    /// Creates an invalid handle error.
    pub fn invalid(handle: RawHandle) -> Self {
        HandleError::InvalidHandle { handle }
    }

    /// Returns the code reported through `dog_last_error()`.
    pub fn code(&self) -> HandleErrorCode {
        match self {
            HandleError::NullHandle => HandleErrorCode::NullHandle,
            HandleError::InvalidHandle { .. } => HandleErrorCode::InvalidHandle,
            HandleError::Exhausted => HandleErrorCode::Exhausted,
        }
    }
}

/// Result type for handle operations.
pub type HandleResult<T> = Result<T, HandleError>;

/// Error codes visible across the C boundary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandleErrorCode {
    #[default]
    Ok = 0,
    NullHandle = 1,
    InvalidHandle = 2,
    Exhausted = 3,
}

impl HandleErrorCode {
    /// Creates a code from its raw value. Unknown values map to `InvalidHandle`.
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => HandleErrorCode::Ok,
            1 => HandleErrorCode::NullHandle,
            3 => HandleErrorCode::Exhausted,
            _ => HandleErrorCode::InvalidHandle,
        }
    }

    /// Returns the raw value passed to C.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_ok(&self) -> bool {
        *self == HandleErrorCode::Ok
    }
}

impl fmt::Display for HandleErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandleErrorCode::Ok => "DOG_OK",
            HandleErrorCode::NullHandle => "DOG_NULL_HANDLE",
            HandleErrorCode::InvalidHandle => "DOG_INVALID_HANDLE",
            HandleErrorCode::Exhausted => "DOG_HANDLE_EXHAUSTED",
        };
        write!(f, "{}", s)
    }
}
