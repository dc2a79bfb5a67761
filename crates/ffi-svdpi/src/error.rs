//! Marshalling errors and the status codes returned to the simulator.

use std::fmt;
use std::io;
use thiserror::Error;

/// Status codes returned by `send_udp_packet`.
///
/// Zero is success. A failing sink reports its own nonzero code, which is
/// passed through unchanged; the values here cover failures raised before the
/// sink is reached.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendStatus {
    Success = 0,
    Failure = -1,
    NullArgument = -2,
    MissingElement = -3,
}

impl SendStatus {
    /// Creates a SendStatus from a raw value. Unknown codes map to `Failure`.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => SendStatus::Success,
            -2 => SendStatus::NullArgument,
            -3 => SendStatus::MissingElement,
            _ => SendStatus::Failure,
        }
    }

    /// Returns the raw value passed to C.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == SendStatus::Success
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> MarshalResult<()> {
        match self {
            SendStatus::Success => Ok(()),
            other => Err(MarshalError::Sink {
                code: other.as_raw(),
            }),
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SendStatus::Success => "SEND_SUCCESS",
            SendStatus::Failure => "SEND_FAILURE",
            SendStatus::NullArgument => "SEND_NULL_ARGUMENT",
            SendStatus::MissingElement => "SEND_MISSING_ELEMENT",
        };
        write!(f, "{}", s)
    }
}

/// Error type for marshalling operations.
#[derive(Debug, Error)]
pub enum MarshalError {
    /// The address pointer from the simulator was null.
    #[error("Null address pointer")]
    NullAddress,

    /// The simulator returned no element for an index inside the bounds.
    #[error("No element at open array index {index}")]
    MissingElement { index: i32 },

    /// The sink rejected the datagram.
    #[error("Packet sink failed with code {code}")]
    Sink { code: i32 },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl MarshalError {
    /// Creates a sink error. A zero code is coerced to `Failure` so the
    /// caller never sees success for a failed send.
    pub fn sink(code: i32) -> Self {
        let code = if code == 0 {
            SendStatus::Failure.as_raw()
        } else {
            code
        };
        MarshalError::Sink { code }
    }

    /// Creates a config validation error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        MarshalError::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the status code reported to C for this error.
    pub fn status_code(&self) -> i32 {
        match self {
            MarshalError::NullAddress => SendStatus::NullArgument.as_raw(),
            MarshalError::MissingElement { .. } => SendStatus::MissingElement.as_raw(),
            MarshalError::Sink { code } => *code,
            _ => SendStatus::Failure.as_raw(),
        }
    }
}

/// Result type for marshalling operations.
pub type MarshalResult<T> = Result<T, MarshalError>;
