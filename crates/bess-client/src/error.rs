//! BESS error types and status handling.
//!
//! The engine reports failures the way the daemon does: an errno value plus
//! a human readable message. This module maps those onto a Rust error enum.

use std::fmt;
use thiserror::Error;

/// Errno-style status codes returned by the engine.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BessStatus {
    NotFound = 2,
    AlreadyExists = 17,
    NoDevice = 19,
    InvalidArgument = 22,
}

impl BessStatus {
    /// Returns the raw errno value.
    pub fn errno(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for BessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BessStatus::NotFound => "ENOENT",
            BessStatus::AlreadyExists => "EEXIST",
            BessStatus::NoDevice => "ENODEV",
            BessStatus::InvalidArgument => "EINVAL",
        };
        write!(f, "{}", s)
    }
}

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BessError {
    /// A driver option or argument was rejected.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The driver or port does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A port with the requested name already exists.
    #[error("Already exists: {message}")]
    AlreadyExists { message: String },

    /// The requested device is not attached to the engine.
    #[error("No such device: {message}")]
    NoDevice { message: String },
}

impl BessError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        BessError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        BessError::NotFound {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        BessError::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn no_device(message: impl Into<String>) -> Self {
        BessError::NoDevice {
            message: message.into(),
        }
    }

    /// Returns the errno-style status of this error.
    pub fn status(&self) -> BessStatus {
        match self {
            BessError::InvalidArgument { .. } => BessStatus::InvalidArgument,
            BessError::NotFound { .. } => BessStatus::NotFound,
            BessError::AlreadyExists { .. } => BessStatus::AlreadyExists,
            BessError::NoDevice { .. } => BessStatus::NoDevice,
        }
    }
}

/// Result type for engine operations.
pub type BessResult<T> = Result<T, BessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errno() {
        assert_eq!(BessStatus::NotFound.errno(), 2);
        assert_eq!(BessStatus::AlreadyExists.errno(), 17);
        assert_eq!(BessStatus::NoDevice.errno(), 19);
        assert_eq!(BessStatus::InvalidArgument.to_string(), "EINVAL");
    }

    #[test]
    fn test_error_status() {
        let err = BessError::already_exists("Port 'eth0' already exists");
        assert_eq!(err.status(), BessStatus::AlreadyExists);

        let err = BessError::no_device("Port id 3 is not available");
        assert_eq!(err.status(), BessStatus::NoDevice);
        assert_eq!(err.to_string(), "No such device: Port id 3 is not available");
    }

    #[test]
    fn test_error_display() {
        let err = BessError::not_found("No port 'eth9' found");
        assert_eq!(err.to_string(), "Not found: No port 'eth9' found");
    }
}
