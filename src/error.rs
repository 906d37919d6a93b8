//! Error types for the strip controller

use core::fmt;

/// Error type for strip controller operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Bad strip or pixel counts, mismatched tables, zero frame rate
    InvalidParameter,
    /// Neither memory pool could satisfy a buffer request
    AllocationFailure,
    /// The transmit peripheral could not be set up for an output
    HardwareConfigFailure,
    /// The transmit peripheral did not accept a frame
    TransmissionFailure,
    /// The controller has no buffers (not initialized, or deinitialized)
    NotInitialized,
    /// `initialize` was called on an initialized controller
    AlreadyInitialized,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter => write!(f, "Invalid parameter"),
            Error::AllocationFailure => write!(f, "Frame buffer allocation failed"),
            Error::HardwareConfigFailure => write!(f, "Output configuration failed"),
            Error::TransmissionFailure => write!(f, "Frame transmission failed"),
            Error::NotInitialized => write!(f, "Controller is not initialized"),
            Error::AlreadyInitialized => write!(f, "Controller is already initialized"),
        }
    }
}

impl core::error::Error for Error {}
