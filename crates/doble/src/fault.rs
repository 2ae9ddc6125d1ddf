//! Error kinds a setup can raise by declaration.
//!
//! `throws(err)` raises a pre-built error value on every call.
//! `throws_kind::<E>()` instead constructs a fresh `E` per call through
//! [`ErrorKind`], optionally with a message override.

use crate::result::Fault;
use std::error::Error as StdError;
use thiserror::Error;

/// An error type that can be constructed from an optional message
pub trait ErrorKind: StdError + Send + Sync + Sized + 'static {
    /// Build an instance; `None` means the kind's default message
    fn construct(message: Option<&str>) -> Self;
}

/// Constructor stored by a declared-kind throw
pub(crate) type FaultFactory = fn(Option<&str>) -> Fault;

pub(crate) fn factory_for<E: ErrorKind>() -> FaultFactory {
    |message| Fault::new(E::construct(message))
}

/// The member was called while the object was in a state that forbids it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidOperation {
    /// Error message
    pub message: String,
}

impl InvalidOperation {
    /// Default message
    pub const DEFAULT_MESSAGE: &'static str =
        "Operation is not valid due to the current state of the object.";

    /// Create with a custom message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for InvalidOperation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

impl ErrorKind for InvalidOperation {
    fn construct(message: Option<&str>) -> Self {
        message.map_or_else(Self::default, Self::new)
    }
}

/// An argument supplied to the member was not acceptable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ArgumentError {
    /// Error message
    pub message: String,
}

impl ArgumentError {
    /// Default message
    pub const DEFAULT_MESSAGE: &'static str = "Value does not fall within the expected range.";

    /// Create with a custom message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for ArgumentError {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

impl ErrorKind for ArgumentError {
    fn construct(message: Option<&str>) -> Self {
        message.map_or_else(Self::default, Self::new)
    }
}
