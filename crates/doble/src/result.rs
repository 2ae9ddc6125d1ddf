//! Result and error types for Doble.
//!
//! Two error families exist. [`DobleError`] is a configuration error: a setup
//! that cannot be registered. It is returned to the test code that attempted
//! the registration. [`Thrown`] is what a dispatched call raises at the call
//! site of the substitute object.

use crate::value::ValueKind;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for Doble configuration operations
pub type DobleResult<T> = Result<T, DobleError>;

/// Result of a dispatched call: the produced value or the raised error
pub type Outcome = Result<crate::value::Value, Thrown>;

/// Boxed error accepted from user-supplied closures
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors raised while registering a setup
#[derive(Debug, Error)]
pub enum DobleError {
    /// The interface has no member with that name and shape
    #[error("Interface `{interface}` has no member `{member}`")]
    UnknownMember {
        /// Interface name
        interface: String,
        /// Requested member
        member: String,
    },

    /// Matcher count differs from the member's parameter count
    #[error("`{member}` takes {expected} arguments but the setup supplies {actual} matchers")]
    ArityMismatch {
        /// Member display name
        member: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied matcher count
        actual: usize,
    },

    /// A range matcher was built from bounds that cannot be ordered
    #[error("Range matcher at argument {position} of `{member}` needs numeric bounds, found {low} and {high}")]
    NonOrdinalRange {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
        /// Kind of the lower bound
        low: ValueKind,
        /// Kind of the upper bound
        high: ValueKind,
    },

    /// A range matcher was placed on a parameter whose declared kind has no numeric order
    #[error("Argument {position} of `{member}` is declared {kind} and cannot use a range matcher")]
    RangeOnNonOrdinalParam {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
        /// Declared parameter kind
        kind: ValueKind,
    },

    /// An exact-value or set matcher holds a value the parameter can never receive
    #[error("Argument {position} of `{member}` is declared {expected}, but its {matcher} matcher holds a {found} value")]
    MatcherKind {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
        /// Matcher variant name
        matcher: &'static str,
        /// Declared parameter kind
        expected: ValueKind,
        /// Kind of the held value
        found: ValueKind,
    },

    /// Regular expression failed to compile
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// Source pattern
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// A matcher was placed on a parameter whose mode does not allow it
    #[error("Argument {position} of `{member}` is a {mode} parameter and cannot use a {matcher} matcher")]
    SlotMatcher {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
        /// Parameter mode name
        mode: &'static str,
        /// Matcher variant name
        matcher: &'static str,
    },

    /// An output assignment targets a position that is not an out/ref slot
    #[error("Argument {position} of `{member}` is not an out or ref parameter")]
    NotASlot {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
    },

    /// Constant return value does not fit the declared result kind
    #[error("`{member}` returns {expected}, but the setup returns {found}")]
    ReturnKind {
        /// Member display name
        member: String,
        /// Declared result kind
        expected: ValueKind,
        /// Kind of the configured value
        found: ValueKind,
    },

    /// An async-only behavior was configured for a synchronous member
    #[error("`{member}` is not async and cannot return a pending value")]
    NotAsync {
        /// Member display name
        member: String,
    },

    /// JSON conversion error (record values)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A shared, cloneable error value.
///
/// Configured throws and errors returned by user closures are stored as a
/// `Fault` so one behavior can raise the same error on every call.
#[derive(Clone)]
pub struct Fault(Arc<dyn StdError + Send + Sync + 'static>);

impl Fault {
    /// Wrap an error
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Wrap an already boxed error
    #[must_use]
    pub fn from_boxed(error: BoxError) -> Self {
        Self(Arc::from(error))
    }

    /// Borrow the wrapped error as a concrete type
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// Check whether the wrapped error is of type `E`
    #[must_use]
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.0.is::<E>()
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Errors raised at the call site of a dispatched call
#[derive(Debug, Clone, Error)]
pub enum Thrown {
    /// A configured throw, or an error returned by a computed value or callback
    #[error(transparent)]
    Raised(Fault),

    /// A predicate matcher returned an error while evaluating a call
    #[error("Matcher for argument {position} of `{member}` failed: {source}")]
    Matcher {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
        /// Error returned by the predicate
        source: Fault,
    },

    /// A range matcher saw an argument that has no numeric order
    #[error("Range matcher for argument {position} of `{member}` cannot order a {found} value")]
    NonOrdinal {
        /// Member display name
        member: String,
        /// Parameter position
        position: usize,
        /// Kind of the actual argument
        found: ValueKind,
    },

    /// The proxy dispatched with the wrong number of arguments
    #[error("`{member}` expects {expected} arguments, got {actual}")]
    Arity {
        /// Member display name
        member: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// The proxy dispatched to a member the interface does not declare
    #[error("Interface `{interface}` has no member `{member}`")]
    UnknownMember {
        /// Interface name
        interface: String,
        /// Requested member
        member: String,
    },

    /// A dispatch result could not be extracted as the requested type
    #[error("Expected a {expected} value, found {found}")]
    TypeMismatch {
        /// Requested kind
        expected: ValueKind,
        /// Actual kind
        found: ValueKind,
    },
}

impl Thrown {
    /// Raise an arbitrary error
    #[must_use]
    pub fn raise<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Raised(Fault::new(error))
    }

    /// Borrow the raised error as a concrete type.
    ///
    /// Only [`Thrown::Raised`] carries a user error; every other variant
    /// returns `None`.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Raised(fault) => fault.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Check whether the raised error is of type `E`
    #[must_use]
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }
}

impl From<Fault> for Thrown {
    fn from(fault: Fault) -> Self {
        Self::Raised(fault)
    }
}
