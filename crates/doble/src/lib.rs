//! Doble: Dynamic Test Doubles for Rust
//!
//! Doble (Spanish: "double", as in stunt double) is a mock engine. A
//! hand-written or generated proxy implements the interface under test and
//! forwards every call to a [`Mock`]; test code decides what each call
//! returns, raises, or writes back through out/ref slots.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      DOBLE Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Test Code  │    │ Setup      │    │ Behavior   │            │
//! │   │ mock.setup │───►│ Registry   │◄───│ Execution  │            │
//! │   └────────────┘    └─────▲──────┘    └─────▲──────┘            │
//! │   ┌────────────┐    ┌─────┴──────┐          │                   │
//! │   │ Proxy      │───►│ Dispatch   │──────────┘                   │
//! │   │ (Foo impl) │    │ Engine     │                              │
//! │   └────────────┘    └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use doble::prelude::*;
//!
//! let foo = Interface::new("Foo").method(
//!     Method::new("add").param("n", ValueKind::Int).returns(ValueKind::Bool),
//! );
//! let mock = Mock::new(foo);
//! mock.setup("add", [it::in_range(0, 10, RangeKind::Inclusive)])
//!     .returns(true)
//!     .unwrap();
//!
//! assert_eq!(mock.call("add", &args![5]).unwrap(), Value::Bool(true));
//! assert_eq!(mock.call("add", &args![11]).unwrap(), Value::Bool(false));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Configured reactions to matched calls
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod behavior;

/// Mock configuration
pub mod config;

/// Declared error kinds for `throws_kind`
pub mod fault;

/// Argument matchers and the `it` constructors
#[allow(clippy::missing_errors_doc)]
pub mod matcher;

/// Mock instances, the setup builder and call dispatch
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod mock;

/// Pre-settled deferred results for async members
pub mod pending;

/// Append-only setup storage and resolution
#[allow(clippy::missing_errors_doc)]
pub mod registry;

mod result;

/// Interfaces, member identity and call signatures
#[allow(clippy::missing_errors_doc)]
pub mod signature;

/// Structured logging of mock activity
pub mod tracing_support;

/// Dynamic argument and result values
#[allow(clippy::missing_errors_doc)]
pub mod value;

/// Proptest strategies for values and matchers
#[cfg(feature = "proptest")]
pub mod strategies;

pub use behavior::Behavior;
pub use config::MockConfig;
pub use fault::{ArgumentError, ErrorKind, InvalidOperation};
pub use matcher::{it, Matcher, RangeKind, RegexOptions};
pub use mock::{Mock, Setup};
pub use pending::PendingValue;
pub use registry::SetupRegistry;
pub use result::{BoxError, DobleError, DobleResult, Fault, Outcome, Thrown};
pub use signature::{CallSignature, Interface, Member, MemberId, MemberKind, Method, Slots};
pub use value::{FromValue, Value, ValueKind};

/// Build a `Vec<Value>` argument list from anything convertible to [`Value`]
///
/// ```rust
/// use doble::{args, Value};
///
/// let args = args!["ping", 1, true];
/// assert_eq!(args, vec![Value::from("ping"), Value::Int(1), Value::Bool(true)]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

/// Prelude for convenient imports
pub mod prelude {
    pub use super::args;
    pub use super::behavior::Behavior;
    pub use super::config::MockConfig;
    pub use super::fault::{ArgumentError, ErrorKind, InvalidOperation};
    pub use super::matcher::{it, Matcher, RangeKind, RegexOptions};
    pub use super::mock::{Mock, Setup};
    pub use super::pending::PendingValue;
    pub use super::result::{DobleError, DobleResult, Fault, Outcome, Thrown};
    pub use super::signature::{Interface, MemberId, Method, Slots};
    pub use super::value::{FromValue, Value, ValueKind};
}
