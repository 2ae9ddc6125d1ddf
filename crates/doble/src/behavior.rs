//! Behavior Execution
//!
//! A [`Behavior`] is the configured reaction to a matched call. It is a
//! closed sum type: every variant is handled in [`Behavior::execute`].
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: Errors from computed values and callbacks surface as the
//!   call's result; nothing downstream runs after a throw
//! - **Heijunka**: Every async configuration shape is levelled to one
//!   representation when the setup is registered

use crate::fault::{factory_for, ErrorKind, FaultFactory};
use crate::pending::PendingValue;
use crate::result::{BoxError, DobleError, DobleResult, Fault, Outcome, Thrown};
use crate::signature::{Member, Slots};
use crate::value::{Value, ValueKind};
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

/// Function computing a result from the call's arguments
pub type ComputeFn = Rc<dyn Fn(&[Value]) -> Result<Value, Fault>>;

/// Side-effecting function run before the delegate behavior
pub type CallbackFn = Rc<dyn Fn(&[Value]) -> Result<(), Fault>>;

/// Configured reaction to a matched call
#[derive(Clone)]
pub enum Behavior {
    /// Return a constant
    Return(Value),
    /// Return a value computed from the arguments
    Compute(ComputeFn),
    /// Write out/ref slots, then run the delegate
    SetOutputs {
        /// `(position, value)` pairs
        outputs: Vec<(usize, Value)>,
        /// Delegate producing the result
        then: Box<Behavior>,
    },
    /// Raise a pre-built error
    Throw(Fault),
    /// Raise a freshly constructed error of a declared kind
    ThrowKind {
        /// Constructor for the kind
        factory: FaultFactory,
        /// Message override
        message: Option<String>,
    },
    /// Run a callback, then the delegate
    Callback {
        /// Side effect
        callback: CallbackFn,
        /// Delegate producing the result
        then: Box<Behavior>,
    },
    /// Wrap the inner result in a pending value
    Async(Box<Behavior>),
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Return(v) => f.debug_tuple("Return").field(v).finish(),
            Self::Compute(_) => f.write_str("Compute(..)"),
            Self::SetOutputs { outputs, then } => f
                .debug_struct("SetOutputs")
                .field("outputs", outputs)
                .field("then", then)
                .finish(),
            Self::Throw(fault) => f.debug_tuple("Throw").field(fault).finish(),
            Self::ThrowKind { message, .. } => f
                .debug_struct("ThrowKind")
                .field("message", message)
                .finish_non_exhaustive(),
            Self::Callback { then, .. } => f
                .debug_struct("Callback")
                .field("then", then)
                .finish_non_exhaustive(),
            Self::Async(inner) => f.debug_tuple("Async").field(inner).finish(),
        }
    }
}

impl Behavior {
    /// Return a constant
    #[must_use]
    pub fn returns(value: impl Into<Value>) -> Self {
        Self::Return(value.into())
    }

    /// Return a value computed from the arguments
    #[must_use]
    pub fn computed<F, V>(compute: F) -> Self
    where
        F: Fn(&[Value]) -> V + 'static,
        V: Into<Value>,
    {
        Self::Compute(Rc::new(move |args| Ok(compute(args).into())))
    }

    /// Return a value computed by a function that may fail
    #[must_use]
    pub fn try_computed<F, V, E>(compute: F) -> Self
    where
        F: Fn(&[Value]) -> Result<V, E> + 'static,
        V: Into<Value>,
        E: Into<BoxError>,
    {
        Self::Compute(Rc::new(move |args| {
            compute(args)
                .map(Into::into)
                .map_err(|e| Fault::from_boxed(e.into()))
        }))
    }

    /// Raise `error` on every call
    #[must_use]
    pub fn throws<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Throw(Fault::new(error))
    }

    /// Raise a new `E` with its default message on every call
    #[must_use]
    pub fn throws_kind<E: ErrorKind>() -> Self {
        Self::ThrowKind {
            factory: factory_for::<E>(),
            message: None,
        }
    }

    /// Raise a new `E` with `message` on every call
    #[must_use]
    pub fn throws_kind_with<E: ErrorKind>(message: &str) -> Self {
        Self::ThrowKind {
            factory: factory_for::<E>(),
            message: Some(message.to_string()),
        }
    }

    /// Run `callback` before `then`
    #[must_use]
    pub fn callback(callback: CallbackFn, then: Self) -> Self {
        Self::Callback {
            callback,
            then: Box::new(then),
        }
    }

    /// Write `outputs` before `then`
    #[must_use]
    pub fn set_outputs(outputs: Vec<(usize, Value)>, then: Self) -> Self {
        Self::SetOutputs {
            outputs,
            then: Box::new(then),
        }
    }

    /// Deliver `inner`'s result through a pending value
    #[must_use]
    pub fn async_wrap(inner: Self) -> Self {
        Self::Async(Box::new(inner))
    }

    /// Run the behavior against one call.
    ///
    /// `args` are the positional arguments, `slots` receives out/ref writes.
    pub fn execute(&self, args: &[Value], slots: &mut Slots) -> Outcome {
        match self {
            Self::Return(value) => Ok(value.clone()),
            Self::Compute(compute) => compute(args).map_err(Thrown::Raised),
            Self::SetOutputs { outputs, then } => {
                for (position, value) in outputs {
                    slots.write(*position, value.clone());
                }
                then.execute(args, slots)
            }
            Self::Throw(fault) => Err(Thrown::Raised(fault.clone())),
            Self::ThrowKind { factory, message } => {
                Err(Thrown::Raised(factory(message.as_deref())))
            }
            Self::Callback { callback, then } => {
                callback(args).map_err(Thrown::Raised)?;
                then.execute(args, slots)
            }
            Self::Async(inner) => match inner.execute(args, slots) {
                // A computed pending value is already the deferred result
                Ok(Value::Pending(pending)) => Ok(Value::Pending(pending)),
                outcome => Ok(Value::Pending(PendingValue::from_outcome(outcome))),
            },
        }
    }

    /// Level every value-producing shape of an async member to `Async(inner)`.
    ///
    /// Synchronous throws stay synchronous.
    #[must_use]
    pub fn normalize_async(self) -> Self {
        match self {
            // A configured pending value is handed out as is, so its rejection
            // reaches the caller unchanged
            Self::Return(_) | Self::Compute(_) => Self::async_wrap(self),
            Self::SetOutputs { outputs, then } => {
                Self::set_outputs(outputs, then.normalize_async())
            }
            Self::Callback { callback, then } => Self::callback(callback, then.normalize_async()),
            Self::Async(_) | Self::Throw(_) | Self::ThrowKind { .. } => self,
        }
    }

    /// Slot positions this behavior writes
    #[must_use]
    pub fn output_positions(&self) -> Vec<usize> {
        match self {
            Self::SetOutputs { outputs, then } => {
                let mut positions: Vec<usize> = outputs.iter().map(|(p, _)| *p).collect();
                positions.extend(then.output_positions());
                positions
            }
            Self::Callback { then, .. } | Self::Async(then) => then.output_positions(),
            _ => Vec::new(),
        }
    }

    /// Whether any step delivers its result through a pending value
    #[must_use]
    pub fn contains_async(&self) -> bool {
        match self {
            Self::Async(_) => true,
            Self::Return(value) => value.kind() == ValueKind::Pending,
            Self::SetOutputs { then, .. } | Self::Callback { then, .. } => then.contains_async(),
            Self::Compute(_) | Self::Throw(_) | Self::ThrowKind { .. } => false,
        }
    }

    /// Check every constant result against the member's declared kind
    pub(crate) fn check_returns(&self, member: &Member) -> DobleResult<()> {
        match self {
            Self::Return(value) => {
                let found = match value {
                    Value::Pending(pending) if member.is_async => match pending.settle() {
                        Ok(settled) => settled.kind(),
                        Err(_) => member.returns,
                    },
                    other => other.kind(),
                };
                let fits = found == member.returns;
                if fits {
                    Ok(())
                } else {
                    Err(DobleError::ReturnKind {
                        member: member.id.to_string(),
                        expected: member.returns,
                        found,
                    })
                }
            }
            Self::SetOutputs { then, .. } | Self::Callback { then, .. } | Self::Async(then) => {
                then.check_returns(member)
            }
            Self::Compute(_) | Self::Throw(_) | Self::ThrowKind { .. } => Ok(()),
        }
    }
}
