//! Deferred results for async members.
//!
//! A [`PendingValue`] is settled exactly once, when it is created, and never
//! changes afterwards. It does not depend on an executor: awaiting it yields
//! immediately on any runtime, and [`PendingValue::settle`] resolves it
//! without one.

use crate::result::{Outcome, Thrown};
use crate::value::Value;
use std::fmt;
use std::future::{ready, IntoFuture, Ready};
use std::sync::Arc;

/// Handle to the eventual result of an async member
#[derive(Clone)]
pub struct PendingValue {
    settlement: Arc<Outcome>,
}

impl PendingValue {
    /// A pending value that resolves to `value`
    #[must_use]
    pub fn resolved(value: impl Into<Value>) -> Self {
        Self::from_outcome(Ok(value.into()))
    }

    /// A pending value that rejects with `reason`
    #[must_use]
    pub fn rejected(reason: Thrown) -> Self {
        Self::from_outcome(Err(reason))
    }

    /// Wrap an already computed outcome
    #[must_use]
    pub fn from_outcome(outcome: Outcome) -> Self {
        Self {
            settlement: Arc::new(outcome),
        }
    }

    /// Resolve synchronously
    pub fn settle(&self) -> Outcome {
        (*self.settlement).clone()
    }

    /// Whether the settlement is a value rather than a rejection
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.settlement.is_ok()
    }
}

impl fmt::Debug for PendingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.settlement {
            Ok(value) => f.debug_tuple("Resolved").field(value).finish(),
            Err(reason) => f.debug_tuple("Rejected").field(reason).finish(),
        }
    }
}

impl PartialEq for PendingValue {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.settlement, &other.settlement) {
            return true;
        }
        match (&*self.settlement, &*other.settlement) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl IntoFuture for PendingValue {
    type Output = Outcome;
    type IntoFuture = Ready<Outcome>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.settle())
    }
}
