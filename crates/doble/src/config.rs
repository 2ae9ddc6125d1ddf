//! Mock configuration.

use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a [`crate::Mock`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Name used in log events; defaults to the interface name
    pub name: Option<String>,
    /// Log unmatched calls at `warn` instead of `debug`
    pub warn_on_unmatched: bool,
    /// Every read/write property remembers the last value set
    pub stub_properties: bool,
    /// Result returned for unmatched calls, per declared kind
    pub default_values: HashMap<ValueKind, Value>,
}

impl MockConfig {
    /// Create a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log name
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Log unmatched calls at `warn`
    #[must_use]
    pub const fn with_warn_on_unmatched(mut self) -> Self {
        self.warn_on_unmatched = true;
        self
    }

    /// Stub every read/write property
    #[must_use]
    pub const fn with_stubbed_properties(mut self) -> Self {
        self.stub_properties = true;
        self
    }

    /// Override the unmatched-call result for one kind
    #[must_use]
    pub fn with_default(mut self, kind: ValueKind, value: impl Into<Value>) -> Self {
        self.default_values.insert(kind, value.into());
        self
    }

    /// Result for an unmatched call whose declared kind is `kind`
    #[must_use]
    pub fn default_for(&self, kind: ValueKind) -> Value {
        self.default_values
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Value::zero(kind))
    }
}
