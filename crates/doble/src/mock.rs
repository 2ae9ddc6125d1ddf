//! Mock Instances and Call Dispatch
//!
//! A [`Mock`] owns the setups of one substitute object. Test code configures
//! it through [`Mock::setup`]; the substitute forwards every call to
//! [`Mock::dispatch`].
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: Configuration mistakes stop the test at the `setup` line;
//!   raised errors surface exactly at the call that triggered them
//! - **Genchi Genbutsu**: Every registration and dispatch is traced, so a
//!   surprising result can be followed back to the setup that produced it
//!
//! ## Example
//!
//! ```rust
//! use doble::prelude::*;
//!
//! let foo = Interface::new("Foo").method(
//!     Method::new("do_something")
//!         .param("command", ValueKind::Str)
//!         .returns(ValueKind::Bool),
//! );
//! let mock = Mock::new(foo);
//! mock.setup("do_something", [it::eq("ping")]).returns(true).unwrap();
//!
//! assert_eq!(mock.call("do_something", &args!["ping"]).unwrap(), Value::Bool(true));
//! assert_eq!(mock.call("do_something", &args!["pong"]).unwrap(), Value::Bool(false));
//! ```

use crate::behavior::{Behavior, CallbackFn};
use crate::config::MockConfig;
use crate::fault::ErrorKind;
use crate::matcher::Matcher;
use crate::pending::PendingValue;
use crate::registry::SetupRegistry;
use crate::result::{BoxError, DobleError, DobleResult, Fault, Outcome, Thrown};
use crate::signature::{CallSignature, Interface, Member, MemberId, MemberKind, Slots};
use crate::tracing_support::{log_matched, log_registered, log_thrown, log_unmatched};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Substitute state for one interface under test
#[derive(Debug)]
pub struct Mock {
    id: Uuid,
    interface: Interface,
    config: MockConfig,
    registry: RefCell<SetupRegistry>,
    properties: RefCell<HashMap<String, Value>>,
}

impl Mock {
    /// Create a mock with default configuration
    #[must_use]
    pub fn new(interface: Interface) -> Self {
        Self::with_config(interface, MockConfig::default())
    }

    /// Create a mock with `config`
    #[must_use]
    pub fn with_config(interface: Interface, config: MockConfig) -> Self {
        let properties = if config.stub_properties {
            interface
                .writable_properties()
                .map(|m| (m.id.name.clone(), config.default_for(m.returns)))
                .collect()
        } else {
            HashMap::new()
        };
        Self {
            id: Uuid::new_v4(),
            interface,
            config,
            registry: RefCell::new(SetupRegistry::new()),
            properties: RefCell::new(properties),
        }
    }

    /// Unique id of this mock
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Name used in log events
    #[must_use]
    pub fn name(&self) -> &str {
        self.config
            .name
            .as_deref()
            .unwrap_or_else(|| self.interface.name())
    }

    /// Interface this mock substitutes
    #[must_use]
    pub const fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Number of registered setups
    #[must_use]
    pub fn setup_count(&self) -> usize {
        self.registry.borrow().len()
    }

    // =========================================================================
    // Setup API
    // =========================================================================

    /// Configure a method for calls whose arguments satisfy `matchers`
    pub fn setup<I>(&self, method: &str, matchers: I) -> Setup<'_>
    where
        I: IntoIterator<Item = Matcher>,
    {
        let matchers: Vec<Matcher> = matchers.into_iter().collect();
        let target = self
            .interface
            .resolve_method(method, matchers.len())
            .and_then(|member| Self::target(member, matchers));
        Setup::new(self, target)
    }

    /// Configure a property read
    pub fn setup_get(&self, property: &str) -> Setup<'_> {
        let target = self
            .interface
            .resolve_accessor(&MemberId::getter(property))
            .and_then(|member| Self::target(member, Vec::new()));
        Setup::new(self, target)
    }

    /// Configure a property write whose value satisfies `matcher`
    pub fn setup_set(&self, property: &str, matcher: Matcher) -> Setup<'_> {
        let target = self
            .interface
            .resolve_accessor(&MemberId::setter(property))
            .and_then(|member| Self::target(member, vec![matcher]));
        Setup::new(self, target)
    }

    /// Make a read/write property remember the last value set
    pub fn stub_property(&self, property: &str, initial: impl Into<Value>) -> DobleResult<()> {
        self.interface
            .resolve_accessor(&MemberId::getter(property))?;
        self.interface
            .resolve_accessor(&MemberId::setter(property))?;
        self.properties
            .borrow_mut()
            .insert(property.to_string(), initial.into());
        Ok(())
    }

    fn target(member: &Member, matchers: Vec<Matcher>) -> DobleResult<(Member, CallSignature)> {
        let signature = CallSignature::new(member, matchers)?;
        Ok((member.clone(), signature))
    }

    fn register(
        &self,
        member: &Member,
        signature: CallSignature,
        behavior: Behavior,
    ) -> DobleResult<()> {
        let behavior = if member.is_async {
            behavior.normalize_async()
        } else if behavior.contains_async() {
            return Err(DobleError::NotAsync {
                member: member.id.to_string(),
            });
        } else {
            behavior
        };
        behavior.check_returns(member)?;
        for position in behavior.output_positions() {
            let is_slot = member
                .params
                .get(position)
                .is_some_and(|p| p.mode.is_slot());
            if !is_slot {
                return Err(DobleError::NotASlot {
                    member: member.id.to_string(),
                    position,
                });
            }
        }
        let sequence = self.registry.borrow_mut().register(signature, behavior);
        log_registered(self.name(), &member.id, sequence);
        Ok(())
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Route one intercepted call.
    ///
    /// Resolves the newest matching setup and runs its behavior. An
    /// unmatched call returns the member's default result. Behaviors may
    /// call back into this or any other mock.
    pub fn dispatch(&self, member: &MemberId, args: &[Value], slots: &mut Slots) -> Outcome {
        let Some(decl) = self.interface.member(member) else {
            let err = self.missing_member(member);
            log_thrown(self.name(), member, &err);
            return Err(err);
        };
        if args.len() != decl.params.len() {
            return Err(Thrown::Arity {
                member: member.to_string(),
                expected: decl.params.len(),
                actual: args.len(),
            });
        }
        if member.kind == MemberKind::Setter {
            self.record_property(&member.name, &args[0]);
        }

        // Matchers and behaviors run against a snapshot, with no registry
        // borrow held, so both may re-enter the mock
        let candidates = self.registry.borrow().candidates(member);
        let resolved = SetupRegistry::select(&candidates, args);
        let outcome = match resolved {
            Ok(Some(hit)) => {
                log_matched(self.name(), member, hit.sequence);
                hit.behavior.execute(args, slots)
            }
            Ok(None) => {
                log_unmatched(self.name(), member, self.config.warn_on_unmatched);
                Ok(self.fallback(decl))
            }
            Err(thrown) => Err(thrown),
        };
        if let Err(thrown) = &outcome {
            log_thrown(self.name(), member, thrown);
        }
        outcome
    }

    /// Call a method without out/ref slots
    pub fn call(&self, method: &str, args: &[Value]) -> Outcome {
        self.dispatch(&MemberId::method(method, args.len()), args, &mut Slots::new())
    }

    /// Call a method, collecting out/ref writes in `slots`
    pub fn call_with_slots(&self, method: &str, args: &[Value], slots: &mut Slots) -> Outcome {
        self.dispatch(&MemberId::method(method, args.len()), args, slots)
    }

    /// Read a property
    pub fn get(&self, property: &str) -> Outcome {
        self.dispatch(&MemberId::getter(property), &[], &mut Slots::new())
    }

    /// Write a property
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Outcome {
        self.dispatch(&MemberId::setter(property), &[value.into()], &mut Slots::new())
    }

    fn missing_member(&self, member: &MemberId) -> Thrown {
        let overload = self
            .interface
            .members_named(&member.name)
            .find(|m| m.id.kind == member.kind);
        match overload {
            Some(m) => Thrown::Arity {
                member: member.name.clone(),
                expected: m.params.len(),
                actual: member.arity,
            },
            None => Thrown::UnknownMember {
                interface: self.interface.name().to_string(),
                member: member.to_string(),
            },
        }
    }

    fn record_property(&self, property: &str, value: &Value) {
        if let Some(slot) = self.properties.borrow_mut().get_mut(property) {
            *slot = value.clone();
        }
    }

    fn fallback(&self, decl: &Member) -> Value {
        if decl.id.kind == MemberKind::Getter {
            if let Some(stored) = self.properties.borrow().get(&decl.id.name) {
                return stored.clone();
            }
        }
        let value = self.config.default_for(decl.returns);
        if decl.is_async {
            Value::Pending(PendingValue::resolved(value))
        } else {
            value
        }
    }
}

/// Builder for one setup.
///
/// Nothing is registered until a terminal step (`returns`, `throws`, ...)
/// runs; the terminal step reports any configuration error.
#[must_use = "a setup is registered only by a terminal step such as `returns`"]
pub struct Setup<'m> {
    mock: &'m Mock,
    target: DobleResult<(Member, CallSignature)>,
    callbacks: Vec<CallbackFn>,
    outputs: Vec<(usize, Value)>,
}

impl fmt::Debug for Setup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setup")
            .field("mock", &self.mock.name())
            .field("target", &self.target.as_ref().map(|(m, _)| m.id.to_string()))
            .field("callbacks", &self.callbacks.len())
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl<'m> Setup<'m> {
    fn new(mock: &'m Mock, target: DobleResult<(Member, CallSignature)>) -> Self {
        Self {
            mock,
            target,
            callbacks: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Run `callback` with the call's arguments before producing the result
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[Value]) + 'static,
    {
        self.callbacks.push(Rc::new(move |args| {
            callback(args);
            Ok(())
        }));
        self
    }

    /// Like [`Setup::callback`]; an error becomes the call's raised error
    pub fn try_callback<F, E>(mut self, callback: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        self.callbacks.push(Rc::new(move |args| {
            callback(args).map_err(|e| Fault::from_boxed(e.into()))
        }));
        self
    }

    /// Write `value` into the out/ref slot at `position`
    pub fn sets_out(mut self, position: usize, value: impl Into<Value>) -> Self {
        self.outputs.push((position, value.into()));
        self
    }

    /// Return a constant
    pub fn returns(self, value: impl Into<Value>) -> DobleResult<()> {
        self.behaves(Behavior::returns(value))
    }

    /// Return the member's default result
    pub fn returns_default(self) -> DobleResult<()> {
        let value = match &self.target {
            Ok((member, _)) => self.mock.config.default_for(member.returns),
            Err(_) => Value::Unit,
        };
        self.behaves(Behavior::Return(value))
    }

    /// Return a value computed from the arguments
    pub fn returns_with<F, V>(self, compute: F) -> DobleResult<()>
    where
        F: Fn(&[Value]) -> V + 'static,
        V: Into<Value>,
    {
        self.behaves(Behavior::computed(compute))
    }

    /// Return a value computed by a function that may fail
    pub fn try_returns_with<F, V, E>(self, compute: F) -> DobleResult<()>
    where
        F: Fn(&[Value]) -> Result<V, E> + 'static,
        V: Into<Value>,
        E: Into<BoxError>,
    {
        self.behaves(Behavior::try_computed(compute))
    }

    /// Resolve the member's pending result to `value`
    pub fn returns_async(self, value: impl Into<Value>) -> DobleResult<()> {
        self.behaves(Behavior::async_wrap(Behavior::returns(value)))
    }

    /// Resolve the member's pending result to a computed value
    pub fn returns_async_with<F, V>(self, compute: F) -> DobleResult<()>
    where
        F: Fn(&[Value]) -> V + 'static,
        V: Into<Value>,
    {
        self.behaves(Behavior::async_wrap(Behavior::computed(compute)))
    }

    /// Raise `error`
    pub fn throws<E>(self, error: E) -> DobleResult<()>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.behaves(Behavior::throws(error))
    }

    /// Raise a new `E` with its default message
    pub fn throws_kind<E: ErrorKind>(self) -> DobleResult<()> {
        self.behaves(Behavior::throws_kind::<E>())
    }

    /// Raise a new `E` with `message`
    pub fn throws_kind_with<E: ErrorKind>(self, message: &str) -> DobleResult<()> {
        self.behaves(Behavior::throws_kind_with::<E>(message))
    }

    /// Reject the member's pending result with `error`
    pub fn throws_async<E>(self, error: E) -> DobleResult<()>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.behaves(Behavior::async_wrap(Behavior::throws(error)))
    }

    /// Register `behavior`, wrapped by the accumulated callbacks and outputs
    pub fn behaves(self, behavior: Behavior) -> DobleResult<()> {
        let (member, signature) = self.target?;
        let mut behavior = behavior;
        if !self.outputs.is_empty() {
            behavior = Behavior::set_outputs(self.outputs, behavior);
        }
        for callback in self.callbacks.into_iter().rev() {
            behavior = Behavior::callback(callback, behavior);
        }
        self.mock.register(&member, signature, behavior)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fault::{ArgumentError, InvalidOperation};
    use crate::matcher::{it, RangeKind, RegexOptions};
    use crate::signature::Method;
    use crate::value::ValueKind;
    use crate::args;

    fn foo() -> Interface {
        Interface::new("Foo")
            .method(
                Method::new("do_something")
                    .param("command", ValueKind::Str)
                    .returns(ValueKind::Bool),
            )
            .method(
                Method::new("do_something_stringy")
                    .param("command", ValueKind::Str)
                    .returns(ValueKind::Str),
            )
            .method(
                Method::new("try_parse")
                    .param("value", ValueKind::Str)
                    .out_param("result", ValueKind::Str)
                    .returns(ValueKind::Bool),
            )
            .method(
                Method::new("submit")
                    .ref_param("bar", ValueKind::Record)
                    .returns(ValueKind::Bool),
            )
            .method(Method::new("add").param("n", ValueKind::Int).returns(ValueKind::Bool))
            .method(Method::new("do_something_async").returns_async(ValueKind::Bool))
            .property("name", ValueKind::Str)
    }

    mod setup_tests {
        use super::*;

        #[test]
        fn test_setup_and_call() {
            let mock = Mock::new(foo());
            mock.setup("do_something", [it::eq("ping")]).returns(true).unwrap();
            assert_eq!(mock.call("do_something", &args!["ping"]).unwrap(), Value::Bool(true));
            assert_eq!(mock.setup_count(), 1);
        }

        #[test]
        fn test_unknown_member_is_config_error() {
            let mock = Mock::new(foo());
            let err = mock.setup("explode", []).returns(true).unwrap_err();
            assert!(matches!(err, DobleError::UnknownMember { .. }));
            assert_eq!(mock.setup_count(), 0);
        }

        #[test]
        fn test_arity_mismatch_is_config_error() {
            let mock = Mock::new(foo());
            let err = mock
                .setup("do_something", [it::any(), it::any()])
                .returns(true)
                .unwrap_err();
            assert!(matches!(err, DobleError::ArityMismatch { expected: 1, actual: 2, .. }));
        }

        #[test]
        fn test_return_kind_checked() {
            let mock = Mock::new(foo());
            let err = mock.setup("do_something", [it::any()]).returns("yes").unwrap_err();
            assert!(matches!(
                err,
                DobleError::ReturnKind {
                    expected: ValueKind::Bool,
                    found: ValueKind::Str,
                    ..
                }
            ));
        }

        #[test]
        fn test_sets_out_requires_slot() {
            let mock = Mock::new(foo());
            let err = mock
                .setup("do_something", [it::any()])
                .sets_out(0, "x")
                .returns(true)
                .unwrap_err();
            assert!(matches!(err, DobleError::NotASlot { position: 0, .. }));
        }

        #[test]
        fn test_async_behavior_on_sync_member() {
            let mock = Mock::new(foo());
            let err = mock
                .setup("do_something", [it::any()])
                .returns_async(true)
                .unwrap_err();
            assert!(matches!(err, DobleError::NotAsync { .. }));
        }

        #[test]
        fn test_invalid_range_bounds_rejected() {
            let mock = Mock::new(foo());
            let err = mock
                .setup("add", [it::in_range("a", 10, RangeKind::Inclusive)])
                .returns(true)
                .unwrap_err();
            assert!(matches!(err, DobleError::NonOrdinalRange { .. }));
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_unmatched_returns_default() {
            let mock = Mock::new(foo());
            assert_eq!(mock.call("do_something", &args!["x"]).unwrap(), Value::Bool(false));
            assert_eq!(
                mock.call("do_something_stringy", &args!["x"]).unwrap(),
                Value::from("")
            );
            assert_eq!(mock.get("name").unwrap(), Value::from(""));
        }

        #[test]
        fn test_configured_default_override() {
            let config = MockConfig::new().with_default(ValueKind::Str, "n/a");
            let mock = Mock::with_config(foo(), config);
            assert_eq!(
                mock.call("do_something_stringy", &args!["x"]).unwrap(),
                Value::from("n/a")
            );
        }

        #[test]
        fn test_unknown_member_at_dispatch() {
            let mock = Mock::new(foo());
            let err = mock.call("explode", &[]).unwrap_err();
            assert!(matches!(err, Thrown::UnknownMember { .. }));
        }

        #[test]
        fn test_arity_mismatch_at_dispatch() {
            let mock = Mock::new(foo());
            let err = mock
                .dispatch(&MemberId::method("add", 1), &[], &mut Slots::new())
                .unwrap_err();
            assert!(matches!(err, Thrown::Arity { expected: 1, actual: 0, .. }));
            let err = mock.call("add", &args![1, 2]).unwrap_err();
            assert!(matches!(err, Thrown::Arity { expected: 1, actual: 2, .. }));
        }

        #[test]
        fn test_throws_per_argument() {
            let mock = Mock::new(foo());
            mock.setup("do_something", [it::eq("reset")])
                .throws_kind::<InvalidOperation>()
                .unwrap();
            mock.setup("do_something", [it::eq("")])
                .throws(ArgumentError::new("command"))
                .unwrap();
            assert!(mock
                .call("do_something", &args!["reset"])
                .unwrap_err()
                .is::<InvalidOperation>());
            let err = mock.call("do_something", &args![""]).unwrap_err();
            assert_eq!(err.downcast_ref::<ArgumentError>().unwrap().message, "command");
            assert_eq!(mock.call("do_something", &args!["ok"]).unwrap(), Value::Bool(false));
        }

        #[test]
        fn test_regex_and_range() {
            let mock = Mock::new(foo());
            mock.setup(
                "do_something_stringy",
                [it::regex("[a-d]+", RegexOptions::IGNORE_CASE)],
            )
            .returns("foo")
            .unwrap();
            mock.setup("add", [it::in_range(0, 10, RangeKind::Inclusive)])
                .returns(true)
                .unwrap();
            assert_eq!(
                mock.call("do_something_stringy", &args!["a"]).unwrap(),
                Value::from("foo")
            );
            assert_eq!(mock.call("add", &args![10]).unwrap(), Value::Bool(true));
            assert_eq!(mock.call("add", &args![11]).unwrap(), Value::Bool(false));
        }

        #[test]
        fn test_out_slot_written() {
            let mock = Mock::new(foo());
            mock.setup("try_parse", [it::eq("ping"), it::any_ref()])
                .sets_out(1, "ack")
                .returns(true)
                .unwrap();
            let mut slots = Slots::new();
            let out = mock
                .call_with_slots("try_parse", &args!["ping", ()], &mut slots)
                .unwrap();
            assert_eq!(out, Value::Bool(true));
            assert_eq!(slots.take(1), Some(Value::from("ack")));
        }

        #[test]
        fn test_callbacks_run_in_order() {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let (a, b) = (Rc::clone(&seen), Rc::clone(&seen));
            let mock = Mock::new(foo());
            mock.setup("do_something", [it::any()])
                .callback(move |_| a.borrow_mut().push(1))
                .callback(move |_| b.borrow_mut().push(2))
                .returns(true)
                .unwrap();
            mock.call("do_something", &args!["x"]).unwrap();
            assert_eq!(*seen.borrow(), vec![1, 2]);
        }

        #[test]
        fn test_reentrant_behavior() {
            let mock = Rc::new(Mock::new(foo()));
            let weak = Rc::downgrade(&mock);
            mock.setup("do_something_stringy", [it::any()])
                .returns_with(move |args| {
                    let inner = weak.upgrade().unwrap();
                    let ok = inner.call("do_something", args).unwrap();
                    format!("inner={ok}")
                })
                .unwrap();
            mock.setup("do_something", [it::eq("x")]).returns(true).unwrap();
            assert_eq!(
                mock.call("do_something_stringy", &args!["x"]).unwrap(),
                Value::from("inner=true")
            );
        }

        #[test]
        fn test_setup_inside_callback() {
            let mock = Rc::new(Mock::new(foo()));
            let weak = Rc::downgrade(&mock);
            mock.setup("do_something", [it::eq("arm")])
                .callback(move |_| {
                    let inner = weak.upgrade().unwrap();
                    inner.setup("add", [it::any()]).returns(true).unwrap();
                })
                .returns(true)
                .unwrap();
            assert_eq!(mock.call("add", &args![1]).unwrap(), Value::Bool(false));
            mock.call("do_something", &args!["arm"]).unwrap();
            assert_eq!(mock.call("add", &args![1]).unwrap(), Value::Bool(true));
        }

        #[test]
        fn test_setup_inside_predicate() {
            let mock = Rc::new(Mock::new(foo()));
            let weak = Rc::downgrade(&mock);
            mock.setup(
                "add",
                [it::is(move |_| {
                    let inner = weak.upgrade().unwrap();
                    inner.setup("add", [it::any()]).returns(false).unwrap();
                    true
                })],
            )
            .returns(true)
            .unwrap();
            // The setup made while matching applies from the next call on
            assert_eq!(mock.call("add", &args![1]).unwrap(), Value::Bool(true));
            assert_eq!(mock.setup_count(), 2);
            assert_eq!(mock.call("add", &args![1]).unwrap(), Value::Bool(false));
        }
    }

    mod async_tests {
        use super::*;

        fn settle(mock: &Mock) -> Outcome {
            mock.call("do_something_async", &[])
                .unwrap()
                .into_typed::<PendingValue>()
                .unwrap()
                .settle()
        }

        #[test]
        fn test_unmatched_async_resolves_default() {
            let mock = Mock::new(foo());
            assert_eq!(settle(&mock).unwrap(), Value::Bool(false));
        }

        #[test]
        fn test_configuration_shapes_are_equivalent() {
            let shapes: [fn(Setup<'_>) -> DobleResult<()>; 4] = [
                |s| s.returns_async(true),
                |s| s.returns(true),
                |s| s.returns(PendingValue::resolved(true)),
                |s| s.returns_async_with(|_| true),
            ];
            for shape in shapes {
                let mock = Mock::new(foo());
                shape(mock.setup("do_something_async", [])).unwrap();
                assert_eq!(settle(&mock).unwrap(), Value::Bool(true));
            }
        }

        #[test]
        fn test_last_async_registration_wins() {
            let mock = Mock::new(foo());
            mock.setup("do_something_async", []).returns_async(false).unwrap();
            mock.setup("do_something_async", []).returns(true).unwrap();
            assert_eq!(settle(&mock).unwrap(), Value::Bool(true));
        }

        #[test]
        fn test_throws_async_rejects() {
            let mock = Mock::new(foo());
            mock.setup("do_something_async", [])
                .throws_async(InvalidOperation::default())
                .unwrap();
            assert!(settle(&mock).unwrap_err().is::<InvalidOperation>());
        }

        #[test]
        fn test_sync_throw_on_async_member() {
            let mock = Mock::new(foo());
            mock.setup("do_something_async", [])
                .throws_kind::<InvalidOperation>()
                .unwrap();
            let err = mock.call("do_something_async", &[]).unwrap_err();
            assert!(err.is::<InvalidOperation>());
        }
    }

    mod property_tests {
        use super::*;

        #[test]
        fn test_getter_setup() {
            let mock = Mock::new(foo());
            mock.setup_get("name").returns("bar").unwrap();
            assert_eq!(mock.get("name").unwrap(), Value::from("bar"));
        }

        #[test]
        fn test_unstubbed_property_forgets_writes() {
            let mock = Mock::new(foo());
            mock.set("name", "x").unwrap();
            assert_eq!(mock.get("name").unwrap(), Value::from(""));
        }

        #[test]
        fn test_stub_property_remembers_writes() {
            let mock = Mock::new(foo());
            mock.stub_property("name", "initial").unwrap();
            assert_eq!(mock.get("name").unwrap(), Value::from("initial"));
            mock.set("name", "changed").unwrap();
            assert_eq!(mock.get("name").unwrap(), Value::from("changed"));
        }

        #[test]
        fn test_stub_all_properties() {
            let mock = Mock::with_config(foo(), MockConfig::new().with_stubbed_properties());
            mock.set("name", "auto").unwrap();
            assert_eq!(mock.get("name").unwrap(), Value::from("auto"));
        }

        #[test]
        fn test_getter_setup_beats_stored_value() {
            let mock = Mock::new(foo());
            mock.stub_property("name", "stored").unwrap();
            mock.setup_get("name").returns("configured").unwrap();
            assert_eq!(mock.get("name").unwrap(), Value::from("configured"));
        }

        #[test]
        fn test_setter_setup_still_records() {
            let seen = Rc::new(RefCell::new(Value::Unit));
            let sink = Rc::clone(&seen);
            let mock = Mock::new(foo());
            mock.stub_property("name", "").unwrap();
            mock.setup_set("name", it::any())
                .callback(move |args| *sink.borrow_mut() = args[0].clone())
                .returns_default()
                .unwrap();
            mock.set("name", "v").unwrap();
            assert_eq!(*seen.borrow(), Value::from("v"));
            assert_eq!(mock.get("name").unwrap(), Value::from("v"));
        }

        #[test]
        fn test_stub_unknown_property() {
            let mock = Mock::new(foo());
            assert!(mock.stub_property("missing", 1).is_err());
        }
    }

    mod identity_tests {
        use super::*;

        #[test]
        fn test_name_and_id() {
            let a = Mock::new(foo());
            let b = Mock::with_config(foo(), MockConfig::new().with_name("custom"));
            assert_ne!(a.id(), b.id());
            assert_eq!(a.name(), "Foo");
            assert_eq!(b.name(), "custom");
            assert_eq!(a.interface().name(), "Foo");
            assert!(b.config().name.is_some());
        }

        #[test]
        fn test_setup_debug() {
            let mock = Mock::new(foo());
            let setup = mock.setup("add", [it::any()]).sets_out(0, 1);
            let text = format!("{setup:?}");
            assert!(text.contains("add/1"));
            setup.returns_default().unwrap_err();
        }
    }
}
