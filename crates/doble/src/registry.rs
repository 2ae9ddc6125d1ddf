//! Setup Registry
//!
//! Append-only store of `(CallSignature, Behavior)` entries for one mock.
//!
//! ## Toyota Way Application
//!
//! - **Heijunka**: Registration never edits existing entries; overriding a
//!   setup is just registering a newer one
//! - **Poka-Yoke**: Resolution scans newest-first, so the latest matching
//!   setup always wins and the choice is deterministic

use crate::behavior::Behavior;
use crate::matcher::MatchError;
use crate::result::Thrown;
use crate::signature::{CallSignature, MemberId};
use crate::value::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// One registered setup
#[derive(Debug, Clone)]
pub struct SetupEntry {
    /// Registration order across the whole registry
    pub sequence: u64,
    /// Member and matchers
    pub signature: CallSignature,
    /// Reaction to a matching call
    pub behavior: Behavior,
}

impl SetupEntry {
    /// Whether every matcher accepts its argument.
    ///
    /// Stops at the first matcher that rejects. A call with a different
    /// argument count never matches.
    pub fn accepts(&self, args: &[Value]) -> Result<bool, Thrown> {
        if args.len() != self.signature.matchers().len() {
            return Ok(false);
        }
        for (position, (matcher, actual)) in
            self.signature.matchers().iter().zip(args).enumerate()
        {
            let accepted = matcher.matches(actual).map_err(|e| {
                let member = self.signature.member().to_string();
                match e {
                    MatchError::Predicate(source) => Thrown::Matcher {
                        member,
                        position,
                        source,
                    },
                    MatchError::NonOrdinal(found) => Thrown::NonOrdinal {
                        member,
                        position,
                        found,
                    },
                }
            })?;
            if !accepted {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// The entry chosen for a call
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Sequence number of the chosen entry
    pub sequence: u64,
    /// Its behavior
    pub behavior: Behavior,
}

/// Ordered setups of one mock, grouped by member
#[derive(Debug, Default)]
pub struct SetupRegistry {
    by_member: HashMap<MemberId, Vec<Rc<SetupEntry>>>,
    next_sequence: u64,
}

impl SetupRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its sequence number
    pub fn register(&mut self, signature: CallSignature, behavior: Behavior) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.by_member
            .entry(signature.member().clone())
            .or_default()
            .push(Rc::new(SetupEntry {
                sequence,
                signature,
                behavior,
            }));
        sequence
    }

    /// Find the most recent entry for `member` whose matchers accept `args`.
    ///
    /// A matcher that fails to evaluate aborts the scan with its error.
    pub fn resolve(&self, member: &MemberId, args: &[Value]) -> Result<Option<Resolved>, Thrown> {
        Self::select(self.entries_for(member), args)
    }

    /// Newest-first scan over a snapshot of entries.
    ///
    /// Used with [`SetupRegistry::candidates`] so matchers run without the
    /// registry being borrowed.
    pub fn select(entries: &[Rc<SetupEntry>], args: &[Value]) -> Result<Option<Resolved>, Thrown> {
        for entry in entries.iter().rev() {
            if entry.accepts(args)? {
                return Ok(Some(Resolved {
                    sequence: entry.sequence,
                    behavior: entry.behavior.clone(),
                }));
            }
        }
        Ok(None)
    }

    /// Entries for one member, oldest first
    #[must_use]
    pub fn entries_for(&self, member: &MemberId) -> &[Rc<SetupEntry>] {
        self.by_member
            .get(member)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Owned snapshot of the entries for one member, oldest first
    #[must_use]
    pub fn candidates(&self, member: &MemberId) -> Vec<Rc<SetupEntry>> {
        self.entries_for(member).to_vec()
    }

    /// Total number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_member.values().map(Vec::len).sum()
    }

    /// Whether nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_member.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::matcher::{it, Matcher, RangeKind};
    use crate::result::Fault;
    use crate::signature::{Interface, Method, Slots};
    use crate::value::ValueKind;

    fn add_member() -> Interface {
        Interface::new("Foo")
            .method(Method::new("add").param("n", ValueKind::Int).returns(ValueKind::Bool))
            .method(
                Method::new("do_something")
                    .param("command", ValueKind::Str)
                    .returns(ValueKind::Int),
            )
    }

    fn signature(iface: &Interface, name: &str, matcher: Matcher) -> CallSignature {
        let member = iface.member(&MemberId::method(name, 1)).unwrap();
        CallSignature::new(member, vec![matcher]).unwrap()
    }

    fn resolved_value(registry: &SetupRegistry, name: &str, arg: Value) -> Option<Value> {
        registry
            .resolve(&MemberId::method(name, 1), &[arg.clone()])
            .unwrap()
            .map(|r| r.behavior.execute(&[arg], &mut Slots::new()).unwrap())
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_empty_registry_resolves_nothing() {
            let registry = SetupRegistry::new();
            assert!(registry.is_empty());
            assert!(resolved_value(&registry, "add", Value::Int(1)).is_none());
        }

        #[test]
        fn test_latest_matching_setup_wins() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(signature(&iface, "do_something", it::any()), Behavior::returns(1));
            registry.register(
                signature(&iface, "do_something", it::eq("ping")),
                Behavior::returns(2),
            );
            assert_eq!(
                resolved_value(&registry, "do_something", Value::from("ping")),
                Some(Value::Int(2))
            );
            // The newer setup does not match, so the older one applies
            assert_eq!(
                resolved_value(&registry, "do_something", Value::from("pong")),
                Some(Value::Int(1))
            );
        }

        #[test]
        fn test_later_wildcard_shadows_earlier_literal() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(
                signature(&iface, "do_something", it::eq("ping")),
                Behavior::returns(2),
            );
            registry.register(signature(&iface, "do_something", it::any()), Behavior::returns(3));
            assert_eq!(
                resolved_value(&registry, "do_something", Value::from("ping")),
                Some(Value::Int(3))
            );
        }

        #[test]
        fn test_members_do_not_interfere() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(signature(&iface, "add", it::any()), Behavior::returns(true));
            assert!(resolved_value(&registry, "do_something", Value::from("x")).is_none());
            assert_eq!(registry.len(), 1);
            assert_eq!(registry.entries_for(&MemberId::method("add", 1)).len(), 1);
        }

        #[test]
        fn test_short_argument_list_never_matches() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(signature(&iface, "add", it::eq(5)), Behavior::returns(true));
            let member = MemberId::method("add", 1);
            assert!(registry.resolve(&member, &[]).unwrap().is_none());
            assert!(registry
                .resolve(&member, &[Value::Int(5), Value::Int(5)])
                .unwrap()
                .is_none());
        }

        #[test]
        fn test_select_over_snapshot() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(signature(&iface, "add", it::any()), Behavior::returns(true));
            let member = MemberId::method("add", 1);
            let snapshot = registry.candidates(&member);
            // Entries added after the snapshot are not part of it
            let newer =
                registry.register(signature(&iface, "add", it::any()), Behavior::returns(false));
            let old = SetupRegistry::select(&snapshot, &[Value::Int(1)]).unwrap().unwrap();
            assert!(old.sequence < newer);
            let now = registry.resolve(&member, &[Value::Int(1)]).unwrap().unwrap();
            assert_eq!(now.sequence, newer);
        }

        #[test]
        fn test_sequence_numbers_are_global() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            let a = registry.register(signature(&iface, "add", it::any()), Behavior::returns(true));
            let b = registry.register(
                signature(&iface, "do_something", it::any()),
                Behavior::returns(1),
            );
            assert!(b > a);
            let hit = registry
                .resolve(&MemberId::method("do_something", 1), &[Value::from("z")])
                .unwrap()
                .unwrap();
            assert_eq!(hit.sequence, b);
        }
    }

    mod matcher_error_tests {
        use super::*;

        #[derive(Debug, thiserror::Error)]
        #[error("bad predicate")]
        struct BadPredicate;

        #[test]
        fn test_predicate_error_aborts_resolution() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(signature(&iface, "add", it::any()), Behavior::returns(true));
            registry.register(
                signature(&iface, "add", it::try_is(|_| Err::<bool, _>(BadPredicate))),
                Behavior::returns(false),
            );
            let err = registry
                .resolve(&MemberId::method("add", 1), &[Value::Int(1)])
                .unwrap_err();
            match err {
                Thrown::Matcher { position, source, .. } => {
                    assert_eq!(position, 0);
                    assert!(Fault::is::<BadPredicate>(&source));
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_range_over_non_ordinal_argument() {
            let iface = add_member();
            let mut registry = SetupRegistry::new();
            registry.register(
                signature(&iface, "add", it::in_range(0, 10, RangeKind::Inclusive)),
                Behavior::returns(true),
            );
            let err = registry
                .resolve(&MemberId::method("add", 1), &[Value::from("five")])
                .unwrap_err();
            assert!(matches!(
                err,
                Thrown::NonOrdinal {
                    found: ValueKind::Str,
                    ..
                }
            ));
        }

        #[test]
        fn test_short_circuit_skips_later_matchers() {
            let iface = Interface::new("Foo").method(
                Method::new("pair")
                    .param("a", ValueKind::Int)
                    .param("b", ValueKind::Int)
                    .returns(ValueKind::Bool),
            );
            let member = iface.member(&MemberId::method("pair", 2)).unwrap();
            let sig = CallSignature::new(
                member,
                vec![it::eq(1), it::try_is(|_| Err::<bool, _>(BadPredicate))],
            )
            .unwrap();
            let mut registry = SetupRegistry::new();
            registry.register(sig, Behavior::returns(true));
            // First matcher rejects, so the failing predicate never runs
            let hit = registry
                .resolve(&MemberId::method("pair", 2), &[Value::Int(2), Value::Int(0)])
                .unwrap();
            assert!(hit.is_none());
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The chosen entry is the last registered one that accepts the argument
            #[test]
            fn prop_last_matching_registration_wins(
                setups in proptest::collection::vec(proptest::option::of(0i64..5), 1..20),
                arg in 0i64..5,
            ) {
                let iface = add_member();
                let mut registry = SetupRegistry::new();
                for (i, literal) in setups.iter().enumerate() {
                    let matcher = literal.map_or(Matcher::Any, |v| it::eq(v));
                    let behavior = Behavior::returns(i as i64);
                    registry.register(signature(&iface, "add", matcher), behavior);
                }
                let expected = setups
                    .iter()
                    .enumerate()
                    .rev()
                    .find(|(_, literal)| literal.map_or(true, |v| v == arg))
                    .map(|(i, _)| Value::Int(i as i64));
                let member = MemberId::method("add", 1);
                let got = registry
                    .resolve(&member, &[Value::Int(arg)])
                    .unwrap()
                    .map(|r| r.behavior.execute(&[], &mut Slots::new()).unwrap());
                prop_assert_eq!(got, expected);
            }

            /// Resolution is deterministic for a fixed registry and call
            #[test]
            fn prop_resolution_is_deterministic(
                setups in proptest::collection::vec(0i64..3, 1..10),
                arg in 0i64..3,
            ) {
                let iface = add_member();
                let mut registry = SetupRegistry::new();
                for v in &setups {
                    registry.register(signature(&iface, "add", it::eq(*v)), Behavior::returns(*v));
                }
                let member = MemberId::method("add", 1);
                let call = [Value::Int(arg)];
                let first = registry.resolve(&member, &call).unwrap().map(|r| r.sequence);
                let second = registry.resolve(&member, &call).unwrap().map(|r| r.sequence);
                prop_assert_eq!(first, second);
            }
        }
    }
}
