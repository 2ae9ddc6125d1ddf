//! Member identity and call signatures.
//!
//! An [`Interface`] is the description a proxy generator hands to the
//! engine: which members exist, what they take and what they return. A
//! [`CallSignature`] pairs one member with the matchers of a setup.

use crate::matcher::Matcher;
use crate::result::{DobleError, DobleResult};
use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Method, property getter, or property setter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    /// Ordinary method
    Method,
    /// Property read
    Getter,
    /// Property write
    Setter,
}

/// Identity of a member: name, kind and arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId {
    /// Member name
    pub name: String,
    /// Member kind
    pub kind: MemberKind,
    /// Parameter count
    pub arity: usize,
}

impl MemberId {
    /// A method with `arity` parameters
    #[must_use]
    pub fn method(name: &str, arity: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Method,
            arity,
        }
    }

    /// A property getter
    #[must_use]
    pub fn getter(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Getter,
            arity: 0,
        }
    }

    /// A property setter
    #[must_use]
    pub fn setter(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Setter,
            arity: 1,
        }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{}/{}", self.name, self.arity),
            MemberKind::Getter => write!(f, "get {}", self.name),
            MemberKind::Setter => write!(f, "set {}", self.name),
        }
    }
}

/// How an argument is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamMode {
    /// By value
    Value,
    /// Output slot, written by the callee
    Out,
    /// Reference slot, read and possibly written by the callee
    Ref,
}

impl ParamMode {
    /// Whether the position is a slot
    #[must_use]
    pub const fn is_slot(&self) -> bool {
        matches!(self, Self::Out | Self::Ref)
    }

    const fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Out => "out",
            Self::Ref => "ref",
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Declared kind
    pub kind: ValueKind,
    /// Passing mode
    pub mode: ParamMode,
}

impl Param {
    /// Whether a call can pass `value` here; unit stands for an absent value
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        value.is_unit() || value.kind() == self.kind
    }

    /// Reject matchers that can never match an argument of the declared kind
    fn check_matcher_kind(
        &self,
        matcher: &Matcher,
        member: &str,
        position: usize,
    ) -> DobleResult<()> {
        let held: &[Value] = match matcher {
            Matcher::Range { .. } if !self.kind.is_ordinal() => {
                return Err(DobleError::RangeOnNonOrdinalParam {
                    member: member.to_string(),
                    position,
                    kind: self.kind,
                });
            }
            Matcher::Eq(value) => std::slice::from_ref(value),
            Matcher::OneOf(values) | Matcher::NoneOf(values) => values,
            _ => &[],
        };
        match held.iter().find(|v| !self.accepts(v)) {
            Some(value) => Err(DobleError::MatcherKind {
                member: member.to_string(),
                position,
                matcher: matcher.name(),
                expected: self.kind,
                found: value.kind(),
            }),
            None => Ok(()),
        }
    }
}

/// One declared member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Identity
    pub id: MemberId,
    /// Ordered parameters
    pub params: Vec<Param>,
    /// Result kind; for async members, the kind the pending value resolves to
    pub returns: ValueKind,
    /// Whether callers await the result
    pub is_async: bool,
}

impl Member {
    /// Declared default result, before any configured override
    #[must_use]
    pub fn zero_result(&self) -> Value {
        Value::zero(self.returns)
    }
}

/// Builder for a method declaration
#[derive(Debug, Clone)]
pub struct Method {
    name: String,
    params: Vec<Param>,
    returns: ValueKind,
    is_async: bool,
}

impl Method {
    /// Start a method returning unit
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            returns: ValueKind::Unit,
            is_async: false,
        }
    }

    fn push(mut self, name: &str, kind: ValueKind, mode: ParamMode) -> Self {
        self.params.push(Param {
            name: name.to_string(),
            kind,
            mode,
        });
        self
    }

    /// By-value parameter
    #[must_use]
    pub fn param(self, name: &str, kind: ValueKind) -> Self {
        self.push(name, kind, ParamMode::Value)
    }

    /// Output parameter
    #[must_use]
    pub fn out_param(self, name: &str, kind: ValueKind) -> Self {
        self.push(name, kind, ParamMode::Out)
    }

    /// Reference parameter
    #[must_use]
    pub fn ref_param(self, name: &str, kind: ValueKind) -> Self {
        self.push(name, kind, ParamMode::Ref)
    }

    /// Synchronous result kind
    #[must_use]
    pub const fn returns(mut self, kind: ValueKind) -> Self {
        self.returns = kind;
        self.is_async = false;
        self
    }

    /// Async result: callers await a pending value resolving to `kind`
    #[must_use]
    pub const fn returns_async(mut self, kind: ValueKind) -> Self {
        self.returns = kind;
        self.is_async = true;
        self
    }

    fn build(self) -> Member {
        Member {
            id: MemberId::method(&self.name, self.params.len()),
            params: self.params,
            returns: self.returns,
            is_async: self.is_async,
        }
    }
}

/// Member table of an abstract interface
#[derive(Debug, Clone, Default)]
pub struct Interface {
    name: String,
    members: HashMap<MemberId, Member>,
}

impl Interface {
    /// Empty interface
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashMap::new(),
        }
    }

    /// Declare a method; a later declaration with the same identity replaces it
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        let member = method.build();
        self.members.insert(member.id.clone(), member);
        self
    }

    /// Declare a read/write property
    #[must_use]
    pub fn property(self, name: &str, kind: ValueKind) -> Self {
        self.readonly_property(name, kind).with_setter(name, kind)
    }

    /// Declare a property with a getter only
    #[must_use]
    pub fn readonly_property(mut self, name: &str, kind: ValueKind) -> Self {
        let getter = Member {
            id: MemberId::getter(name),
            params: Vec::new(),
            returns: kind,
            is_async: false,
        };
        self.members.insert(getter.id.clone(), getter);
        self
    }

    fn with_setter(mut self, name: &str, kind: ValueKind) -> Self {
        let setter = Member {
            id: MemberId::setter(name),
            params: vec![Param {
                name: "value".to_string(),
                kind,
                mode: ParamMode::Value,
            }],
            returns: ValueKind::Unit,
            is_async: false,
        };
        self.members.insert(setter.id.clone(), setter);
        self
    }

    /// Interface name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a member by identity
    #[must_use]
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    /// All members sharing a name, any kind or arity
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.values().filter(move |m| m.id.name == name)
    }

    /// Property names that have both a getter and a setter
    pub fn writable_properties(&self) -> impl Iterator<Item = &Member> {
        self.members.values().filter(|m| {
            m.id.kind == MemberKind::Getter
                && self.members.contains_key(&MemberId::setter(&m.id.name))
        })
    }

    /// Number of declared members
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Find the method a setup names.
    ///
    /// A name that exists with a different arity is an arity error rather
    /// than an unknown member.
    pub(crate) fn resolve_method(&self, name: &str, arity: usize) -> DobleResult<&Member> {
        if let Some(member) = self.member(&MemberId::method(name, arity)) {
            return Ok(member);
        }
        let overload = self
            .members_named(name)
            .filter(|m| m.id.kind == MemberKind::Method)
            .min_by_key(|m| m.id.arity.abs_diff(arity));
        match overload {
            Some(m) => Err(DobleError::ArityMismatch {
                member: name.to_string(),
                expected: m.id.arity,
                actual: arity,
            }),
            None => Err(self.unknown(name)),
        }
    }

    /// Find a property accessor
    pub(crate) fn resolve_accessor(&self, id: &MemberId) -> DobleResult<&Member> {
        self.member(id).ok_or_else(|| self.unknown(&id.to_string()))
    }

    fn unknown(&self, member: &str) -> DobleError {
        DobleError::UnknownMember {
            interface: self.name.clone(),
            member: member.to_string(),
        }
    }
}

/// A member plus the matchers a setup supplied for it.
///
/// Immutable once built; the matcher list length always equals the
/// member's parameter count.
#[derive(Debug, Clone)]
pub struct CallSignature {
    member: MemberId,
    matchers: Vec<Matcher>,
}

impl CallSignature {
    /// Validate `matchers` against `member` and build the signature
    pub fn new(member: &Member, matchers: Vec<Matcher>) -> DobleResult<Self> {
        let display = member.id.to_string();
        if matchers.len() != member.params.len() {
            return Err(DobleError::ArityMismatch {
                member: display,
                expected: member.params.len(),
                actual: matchers.len(),
            });
        }
        for (position, (matcher, param)) in matchers.iter().zip(&member.params).enumerate() {
            matcher.validate(&display, position)?;
            let allowed = match param.mode {
                ParamMode::Value => true,
                ParamMode::Out => matches!(matcher, Matcher::AnyRef | Matcher::Any),
                ParamMode::Ref => {
                    matches!(matcher, Matcher::AnyRef | Matcher::Any | Matcher::Eq(_))
                }
            };
            if !allowed {
                return Err(DobleError::SlotMatcher {
                    member: display,
                    position,
                    mode: param.mode.as_str(),
                    matcher: matcher.name(),
                });
            }
            param.check_matcher_kind(matcher, &display, position)?;
        }
        Ok(Self {
            member: member.id.clone(),
            matchers,
        })
    }

    /// Member this signature targets
    #[must_use]
    pub const fn member(&self) -> &MemberId {
        &self.member
    }

    /// Per-position matchers
    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }
}

/// Out/ref slots of one call, keyed by parameter position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    values: BTreeMap<usize, Value>,
}

impl Slots {
    /// No slots written
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a slot
    pub fn write(&mut self, position: usize, value: Value) {
        self.values.insert(position, value);
    }

    /// Read a slot
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(&position)
    }

    /// Remove and return a slot
    pub fn take(&mut self, position: usize) -> Option<Value> {
        self.values.remove(&position)
    }

    /// Number of written slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no slot was written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
