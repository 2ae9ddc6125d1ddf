//! Argument Matching
//!
//! Decides whether one supplied argument satisfies the expectation a setup
//! configured for its position.
//!
//! ## Toyota Way Application
//!
//! - **Poka-Yoke**: Malformed matchers (non-numeric range bounds, invalid
//!   patterns) are rejected when the setup is registered, not when a call
//!   arrives
//! - **Jidoka**: A predicate that fails stops the call with its own error

use crate::result::{BoxError, DobleError, DobleResult, Fault};
use crate::value::{FromValue, Value, ValueKind};
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

/// Predicate over an actual argument
pub type Predicate = Rc<dyn Fn(&Value) -> Result<bool, Fault>>;

/// Whether range bounds are part of the range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// `low <= actual <= high`
    Inclusive,
    /// `low < actual < high`
    Exclusive,
}

/// Flags applied when compiling a pattern matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegexOptions {
    /// Case-insensitive matching
    pub ignore_case: bool,
    /// `^` and `$` match at line boundaries
    pub multi_line: bool,
    /// `.` also matches `\n`
    pub single_line: bool,
    /// Whitespace and `#` comments in the pattern are ignored
    pub ignore_whitespace: bool,
}

impl RegexOptions {
    /// No flags
    pub const NONE: Self = Self {
        ignore_case: false,
        multi_line: false,
        single_line: false,
        ignore_whitespace: false,
    };

    /// Case-insensitive matching
    pub const IGNORE_CASE: Self = Self {
        ignore_case: true,
        ..Self::NONE
    };

    /// Line-anchored `^` and `$`
    pub const MULTI_LINE: Self = Self {
        multi_line: true,
        ..Self::NONE
    };

    /// `.` matches newlines
    pub const SINGLE_LINE: Self = Self {
        single_line: true,
        ..Self::NONE
    };

    /// Verbose patterns
    pub const IGNORE_WHITESPACE: Self = Self {
        ignore_whitespace: true,
        ..Self::NONE
    };
}

impl BitOr for RegexOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            ignore_case: self.ignore_case || rhs.ignore_case,
            multi_line: self.multi_line || rhs.multi_line,
            single_line: self.single_line || rhs.single_line,
            ignore_whitespace: self.ignore_whitespace || rhs.ignore_whitespace,
        }
    }
}

/// A compiled pattern matcher
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: String,
    options: RegexOptions,
    compiled: Result<regex::Regex, regex::Error>,
}

impl PatternMatcher {
    fn new(pattern: &str, options: RegexOptions) -> Self {
        let compiled = regex::RegexBuilder::new(pattern)
            .case_insensitive(options.ignore_case)
            .multi_line(options.multi_line)
            .dot_matches_new_line(options.single_line)
            .ignore_whitespace(options.ignore_whitespace)
            .build();
        Self {
            pattern: pattern.to_string(),
            options,
            compiled,
        }
    }

    /// Source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compile options
    #[must_use]
    pub const fn options(&self) -> RegexOptions {
        self.options
    }
}

/// Why a matcher could not decide
#[derive(Debug, Clone)]
pub enum MatchError {
    /// The predicate returned an error
    Predicate(Fault),
    /// A range matcher saw a value without numeric order
    NonOrdinal(ValueKind),
}

/// Expectation for one positional argument of a setup
#[derive(Clone)]
pub enum Matcher {
    /// Structural equality with a value captured at setup time
    Eq(Value),
    /// User predicate
    Predicate(Predicate),
    /// Numeric range
    Range {
        /// Lower bound
        low: Value,
        /// Upper bound
        high: Value,
        /// Bound inclusion
        kind: RangeKind,
    },
    /// Regular expression over string arguments
    Regex(PatternMatcher),
    /// Equal to one of the listed values
    OneOf(Vec<Value>),
    /// Equal to none of the listed values
    NoneOf(Vec<Value>),
    /// Any value
    Any,
    /// Any value passed through an out/ref slot
    AnyRef,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(v) => f.debug_tuple("Eq").field(v).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Range { low, high, kind } => f
                .debug_struct("Range")
                .field("low", low)
                .field("high", high)
                .field("kind", kind)
                .finish(),
            Self::Regex(p) => f
                .debug_tuple("Regex")
                .field(&p.pattern)
                .field(&p.options)
                .finish(),
            Self::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Self::NoneOf(values) => f.debug_tuple("NoneOf").field(values).finish(),
            Self::Any => f.write_str("Any"),
            Self::AnyRef => f.write_str("AnyRef"),
        }
    }
}

impl Matcher {
    /// Variant name used in messages
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Eq(_) => "exact-value",
            Self::Predicate(_) => "predicate",
            Self::Range { .. } => "range",
            Self::Regex(_) => "regex",
            Self::OneOf(_) => "one-of",
            Self::NoneOf(_) => "none-of",
            Self::Any => "any",
            Self::AnyRef => "any-ref",
        }
    }

    /// Check whether `actual` satisfies this expectation.
    ///
    /// Only predicate and range matchers can fail to decide; every other
    /// variant answers `Ok`.
    pub fn matches(&self, actual: &Value) -> Result<bool, MatchError> {
        match self {
            Self::Eq(expected) => Ok(expected == actual),
            Self::Predicate(predicate) => predicate(actual).map_err(MatchError::Predicate),
            Self::Range { low, high, kind } => {
                if !actual.kind().is_ordinal() {
                    return Err(MatchError::NonOrdinal(actual.kind()));
                }
                let (Some(lo), Some(hi)) = (actual.numeric_cmp(low), actual.numeric_cmp(high))
                else {
                    return Ok(false);
                };
                Ok(match kind {
                    RangeKind::Inclusive => lo.is_ge() && hi.is_le(),
                    RangeKind::Exclusive => lo.is_gt() && hi.is_lt(),
                })
            }
            Self::Regex(pattern) => Ok(match (&pattern.compiled, actual) {
                (Ok(re), Value::Str(s)) => re.is_match(s),
                _ => false,
            }),
            Self::OneOf(values) => Ok(values.contains(actual)),
            Self::NoneOf(values) => Ok(!values.contains(actual)),
            Self::Any | Self::AnyRef => Ok(true),
        }
    }

    /// Reject matchers that can never be evaluated
    pub(crate) fn validate(&self, member: &str, position: usize) -> DobleResult<()> {
        match self {
            Self::Range { low, high, .. } => {
                if low.kind().is_ordinal() && high.kind().is_ordinal() {
                    Ok(())
                } else {
                    Err(DobleError::NonOrdinalRange {
                        member: member.to_string(),
                        position,
                        low: low.kind(),
                        high: high.kind(),
                    })
                }
            }
            Self::Regex(pattern) => match &pattern.compiled {
                Ok(_) => Ok(()),
                Err(e) => Err(DobleError::InvalidPattern {
                    pattern: pattern.pattern.clone(),
                    message: e.to_string(),
                }),
            },
            _ => Ok(()),
        }
    }
}

/// Matcher constructors, in the shape tests write them
pub mod it {
    use super::*;

    /// Argument equal to `value`
    #[must_use]
    pub fn eq(value: impl Into<Value>) -> Matcher {
        Matcher::Eq(value.into())
    }

    /// Argument accepted by `predicate`
    #[must_use]
    pub fn is<F>(predicate: F) -> Matcher
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Matcher::Predicate(Rc::new(move |v| Ok(predicate(v))))
    }

    /// Argument of type `T` accepted by `predicate`; other kinds never match
    #[must_use]
    pub fn is_typed<T, F>(predicate: F) -> Matcher
    where
        T: FromValue,
        F: Fn(&T) -> bool + 'static,
    {
        Matcher::Predicate(Rc::new(move |v| {
            Ok(T::from_value(v.clone()).is_ok_and(|typed| predicate(&typed)))
        }))
    }

    /// Argument accepted by a predicate that may fail
    #[must_use]
    pub fn try_is<F, E>(predicate: F) -> Matcher
    where
        F: Fn(&Value) -> Result<bool, E> + 'static,
        E: Into<BoxError>,
    {
        Matcher::Predicate(Rc::new(move |v| {
            predicate(v).map_err(|e| Fault::from_boxed(e.into()))
        }))
    }

    /// Numeric argument between `low` and `high`
    #[must_use]
    pub fn in_range(low: impl Into<Value>, high: impl Into<Value>, kind: RangeKind) -> Matcher {
        Matcher::Range {
            low: low.into(),
            high: high.into(),
            kind,
        }
    }

    /// String argument matching `pattern`
    #[must_use]
    pub fn regex(pattern: &str, options: RegexOptions) -> Matcher {
        Matcher::Regex(PatternMatcher::new(pattern, options))
    }

    /// Argument equal to one of `values`
    #[must_use]
    pub fn one_of<I, V>(values: I) -> Matcher
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Matcher::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Argument equal to none of `values`
    #[must_use]
    pub fn none_of<I, V>(values: I) -> Matcher
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Matcher::NoneOf(values.into_iter().map(Into::into).collect())
    }

    /// Any argument
    #[must_use]
    pub const fn any() -> Matcher {
        Matcher::Any
    }

    /// Any value in an out/ref slot
    #[must_use]
    pub const fn any_ref() -> Matcher {
        Matcher::AnyRef
    }
}
