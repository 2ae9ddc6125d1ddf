//! Dynamic values crossing the dispatch boundary.
//!
//! A generated substitute turns every argument into a [`Value`] before it
//! calls [`crate::Mock::dispatch`], and turns the resulting [`Value`] back
//! into its declared Rust type with [`FromValue`].

use crate::pending::PendingValue;
use crate::result::{DobleResult, Thrown};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Declared type of a parameter or result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// No value
    Unit,
    /// Boolean
    Bool,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// UTF-8 string
    Str,
    /// Ordered list of values
    List,
    /// Serializable structured value
    Record,
    /// Deferred result of an async member
    Pending,
}

impl ValueKind {
    /// Lowercase name used in messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Record => "record",
            Self::Pending => "pending",
        }
    }

    /// Whether values of this kind have a numeric order
    #[must_use]
    pub const fn is_ordinal(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed argument or result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// No value
    Unit,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Structured value, stored as JSON
    Record(serde_json::Value),
    /// Deferred result of an async member
    #[serde(skip)]
    Pending(PendingValue),
}

impl Default for Value {
    fn default() -> Self {
        Self::Unit
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Pending(a), Self::Pending(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Convert any serializable value into a record
    pub fn record<T: Serialize>(value: &T) -> DobleResult<Self> {
        Ok(Self::Record(serde_json::to_value(value)?))
    }

    /// The declared default for a kind
    #[must_use]
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Unit => Self::Unit,
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Int => Self::Int(0),
            ValueKind::Float => Self::Float(0.0),
            ValueKind::Str => Self::Str(String::new()),
            ValueKind::List => Self::List(Vec::new()),
            ValueKind::Record => Self::Record(serde_json::Value::Null),
            ValueKind::Pending => Self::Pending(PendingValue::resolved(Self::Unit)),
        }
    }

    /// Kind of this value
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Unit => ValueKind::Unit,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
            Self::Record(_) => ValueKind::Record,
            Self::Pending(_) => ValueKind::Pending,
        }
    }

    /// Check for the unit value
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Borrow as bool
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as integer
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Borrow as float
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Borrow as string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as list
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as JSON record
    #[must_use]
    pub const fn as_record(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Record(json) => Some(json),
            _ => None,
        }
    }

    /// Borrow as pending value
    #[must_use]
    pub const fn as_pending(&self) -> Option<&PendingValue> {
        match self {
            Self::Pending(p) => Some(p),
            _ => None,
        }
    }

    /// Numeric ordering between two values.
    ///
    /// Returns `None` when either side is not an `Int` or `Float`.
    #[must_use]
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Extract a typed value
    pub fn into_typed<T: FromValue>(self) -> Result<T, Thrown> {
        T::from_value(self)
    }

    /// Deserialize a record into a concrete type
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Thrown> {
        match self {
            Self::Record(json) => serde_json::from_value(json).map_err(Thrown::raise),
            other => Err(mismatch(ValueKind::Record, &other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("()"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Record(json) => write!(f, "{json}"),
            Self::Pending(p) => write!(f, "{p:?}"),
        }
    }
}

fn mismatch(expected: ValueKind, found: &Value) -> Thrown {
    Thrown::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

// =============================================================================
// Conversions into Value
// =============================================================================

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! int_into_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Self::Int(i64::from(i))
                }
            }
        )*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Self::Int(i as i64)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Unit, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Self::Record(json)
    }
}

impl From<PendingValue> for Value {
    fn from(pending: PendingValue) -> Self {
        Self::Pending(pending)
    }
}

// =============================================================================
// Typed extraction
// =============================================================================

/// Extraction of a Rust type from a dispatch result
pub trait FromValue: Sized {
    /// Convert, raising [`Thrown::TypeMismatch`] on a kind mismatch
    fn from_value(value: Value) -> Result<Self, Thrown>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        Ok(value)
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        match value {
            Value::Unit => Ok(()),
            other => Err(mismatch(ValueKind::Unit, &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        value
            .as_bool()
            .ok_or_else(|| mismatch(ValueKind::Bool, &value))
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        value.as_int().ok_or_else(|| mismatch(ValueKind::Int, &value))
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(Thrown::raise)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch(ValueKind::Float, &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch(ValueKind::Str, &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch(ValueKind::List, &other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        match value {
            Value::Record(json) => Ok(json),
            other => Err(mismatch(ValueKind::Record, &other)),
        }
    }
}

impl FromValue for PendingValue {
    fn from_value(value: Value) -> Result<Self, Thrown> {
        match value {
            Value::Pending(p) => Ok(p),
            other => Err(mismatch(ValueKind::Pending, &other)),
        }
    }
}
