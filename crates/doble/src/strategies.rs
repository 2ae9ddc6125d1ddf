//! Proptest Strategies for Mock Values
//!
//! Strategies that generate [`Value`]s and matching matcher/argument pairs,
//! for property tests of code that talks to a [`crate::Mock`].
//!
//! ```rust,ignore
//! proptest! {
//!     #[test]
//!     fn prop_unmatched_calls_are_default(arg in scalar_value()) {
//!         let mock = Mock::new(iface());
//!         prop_assert_eq!(mock.call("do_something", &[arg]).unwrap(), Value::Bool(false));
//!     }
//! }
//! ```

use crate::matcher::{it, Matcher, RangeKind};
use crate::value::Value;
use proptest::prelude::*;

/// Any non-pending scalar value
pub fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Unit),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        // Finite floats only; NaN never equals itself
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::Str),
    ]
}

/// Any non-pending value, nesting lists up to three levels
pub fn any_value() -> impl Strategy<Value = Value> {
    scalar_value().prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::List)
    })
}

/// Integer bounds `(low, high)` with `low <= high`
pub fn ordered_bounds() -> impl Strategy<Value = (i64, i64)> {
    (-1000i64..1000, 0i64..500).prop_map(|(low, width)| (low, low + width))
}

/// A range matcher plus an integer argument near its bounds.
///
/// The third element is whether the argument should match.
pub fn range_case() -> impl Strategy<Value = (Matcher, Value, bool)> {
    (ordered_bounds(), -3i64..3, any::<bool>(), any::<bool>()).prop_map(
        |((low, high), offset, at_high, inclusive)| {
            let arg = if at_high { high + offset } else { low + offset };
            let kind = if inclusive {
                RangeKind::Inclusive
            } else {
                RangeKind::Exclusive
            };
            let expected = if inclusive {
                low <= arg && arg <= high
            } else {
                low < arg && arg < high
            };
            (it::in_range(low, high, kind), Value::Int(arg), expected)
        },
    )
}
