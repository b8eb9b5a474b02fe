//! The equality/ordering protocol every operator builds on.
//!
//! Three default comparisons exist:
//!
//! - `same`: identity-like equality. Objects delegate to their comparison
//!   capability when one side exposes it, otherwise pointer identity.
//!   Scalars compare strictly (same kind, same value).
//! - `equals`: loose equality. Objects as in `same`; scalars coerce, so
//!   `"1"` equals `1` and booleans compare by truthiness.
//! - `compare`: three-way ordering. Capability first; objects of the same
//!   kind without one fall back to a deterministic generic ordering; objects
//!   of unrelated kinds fail with `InvalidComparison`.
//!
//! Operators take comparers as explicit `Option<Comparer>` parameters and
//! substitute one of these defaults when handed `None`. There is no global
//! comparer state.
//!
//! A pluggable comparer answers with a `Comparison`: either an equality
//! verdict or a three-way order. `invert` wraps any comparer, negating
//! equality verdicts and flipping orders; the `Comparison` type makes a
//! comparer that answers with "neither" unrepresentable, so the original's
//! runtime check for foreign comparer results becomes a compile-time
//! guarantee. Asking an equality-only comparer for an order is still a
//! runtime failure (`InvalidArgument`), raised by `Comparison::as_order`.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// The outcome of a pluggable comparer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// An equality verdict.
    Equality(bool),
    /// A three-way order.
    Order(Ordering),
}

impl Comparison {
    /// True if the two operands matched.
    pub fn is_match(&self) -> bool {
        return match self {
            Comparison::Equality(b) => *b,
            Comparison::Order(o) => *o == Ordering::Equal,
        };
    }

    /// The order, for comparers used in sorting contexts.
    ///
    /// Equality-only comparers cannot answer and fail `InvalidArgument`.
    pub fn as_order(&self) -> Result<Ordering> {
        return match self {
            Comparison::Order(o) => Ok(*o),
            Comparison::Equality(_) => Err(Error::invalid_argument(
                "ordering requires a three-way comparer, got an equality comparer",
            )),
        };
    }

    /// Negate an equality verdict or flip an order.
    pub fn invert(self) -> Comparison {
        return match self {
            Comparison::Equality(b) => Comparison::Equality(!b),
            Comparison::Order(o) => Comparison::Order(o.reverse()),
        };
    }
}

/// A pluggable two-argument comparer.
pub type Comparer = Rc<dyn Fn(&Value, &Value) -> Result<Comparison>>;

/// Identity-like equality.
pub fn same(a: &Value, b: &Value) -> Result<bool> {
    if let Value::Object(object) = a {
        if let Some(capability) = object.comparable() {
            return Ok(capability.compare_to(b)? == Ordering::Equal);
        }
    }
    if let Value::Object(object) = b {
        if let Some(capability) = object.comparable() {
            return Ok(capability.compare_to(a)? == Ordering::Equal);
        }
    }
    return Ok(a == b);
}

/// Loose equality: numeric coercion for scalars, `same` for objects.
pub fn equals(a: &Value, b: &Value) -> Result<bool> {
    if let Value::Object(object) = a {
        if let Some(capability) = object.comparable() {
            return Ok(capability.compare_to(b)? == Ordering::Equal);
        }
    }
    if let Value::Object(object) = b {
        if let Some(capability) = object.comparable() {
            return Ok(capability.compare_to(a)? == Ordering::Equal);
        }
    }
    match (a, b) {
        (Value::Bool(x), other) if !matches!(other, Value::Object(_)) => {
            return Ok(*x == other.truthy());
        }
        (other, Value::Bool(y)) if !matches!(other, Value::Object(_)) => {
            return Ok(other.truthy() == *y);
        }
        // Exact integer equality; the f64 path below loses precision above
        // 2^53.
        (Value::Int(x), Value::Int(y)) => return Ok(x == y),
        _ => {}
    }
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return Ok(x == y);
    }
    return Ok(a == b);
}

/// Three-way ordering.
///
/// Objects of unrelated kinds without a comparison capability have no
/// meaningful order and fail with `InvalidComparison`. Scalars order
/// totally: numerics (including numeric strings) numerically, strings
/// lexicographically, lists by length then element-wise, and mixed kinds by
/// a fixed rank (null < bool < numbers < strings < lists).
pub fn compare(a: &Value, b: &Value) -> Result<Ordering> {
    if let Value::Object(object) = a {
        if let Some(capability) = object.comparable() {
            return capability.compare_to(b);
        }
    }
    if let Value::Object(object) = b {
        if let Some(capability) = object.comparable() {
            return Ok(capability.compare_to(a)?.reverse());
        }
    }
    return match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            if x.kind() != y.kind() {
                return Err(Error::InvalidComparison {
                    left: x.kind().to_string(),
                    right: y.kind().to_string(),
                });
            }
            if Rc::ptr_eq(x, y) {
                return Ok(Ordering::Equal);
            }
            // Same kind, no capability: a deterministic generic ordering.
            Ok(format!("{:?}", x).cmp(&format!("{:?}", y)))
        }
        (Value::Object(_), _) | (_, Value::Object(_)) => Err(Error::InvalidComparison {
            left: a.kind().to_string(),
            right: b.kind().to_string(),
        }),
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Null, _) => Ok(Ordering::Less),
        (_, Value::Null) => Ok(Ordering::Greater),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::List(x), Value::List(y)) => compare_lists(x, y),
        // Exact integer ordering; f64 promotion collapses distinct ints
        // above 2^53. Mixed int/float/numeric-string operands still take
        // the numeric path below.
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        _ => {
            if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
                return Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal));
            }
            if let (Value::Str(x), Value::Str(y)) = (a, b) {
                return Ok(x.cmp(y));
            }
            Ok(type_rank(a).cmp(&type_rank(b)))
        }
    };
}

/// Lists order by length first, then by the first unequal element.
fn compare_lists(a: &[Value], b: &[Value]) -> Result<Ordering> {
    if a.len() != b.len() {
        return Ok(a.len().cmp(&b.len()));
    }
    for (x, y) in a.iter().zip(b.iter()) {
        let order = compare(x, y)?;
        if order != Ordering::Equal {
            return Ok(order);
        }
    }
    return Ok(Ordering::Equal);
}

fn type_rank(v: &Value) -> u8 {
    return match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::Str(s) if s.trim().parse::<f64>().is_ok() => 2,
        Value::Str(_) => 3,
        Value::List(_) => 4,
        Value::Object(_) => 5,
    };
}

/// The `same` protocol as a pluggable comparer.
pub fn same_comparer() -> Comparer {
    return Rc::new(|a, b| Ok(Comparison::Equality(same(a, b)?)));
}

/// The `equals` protocol as a pluggable comparer.
pub fn equals_comparer() -> Comparer {
    return Rc::new(|a, b| Ok(Comparison::Equality(equals(a, b)?)));
}

/// The `compare` protocol as a pluggable comparer.
pub fn order_comparer() -> Comparer {
    return Rc::new(|a, b| Ok(Comparison::Order(compare(a, b)?)));
}

/// Wrap a comparer, negating equality verdicts and flipping orders.
pub fn invert(comparer: Comparer) -> Comparer {
    return Rc::new(move |a, b| Ok(comparer(a, b)?.invert()));
}
