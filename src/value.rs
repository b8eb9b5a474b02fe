//! The dynamic element type that flows through every sequence.
//!
//! A `Value` is either a scalar (`Null`, `Bool`, `Int`, `Float`, `Str`), a
//! `List` of values, or an `Object` behind a shared pointer. Objects may
//! expose a comparison capability (`Comparable`) that the default comparers
//! in `compare` consult before falling back to identity; see that module for
//! the full protocol.
//!
//! Values double as map keys once coerced to a `ScalarKey`. The coercion
//! mirrors how dynamic languages canonicalize array keys: booleans become
//! 0/1, floats truncate, and canonical integer strings collapse to the
//! integer they spell. Values that have no scalar rendering (`Null`, lists,
//! objects) are rejected with `KeyNotAllowed`.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::error::Result;

/// A user-defined object stored in a `Value`.
///
/// `kind` names the concrete object type for error messages and for the
/// "same kind" check in ordering. Objects that want to participate in
/// ordering override `comparable` to expose their capability.
pub trait Object: fmt::Debug {
    /// The name of the concrete object kind.
    fn kind(&self) -> &'static str;

    /// Downcast hook, so comparison capabilities can inspect peers of
    /// their own concrete type.
    fn as_any(&self) -> &dyn Any;

    /// The comparison capability, if this object has one.
    fn comparable(&self) -> Option<&dyn Comparable> {
        return None;
    }
}

/// Three-way comparison capability an `Object` may expose.
pub trait Comparable {
    /// Compare `self` against any other value.
    fn compare_to(&self, other: &Value) -> Result<Ordering>;
}

/// A dynamically typed value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Object(Rc<dyn Object>),
}

impl Value {
    /// Build a string value.
    pub fn str(s: impl Into<String>) -> Value {
        return Value::Str(s.into());
    }

    /// Build an object value.
    pub fn object(object: Rc<dyn Object>) -> Value {
        return Value::Object(object);
    }

    /// The name of this value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        return match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(object) => object.kind(),
        };
    }

    /// True if this value is a number or a string spelling one.
    pub fn is_numeric(&self) -> bool {
        return self.as_number().is_some();
    }

    /// Numeric rendering of this value, if it has one.
    ///
    /// Integers and floats convert directly; strings parse after trimming.
    /// Booleans and everything else have no numeric rendering here (loose
    /// boolean comparison is handled by the comparers via truthiness).
    pub fn as_number(&self) -> Option<f64> {
        return match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
    }

    /// Loose truthiness: empty-ish values are false.
    pub fn truthy(&self) -> bool {
        return match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty() && s != "0",
            Value::List(items) => !items.is_empty(),
            Value::Object(_) => true,
        };
    }

    /// Coerce this value to a map key.
    ///
    /// Fails with `KeyNotAllowed` for values without a scalar rendering.
    pub fn array_key(&self) -> Result<ScalarKey> {
        return match self {
            Value::Bool(b) => Ok(ScalarKey::Int(*b as i64)),
            Value::Int(i) => Ok(ScalarKey::Int(*i)),
            Value::Float(f) => Ok(ScalarKey::Int(*f as i64)),
            Value::Str(s) => Ok(ScalarKey::from_str_key(s)),
            _ => Err(Error::KeyNotAllowed(self.kind().to_string())),
        };
    }
}

impl PartialEq for Value {
    /// Strict equality: same kind, same value. Objects compare by pointer
    /// identity. Loose and capability-aware equality live in `compare`.
    fn eq(&self, other: &Value) -> bool {
        return match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Value::Null => write!(f, ""),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(_) => write!(f, "list"),
            Value::Object(object) => write!(f, "{}", object.kind()),
        };
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        return Value::Bool(b);
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        return Value::Int(i);
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        return Value::Float(f);
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        return Value::Str(s.to_string());
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        return Value::Str(s);
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        return Value::List(items);
    }
}

/// A value coerced into map-key form: an integer or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Int(i64),
    Str(String),
}

impl ScalarKey {
    /// Canonicalize a string key: strings that spell an integer exactly
    /// (no leading zeros, no leading `+`, no surrounding space) collapse to
    /// that integer, everything else stays a string.
    fn from_str_key(s: &str) -> ScalarKey {
        if let Ok(i) = s.parse::<i64>() {
            if i.to_string() == s {
                return ScalarKey::Int(i);
            }
        }
        return ScalarKey::Str(s.to_string());
    }

    /// The key as a `Value` again.
    pub fn to_value(&self) -> Value {
        return match self {
            ScalarKey::Int(i) => Value::Int(*i),
            ScalarKey::Str(s) => Value::Str(s.clone()),
        };
    }
}

impl fmt::Display for ScalarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            ScalarKey::Int(i) => write!(f, "{}", i),
            ScalarKey::Str(s) => write!(f, "{}", s),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Opaque;

    impl Object for Opaque {
        fn kind(&self) -> &'static str {
            return "opaque";
        }

        fn as_any(&self) -> &dyn std::any::Any {
            return self;
        }
    }

    #[test]
    fn kinds() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Int(1).kind(), "int");
        assert_eq!(Value::str("x").kind(), "string");
        assert_eq!(Value::List(vec![]).kind(), "list");
        assert_eq!(Value::object(Rc::new(Opaque)).kind(), "opaque");
    }

    #[test]
    fn numeric_rendering() {
        assert_eq!(Value::Int(3).as_number(), Some(3.0));
        assert_eq!(Value::Float(1.5).as_number(), Some(1.5));
        assert_eq!(Value::str("  42 ").as_number(), Some(42.0));
        assert_eq!(Value::str("nope").as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::str("").truthy());
        assert!(!Value::str("0").truthy());
        assert!(!Value::List(vec![]).truthy());
        assert!(Value::Int(-1).truthy());
        assert!(Value::str("0.0").truthy());
        assert!(Value::object(Rc::new(Opaque)).truthy());
    }

    #[test]
    fn strict_equality_is_type_strict() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Int(1), Value::str("1"));
        assert_eq!(
            Value::List(vec![Value::Int(1)]),
            Value::List(vec![Value::Int(1)])
        );
    }

    #[test]
    fn object_equality_is_identity() {
        let a: Rc<dyn Object> = Rc::new(Opaque);
        let b: Rc<dyn Object> = Rc::new(Opaque);
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn array_key_coercion() {
        assert_eq!(Value::Bool(true).array_key().unwrap(), ScalarKey::Int(1));
        assert_eq!(Value::Int(7).array_key().unwrap(), ScalarKey::Int(7));
        assert_eq!(Value::Float(3.9).array_key().unwrap(), ScalarKey::Int(3));
        assert_eq!(Value::str("12").array_key().unwrap(), ScalarKey::Int(12));
        assert_eq!(
            Value::str("012").array_key().unwrap(),
            ScalarKey::Str("012".to_string())
        );
        assert_eq!(
            Value::str("name").array_key().unwrap(),
            ScalarKey::Str("name".to_string())
        );
    }

    #[test]
    fn array_key_rejects_unkeyable_values() {
        assert_eq!(
            Value::Null.array_key(),
            Err(Error::KeyNotAllowed("null".to_string()))
        );
        assert_eq!(
            Value::List(vec![]).array_key(),
            Err(Error::KeyNotAllowed("list".to_string()))
        );
        assert_eq!(
            Value::object(Rc::new(Opaque)).array_key(),
            Err(Error::KeyNotAllowed("opaque".to_string()))
        );
    }
}
