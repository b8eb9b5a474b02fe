//! An immutable key/value pair with positional access.

use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// A (key, value) tuple. Position 0 is the key, position 1 the value.
#[derive(Clone, Debug, PartialEq)]
pub struct Pair {
    key: Value,
    value: Value,
}

impl Pair {
    /// Build a pair.
    pub fn new(key: Value, value: Value) -> Pair {
        return Pair { key, value };
    }

    /// The key.
    pub fn key(&self) -> &Value {
        return &self.key;
    }

    /// The value.
    pub fn value(&self) -> &Value {
        return &self.value;
    }

    /// Positional access: 0 is the key, 1 the value, anything else fails.
    pub fn get(&self, index: usize) -> Result<&Value> {
        return match index {
            0 => Ok(&self.key),
            1 => Ok(&self.value),
            _ => Err(Error::invalid_argument(format!(
                "pair index must be 0 or 1, got {}",
                index
            ))),
        };
    }

    /// Split into owned key and value.
    pub fn into_parts(self) -> (Value, Value) {
        return (self.key, self.value);
    }
}

impl From<(Value, Value)> for Pair {
    fn from((key, value): (Value, Value)) -> Pair {
        return Pair::new(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_access() {
        let pair = Pair::new(Value::str("name"), Value::str("ada"));
        assert_eq!(pair.get(0).unwrap(), &Value::str("name"));
        assert_eq!(pair.get(1).unwrap(), &Value::str("ada"));
        assert!(pair.get(2).is_err());
    }

    #[test]
    fn accessors() {
        let pair = Pair::new(Value::Int(0), Value::str("a"));
        assert_eq!(pair.key(), &Value::Int(0));
        assert_eq!(pair.value(), &Value::str("a"));
        let (k, v) = pair.into_parts();
        assert_eq!(k, Value::Int(0));
        assert_eq!(v, Value::str("a"));
    }
}
