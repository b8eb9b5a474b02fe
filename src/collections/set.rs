//! A comparer-based set of values.

use crate::compare::Comparer;
use crate::compare::same_comparer;
use crate::enumerable::Enumerable;
use crate::error::Result;
use crate::keyed::KeyedEnumerable;
use crate::sequence::Sequence;
use crate::value::Value;

/// Membership is decided by a comparer (default `same`), checked by linear
/// scan. The scan is what lets object elements participate without any
/// hashing requirement; it also means the comparer can fail, so membership
/// operations return `Result`.
#[derive(Clone)]
pub struct Set {
    items: Vec<Value>,
    comparer: Comparer,
}

impl Set {
    pub fn new(comparer: Option<Comparer>) -> Set {
        return Set {
            items: Vec::new(),
            comparer: comparer.unwrap_or_else(same_comparer),
        };
    }

    /// Build from values, dropping duplicates. First occurrence wins.
    pub fn from_values(values: Vec<Value>, comparer: Option<Comparer>) -> Result<Set> {
        let mut set = Set::new(comparer);
        for value in values {
            set.add(value)?;
        }
        return Ok(set);
    }

    pub fn len(&self) -> usize {
        return self.items.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }

    fn position(&self, value: &Value) -> Result<Option<usize>> {
        for (i, member) in self.items.iter().enumerate() {
            if (self.comparer)(member, value)?.is_match() {
                return Ok(Some(i));
            }
        }
        return Ok(None);
    }

    pub fn contains(&self, value: &Value) -> Result<bool> {
        return Ok(self.position(value)?.is_some());
    }

    /// Add a value; returns true if it was new.
    pub fn add(&mut self, value: Value) -> Result<bool> {
        if self.position(&value)?.is_some() {
            return Ok(false);
        }
        self.items.push(value);
        return Ok(true);
    }

    /// Remove a value; returns true if it was present. Later elements keep
    /// their relative order.
    pub fn remove(&mut self, value: &Value) -> Result<bool> {
        return match self.position(value)? {
            Some(pos) => {
                self.items.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        };
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        return self.items.iter();
    }
}

impl Enumerable for Set {
    /// Snapshot, in insertion order.
    fn sequence(&self) -> Sequence {
        return Sequence::from_values(self.items.clone());
    }
}

impl KeyedEnumerable for Set {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::compare::equals_comparer;

    #[test]
    fn add_deduplicates() {
        let mut set = Set::new(None);
        assert!(set.add(Value::Int(1)).unwrap());
        assert!(!set.add(Value::Int(1)).unwrap());
        assert!(set.add(Value::Int(2)).unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_comparer_is_strict() {
        let mut set = Set::new(None);
        set.add(Value::Int(1)).unwrap();
        // "1" is a distinct member under `same`.
        assert!(set.add(Value::str("1")).unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn loose_comparer_collapses_coercible_members() {
        let mut set = Set::new(Some(equals_comparer()));
        set.add(Value::Int(1)).unwrap();
        assert!(!set.add(Value::str("1")).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_and_contains() {
        let mut set = Set::from_values(
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            None,
        )
        .unwrap();
        assert!(set.contains(&Value::Int(2)).unwrap());
        assert!(set.remove(&Value::Int(2)).unwrap());
        assert!(!set.remove(&Value::Int(2)).unwrap());
        assert!(!set.contains(&Value::Int(2)).unwrap());
        assert_eq!(
            set.sequence().to_vec().unwrap(),
            vec![Value::Int(1), Value::Int(3)]
        );
    }

    #[test]
    fn failing_comparer_surfaces() {
        use crate::error::Error;
        let broken: Comparer = Rc::new(|_a, _b| Err(Error::callback("broken")));
        let mut set = Set::new(Some(broken));
        set.items.push(Value::Int(1));
        assert!(set.add(Value::Int(2)).is_err());
    }
}
