//! An insertion-ordered, scalar-keyed map.

use rustc_hash::FxHashMap;

use crate::enumerable::Enumerable;
use crate::error::Error;
use crate::error::Result;
use crate::keyed::KeyedEnumerable;
use crate::sequence::Sequence;
use crate::value::ScalarKey;
use crate::value::Value;

/// Entries live in a `Vec` in insertion order; an `FxHashMap` indexes
/// canonical keys to positions. Keys must coerce to a `ScalarKey`, so
/// `1`, `1.7`, `true` and `"1"` all address the same slot while `Null`,
/// lists and objects are rejected with `KeyNotAllowed` (use `ObjectMap`
/// for those).
#[derive(Clone, Debug, Default)]
pub struct Map {
    entries: Vec<(ScalarKey, Value)>,
    index: FxHashMap<ScalarKey, usize>,
}

impl Map {
    pub fn new() -> Map {
        return Map::default();
    }

    /// Build from (key, value) pairs. The last writer wins on collision
    /// but keeps the first writer's position, matching insert-then-update
    /// semantics.
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Result<Map> {
        let mut map = Map::new();
        for (key, value) in pairs {
            map.insert(&key, value)?;
        }
        return Ok(map);
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// Insert or update. Updating keeps the entry's original position.
    pub fn insert(&mut self, key: &Value, value: Value) -> Result<()> {
        let key = key.array_key()?;
        match self.index.get(&key) {
            Some(pos) => self.entries[*pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
        return Ok(());
    }

    /// Look up a key. `None` means absent; an unkeyable value is an error.
    pub fn get(&self, key: &Value) -> Result<Option<&Value>> {
        let key = key.array_key()?;
        return Ok(self.index.get(&key).map(|pos| &self.entries[*pos].1));
    }

    /// Like `get`, but absence is a hard `KeyNotFound` failure.
    pub fn expect_get(&self, key: &Value) -> Result<&Value> {
        return self
            .get(key)?
            .ok_or_else(|| Error::KeyNotFound(key.to_string()));
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool> {
        return Ok(self.index.contains_key(&key.array_key()?));
    }

    /// Remove an entry, returning its value. Later entries shift down one
    /// position, so removal is O(n).
    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>> {
        let key = key.array_key()?;
        let pos = match self.index.remove(&key) {
            Some(pos) => pos,
            None => return Ok(None),
        };
        let (_, value) = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        return Ok(Some(value));
    }

    /// Keys in insertion order, as values.
    pub fn map_keys(&self) -> Vec<Value> {
        return self.entries.iter().map(|(k, _)| k.to_value()).collect();
    }

    /// Values in insertion order.
    pub fn map_values(&self) -> Vec<Value> {
        return self.entries.iter().map(|(_, v)| v.clone()).collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScalarKey, &Value)> {
        return self.entries.iter().map(|(k, v)| (k, v));
    }
}

impl Enumerable for Map {
    /// Snapshot: entries at the time the chain was built, in insertion
    /// order, with canonical keys.
    fn sequence(&self) -> Sequence {
        let pairs = self
            .entries
            .iter()
            .map(|(k, v)| (k.to_value(), v.clone()))
            .collect();
        return Sequence::from_pairs(pairs);
    }
}

impl KeyedEnumerable for Map {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut map = Map::new();
        map.insert(&Value::str("a"), Value::Int(1)).unwrap();
        map.insert(&Value::Int(2), Value::Int(20)).unwrap();
        assert_eq!(map.get(&Value::str("a")).unwrap(), Some(&Value::Int(1)));
        assert_eq!(map.get(&Value::Int(2)).unwrap(), Some(&Value::Int(20)));
        assert_eq!(map.get(&Value::str("missing")).unwrap(), None);
    }

    #[test]
    fn keys_canonicalize_like_array_keys() {
        let mut map = Map::new();
        map.insert(&Value::Int(1), Value::str("int")).unwrap();
        // "1", 1.7 and true all collapse to key 1.
        map.insert(&Value::str("1"), Value::str("string")).unwrap();
        map.insert(&Value::Float(1.7), Value::str("float")).unwrap();
        map.insert(&Value::Bool(true), Value::str("bool")).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Value::Int(1)).unwrap(), Some(&Value::str("bool")));
    }

    #[test]
    fn update_keeps_insertion_position() {
        let mut map = Map::new();
        map.insert(&Value::str("a"), Value::Int(1)).unwrap();
        map.insert(&Value::str("b"), Value::Int(2)).unwrap();
        map.insert(&Value::str("a"), Value::Int(9)).unwrap();
        assert_eq!(map.map_keys(), vec![Value::str("a"), Value::str("b")]);
        assert_eq!(map.map_values(), vec![Value::Int(9), Value::Int(2)]);
    }

    #[test]
    fn unkeyable_values_are_rejected() {
        let mut map = Map::new();
        assert!(matches!(
            map.insert(&Value::Null, Value::Int(1)),
            Err(Error::KeyNotAllowed(_))
        ));
        assert!(map.get(&Value::List(vec![])).is_err());
    }

    #[test]
    fn expect_get_fails_on_absence() {
        let map = Map::new();
        assert!(matches!(
            map.expect_get(&Value::str("nope")),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let mut map = Map::new();
        map.insert(&Value::str("a"), Value::Int(1)).unwrap();
        map.insert(&Value::str("b"), Value::Int(2)).unwrap();
        map.insert(&Value::str("c"), Value::Int(3)).unwrap();
        assert_eq!(map.remove(&Value::str("b")).unwrap(), Some(Value::Int(2)));
        assert_eq!(map.remove(&Value::str("b")).unwrap(), None);
        assert_eq!(map.map_keys(), vec![Value::str("a"), Value::str("c")]);
        // The shifted index still resolves.
        assert_eq!(map.get(&Value::str("c")).unwrap(), Some(&Value::Int(3)));
    }

    #[test]
    fn sequence_carries_canonical_keys() {
        let mut map = Map::new();
        map.insert(&Value::str("7"), Value::Int(70)).unwrap();
        map.insert(&Value::str("name"), Value::Int(1)).unwrap();
        assert_eq!(
            map.keys().to_vec().unwrap(),
            vec![Value::Int(7), Value::str("name")]
        );
    }

    #[test]
    fn round_trips_through_to_map() {
        let mut map = Map::new();
        map.insert(&Value::str("a"), Value::Int(1)).unwrap();
        map.insert(&Value::str("b"), Value::Int(2)).unwrap();
        let rebuilt = map
            .where_by(|v, _k| Ok(matches!(v, Value::Int(i) if *i > 1)))
            .to_map()
            .unwrap();
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt.get(&Value::str("b")).unwrap(), Some(&Value::Int(2)));
    }
}
