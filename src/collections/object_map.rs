//! A map keyed by arbitrary values.

use crate::compare::Comparer;
use crate::compare::same_comparer;
use crate::enumerable::Enumerable;
use crate::error::Error;
use crate::error::Result;
use crate::keyed::KeyedEnumerable;
use crate::sequence::Sequence;
use crate::value::Value;

/// Unlike `Map`, keys are not coerced: any value can key an entry,
/// including objects and lists. Lookup is a linear comparer scan (default
/// `same`), so objects key by identity unless a comparer says otherwise.
#[derive(Clone)]
pub struct ObjectMap {
    entries: Vec<(Value, Value)>,
    comparer: Comparer,
}

impl ObjectMap {
    pub fn new(comparer: Option<Comparer>) -> ObjectMap {
        return ObjectMap {
            entries: Vec::new(),
            comparer: comparer.unwrap_or_else(same_comparer),
        };
    }

    /// Build from (key, value) pairs; the last writer wins on collision.
    pub fn from_pairs(pairs: Vec<(Value, Value)>, comparer: Option<Comparer>) -> Result<ObjectMap> {
        let mut map = ObjectMap::new(comparer);
        for (key, value) in pairs {
            map.insert(key, value)?;
        }
        return Ok(map);
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    fn position(&self, key: &Value) -> Result<Option<usize>> {
        for (i, (existing, _)) in self.entries.iter().enumerate() {
            if (self.comparer)(existing, key)?.is_match() {
                return Ok(Some(i));
            }
        }
        return Ok(None);
    }

    /// Insert or update. Updating keeps the entry's original position.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<()> {
        match self.position(&key)? {
            Some(pos) => self.entries[pos].1 = value,
            None => self.entries.push((key, value)),
        }
        return Ok(());
    }

    pub fn get(&self, key: &Value) -> Result<Option<&Value>> {
        return Ok(self.position(key)?.map(|pos| &self.entries[pos].1));
    }

    /// Like `get`, but absence is a hard `KeyNotFound` failure.
    pub fn expect_get(&self, key: &Value) -> Result<&Value> {
        return self
            .get(key)?
            .ok_or_else(|| Error::KeyNotFound(key.to_string()));
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool> {
        return Ok(self.position(key)?.is_some());
    }

    /// Remove an entry, returning its value. Later entries keep their
    /// relative order.
    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>> {
        return match self.position(key)? {
            Some(pos) => Ok(Some(self.entries.remove(pos).1)),
            None => Ok(None),
        };
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        return self.entries.iter().map(|(k, v)| (k, v));
    }
}

impl Enumerable for ObjectMap {
    /// Snapshot, in insertion order, keys untouched.
    fn sequence(&self) -> Sequence {
        return Sequence::from_pairs(self.entries.clone());
    }
}

impl KeyedEnumerable for ObjectMap {}
