//! A positional, growable list of values.

use crate::enumerable::Enumerable;
use crate::error::Error;
use crate::error::Result;
use crate::keyed::KeyedEnumerable;
use crate::sequence::Sequence;
use crate::value::Value;

/// An eager `Vec`-backed list. Keys are always the positions 0..len, so
/// removal and insertion shift everything after the touched index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    pub fn new() -> List {
        return List { items: Vec::new() };
    }

    pub fn from_values(items: Vec<Value>) -> List {
        return List { items };
    }

    pub fn len(&self) -> usize {
        return self.items.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }

    /// Append a value at the end.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Remove and return the last value.
    pub fn pop(&mut self) -> Option<Value> {
        return self.items.pop();
    }

    /// Insert at `index`, shifting later elements right. An index past the
    /// end fails with `InvalidArgument`.
    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::invalid_argument(format!(
                "insert index {} out of bounds for length {}",
                index,
                self.items.len()
            )));
        }
        self.items.insert(index, value);
        return Ok(());
    }

    /// Remove and return the value at `index`, shifting later elements
    /// left.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        if index >= self.items.len() {
            return Err(Error::invalid_argument(format!(
                "remove index {} out of bounds for length {}",
                index,
                self.items.len()
            )));
        }
        return Ok(self.items.remove(index));
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        return self.items.get(index);
    }

    /// Replace the value at `index`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        return match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::invalid_argument(format!(
                "set index {} out of bounds for length {}",
                index,
                self.items.len()
            ))),
        };
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        return self.items.iter();
    }

    pub fn into_values(self) -> Vec<Value> {
        return self.items;
    }
}

impl Enumerable for List {
    /// Snapshot: the sequence sees the list as it is now.
    fn sequence(&self) -> Sequence {
        return Sequence::from_values(self.items.clone());
    }
}

impl KeyedEnumerable for List {}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> List {
        return List::from_values(iter.into_iter().collect());
    }
}
