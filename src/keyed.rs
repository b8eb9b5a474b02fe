//! The keyed-flavor operator surface.
//!
//! `KeyedEnumerable` extends `Enumerable` with the operators for which keys
//! are semantic rather than positional: projecting and remapping keys,
//! swapping key and value roles, key-based lookup, and materializing into a
//! key-indexed map. Everything here stays lazy except the lookups and
//! `to_map`.

use std::rc::Rc;

use crate::adapters::Selector;
use crate::adapters::select::FlipCursor;
use crate::adapters::select::KeySelectCursor;
use crate::adapters::select::RenumberCursor;
use crate::collections::map::Map;
use crate::compare::Comparer;
use crate::compare::same_comparer;
use crate::cursor::drain;
use crate::enumerable::Enumerable;
use crate::error::Error;
use crate::error::Result;
use crate::sequence::GroupedSequence;
use crate::sequence::Sequence;
use crate::value::Value;

pub trait KeyedEnumerable: Enumerable {
    /// The keys as a positionally keyed sequence of values.
    fn keys(&self) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            let flipped = Box::new(FlipCursor::new(source.cursor()?));
            return Ok(Box::new(RenumberCursor::new(flipped)));
        });
    }

    /// The values with keys renumbered from 0.
    fn values(&self) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(RenumberCursor::new(source.cursor()?)));
        });
    }

    /// Remap each key through `(key, value) -> key`. Values pass through;
    /// colliding keys are left for downstream consumers to resolve.
    fn select_keys(&self, selector: impl Fn(&Value, &Value) -> Result<Value> + 'static) -> Sequence {
        let source = self.sequence();
        let selector: Selector = Rc::new(selector);
        return Sequence::from_factory(move || {
            return Ok(Box::new(KeySelectCursor::new(
                source.cursor()?,
                selector.clone(),
            )));
        });
    }

    /// Swap key and value roles: values become keys and keys become
    /// values. Whether the new keys are usable downstream is the
    /// consumer's concern.
    fn flip(&self) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(FlipCursor::new(source.cursor()?)));
        });
    }

    /// Group elements by their key. Defaults to the `same` comparer.
    fn group_by_key(&self, comparer: Option<Comparer>) -> GroupedSequence {
        return self.group_by(|_v, k| Ok(k.clone()), comparer);
    }

    /// True if any element's key matches, under the comparer (default
    /// `same`).
    fn contains_key(&self, key: &Value, comparer: Option<Comparer>) -> Result<bool> {
        let comparer = comparer.unwrap_or_else(same_comparer);
        return self.any_by(move |_v, k| Ok(comparer(k, key)?.is_match()));
    }

    /// The value of the first element whose key matches, or `KeyNotFound`.
    fn get(&self, key: &Value, comparer: Option<Comparer>) -> Result<Value> {
        let comparer = comparer.unwrap_or_else(same_comparer);
        return match self.first_by(move |_v, k| Ok(comparer(k, key)?.is_match())) {
            Ok(value) => Ok(value),
            Err(Error::EmptySequence) => Err(Error::KeyNotFound(key.to_string())),
            Err(error) => Err(error),
        };
    }

    /// Lockstep equality over both keys and values. Unequal lengths
    /// compare unequal.
    fn entries_equal(&self, other: Sequence, comparer: Option<Comparer>) -> Result<bool> {
        let comparer = comparer.unwrap_or_else(same_comparer);
        let mut left = self.sequence().cursor()?;
        let mut right = other.cursor()?;
        left.rewind()?;
        right.rewind()?;
        loop {
            match (left.is_valid(), right.is_valid()) {
                (true, true) => {
                    if !comparer(&left.key()?, &right.key()?)?.is_match() {
                        return Ok(false);
                    }
                    if !comparer(&left.current()?, &right.current()?)?.is_match() {
                        return Ok(false);
                    }
                    left.advance()?;
                    right.advance()?;
                }
                (false, false) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }

    /// Materialize into a key-indexed map. Keys must be scalar
    /// (int-coercible or string); the last writer wins on collision.
    fn to_map(&self) -> Result<Map> {
        let pairs = drain(self.sequence().cursor()?.as_mut())?;
        return Map::from_pairs(pairs);
    }
}
