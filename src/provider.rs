//! The iterator provider: where cursors come from, and the eager-replay
//! cache that makes single-pass producers traversable more than once.
//!
//! A provider owns one of three sources:
//!
//! - materialized items, shared behind an `Rc` — every cursor is a fresh
//!   `ItemsCursor` over the same list;
//! - a factory thunk — every traversal invokes it and gets a freshly built
//!   cursor chain, so replay works by reconstruction;
//! - a single-pass pull iterator (the generator case) — wrapped in a shared
//!   replay cache that captures each pair the first time it is pulled, so
//!   every later traversal replays the recorded pairs instead of re-driving
//!   the exhausted producer.
//!
//! The guarantee either way: asking the same provider for a cursor any
//! number of times observes the same elements in the same order. The cache
//! fills incrementally, so a partial first traversal does not freeze it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::cursor::ItemsCursor;
use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// A thunk producing a fresh cursor per traversal.
pub type CursorFactory = Rc<dyn Fn() -> Result<Box<dyn Cursor>>>;

/// The source of cursors behind a sequence.
#[derive(Clone)]
pub enum Provider {
    /// Materialized pairs; replayable.
    Items(Rc<Vec<(Value, Value)>>),
    /// Rebuilds a cursor chain per traversal; replayable.
    Factory(CursorFactory),
    /// A single-pass producer behind a capture-on-traversal cache.
    Replay(Rc<RefCell<ReplayCache>>),
}

impl Provider {
    /// A provider over already-materialized pairs.
    pub fn from_items(items: Vec<(Value, Value)>) -> Provider {
        return Provider::Items(Rc::new(items));
    }

    /// A provider that rebuilds its cursor chain on every traversal.
    pub fn from_factory(factory: impl Fn() -> Result<Box<dyn Cursor>> + 'static) -> Provider {
        return Provider::Factory(Rc::new(factory));
    }

    /// A provider over a one-shot producer. The replay cache records pairs
    /// as they are first pulled.
    pub fn from_single_pass(source: impl Iterator<Item = (Value, Value)> + 'static) -> Provider {
        let cache = ReplayCache {
            captured: Vec::new(),
            source: Some(Box::new(source)),
        };
        return Provider::Replay(Rc::new(RefCell::new(cache)));
    }

    /// A fresh cursor over this provider's elements.
    pub fn cursor(&self) -> Result<Box<dyn Cursor>> {
        return match self {
            Provider::Items(items) => Ok(Box::new(ItemsCursor::new(items.clone()))),
            Provider::Factory(factory) => factory(),
            Provider::Replay(cache) => Ok(Box::new(ReplayCursor {
                cache: cache.clone(),
                pos: None,
            })),
        };
    }
}

/// Pairs captured from a single-pass producer, plus the producer itself
/// until it is exhausted.
pub struct ReplayCache {
    captured: Vec<(Value, Value)>,
    source: Option<Box<dyn Iterator<Item = (Value, Value)>>>,
}

impl ReplayCache {
    /// Pull from the producer until index `n` is captured. Returns true if
    /// the cache now holds an element at `n`.
    fn fill_to(&mut self, n: usize) -> bool {
        while self.captured.len() <= n {
            match self.source.as_mut().and_then(|source| source.next()) {
                Some(pair) => self.captured.push(pair),
                None => {
                    self.source = None;
                    return false;
                }
            }
        }
        return true;
    }
}

/// A cursor over a shared replay cache. Independent cursors over the same
/// cache each keep their own position.
struct ReplayCursor {
    cache: Rc<RefCell<ReplayCache>>,
    pos: Option<usize>,
}

impl Cursor for ReplayCursor {
    fn rewind(&mut self) -> Result<()> {
        self.pos = Some(0);
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return match self.pos {
            Some(pos) => self.cache.borrow_mut().fill_to(pos),
            None => false,
        };
    }

    fn current(&self) -> Result<Value> {
        let pos = self.pos.ok_or(Error::NoCurrentElement)?;
        let mut cache = self.cache.borrow_mut();
        if !cache.fill_to(pos) {
            return Err(Error::NoCurrentElement);
        }
        return Ok(cache.captured[pos].1.clone());
    }

    fn key(&self) -> Result<Value> {
        let pos = self.pos.ok_or(Error::NoCurrentElement)?;
        let mut cache = self.cache.borrow_mut();
        if !cache.fill_to(pos) {
            return Err(Error::NoCurrentElement);
        }
        return Ok(cache.captured[pos].0.clone());
    }

    fn advance(&mut self) -> Result<()> {
        if let Some(pos) = self.pos {
            if self.cache.borrow_mut().fill_to(pos) {
                self.pos = Some(pos + 1);
            }
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::drain;

    fn pairs(values: &[i64]) -> Vec<(Value, Value)> {
        return values
            .iter()
            .enumerate()
            .map(|(i, v)| (Value::Int(i as i64), Value::Int(*v)))
            .collect();
    }

    #[test]
    fn items_provider_replays() {
        let provider = Provider::from_items(pairs(&[1, 2, 3]));
        let first = drain(provider.cursor().unwrap().as_mut()).unwrap();
        let second = drain(provider.cursor().unwrap().as_mut()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn single_pass_provider_replays_identically() {
        // A genuine one-shot producer: once drained it yields nothing,
        // so the second traversal must come from the cache.
        let provider = Provider::from_single_pass(pairs(&[1, 2, 3]).into_iter());
        let first = drain(provider.cursor().unwrap().as_mut()).unwrap();
        let second = drain(provider.cursor().unwrap().as_mut()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, pairs(&[1, 2, 3]));
    }

    #[test]
    fn partial_traversal_does_not_freeze_the_cache() {
        let provider = Provider::from_single_pass(pairs(&[1, 2, 3]).into_iter());
        let mut cursor = provider.cursor().unwrap();
        cursor.rewind().unwrap();
        assert!(cursor.is_valid());
        cursor.advance().unwrap();
        // Only two elements pulled so far; a full traversal still sees all
        // three.
        let full = drain(provider.cursor().unwrap().as_mut()).unwrap();
        assert_eq!(full.len(), 3);
    }

    #[test]
    fn interleaved_cursors_do_not_disturb_each_other() {
        let provider = Provider::from_single_pass(pairs(&[10, 20]).into_iter());
        let mut a = provider.cursor().unwrap();
        let mut b = provider.cursor().unwrap();
        a.rewind().unwrap();
        b.rewind().unwrap();
        assert_eq!(a.current().unwrap(), Value::Int(10));
        a.advance().unwrap();
        assert_eq!(a.current().unwrap(), Value::Int(20));
        assert_eq!(b.current().unwrap(), Value::Int(10));
    }

    #[test]
    fn factory_provider_rebuilds_per_traversal() {
        let provider = Provider::from_factory(|| {
            return Ok(Box::new(ItemsCursor::new(Rc::new(vec![(
                Value::Int(0),
                Value::Int(7),
            )]))));
        });
        let first = drain(provider.cursor().unwrap().as_mut()).unwrap();
        let second = drain(provider.cursor().unwrap().as_mut()).unwrap();
        assert_eq!(first, second);
    }
}
