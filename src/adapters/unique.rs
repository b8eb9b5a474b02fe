//! Distinctness: yields only the first element for each projected key.

use smallvec::SmallVec;

use crate::adapters::Selector;
use crate::compare::Comparer;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// Yields elements whose projected key has not been seen before.
///
/// Seen keys live in an append-only buffer scanned linearly with the
/// configured comparer. That is O(n²) over the distinct count, which buys
/// support for arbitrary equality (object keys, loose numeric equality)
/// instead of requiring hashable keys.
pub struct UniqueCursor {
    inner: Box<dyn Cursor>,
    /// Projects `(value, key)` to the distinctness key. `None` means the
    /// value itself is the key.
    selector: Option<Selector>,
    comparer: Comparer,
    seen: SmallVec<[Value; 8]>,
}

impl UniqueCursor {
    pub fn new(
        inner: Box<dyn Cursor>,
        selector: Option<Selector>,
        comparer: Comparer,
    ) -> UniqueCursor {
        return UniqueCursor {
            inner,
            selector,
            comparer,
            seen: SmallVec::new(),
        };
    }

    fn project(&self) -> Result<Value> {
        let value = self.inner.current()?;
        return match &self.selector {
            Some(selector) => selector(&value, &self.inner.key()?),
            None => Ok(value),
        };
    }

    fn already_seen(&self, candidate: &Value) -> Result<bool> {
        for previous in &self.seen {
            if (self.comparer)(previous, candidate)?.is_match() {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    /// Advance the inner cursor until it rests on an unseen key, recording
    /// that key.
    fn settle(&mut self) -> Result<()> {
        while self.inner.is_valid() {
            let candidate = self.project()?;
            if !self.already_seen(&candidate)? {
                self.seen.push(candidate);
                break;
            }
            self.inner.advance()?;
        }
        return Ok(());
    }
}

impl Cursor for UniqueCursor {
    fn rewind(&mut self) -> Result<()> {
        self.seen.clear();
        self.inner.rewind()?;
        return self.settle();
    }

    fn is_valid(&self) -> bool {
        return self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        if !self.inner.is_valid() {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        if !self.inner.is_valid() {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.key();
    }

    fn advance(&mut self) -> Result<()> {
        self.inner.advance()?;
        return self.settle();
    }
}
