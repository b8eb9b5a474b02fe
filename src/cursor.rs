//! The pull protocol spoken by every adapter and sequence.
//!
//! A cursor walks a stream of (key, value) pairs through five operations:
//! `rewind`, `is_valid`, `current`, `key`, `advance`. The state machine is
//! uniform across the crate:
//!
//! ```text
//! Initial -> (rewind) -> Iterating -> (advance while is_valid) -> Exhausted
//! ```
//!
//! `Exhausted` is terminal only for single-pass sources; cursors backed by
//! materialized items return to `Iterating` on the next `rewind`. Calling
//! `current` or `key` while `is_valid` is false violates the protocol and
//! fails with `NoCurrentElement`. `advance` on an invalid cursor is a no-op.

use std::rc::Rc;

use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// A pull-based iterator over (key, value) pairs.
pub trait Cursor {
    /// Reset to the start of the stream.
    fn rewind(&mut self) -> Result<()>;

    /// True while the cursor holds an element.
    fn is_valid(&self) -> bool;

    /// The current value. Fails if the cursor holds no element.
    fn current(&self) -> Result<Value>;

    /// The current key. Fails if the cursor holds no element.
    fn key(&self) -> Result<Value>;

    /// Move to the next element.
    fn advance(&mut self) -> Result<()>;
}

/// Rewind a cursor and collect every (key, value) pair it yields.
pub fn drain(cursor: &mut dyn Cursor) -> Result<Vec<(Value, Value)>> {
    cursor.rewind()?;
    let mut pairs = Vec::new();
    while cursor.is_valid() {
        pairs.push((cursor.key()?, cursor.current()?));
        cursor.advance()?;
    }
    return Ok(pairs);
}

/// A cursor over a shared, materialized pair list. Fully rewindable.
pub struct ItemsCursor {
    items: Rc<Vec<(Value, Value)>>,
    /// `None` until the first rewind.
    pos: Option<usize>,
}

impl ItemsCursor {
    /// Build a cursor over shared items.
    pub fn new(items: Rc<Vec<(Value, Value)>>) -> ItemsCursor {
        return ItemsCursor { items, pos: None };
    }
}

impl Cursor for ItemsCursor {
    fn rewind(&mut self) -> Result<()> {
        self.pos = Some(0);
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return match self.pos {
            Some(pos) => pos < self.items.len(),
            None => false,
        };
    }

    fn current(&self) -> Result<Value> {
        let pos = self.pos.filter(|p| *p < self.items.len());
        return match pos {
            Some(pos) => Ok(self.items[pos].1.clone()),
            None => Err(Error::NoCurrentElement),
        };
    }

    fn key(&self) -> Result<Value> {
        let pos = self.pos.filter(|p| *p < self.items.len());
        return match pos {
            Some(pos) => Ok(self.items[pos].0.clone()),
            None => Err(Error::NoCurrentElement),
        };
    }

    fn advance(&mut self) -> Result<()> {
        if let Some(pos) = self.pos {
            if pos < self.items.len() {
                self.pos = Some(pos + 1);
            }
        }
        return Ok(());
    }
}

/// An inclusive integer range with a signed step. Keys count up from 0.
pub struct RangeCursor {
    start: i64,
    end: i64,
    step: i64,
    current: Option<i64>,
    index: i64,
}

impl RangeCursor {
    /// Build a range cursor. The step must not be zero; that is validated
    /// at sequence construction time.
    pub fn new(start: i64, end: i64, step: i64) -> RangeCursor {
        return RangeCursor {
            start,
            end,
            step,
            current: None,
            index: 0,
        };
    }

    fn in_bounds(&self, value: i64) -> bool {
        if self.step > 0 {
            return value <= self.end;
        }
        return value >= self.end;
    }
}

impl Cursor for RangeCursor {
    fn rewind(&mut self) -> Result<()> {
        self.index = 0;
        self.current = if self.in_bounds(self.start) {
            Some(self.start)
        } else {
            None
        };
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return self.current.is_some();
    }

    fn current(&self) -> Result<Value> {
        return match self.current {
            Some(value) => Ok(Value::Int(value)),
            None => Err(Error::NoCurrentElement),
        };
    }

    fn key(&self) -> Result<Value> {
        if self.current.is_none() {
            return Err(Error::NoCurrentElement);
        }
        return Ok(Value::Int(self.index));
    }

    fn advance(&mut self) -> Result<()> {
        if let Some(value) = self.current {
            self.current = value
                .checked_add(self.step)
                .filter(|next| self.in_bounds(*next));
            self.index += 1;
        }
        return Ok(());
    }
}

/// The zero-element cursor.
pub struct EmptyCursor;

impl Cursor for EmptyCursor {
    fn rewind(&mut self) -> Result<()> {
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return false;
    }

    fn current(&self) -> Result<Value> {
        return Err(Error::NoCurrentElement);
    }

    fn key(&self) -> Result<Value> {
        return Err(Error::NoCurrentElement);
    }

    fn advance(&mut self) -> Result<()> {
        return Ok(());
    }
}
