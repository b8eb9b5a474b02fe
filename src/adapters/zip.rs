//! Two-source adapters: concatenation, lockstep pairing, and comparer-based
//! inner join.

use crate::adapters::Selector;
use crate::compare::Comparer;
use crate::cursor::Cursor;
use crate::cursor::drain;
use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// Yields the left source, then the right. Keys pass through from whichever
/// source is active; consumers that need fresh keys renumber downstream.
pub struct ConcatCursor {
    left: Box<dyn Cursor>,
    right: Box<dyn Cursor>,
}

impl ConcatCursor {
    pub fn new(left: Box<dyn Cursor>, right: Box<dyn Cursor>) -> ConcatCursor {
        return ConcatCursor { left, right };
    }

    fn active(&self) -> &dyn Cursor {
        if self.left.is_valid() {
            return self.left.as_ref();
        }
        return self.right.as_ref();
    }
}

impl Cursor for ConcatCursor {
    fn rewind(&mut self) -> Result<()> {
        self.left.rewind()?;
        return self.right.rewind();
    }

    fn is_valid(&self) -> bool {
        return self.left.is_valid() || self.right.is_valid();
    }

    fn current(&self) -> Result<Value> {
        return self.active().current();
    }

    fn key(&self) -> Result<Value> {
        return self.active().key();
    }

    fn advance(&mut self) -> Result<()> {
        if self.left.is_valid() {
            return self.left.advance();
        }
        return self.right.advance();
    }
}

/// Lockstep pairing. Need-all semantics: a result exists only while both
/// sources hold a current element, so output stops at the shorter input.
/// Keys renumber from 0.
pub struct ZipCursor {
    left: Box<dyn Cursor>,
    right: Box<dyn Cursor>,
    /// `(left, right) -> result`; `None` pairs into a two-element list.
    selector: Option<Selector>,
    index: i64,
}

impl ZipCursor {
    pub fn new(
        left: Box<dyn Cursor>,
        right: Box<dyn Cursor>,
        selector: Option<Selector>,
    ) -> ZipCursor {
        return ZipCursor {
            left,
            right,
            selector,
            index: 0,
        };
    }
}

impl Cursor for ZipCursor {
    fn rewind(&mut self) -> Result<()> {
        self.index = 0;
        self.left.rewind()?;
        return self.right.rewind();
    }

    fn is_valid(&self) -> bool {
        return self.left.is_valid() && self.right.is_valid();
    }

    fn current(&self) -> Result<Value> {
        if !self.is_valid() {
            return Err(Error::NoCurrentElement);
        }
        let left = self.left.current()?;
        let right = self.right.current()?;
        return match &self.selector {
            Some(selector) => selector(&left, &right),
            None => Ok(Value::List(vec![left, right])),
        };
    }

    fn key(&self) -> Result<Value> {
        if !self.is_valid() {
            return Err(Error::NoCurrentElement);
        }
        return Ok(Value::Int(self.index));
    }

    fn advance(&mut self) -> Result<()> {
        if !self.is_valid() {
            return Ok(());
        }
        self.left.advance()?;
        self.right.advance()?;
        self.index += 1;
        return Ok(());
    }
}

/// Comparer-based inner join: O(n·m), one result per matching inner
/// element.
///
/// The inner side is fully materialized (projected key plus element) on
/// `rewind`; membership testing needs random access over it. The outer side
/// streams. Keys renumber from 0.
pub struct JoinCursor {
    outer: Box<dyn Cursor>,
    inner: Box<dyn Cursor>,
    outer_selector: Selector,
    inner_selector: Selector,
    result_selector: Selector,
    comparer: Comparer,
    inner_items: Vec<(Value, Value)>,
    inner_pos: usize,
    outer_key: Option<Value>,
    index: i64,
}

impl JoinCursor {
    pub fn new(
        outer: Box<dyn Cursor>,
        inner: Box<dyn Cursor>,
        outer_selector: Selector,
        inner_selector: Selector,
        result_selector: Selector,
        comparer: Comparer,
    ) -> JoinCursor {
        return JoinCursor {
            outer,
            inner,
            outer_selector,
            inner_selector,
            result_selector,
            comparer,
            inner_items: Vec::new(),
            inner_pos: 0,
            outer_key: None,
            index: 0,
        };
    }

    /// Move to the next (outer, inner) match. Afterwards either the outer
    /// cursor is exhausted or `inner_pos` rests on a matching inner
    /// element.
    fn settle(&mut self) -> Result<()> {
        while self.outer.is_valid() {
            if self.outer_key.is_none() {
                let value = self.outer.current()?;
                let key = self.outer.key()?;
                self.outer_key = Some((self.outer_selector)(&value, &key)?);
            }
            let outer_key = self.outer_key.clone().unwrap_or(Value::Null);
            while self.inner_pos < self.inner_items.len() {
                if (self.comparer)(&outer_key, &self.inner_items[self.inner_pos].0)?.is_match() {
                    return Ok(());
                }
                self.inner_pos += 1;
            }
            self.outer.advance()?;
            self.outer_key = None;
            self.inner_pos = 0;
        }
        return Ok(());
    }
}

impl Cursor for JoinCursor {
    fn rewind(&mut self) -> Result<()> {
        let pairs = drain(self.inner.as_mut())?;
        let mut items = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let projected = (self.inner_selector)(&value, &key)?;
            items.push((projected, value));
        }
        self.inner_items = items;
        self.inner_pos = 0;
        self.outer_key = None;
        self.index = 0;
        self.outer.rewind()?;
        return self.settle();
    }

    fn is_valid(&self) -> bool {
        // settle leaves the cursor either on a match or past the outer end.
        return self.outer.is_valid() && self.inner_pos < self.inner_items.len();
    }

    fn current(&self) -> Result<Value> {
        if !self.is_valid() {
            return Err(Error::NoCurrentElement);
        }
        let outer = self.outer.current()?;
        return (self.result_selector)(&outer, &self.inner_items[self.inner_pos].1);
    }

    fn key(&self) -> Result<Value> {
        if !self.is_valid() {
            return Err(Error::NoCurrentElement);
        }
        return Ok(Value::Int(self.index));
    }

    fn advance(&mut self) -> Result<()> {
        if !self.is_valid() {
            return Ok(());
        }
        self.inner_pos += 1;
        self.index += 1;
        return self.settle();
    }
}
