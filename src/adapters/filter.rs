//! Filtering and windowing adapters: `where`, take/skip-while, index
//! slicing, and chunking.

use crate::adapters::Predicate;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// Skips elements failing the predicate. The predicate runs once per source
/// element, while advancing; it is not re-evaluated by `current`.
pub struct WhereCursor {
    inner: Box<dyn Cursor>,
    predicate: Predicate,
}

impl WhereCursor {
    pub fn new(inner: Box<dyn Cursor>, predicate: Predicate) -> WhereCursor {
        return WhereCursor { inner, predicate };
    }

    /// Advance the inner cursor until it rests on a passing element.
    fn settle(&mut self) -> Result<()> {
        while self.inner.is_valid() {
            let value = self.inner.current()?;
            let key = self.inner.key()?;
            if (self.predicate)(&value, &key)? {
                break;
            }
            self.inner.advance()?;
        }
        return Ok(());
    }
}

impl Cursor for WhereCursor {
    fn rewind(&mut self) -> Result<()> {
        self.inner.rewind()?;
        return self.settle();
    }

    fn is_valid(&self) -> bool {
        return self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        return self.inner.key();
    }

    fn advance(&mut self) -> Result<()> {
        self.inner.advance()?;
        return self.settle();
    }
}

/// Yields while the predicate holds; the first failure pins the cursor
/// invalid even though the source may have more elements.
pub struct WhileCursor {
    inner: Box<dyn Cursor>,
    predicate: Predicate,
    stopped: bool,
}

impl WhileCursor {
    pub fn new(inner: Box<dyn Cursor>, predicate: Predicate) -> WhileCursor {
        return WhileCursor {
            inner,
            predicate,
            stopped: false,
        };
    }

    fn check(&mut self) -> Result<()> {
        if self.inner.is_valid() {
            let value = self.inner.current()?;
            let key = self.inner.key()?;
            if !(self.predicate)(&value, &key)? {
                self.stopped = true;
            }
        }
        return Ok(());
    }
}

impl Cursor for WhileCursor {
    fn rewind(&mut self) -> Result<()> {
        self.stopped = false;
        self.inner.rewind()?;
        return self.check();
    }

    fn is_valid(&self) -> bool {
        return !self.stopped && self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        if self.stopped {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        if self.stopped {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.key();
    }

    fn advance(&mut self) -> Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.inner.advance()?;
        return self.check();
    }
}

/// Drops the leading run of elements passing the predicate, then yields the
/// rest unconditionally.
///
/// The failing prefix is drained eagerly on the first `rewind`; a second
/// `rewind` fails, because the drained prefix cannot be replayed through
/// this cursor. Sequence-level replay still works: each traversal builds a
/// fresh cursor chain.
pub struct SkipWhileCursor {
    inner: Box<dyn Cursor>,
    predicate: Predicate,
    started: bool,
}

impl SkipWhileCursor {
    pub fn new(inner: Box<dyn Cursor>, predicate: Predicate) -> SkipWhileCursor {
        return SkipWhileCursor {
            inner,
            predicate,
            started: false,
        };
    }
}

impl Cursor for SkipWhileCursor {
    fn rewind(&mut self) -> Result<()> {
        if self.started {
            return Err(Error::invalid_argument(
                "a skip-while cursor cannot be rewound",
            ));
        }
        self.started = true;
        self.inner.rewind()?;
        while self.inner.is_valid() {
            let value = self.inner.current()?;
            let key = self.inner.key()?;
            if !(self.predicate)(&value, &key)? {
                break;
            }
            self.inner.advance()?;
        }
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return self.started && self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        if !self.started {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        if !self.started {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.key();
    }

    fn advance(&mut self) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        return self.inner.advance();
    }
}

/// Index-based slicing: drop the first `skip` elements, then yield at most
/// `take` elements (all of them when `take` is `None`). Rewindable, unlike
/// the predicate-driven skip.
pub struct SliceCursor {
    inner: Box<dyn Cursor>,
    skip: usize,
    take: Option<usize>,
    taken: usize,
}

impl SliceCursor {
    pub fn new(inner: Box<dyn Cursor>, skip: usize, take: Option<usize>) -> SliceCursor {
        return SliceCursor {
            inner,
            skip,
            take,
            taken: 0,
        };
    }

    fn within_window(&self) -> bool {
        return match self.take {
            Some(limit) => self.taken < limit,
            None => true,
        };
    }
}

impl Cursor for SliceCursor {
    fn rewind(&mut self) -> Result<()> {
        self.taken = 0;
        self.inner.rewind()?;
        for _ in 0..self.skip {
            if !self.inner.is_valid() {
                break;
            }
            self.inner.advance()?;
        }
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return self.within_window() && self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        if !self.within_window() {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        if !self.within_window() {
            return Err(Error::NoCurrentElement);
        }
        return self.inner.key();
    }

    fn advance(&mut self) -> Result<()> {
        if !self.is_valid() {
            return Ok(());
        }
        self.taken += 1;
        if self.within_window() {
            return self.inner.advance();
        }
        return Ok(());
    }
}

/// Packs runs of `size` values into lists. Keys renumber from 0; the source
/// keys are discarded, because a chunk spans several of them.
pub struct ChunkCursor {
    inner: Box<dyn Cursor>,
    size: usize,
    chunk: Option<Vec<Value>>,
    index: i64,
}

impl ChunkCursor {
    /// `size` must be at least 1; validated by the operator that builds
    /// this cursor.
    pub fn new(inner: Box<dyn Cursor>, size: usize) -> ChunkCursor {
        return ChunkCursor {
            inner,
            size,
            chunk: None,
            index: 0,
        };
    }

    fn load(&mut self) -> Result<()> {
        let mut values = Vec::new();
        while values.len() < self.size && self.inner.is_valid() {
            values.push(self.inner.current()?);
            self.inner.advance()?;
        }
        self.chunk = if values.is_empty() { None } else { Some(values) };
        return Ok(());
    }
}

impl Cursor for ChunkCursor {
    fn rewind(&mut self) -> Result<()> {
        self.index = 0;
        self.inner.rewind()?;
        return self.load();
    }

    fn is_valid(&self) -> bool {
        return self.chunk.is_some();
    }

    fn current(&self) -> Result<Value> {
        return match &self.chunk {
            Some(values) => Ok(Value::List(values.clone())),
            None => Err(Error::NoCurrentElement),
        };
    }

    fn key(&self) -> Result<Value> {
        if self.chunk.is_none() {
            return Err(Error::NoCurrentElement);
        }
        return Ok(Value::Int(self.index));
    }

    fn advance(&mut self) -> Result<()> {
        if self.chunk.is_none() {
            return Ok(());
        }
        self.index += 1;
        return self.load();
    }
}
