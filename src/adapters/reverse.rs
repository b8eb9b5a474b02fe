//! Materializing reversal.

use crate::cursor::Cursor;
use crate::cursor::drain;
use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// Drains the entire source on `rewind` and yields it back-to-front.
/// O(n) memory, by nature. With `preserve_keys` off, keys renumber from 0
/// in reversed order instead of reusing the source keys.
pub struct ReverseCursor {
    inner: Box<dyn Cursor>,
    preserve_keys: bool,
    buffer: Vec<(Value, Value)>,
    pos: Option<usize>,
}

impl ReverseCursor {
    pub fn new(inner: Box<dyn Cursor>, preserve_keys: bool) -> ReverseCursor {
        return ReverseCursor {
            inner,
            preserve_keys,
            buffer: Vec::new(),
            pos: None,
        };
    }

    fn at(&self) -> Result<&(Value, Value)> {
        let pos = self.pos.filter(|p| *p < self.buffer.len());
        return match pos {
            Some(pos) => Ok(&self.buffer[pos]),
            None => Err(Error::NoCurrentElement),
        };
    }
}

impl Cursor for ReverseCursor {
    fn rewind(&mut self) -> Result<()> {
        let mut pairs = drain(self.inner.as_mut())?;
        pairs.reverse();
        if !self.preserve_keys {
            for (i, pair) in pairs.iter_mut().enumerate() {
                pair.0 = Value::Int(i as i64);
            }
        }
        self.buffer = pairs;
        self.pos = Some(0);
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return match self.pos {
            Some(pos) => pos < self.buffer.len(),
            None => false,
        };
    }

    fn current(&self) -> Result<Value> {
        return Ok(self.at()?.1.clone());
    }

    fn key(&self) -> Result<Value> {
        return Ok(self.at()?.0.clone());
    }

    fn advance(&mut self) -> Result<()> {
        if let Some(pos) = self.pos {
            if pos < self.buffer.len() {
                self.pos = Some(pos + 1);
            }
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::cursor::ItemsCursor;

    fn source(values: &[i64]) -> Box<dyn Cursor> {
        let pairs = values
            .iter()
            .enumerate()
            .map(|(i, v)| (Value::Int(i as i64), Value::Int(*v)))
            .collect();
        return Box::new(ItemsCursor::new(Rc::new(pairs)));
    }

    #[test]
    fn yields_back_to_front_with_source_keys() {
        let mut cursor = ReverseCursor::new(source(&[1, 2, 3]), true);
        let pairs = drain(&mut cursor).unwrap();
        assert_eq!(pairs[0], (Value::Int(2), Value::Int(3)));
        assert_eq!(pairs[2], (Value::Int(0), Value::Int(1)));
    }

    #[test]
    fn renumbers_keys_when_not_preserving() {
        let mut cursor = ReverseCursor::new(source(&[1, 2, 3]), false);
        let pairs = drain(&mut cursor).unwrap();
        assert_eq!(pairs[0], (Value::Int(0), Value::Int(3)));
        assert_eq!(pairs[2], (Value::Int(2), Value::Int(1)));
    }

    #[test]
    fn empty_source_reverses_to_empty() {
        let mut cursor = ReverseCursor::new(source(&[]), true);
        assert!(drain(&mut cursor).unwrap().is_empty());
    }
}
