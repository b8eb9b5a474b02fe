//! Projection adapters: remap values, remap keys, or swap the two roles.

use crate::adapters::Selector;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::value::Value;

/// Applies `(value, key) -> value` lazily on each pull. Keys pass through.
pub struct SelectCursor {
    inner: Box<dyn Cursor>,
    selector: Selector,
}

impl SelectCursor {
    pub fn new(inner: Box<dyn Cursor>, selector: Selector) -> SelectCursor {
        return SelectCursor { inner, selector };
    }
}

impl Cursor for SelectCursor {
    fn rewind(&mut self) -> Result<()> {
        return self.inner.rewind();
    }

    fn is_valid(&self) -> bool {
        return self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        let value = self.inner.current()?;
        let key = self.inner.key()?;
        return (self.selector)(&value, &key);
    }

    fn key(&self) -> Result<Value> {
        return self.inner.key();
    }

    fn advance(&mut self) -> Result<()> {
        return self.inner.advance();
    }
}

/// Applies `(key, value) -> key` lazily. Values pass through. Key
/// collisions are not detected here; downstream consumers decide the
/// collision policy (for example `to_map`, where the last writer wins).
pub struct KeySelectCursor {
    inner: Box<dyn Cursor>,
    selector: Selector,
}

impl KeySelectCursor {
    pub fn new(inner: Box<dyn Cursor>, selector: Selector) -> KeySelectCursor {
        return KeySelectCursor { inner, selector };
    }
}

impl Cursor for KeySelectCursor {
    fn rewind(&mut self) -> Result<()> {
        return self.inner.rewind();
    }

    fn is_valid(&self) -> bool {
        return self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        let key = self.inner.key()?;
        let value = self.inner.current()?;
        return (self.selector)(&key, &value);
    }

    fn advance(&mut self) -> Result<()> {
        return self.inner.advance();
    }
}

/// Swaps key and value roles: `current` yields the inner key, `key` yields
/// the inner value. Whether the flipped keys are usable downstream (for
/// example as map keys) is the consumer's concern.
pub struct FlipCursor {
    inner: Box<dyn Cursor>,
}

impl FlipCursor {
    pub fn new(inner: Box<dyn Cursor>) -> FlipCursor {
        return FlipCursor { inner };
    }
}

impl Cursor for FlipCursor {
    fn rewind(&mut self) -> Result<()> {
        return self.inner.rewind();
    }

    fn is_valid(&self) -> bool {
        return self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        return self.inner.key();
    }

    fn key(&self) -> Result<Value> {
        return self.inner.current();
    }

    fn advance(&mut self) -> Result<()> {
        return self.inner.advance();
    }
}

/// Replaces keys with a fresh 0-based integer numbering. Values pass
/// through. The counter resets on rewind.
pub struct RenumberCursor {
    inner: Box<dyn Cursor>,
    index: i64,
}

impl RenumberCursor {
    pub fn new(inner: Box<dyn Cursor>) -> RenumberCursor {
        return RenumberCursor { inner, index: 0 };
    }
}

impl Cursor for RenumberCursor {
    fn rewind(&mut self) -> Result<()> {
        self.index = 0;
        return self.inner.rewind();
    }

    fn is_valid(&self) -> bool {
        return self.inner.is_valid();
    }

    fn current(&self) -> Result<Value> {
        return self.inner.current();
    }

    fn key(&self) -> Result<Value> {
        // Valid only while the inner cursor is; delegate the check.
        self.inner.key()?;
        return Ok(Value::Int(self.index));
    }

    fn advance(&mut self) -> Result<()> {
        if self.inner.is_valid() {
            self.index += 1;
        }
        return self.inner.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::cursor::ItemsCursor;
    use crate::cursor::drain;
    use crate::error::Error;

    fn source(values: &[i64]) -> Box<dyn Cursor> {
        let pairs = values
            .iter()
            .enumerate()
            .map(|(i, v)| (Value::Int(i as i64), Value::Int(*v)))
            .collect();
        return Box::new(ItemsCursor::new(Rc::new(pairs)));
    }

    #[test]
    fn select_maps_values_and_keeps_keys() {
        let selector: Selector = Rc::new(|v, _k| {
            return match v {
                Value::Int(i) => Ok(Value::Int(i * 2)),
                _ => Err(Error::callback("expected int")),
            };
        });
        let mut cursor = SelectCursor::new(source(&[1, 2, 3]), selector);
        let pairs = drain(&mut cursor).unwrap();
        assert_eq!(pairs[0], (Value::Int(0), Value::Int(2)));
        assert_eq!(pairs[2], (Value::Int(2), Value::Int(6)));
    }

    #[test]
    fn select_sees_the_key() {
        let selector: Selector = Rc::new(|_v, k| Ok(k.clone()));
        let mut cursor = SelectCursor::new(source(&[9, 9]), selector);
        let pairs = drain(&mut cursor).unwrap();
        assert_eq!(pairs[1], (Value::Int(1), Value::Int(1)));
    }

    #[test]
    fn select_propagates_callback_errors() {
        let selector: Selector = Rc::new(|_v, _k| Err(Error::callback("boom")));
        let mut cursor = SelectCursor::new(source(&[1]), selector);
        cursor.rewind().unwrap();
        assert_eq!(cursor.current(), Err(Error::Callback("boom".to_string())));
    }

    #[test]
    fn key_select_remaps_keys_only() {
        let selector: Selector = Rc::new(|_k, v| Ok(v.clone()));
        let mut cursor = KeySelectCursor::new(source(&[5, 6]), selector);
        let pairs = drain(&mut cursor).unwrap();
        assert_eq!(pairs[0], (Value::Int(5), Value::Int(5)));
        assert_eq!(pairs[1], (Value::Int(6), Value::Int(6)));
    }

    #[test]
    fn flip_swaps_roles() {
        let mut cursor = FlipCursor::new(source(&[7, 8]));
        let pairs = drain(&mut cursor).unwrap();
        assert_eq!(pairs[0], (Value::Int(7), Value::Int(0)));
        assert_eq!(pairs[1], (Value::Int(8), Value::Int(1)));
    }

    #[test]
    fn renumber_resets_on_rewind() {
        // Flipping gives non-positional keys; renumbering restores them.
        let mut cursor = RenumberCursor::new(Box::new(FlipCursor::new(source(&[7, 8]))));
        let first = drain(&mut cursor).unwrap();
        let second = drain(&mut cursor).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0], (Value::Int(0), Value::Int(0)));
        assert_eq!(first[1], (Value::Int(1), Value::Int(1)));
    }
}
