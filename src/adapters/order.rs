//! Stable ordering with chained tie-break levels.

use std::cmp::Ordering;

use crate::adapters::Selector;
use crate::compare::Comparer;
use crate::cursor::Cursor;
use crate::cursor::drain;
use crate::error::Error;
use crate::error::Result;
use crate::value::Value;

/// One (key selector, comparer) tie-break level. Descending levels carry an
/// inverted comparer rather than reversing output, which keeps later
/// tie-break levels meaningful.
#[derive(Clone)]
pub struct SortLevel {
    pub selector: Selector,
    pub comparer: Comparer,
}

/// Eagerly projects every element's sort keys on `rewind`, stable-sorts an
/// index vector, and replays the pairs in sorted order.
///
/// Stability is load-bearing: elements the comparer chain considers equal
/// keep their original relative order, which is what makes `then_by` chains
/// behave.
pub struct OrderCursor {
    inner: Box<dyn Cursor>,
    levels: Vec<SortLevel>,
    sorted: Vec<(Value, Value)>,
    pos: Option<usize>,
}

impl OrderCursor {
    pub fn new(inner: Box<dyn Cursor>, levels: Vec<SortLevel>) -> OrderCursor {
        return OrderCursor {
            inner,
            levels,
            sorted: Vec::new(),
            pos: None,
        };
    }

    fn at(&self) -> Result<&(Value, Value)> {
        let pos = self.pos.filter(|p| *p < self.sorted.len());
        return match pos {
            Some(pos) => Ok(&self.sorted[pos]),
            None => Err(Error::NoCurrentElement),
        };
    }
}

impl Cursor for OrderCursor {
    fn rewind(&mut self) -> Result<()> {
        let pairs = drain(self.inner.as_mut())?;

        // Project every sort key up front so selector errors surface before
        // the sort runs.
        let mut keys: Vec<Vec<Value>> = Vec::with_capacity(pairs.len());
        for (key, value) in &pairs {
            let mut row = Vec::with_capacity(self.levels.len());
            for level in &self.levels {
                row.push((level.selector)(value, key)?);
            }
            keys.push(row);
        }

        // Stable sort over indices. Comparer failures cannot escape the
        // sort closure, so they park in `failure` and the affected pairs
        // rank equal until the error is rethrown below.
        let mut indices: Vec<usize> = (0..pairs.len()).collect();
        let mut failure: Option<Error> = None;
        let levels = &self.levels;
        indices.sort_by(|&a, &b| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            for (l, level) in levels.iter().enumerate() {
                let verdict = (level.comparer)(&keys[a][l], &keys[b][l])
                    .and_then(|comparison| comparison.as_order());
                match verdict {
                    Ok(Ordering::Equal) => continue,
                    Ok(order) => return order,
                    Err(error) => {
                        failure = Some(error);
                        return Ordering::Equal;
                    }
                }
            }
            return Ordering::Equal;
        });
        if let Some(error) = failure {
            return Err(error);
        }

        self.sorted = indices.into_iter().map(|i| pairs[i].clone()).collect();
        self.pos = Some(0);
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return match self.pos {
            Some(pos) => pos < self.sorted.len(),
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
            if pos < self.sorted.len() {
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

    use crate::compare::invert;
    use crate::compare::order_comparer;
    use crate::cursor::ItemsCursor;

    fn source(values: &[i64]) -> Box<dyn Cursor> {
        let pairs = values
            .iter()
            .enumerate()
            .map(|(i, v)| (Value::Int(i as i64), Value::Int(*v)))
            .collect();
        return Box::new(ItemsCursor::new(Rc::new(pairs)));
    }

    fn identity_level(comparer: Comparer) -> SortLevel {
        return SortLevel {
            selector: Rc::new(|v, _k| Ok(v.clone())),
            comparer,
        };
    }

    #[test]
    fn sorts_ascending() {
        let mut cursor = OrderCursor::new(source(&[3, 1, 2]), vec![identity_level(order_comparer())]);
        let pairs = drain(&mut cursor).unwrap();
        let values: Vec<Value> = pairs.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn inverted_comparer_sorts_descending() {
        let mut cursor = OrderCursor::new(
            source(&[3, 1, 2]),
            vec![identity_level(invert(order_comparer()))],
        );
        let pairs = drain(&mut cursor).unwrap();
        let values: Vec<Value> = pairs.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![Value::Int(3), Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn equal_elements_keep_source_order() {
        // All values tie under a constant key; keys reveal original order.
        let level = SortLevel {
            selector: Rc::new(|_v, _k| Ok(Value::Int(0))),
            comparer: order_comparer(),
        };
        let mut cursor = OrderCursor::new(source(&[5, 3, 9]), vec![level]);
        let pairs = drain(&mut cursor).unwrap();
        let keys: Vec<Value> = pairs.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn second_level_breaks_ties() {
        // First level: parity. Second level: value, descending.
        let parity = SortLevel {
            selector: Rc::new(|v, _k| {
                return match v {
                    Value::Int(i) => Ok(Value::Int(i % 2)),
                    _ => Ok(v.clone()),
                };
            }),
            comparer: order_comparer(),
        };
        let value_desc = identity_level(invert(order_comparer()));
        let mut cursor = OrderCursor::new(source(&[1, 2, 3, 4]), vec![parity, value_desc]);
        let pairs = drain(&mut cursor).unwrap();
        let values: Vec<Value> = pairs.into_iter().map(|(_, v)| v).collect();
        assert_eq!(
            values,
            vec![Value::Int(4), Value::Int(2), Value::Int(3), Value::Int(1)]
        );
    }

    #[test]
    fn comparer_failure_surfaces_from_rewind() {
        let failing = SortLevel {
            selector: Rc::new(|v, _k| Ok(v.clone())),
            comparer: Rc::new(|_a, _b| Err(Error::callback("bad comparer"))),
        };
        let mut cursor = OrderCursor::new(source(&[2, 1]), vec![failing]);
        assert_eq!(cursor.rewind(), Err(Error::Callback("bad comparer".to_string())));
    }

    #[test]
    fn rewind_resorts_cleanly() {
        let mut cursor = OrderCursor::new(source(&[2, 1]), vec![identity_level(order_comparer())]);
        let first = drain(&mut cursor).unwrap();
        let second = drain(&mut cursor).unwrap();
        assert_eq!(first, second);
    }
}
