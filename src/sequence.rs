//! The lazy sequence type and its entry points.
//!
//! A `Sequence` is an immutable handle on a provider of (key, value)
//! cursors. Operators never mutate a sequence; each one wraps the source in
//! a new sequence whose provider rebuilds the adapter chain per traversal.
//! Nothing is pulled until the sequence is materialized (`to_vec`, `count`,
//! iteration through a cursor).
//!
//! `OrderedSequence` and `GroupedSequence` are the two operator results
//! that carry extra structure: an ordered sequence accumulates tie-break
//! levels through `then_by`, a grouped sequence defers bucketing until it
//! is iterated or turned into a `Lookup`.

use crate::adapters::Selector;
use crate::adapters::group::GroupCursor;
use crate::adapters::group::Grouping;
use crate::adapters::group::Lookup;
use crate::adapters::group::build_lookup;
use crate::adapters::order::OrderCursor;
use crate::adapters::order::SortLevel;
use crate::compare::Comparer;
use crate::compare::invert;
use crate::compare::order_comparer;
use crate::cursor::Cursor;
use crate::cursor::EmptyCursor;
use crate::cursor::RangeCursor;
use crate::cursor::drain;
use crate::enumerable::Enumerable;
use crate::error::Error;
use crate::error::Result;
use crate::keyed::KeyedEnumerable;
use crate::provider::Provider;
use crate::value::Value;

/// A lazy, immutable stream of (key, value) pairs.
#[derive(Clone)]
pub struct Sequence {
    provider: Provider,
}

impl Sequence {
    pub(crate) fn new(provider: Provider) -> Sequence {
        return Sequence { provider };
    }

    /// A sequence over materialized (key, value) pairs.
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Sequence {
        return Sequence::new(Provider::from_items(pairs));
    }

    /// A sequence over values with positional integer keys.
    pub fn from_values(values: Vec<Value>) -> Sequence {
        let pairs = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Value::Int(i as i64), v))
            .collect();
        return Sequence::from_pairs(pairs);
    }

    /// Build a sequence from an arbitrary value.
    ///
    /// Strings split into single-character string elements, lists become
    /// key-preserving positional sequences. Anything else is not iterable
    /// and fails with `InvalidArgument`. An existing `Sequence` needs no
    /// conversion: `clone` shares the provider, so no re-wrapping occurs.
    pub fn from_value(value: Value) -> Result<Sequence> {
        return match value {
            Value::Str(s) => {
                let values = s.chars().map(|c| Value::Str(c.to_string())).collect();
                Ok(Sequence::from_values(values))
            }
            Value::List(items) => Ok(Sequence::from_values(items)),
            other => Err(Error::invalid_argument(format!(
                "cannot build a sequence from a value of kind {}",
                other.kind()
            ))),
        };
    }

    /// A sequence over a one-shot producer of (key, value) pairs. The
    /// provider's replay cache makes repeated traversals observe the same
    /// elements.
    pub fn from_single_pass(source: impl Iterator<Item = (Value, Value)> + 'static) -> Sequence {
        return Sequence::new(Provider::from_single_pass(source));
    }

    /// A sequence over a one-shot producer of values, keyed positionally.
    pub fn from_single_pass_values(source: impl Iterator<Item = Value> + 'static) -> Sequence {
        let pairs = source
            .enumerate()
            .map(|(i, v)| (Value::Int(i as i64), v));
        return Sequence::from_single_pass(pairs);
    }

    /// A sequence whose provider rebuilds a cursor chain per traversal.
    pub(crate) fn from_factory(
        factory: impl Fn() -> Result<Box<dyn Cursor>> + 'static,
    ) -> Sequence {
        return Sequence::new(Provider::from_factory(factory));
    }

    /// The zero-element sequence.
    pub fn empty() -> Sequence {
        return Sequence::from_factory(|| Ok(Box::new(EmptyCursor)));
    }

    /// An inclusive integer range. `range(1, 5)` yields 1 through 5;
    /// negative steps count down. A zero step fails with `InvalidArgument`.
    pub fn range(start: i64, end: i64, step: i64) -> Result<Sequence> {
        if step == 0 {
            return Err(Error::invalid_argument("range step must not be zero"));
        }
        return Ok(Sequence::from_factory(move || {
            return Ok(Box::new(RangeCursor::new(start, end, step)));
        }));
    }

    /// A fresh cursor over this sequence's elements.
    pub fn cursor(&self) -> Result<Box<dyn Cursor>> {
        return self.provider.cursor();
    }
}

impl Enumerable for Sequence {
    fn sequence(&self) -> Sequence {
        return self.clone();
    }
}

impl KeyedEnumerable for Sequence {}

/// A sequence with an attached chain of (selector, comparer) tie-break
/// levels. Built once by `order_by`, extended immutably by `then_by`, and
/// materialized only when iterated.
#[derive(Clone)]
pub struct OrderedSequence {
    source: Sequence,
    levels: Vec<SortLevel>,
}

impl OrderedSequence {
    pub(crate) fn new(source: Sequence, level: SortLevel) -> OrderedSequence {
        return OrderedSequence {
            source,
            levels: vec![level],
        };
    }

    fn with_level(&self, level: SortLevel) -> OrderedSequence {
        let mut levels = self.levels.clone();
        levels.push(level);
        return OrderedSequence {
            source: self.source.clone(),
            levels,
        };
    }

    /// Append an ascending tie-break level. Earlier levels are not
    /// re-evaluated.
    pub fn then_by(
        &self,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> OrderedSequence {
        return self.with_level(SortLevel {
            selector: std::rc::Rc::new(selector),
            comparer: comparer.unwrap_or_else(order_comparer),
        });
    }

    /// Append a descending tie-break level (inverted comparer).
    pub fn then_by_descending(
        &self,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> OrderedSequence {
        return self.with_level(SortLevel {
            selector: std::rc::Rc::new(selector),
            comparer: invert(comparer.unwrap_or_else(order_comparer)),
        });
    }
}

impl Enumerable for OrderedSequence {
    fn sequence(&self) -> Sequence {
        let source = self.source.clone();
        let levels = self.levels.clone();
        return Sequence::from_factory(move || {
            return Ok(Box::new(OrderCursor::new(source.cursor()?, levels.clone())));
        });
    }
}

impl KeyedEnumerable for OrderedSequence {}

/// A deferred group-by: bucketing happens when the result is iterated or
/// turned into a `Lookup`.
#[derive(Clone)]
pub struct GroupedSequence {
    source: Sequence,
    selector: Selector,
    comparer: Comparer,
}

impl GroupedSequence {
    pub(crate) fn new(source: Sequence, selector: Selector, comparer: Comparer) -> GroupedSequence {
        return GroupedSequence {
            source,
            selector,
            comparer,
        };
    }

    /// Bucket now and return the groups in first-seen key order.
    pub fn groups(&self) -> Result<Vec<Grouping>> {
        return Ok(self.lookup()?.iter().cloned().collect());
    }

    /// Bucket now and return an indexable, comparer-keyed lookup.
    pub fn lookup(&self) -> Result<Lookup> {
        let pairs = drain(self.source.cursor()?.as_mut())?;
        return build_lookup(pairs, &self.selector, &self.comparer);
    }
}

impl Enumerable for GroupedSequence {
    /// As a sequence, each group becomes one pair: the group key, and the
    /// member values as a list.
    fn sequence(&self) -> Sequence {
        let source = self.source.clone();
        let selector = self.selector.clone();
        let comparer = self.comparer.clone();
        return Sequence::from_factory(move || {
            return Ok(Box::new(GroupCursor::new(
                source.cursor()?,
                selector.clone(),
                comparer.clone(),
            )));
        });
    }
}

impl KeyedEnumerable for GroupedSequence {}
