//! The positional-flavor operator surface.
//!
//! `Enumerable` is a behavior bundle: implementors supply `sequence()` and
//! inherit the full deferred operator surface as default methods. Lazy
//! operators wrap the source in a new `Sequence` whose factory rebuilds the
//! adapter chain per traversal; terminal operators pull through a cursor.
//!
//! Selectors and predicates receive `(value, key)`. In this flavor keys are
//! incidental (positional) but still threaded through, so callbacks that
//! care can look. The keyed flavor in `keyed` adds the operators for which
//! keys are semantic.
//!
//! Every operator that takes an `Option<Comparer>` substitutes a default
//! when handed `None`: `same` for equality contexts (distinct, set algebra,
//! contains, sequence comparison, grouping) and `compare` for ordering
//! contexts.

use std::rc::Rc;

use crate::adapters::Predicate;
use crate::adapters::Selector;
use crate::adapters::filter::ChunkCursor;
use crate::adapters::filter::SkipWhileCursor;
use crate::adapters::filter::SliceCursor;
use crate::adapters::filter::WhereCursor;
use crate::adapters::filter::WhileCursor;
use crate::adapters::order::SortLevel;
use crate::adapters::reverse::ReverseCursor;
use crate::adapters::select::SelectCursor;
use crate::adapters::unique::UniqueCursor;
use crate::adapters::zip::ConcatCursor;
use crate::adapters::zip::JoinCursor;
use crate::adapters::zip::ZipCursor;
use crate::collections::list::List;
use crate::compare::Comparer;
use crate::compare::compare;
use crate::compare::invert;
use crate::compare::order_comparer;
use crate::compare::same_comparer;
use crate::cursor::ItemsCursor;
use crate::cursor::drain;
use crate::error::Error;
use crate::error::Result;
use crate::json;
use crate::pair::Pair;
use crate::sequence::GroupedSequence;
use crate::sequence::OrderedSequence;
use crate::sequence::Sequence;
use crate::value::Value;

/// Walk a sequence, feeding each (key, value) to `f` until it returns
/// false or the sequence ends.
fn walk(
    sequence: &Sequence,
    mut f: impl FnMut(Value, Value) -> Result<bool>,
) -> Result<()> {
    let mut cursor = sequence.cursor()?;
    cursor.rewind()?;
    while cursor.is_valid() {
        let key = cursor.key()?;
        let value = cursor.current()?;
        if !f(key, value)? {
            break;
        }
        cursor.advance()?;
    }
    return Ok(());
}

/// Numeric accumulator: integral until a float joins in.
#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Result<Num> {
        return match value {
            Value::Int(i) => Ok(Num::Int(*i)),
            Value::Float(f) => Ok(Num::Float(*f)),
            Value::Str(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(Num::Int(i));
                }
                match trimmed.parse::<f64>() {
                    Ok(f) => Ok(Num::Float(f)),
                    Err(_) => Err(Error::invalid_argument(format!(
                        "string {:?} is not numeric",
                        s
                    ))),
                }
            }
            other => Err(Error::invalid_argument(format!(
                "value of kind {} is not numeric",
                other.kind()
            ))),
        };
    }

    fn add(self, other: Num) -> Num {
        return match (self, other) {
            (Num::Int(a), Num::Int(b)) => match a.checked_add(b) {
                Some(sum) => Num::Int(sum),
                None => Num::Float(a as f64 + b as f64),
            },
            (a, b) => Num::Float(a.as_f64() + b.as_f64()),
        };
    }

    fn as_f64(self) -> f64 {
        return match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        };
    }

    fn into_value(self) -> Value {
        return match self {
            Num::Int(i) => Value::Int(i),
            Num::Float(f) => Value::Float(f),
        };
    }
}

/// The full positional operator surface.
pub trait Enumerable {
    /// The underlying lazy pair stream. For `Sequence` this is a cheap
    /// clone sharing the provider; eager shells build a snapshot.
    fn sequence(&self) -> Sequence;

    // --- projection and filtering ---------------------------------------

    /// Map each element through `(value, key) -> value`. Lazy.
    fn select(&self, selector: impl Fn(&Value, &Value) -> Result<Value> + 'static) -> Sequence {
        let source = self.sequence();
        let selector: Selector = Rc::new(selector);
        return Sequence::from_factory(move || {
            return Ok(Box::new(SelectCursor::new(source.cursor()?, selector.clone())));
        });
    }

    /// Keep elements passing `(value, key) -> bool`. Lazy.
    fn where_by(&self, predicate: impl Fn(&Value, &Value) -> Result<bool> + 'static) -> Sequence {
        let source = self.sequence();
        let predicate: Predicate = Rc::new(predicate);
        return Sequence::from_factory(move || {
            return Ok(Box::new(WhereCursor::new(source.cursor()?, predicate.clone())));
        });
    }

    /// Yield while the predicate holds, then stop for good.
    fn take_while(&self, predicate: impl Fn(&Value, &Value) -> Result<bool> + 'static) -> Sequence {
        let source = self.sequence();
        let predicate: Predicate = Rc::new(predicate);
        return Sequence::from_factory(move || {
            return Ok(Box::new(WhileCursor::new(source.cursor()?, predicate.clone())));
        });
    }

    /// Drop the leading run where the predicate holds, keep the rest.
    fn skip_while(&self, predicate: impl Fn(&Value, &Value) -> Result<bool> + 'static) -> Sequence {
        let source = self.sequence();
        let predicate: Predicate = Rc::new(predicate);
        return Sequence::from_factory(move || {
            return Ok(Box::new(SkipWhileCursor::new(
                source.cursor()?,
                predicate.clone(),
            )));
        });
    }

    /// At most the first `count` elements.
    fn take(&self, count: usize) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(SliceCursor::new(source.cursor()?, 0, Some(count))));
        });
    }

    /// Everything after the first `count` elements.
    fn skip(&self, count: usize) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(SliceCursor::new(source.cursor()?, count, None)));
        });
    }

    /// The last `count` elements. Drains and counts the source when
    /// traversed, so infinite sequences are out.
    fn take_last(&self, count: usize) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            let pairs = drain(source.cursor()?.as_mut())?;
            let start = pairs.len().saturating_sub(count);
            return Ok(Box::new(ItemsCursor::new(Rc::new(pairs[start..].to_vec()))));
        });
    }

    /// Everything but the last `count` elements. Drains like `take_last`.
    fn skip_last(&self, count: usize) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            let mut pairs = drain(source.cursor()?.as_mut())?;
            let keep = pairs.len().saturating_sub(count);
            pairs.truncate(keep);
            return Ok(Box::new(ItemsCursor::new(Rc::new(pairs))));
        });
    }

    /// Reversed order. `preserve_keys` keeps source keys; otherwise keys
    /// renumber from 0 in the reversed order.
    fn reverse(&self, preserve_keys: bool) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(ReverseCursor::new(source.cursor()?, preserve_keys)));
        });
    }

    /// Pack runs of `size` values into lists. `size` must be at least 1.
    fn chunk(&self, size: usize) -> Result<Sequence> {
        if size == 0 {
            return Err(Error::invalid_argument("chunk size must be positive"));
        }
        let source = self.sequence();
        return Ok(Sequence::from_factory(move || {
            return Ok(Box::new(ChunkCursor::new(source.cursor()?, size)));
        }));
    }

    // --- distinctness and set algebra -----------------------------------

    /// First occurrence of each value wins. Defaults to the `same`
    /// comparer.
    fn distinct(&self, comparer: Option<Comparer>) -> Sequence {
        let source = self.sequence();
        let comparer = comparer.unwrap_or_else(same_comparer);
        return Sequence::from_factory(move || {
            return Ok(Box::new(UniqueCursor::new(
                source.cursor()?,
                None,
                comparer.clone(),
            )));
        });
    }

    /// First occurrence of each projected key wins.
    fn distinct_by(
        &self,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> Sequence {
        let source = self.sequence();
        let selector: Selector = Rc::new(selector);
        let comparer = comparer.unwrap_or_else(same_comparer);
        return Sequence::from_factory(move || {
            return Ok(Box::new(UniqueCursor::new(
                source.cursor()?,
                Some(selector.clone()),
                comparer.clone(),
            )));
        });
    }

    /// This sequence followed by `other`. Keys pass through from each
    /// source.
    fn concat(&self, other: Sequence) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(ConcatCursor::new(source.cursor()?, other.cursor()?)));
        });
    }

    /// Concatenate then de-duplicate; first occurrence wins.
    fn union(&self, other: Sequence, comparer: Option<Comparer>) -> Sequence {
        return self.concat(other).distinct(comparer);
    }

    /// Union under a projected key.
    fn union_by(
        &self,
        other: Sequence,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> Sequence {
        return self.concat(other).distinct_by(selector, comparer);
    }

    /// Elements whose projected key matches nothing in `other`. The other
    /// side's keys materialize when traversal starts; membership testing
    /// needs the whole set.
    fn except_by(
        &self,
        other: Sequence,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> Sequence {
        return membership_filter(self.sequence(), other, Rc::new(selector), comparer, false);
    }

    /// `except_by` with the value itself as the key.
    fn except(&self, other: Sequence, comparer: Option<Comparer>) -> Sequence {
        return self.except_by(other, |v, _k| Ok(v.clone()), comparer);
    }

    /// Elements whose projected key matches at least one element of
    /// `other`.
    fn intersect_by(
        &self,
        other: Sequence,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> Sequence {
        return membership_filter(self.sequence(), other, Rc::new(selector), comparer, true);
    }

    /// `intersect_by` with the value itself as the key.
    fn intersect(&self, other: Sequence, comparer: Option<Comparer>) -> Sequence {
        return self.intersect_by(other, |v, _k| Ok(v.clone()), comparer);
    }

    // --- pairing and joining --------------------------------------------

    /// Lockstep pairing into two-element lists; stops at the shorter
    /// input.
    fn zip(&self, other: Sequence) -> Sequence {
        let source = self.sequence();
        return Sequence::from_factory(move || {
            return Ok(Box::new(ZipCursor::new(source.cursor()?, other.cursor()?, None)));
        });
    }

    /// Lockstep pairing through `(left, right) -> result`.
    fn zip_with(
        &self,
        other: Sequence,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
    ) -> Sequence {
        let source = self.sequence();
        let selector: Selector = Rc::new(selector);
        return Sequence::from_factory(move || {
            return Ok(Box::new(ZipCursor::new(
                source.cursor()?,
                other.cursor()?,
                Some(selector.clone()),
            )));
        });
    }

    /// Comparer-based inner join: one result per matching (outer, inner)
    /// pair, O(n·m).
    fn join(
        &self,
        inner: Sequence,
        outer_key: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        inner_key: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        result: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> Sequence {
        let source = self.sequence();
        let outer_key: Selector = Rc::new(outer_key);
        let inner_key: Selector = Rc::new(inner_key);
        let result: Selector = Rc::new(result);
        let comparer = comparer.unwrap_or_else(same_comparer);
        return Sequence::from_factory(move || {
            return Ok(Box::new(JoinCursor::new(
                source.cursor()?,
                inner.cursor()?,
                outer_key.clone(),
                inner_key.clone(),
                result.clone(),
                comparer.clone(),
            )));
        });
    }

    // --- ordering and grouping ------------------------------------------

    /// Stable sort by a projected key, ascending.
    fn order_by(
        &self,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> OrderedSequence {
        return OrderedSequence::new(
            self.sequence(),
            SortLevel {
                selector: Rc::new(selector),
                comparer: comparer.unwrap_or_else(order_comparer),
            },
        );
    }

    /// Stable sort by a projected key, descending. The comparer is
    /// inverted rather than the output reversed, so later `then_by` levels
    /// still see correct tie groups.
    fn order_by_descending(
        &self,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> OrderedSequence {
        return OrderedSequence::new(
            self.sequence(),
            SortLevel {
                selector: Rc::new(selector),
                comparer: invert(comparer.unwrap_or_else(order_comparer)),
            },
        );
    }

    /// Group by a projected key. Groups keep first-seen key order; members
    /// keep their original relative order.
    fn group_by(
        &self,
        selector: impl Fn(&Value, &Value) -> Result<Value> + 'static,
        comparer: Option<Comparer>,
    ) -> GroupedSequence {
        return GroupedSequence::new(
            self.sequence(),
            Rc::new(selector),
            comparer.unwrap_or_else(same_comparer),
        );
    }

    // --- quantifiers and searches ---------------------------------------

    /// True if any element exists.
    fn any(&self) -> Result<bool> {
        let mut found = false;
        walk(&self.sequence(), |_k, _v| {
            found = true;
            return Ok(false);
        })?;
        return Ok(found);
    }

    /// True if any element passes; short-circuits on the first match.
    fn any_by(&self, predicate: impl Fn(&Value, &Value) -> Result<bool>) -> Result<bool> {
        let mut found = false;
        walk(&self.sequence(), |k, v| {
            if predicate(&v, &k)? {
                found = true;
                return Ok(false);
            }
            return Ok(true);
        })?;
        return Ok(found);
    }

    /// True if every element passes; short-circuits on the first failure.
    fn all(&self, predicate: impl Fn(&Value, &Value) -> Result<bool>) -> Result<bool> {
        let mut ok = true;
        walk(&self.sequence(), |k, v| {
            if !predicate(&v, &k)? {
                ok = false;
                return Ok(false);
            }
            return Ok(true);
        })?;
        return Ok(ok);
    }

    /// True if `value` occurs, under the comparer (default `same`).
    fn contains(&self, value: &Value, comparer: Option<Comparer>) -> Result<bool> {
        let comparer = comparer.unwrap_or_else(same_comparer);
        return self.any_by(move |v, _k| Ok(comparer(v, value)?.is_match()));
    }

    /// The first element, or `EmptySequence`.
    fn first(&self) -> Result<Value> {
        return self.first_by(|_v, _k| Ok(true));
    }

    /// The first element passing the predicate, or `EmptySequence`.
    fn first_by(&self, predicate: impl Fn(&Value, &Value) -> Result<bool>) -> Result<Value> {
        let mut found = None;
        walk(&self.sequence(), |k, v| {
            if predicate(&v, &k)? {
                found = Some(v);
                return Ok(false);
            }
            return Ok(true);
        })?;
        return found.ok_or(Error::EmptySequence);
    }

    /// The first element, or the supplied default.
    fn first_or(&self, default: Value) -> Result<Value> {
        return self.first_or_by(|_v, _k| Ok(true), default);
    }

    /// The first passing element, or the supplied default.
    fn first_or_by(
        &self,
        predicate: impl Fn(&Value, &Value) -> Result<bool>,
        default: Value,
    ) -> Result<Value> {
        return match self.first_by(predicate) {
            Ok(value) => Ok(value),
            Err(Error::EmptySequence) => Ok(default),
            Err(error) => Err(error),
        };
    }

    /// The last element, or `EmptySequence`.
    fn last(&self) -> Result<Value> {
        return self.last_by(|_v, _k| Ok(true));
    }

    /// The last element passing the predicate, or `EmptySequence`.
    fn last_by(&self, predicate: impl Fn(&Value, &Value) -> Result<bool>) -> Result<Value> {
        let mut found = None;
        walk(&self.sequence(), |k, v| {
            if predicate(&v, &k)? {
                found = Some(v);
            }
            return Ok(true);
        })?;
        return found.ok_or(Error::EmptySequence);
    }

    /// The last element, or the supplied default.
    fn last_or(&self, default: Value) -> Result<Value> {
        return match self.last() {
            Ok(value) => Ok(value),
            Err(Error::EmptySequence) => Ok(default),
            Err(error) => Err(error),
        };
    }

    /// The only element. Scans the entire sequence even after a match:
    /// a second element means `AmbiguousMatch`, none means
    /// `EmptySequence`.
    fn single(&self) -> Result<Value> {
        return self.single_by(|_v, _k| Ok(true));
    }

    /// The only element passing the predicate.
    fn single_by(&self, predicate: impl Fn(&Value, &Value) -> Result<bool>) -> Result<Value> {
        let mut found: Option<Value> = None;
        let mut ambiguous = false;
        walk(&self.sequence(), |k, v| {
            if predicate(&v, &k)? {
                if found.is_some() {
                    ambiguous = true;
                    return Ok(false);
                }
                found = Some(v);
            }
            return Ok(true);
        })?;
        if ambiguous {
            return Err(Error::AmbiguousMatch);
        }
        return found.ok_or(Error::EmptySequence);
    }

    /// The only element, or the default when there is none. A second
    /// match is still a hard `AmbiguousMatch` failure.
    fn single_or(&self, default: Value) -> Result<Value> {
        return self.single_or_by(|_v, _k| Ok(true), default);
    }

    /// The only passing element, or the default when none pass.
    fn single_or_by(
        &self,
        predicate: impl Fn(&Value, &Value) -> Result<bool>,
        default: Value,
    ) -> Result<Value> {
        return match self.single_by(predicate) {
            Ok(value) => Ok(value),
            Err(Error::EmptySequence) => Ok(default),
            Err(error) => Err(error),
        };
    }

    // --- reducers --------------------------------------------------------

    /// Number of elements.
    fn count(&self) -> Result<usize> {
        let mut n = 0;
        walk(&self.sequence(), |_k, _v| {
            n += 1;
            return Ok(true);
        })?;
        return Ok(n);
    }

    /// Left fold through `(accumulator, value, key) -> accumulator`.
    /// Without a seed the first element seeds the fold, and an empty
    /// sequence fails with `EmptySequence`.
    fn aggregate(
        &self,
        seed: Option<Value>,
        f: impl Fn(&Value, &Value, &Value) -> Result<Value>,
    ) -> Result<Value> {
        let mut acc = seed;
        walk(&self.sequence(), |k, v| {
            acc = Some(match &acc {
                Some(current) => f(current, &v, &k)?,
                None => v,
            });
            return Ok(true);
        })?;
        return acc.ok_or(Error::EmptySequence);
    }

    /// Sum of all elements. Integral until a float contributes. Empty
    /// sequences fail with `EmptySequence`; non-numeric elements with
    /// `InvalidArgument`.
    fn sum(&self) -> Result<Value> {
        return self.sum_by(|v, _k| Ok(v.clone()));
    }

    /// Sum of projected values.
    fn sum_by(&self, selector: impl Fn(&Value, &Value) -> Result<Value>) -> Result<Value> {
        let mut acc: Option<Num> = None;
        walk(&self.sequence(), |k, v| {
            let term = Num::of(&selector(&v, &k)?)?;
            acc = Some(match acc {
                Some(current) => current.add(term),
                None => term,
            });
            return Ok(true);
        })?;
        return match acc {
            Some(total) => Ok(total.into_value()),
            None => Err(Error::EmptySequence),
        };
    }

    /// Arithmetic mean as a float. Empty sequences fail with
    /// `EmptySequence`.
    fn average(&self) -> Result<Value> {
        return self.average_by(|v, _k| Ok(v.clone()));
    }

    /// Mean of projected values.
    fn average_by(&self, selector: impl Fn(&Value, &Value) -> Result<Value>) -> Result<Value> {
        let mut total = 0.0;
        let mut n = 0usize;
        walk(&self.sequence(), |k, v| {
            total += Num::of(&selector(&v, &k)?)?.as_f64();
            n += 1;
            return Ok(true);
        })?;
        if n == 0 {
            return Err(Error::EmptySequence);
        }
        return Ok(Value::Float(total / n as f64));
    }

    /// Smallest element under the default `compare` protocol.
    fn min(&self) -> Result<Value> {
        return self.min_by(|v, _k| Ok(v.clone()));
    }

    /// Smallest projected value.
    fn min_by(&self, selector: impl Fn(&Value, &Value) -> Result<Value>) -> Result<Value> {
        return extremum(&self.sequence(), selector, std::cmp::Ordering::Less);
    }

    /// Largest element under the default `compare` protocol.
    fn max(&self) -> Result<Value> {
        return self.max_by(|v, _k| Ok(v.clone()));
    }

    /// Largest projected value.
    fn max_by(&self, selector: impl Fn(&Value, &Value) -> Result<Value>) -> Result<Value> {
        return extremum(&self.sequence(), selector, std::cmp::Ordering::Greater);
    }

    // --- comparison and materialization ----------------------------------

    /// Pairwise value equality in lockstep. Unequal lengths compare
    /// unequal: the answer is false as soon as one side is exhausted while
    /// the other still has elements.
    fn sequence_equal(&self, other: Sequence, comparer: Option<Comparer>) -> Result<bool> {
        let comparer = comparer.unwrap_or_else(same_comparer);
        let mut left = self.sequence().cursor()?;
        let mut right = other.cursor()?;
        left.rewind()?;
        right.rewind()?;
        loop {
            match (left.is_valid(), right.is_valid()) {
                (true, true) => {
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

    /// Values in order, keys dropped.
    fn to_vec(&self) -> Result<Vec<Value>> {
        let pairs = drain(self.sequence().cursor()?.as_mut())?;
        return Ok(pairs.into_iter().map(|(_, v)| v).collect());
    }

    /// (key, value) pairs in order.
    fn to_pairs(&self) -> Result<Vec<Pair>> {
        let pairs = drain(self.sequence().cursor()?.as_mut())?;
        return Ok(pairs.into_iter().map(Pair::from).collect());
    }

    /// Materialize into an eager list shell.
    fn to_list(&self) -> Result<List> {
        return Ok(List::from_values(self.to_vec()?));
    }

    /// Serialize the materialized form. Sequences keyed 0..n-1 render as a
    /// JSON array, anything else as an object.
    fn to_json(&self, pretty: bool) -> Result<String> {
        let pairs = drain(self.sequence().cursor()?.as_mut())?;
        return json::pairs_to_json(&pairs, pretty);
    }
}

/// Shared body of except/intersect: keep elements whose projected key's
/// membership in `other` matches `want_member`.
fn membership_filter(
    source: Sequence,
    other: Sequence,
    selector: Selector,
    comparer: Option<Comparer>,
    want_member: bool,
) -> Sequence {
    let comparer = comparer.unwrap_or_else(same_comparer);
    return Sequence::from_factory(move || {
        // Materialize the other side's projected keys up front; membership
        // testing needs random access over the full set.
        let other_pairs = drain(other.cursor()?.as_mut())?;
        let mut other_keys = Vec::with_capacity(other_pairs.len());
        for (key, value) in &other_pairs {
            other_keys.push(selector(value, key)?);
        }
        let selector = selector.clone();
        let comparer = comparer.clone();
        let predicate: Predicate = Rc::new(move |value, key| {
            let candidate = selector(value, key)?;
            for other_key in &other_keys {
                if comparer(other_key, &candidate)?.is_match() {
                    return Ok(want_member);
                }
            }
            return Ok(!want_member);
        });
        return Ok(Box::new(WhereCursor::new(source.cursor()?, predicate)));
    });
}

fn extremum(
    sequence: &Sequence,
    selector: impl Fn(&Value, &Value) -> Result<Value>,
    keep_when: std::cmp::Ordering,
) -> Result<Value> {
    let mut best: Option<Value> = None;
    walk(sequence, |k, v| {
        let candidate = selector(&v, &k)?;
        best = Some(match best.take() {
            Some(current) => {
                if compare(&candidate, &current)? == keep_when {
                    candidate
                } else {
                    current
                }
            }
            None => candidate,
        });
        return Ok(true);
    })?;
    return best.ok_or(Error::EmptySequence);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        return values.iter().map(|v| Value::Int(*v)).collect();
    }

    fn seq(values: &[i64]) -> Sequence {
        return Sequence::from_values(ints(values));
    }

    #[test]
    fn select_is_deferred_until_materialized() {
        use std::cell::Cell;
        use std::rc::Rc as StdRc;
        let calls = StdRc::new(Cell::new(0));
        let seen = calls.clone();
        let mapped = seq(&[1, 2, 3]).select(move |v, _k| {
            seen.set(seen.get() + 1);
            return Ok(v.clone());
        });
        assert_eq!(calls.get(), 0);
        mapped.to_vec().unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn where_then_select_composes() {
        let result = seq(&[1, 2, 3, 4])
            .where_by(|v, _k| Ok(matches!(v, Value::Int(i) if i % 2 == 0)))
            .select(|v, _k| {
                return match v {
                    Value::Int(i) => Ok(Value::Int(i * 10)),
                    _ => Ok(v.clone()),
                };
            })
            .to_vec()
            .unwrap();
        assert_eq!(result, ints(&[20, 40]));
    }

    #[test]
    fn take_and_skip_window() {
        assert_eq!(seq(&[1, 2, 3, 4]).take(2).to_vec().unwrap(), ints(&[1, 2]));
        assert_eq!(seq(&[1, 2, 3, 4]).skip(3).to_vec().unwrap(), ints(&[4]));
        assert_eq!(seq(&[1, 2]).take(9).to_vec().unwrap(), ints(&[1, 2]));
    }

    #[test]
    fn take_last_and_skip_last_drain() {
        assert_eq!(seq(&[1, 2, 3, 4]).take_last(2).to_vec().unwrap(), ints(&[3, 4]));
        assert_eq!(seq(&[1, 2, 3, 4]).skip_last(3).to_vec().unwrap(), ints(&[1]));
        assert_eq!(seq(&[1]).skip_last(5).to_vec().unwrap(), ints(&[]));
    }

    #[test]
    fn chunk_rejects_zero() {
        assert!(seq(&[1]).chunk(0).is_err());
        let chunks = seq(&[1, 2, 3]).chunk(2).unwrap().to_vec().unwrap();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn union_is_concat_then_distinct() {
        let a = seq(&[1, 2, 3]);
        let b = seq(&[2, 3, 4]);
        let union = a.union(b.sequence(), None).to_vec().unwrap();
        let manual = a.concat(b.sequence()).distinct(None).to_vec().unwrap();
        assert_eq!(union, manual);
        assert_eq!(union, ints(&[1, 2, 3, 4]));
    }

    #[test]
    fn except_and_intersect_partition() {
        let a = seq(&[1, 2, 3, 4]);
        let b = seq(&[2, 4, 5]);
        assert_eq!(a.except(b.sequence(), None).to_vec().unwrap(), ints(&[1, 3]));
        assert_eq!(
            a.intersect(b.sequence(), None).to_vec().unwrap(),
            ints(&[2, 4])
        );
    }

    #[test]
    fn first_last_single() {
        assert_eq!(seq(&[7, 8]).first().unwrap(), Value::Int(7));
        assert_eq!(seq(&[7, 8]).last().unwrap(), Value::Int(8));
        assert_eq!(seq(&[]).first(), Err(Error::EmptySequence));
        assert_eq!(seq(&[]).first_or(Value::Null).unwrap(), Value::Null);
        assert_eq!(seq(&[2]).single().unwrap(), Value::Int(2));
        assert_eq!(seq(&[1, 2]).single(), Err(Error::AmbiguousMatch));
        assert_eq!(seq(&[]).single(), Err(Error::EmptySequence));
        // single_or: absence takes the default, ambiguity still fails.
        assert_eq!(seq(&[]).single_or(Value::Int(0)).unwrap(), Value::Int(0));
        assert_eq!(seq(&[1, 2]).single_or(Value::Int(0)), Err(Error::AmbiguousMatch));
    }

    #[test]
    fn single_by_scans_past_the_first_match() {
        // The second matching element is after a non-match; a lazy scan
        // that stopped at the first match would wrongly succeed.
        let result = seq(&[2, 1, 4]).single_by(|v, _k| {
            return Ok(matches!(v, Value::Int(i) if i % 2 == 0));
        });
        assert_eq!(result, Err(Error::AmbiguousMatch));
    }

    #[test]
    fn aggregate_folds_left() {
        let sum = seq(&[1, 2, 3])
            .aggregate(Some(Value::Int(10)), |acc, v, _k| {
                return match (acc, v) {
                    (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
                    _ => Err(Error::callback("expected ints")),
                };
            })
            .unwrap();
        assert_eq!(sum, Value::Int(16));
    }

    #[test]
    fn seedless_aggregate_on_empty_fails() {
        let result = seq(&[]).aggregate(None, |acc, _v, _k| Ok(acc.clone()));
        assert_eq!(result, Err(Error::EmptySequence));
    }

    #[test]
    fn numeric_reducers() {
        assert_eq!(seq(&[1, 2, 3]).sum().unwrap(), Value::Int(6));
        assert_eq!(seq(&[1, 2, 3, 4]).average().unwrap(), Value::Float(2.5));
        assert_eq!(seq(&[3, 1, 2]).min().unwrap(), Value::Int(1));
        assert_eq!(seq(&[3, 1, 2]).max().unwrap(), Value::Int(3));
    }

    #[test]
    fn min_and_max_are_exact_for_large_integers() {
        // Adjacent ints near i64::MAX are indistinguishable as f64.
        let large = seq(&[i64::MAX, i64::MAX - 1]);
        assert_eq!(large.min().unwrap(), Value::Int(i64::MAX - 1));
        assert_eq!(large.max().unwrap(), Value::Int(i64::MAX));
        let sorted = large.order_by(|v, _k| Ok(v.clone()), None).to_vec().unwrap();
        assert_eq!(sorted, ints(&[i64::MAX - 1, i64::MAX]));
    }

    #[test]
    fn numeric_reducers_fail_on_empty() {
        assert_eq!(seq(&[]).sum(), Err(Error::EmptySequence));
        assert_eq!(seq(&[]).average(), Err(Error::EmptySequence));
        assert_eq!(seq(&[]).min(), Err(Error::EmptySequence));
        assert_eq!(seq(&[]).max(), Err(Error::EmptySequence));
    }

    #[test]
    fn sum_promotes_on_float() {
        let mixed = Sequence::from_values(vec![Value::Int(1), Value::Float(0.5)]);
        assert_eq!(mixed.sum().unwrap(), Value::Float(1.5));
    }

    #[test]
    fn sum_rejects_non_numeric() {
        let mixed = Sequence::from_values(vec![Value::Int(1), Value::str("x")]);
        assert!(matches!(mixed.sum(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn quantifiers_short_circuit_sensibly() {
        assert!(seq(&[1]).any().unwrap());
        assert!(!seq(&[]).any().unwrap());
        assert!(seq(&[1, 2]).any_by(|v, _k| Ok(*v == Value::Int(2))).unwrap());
        assert!(seq(&[2, 4]).all(|v, _k| Ok(matches!(v, Value::Int(i) if i % 2 == 0))).unwrap());
        assert!(!seq(&[2, 3]).all(|v, _k| Ok(matches!(v, Value::Int(i) if i % 2 == 0))).unwrap());
    }

    #[test]
    fn contains_uses_the_comparer() {
        let s = seq(&[1, 2]);
        assert!(s.contains(&Value::Int(2), None).unwrap());
        // Strict default: "2" is not 2.
        assert!(!s.contains(&Value::str("2"), None).unwrap());
        assert!(
            s.contains(&Value::str("2"), Some(crate::compare::equals_comparer()))
                .unwrap()
        );
    }

    #[test]
    fn sequence_equal_needs_equal_lengths() {
        assert!(seq(&[1, 2]).sequence_equal(seq(&[1, 2]), None).unwrap());
        assert!(!seq(&[1, 2]).sequence_equal(seq(&[1]), None).unwrap());
        assert!(!seq(&[1]).sequence_equal(seq(&[1, 2]), None).unwrap());
        assert!(!seq(&[1, 2]).sequence_equal(seq(&[2, 1]), None).unwrap());
        assert!(seq(&[]).sequence_equal(seq(&[]), None).unwrap());
    }

    #[test]
    fn callback_errors_propagate_untouched() {
        let result = seq(&[1])
            .select(|_v, _k| Err(Error::callback("user failure")))
            .to_vec();
        assert_eq!(result, Err(Error::Callback("user failure".to_string())));
    }

    #[test]
    fn order_by_then_by_chains() {
        // Sort by parity, then descending value within each parity class.
        let result = seq(&[1, 2, 3, 4, 5])
            .order_by(
                |v, _k| {
                    return match v {
                        Value::Int(i) => Ok(Value::Int(i % 2)),
                        _ => Ok(v.clone()),
                    };
                },
                None,
            )
            .then_by_descending(|v, _k| Ok(v.clone()), None)
            .to_vec()
            .unwrap();
        assert_eq!(result, ints(&[4, 2, 5, 3, 1]));
    }

    #[test]
    fn group_by_preserves_first_seen_order() {
        let grouped = seq(&[20, 20, 30, 30, 40]).group_by(|v, _k| Ok(v.clone()), None);
        let lookup = grouped.lookup().unwrap();
        let keys: Vec<Value> = lookup.iter().map(|g| g.key().clone()).collect();
        assert_eq!(keys, ints(&[20, 30, 40]));
        assert_eq!(lookup.get(&Value::Int(30)).unwrap().unwrap().len(), 2);
    }
}
