//! Grouping: bucket a stream by a projected key, preserving first-seen
//! group order and original member order.
//!
//! Lookup is deliberately linear, not hashed: group keys are matched with
//! the configured comparer, so objects and loosely-equal scalars can serve
//! as group keys without being hashable.

use crate::adapters::Selector;
use crate::compare::Comparer;
use crate::cursor::Cursor;
use crate::cursor::drain;
use crate::error::Error;
use crate::error::Result;
use crate::sequence::Sequence;
use crate::value::Value;

/// One group: the key and its members in original relative order.
#[derive(Clone, Debug)]
pub struct Grouping {
    key: Value,
    members: Vec<(Value, Value)>,
}

impl Grouping {
    /// The group key.
    pub fn key(&self) -> &Value {
        return &self.key;
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        return self.members.len();
    }

    /// True if the group has no members. (A grouping produced by group-by
    /// never is; the type allows it.)
    pub fn is_empty(&self) -> bool {
        return self.members.is_empty();
    }

    /// Member values in original order.
    pub fn values(&self) -> Vec<Value> {
        return self.members.iter().map(|(_, v)| v.clone()).collect();
    }

    /// Members as a sequence, original keys intact.
    pub fn elements(&self) -> Sequence {
        return Sequence::from_pairs(self.members.clone());
    }
}

/// An indexable collection of groupings with linear, comparer-based key
/// lookup.
pub struct Lookup {
    groups: Vec<Grouping>,
    comparer: Comparer,
}

impl Lookup {
    /// Number of groups.
    pub fn len(&self) -> usize {
        return self.groups.len();
    }

    /// True if there are no groups.
    pub fn is_empty(&self) -> bool {
        return self.groups.is_empty();
    }

    /// The group for `key`, if any. Linear scan with the lookup's comparer.
    pub fn get(&self, key: &Value) -> Result<Option<&Grouping>> {
        for group in &self.groups {
            if (self.comparer)(&group.key, key)?.is_match() {
                return Ok(Some(group));
            }
        }
        return Ok(None);
    }

    /// True if a group exists for `key`.
    pub fn contains_key(&self, key: &Value) -> Result<bool> {
        return Ok(self.get(key)?.is_some());
    }

    /// The groups in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = &Grouping> {
        return self.groups.iter();
    }
}

/// Bucket drained pairs by a projected group key.
///
/// Groups appear in first-seen key order; each group's members keep their
/// original relative order. The already-seen group keys are scanned
/// linearly with the comparer.
pub fn bucket(
    pairs: Vec<(Value, Value)>,
    selector: &Selector,
    comparer: &Comparer,
) -> Result<Vec<Grouping>> {
    let mut groups: Vec<Grouping> = Vec::new();
    for (key, value) in pairs {
        let group_key = selector(&value, &key)?;
        let mut found = None;
        for (i, group) in groups.iter().enumerate() {
            if comparer(&group.key, &group_key)?.is_match() {
                found = Some(i);
                break;
            }
        }
        match found {
            Some(i) => groups[i].members.push((key, value)),
            None => groups.push(Grouping {
                key: group_key,
                members: vec![(key, value)],
            }),
        }
    }
    return Ok(groups);
}

/// Build a `Lookup` from drained pairs.
pub fn build_lookup(
    pairs: Vec<(Value, Value)>,
    selector: &Selector,
    comparer: &Comparer,
) -> Result<Lookup> {
    let groups = bucket(pairs, selector, comparer)?;
    return Ok(Lookup {
        groups,
        comparer: comparer.clone(),
    });
}

/// Cursor form of grouping: drains the source on `rewind`, then yields one
/// pair per group with the group key as key and the member values as a
/// list. Calling `current` with no current group is a contract violation
/// and fails explicitly.
pub struct GroupCursor {
    inner: Box<dyn Cursor>,
    selector: Selector,
    comparer: Comparer,
    groups: Vec<Grouping>,
    pos: Option<usize>,
}

impl GroupCursor {
    pub fn new(inner: Box<dyn Cursor>, selector: Selector, comparer: Comparer) -> GroupCursor {
        return GroupCursor {
            inner,
            selector,
            comparer,
            groups: Vec::new(),
            pos: None,
        };
    }

    fn at(&self) -> Result<&Grouping> {
        let pos = self.pos.filter(|p| *p < self.groups.len());
        return match pos {
            Some(pos) => Ok(&self.groups[pos]),
            None => Err(Error::NoCurrentElement),
        };
    }
}

impl Cursor for GroupCursor {
    fn rewind(&mut self) -> Result<()> {
        let pairs = drain(self.inner.as_mut())?;
        self.groups = bucket(pairs, &self.selector, &self.comparer)?;
        self.pos = Some(0);
        return Ok(());
    }

    fn is_valid(&self) -> bool {
        return match self.pos {
            Some(pos) => pos < self.groups.len(),
            None => false,
        };
    }

    fn current(&self) -> Result<Value> {
        return Ok(Value::List(self.at()?.values()));
    }

    fn key(&self) -> Result<Value> {
        return Ok(self.at()?.key.clone());
    }

    fn advance(&mut self) -> Result<()> {
        if let Some(pos) = self.pos {
            if pos < self.groups.len() {
                self.pos = Some(pos + 1);
            }
        }
        return Ok(());
    }
}
