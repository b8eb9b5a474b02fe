//! Lazy cursor adapters, one per operator concern.
//!
//! Each adapter wraps one inner cursor (two, for zips and joins) and speaks
//! the same pull protocol. Adapters hold no data of their own except where
//! an operator inherently needs it: the seen-key buffer in `UniqueCursor`,
//! the drained buffers in `ReverseCursor`, `GroupCursor` and `OrderCursor`.

pub mod filter;
pub mod group;
pub mod order;
pub mod reverse;
pub mod select;
pub mod unique;
pub mod zip;

use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

/// A projection over an element: `(value, key) -> value` in the positional
/// flavor, `(key, value) -> key` when remapping keys, `(outer, inner) ->
/// result` in joins and zips.
pub type Selector = Rc<dyn Fn(&Value, &Value) -> Result<Value>>;

/// A predicate over `(value, key)`.
pub type Predicate = Rc<dyn Fn(&Value, &Value) -> Result<bool>>;
