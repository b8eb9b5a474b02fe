//! Sequin - lazily evaluated, composable sequence operators over dynamic
//! values.
//!
//! A `Sequence` is an immutable stream of (key, value) pairs. Operators
//! like `select`, `where_by`, `order_by` and `group_by` wrap sequences in
//! new sequences without pulling a single element; work happens only when
//! a terminal operator (`to_vec`, `count`, `first`, ...) materializes the
//! chain. One-shot sources replay deterministically through a capture
//! cache, so a sequence can be traversed any number of times.
//!
//! # Quick Start
//!
//! ```
//! use sequin::enumerable::Enumerable;
//! use sequin::sequence::Sequence;
//! use sequin::value::Value;
//!
//! // Squares of the even numbers in 1..=10.
//! let squares = Sequence::range(1, 10, 1).unwrap()
//!     .where_by(|v, _k| Ok(matches!(v, Value::Int(i) if i % 2 == 0)))
//!     .select(|v, _k| {
//!         match v {
//!             Value::Int(i) => Ok(Value::Int(i * i)),
//!             _ => Ok(v.clone()),
//!         }
//!     });
//!
//! // Nothing ran yet; materializing pulls the chain.
//! let values = squares.to_vec().unwrap();
//! assert_eq!(values, vec![
//!     Value::Int(4), Value::Int(16), Value::Int(36),
//!     Value::Int(64), Value::Int(100),
//! ]);
//! ```

pub mod adapters;
pub mod collections;
pub mod compare;
pub mod cursor;
pub mod enumerable;
pub mod error;
pub mod json;
pub mod keyed;
pub mod pair;
pub mod provider;
pub mod sequence;
pub mod value;
