//! Eager collection shells over the lazy engine.
//!
//! Each shell owns its elements and implements the operator traits by
//! snapshotting into a `Sequence`, so every operator chain starting from a
//! collection sees a stable copy of the elements at the time the chain was
//! built. Mutating the collection afterwards does not disturb in-flight
//! chains.

pub mod list;
pub mod map;
pub mod object_map;
pub mod set;
