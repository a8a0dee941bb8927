//! Ordering subsystem: descriptors plus the materialize-then-reorder sink
//! shared by order-by, reverse and shuffle.

pub mod ordering;
pub mod sink;

pub use ordering::{compose, Comparator, NullPlacement, OrderBy};
pub use sink::{Materialize, Reorder};
