#![forbid(unsafe_code)]
//! lazyq-operators: single-pass cursors behind every `Query` operator.
//!
//! Design intent:
//! - Pull only. A cursor does no work until `has_next`/`next` is called and
//!   never reads further ahead than the element it is about to hand out.
//! - `has_next` is idempotent; the value it finds waits in a `Slot` until `next`.
//! - Stages that must see everything (ordering, group-by, join right sides)
//!   materialize once per cursor, on first demand.

pub mod context;
pub mod step;
pub mod traits;

pub mod combine;
pub mod filter;
pub mod generate;
pub mod group;
pub mod map;
pub mod partition;
pub mod set;
pub mod source;
pub mod zip;

pub mod join;
pub mod sort;

pub use context::Context;
pub use source::{SeqRef, Sequence};
pub use step::{ByContext, ByIndex, ByValue, Test, Transform};
pub use traits::{BoxCursor, Cursor, Slot};
