#![forbid(unsafe_code)]
//! lazyq-chain: the `Query` node and everything callable on it.
//!
//! Operator methods (filter, map, join, order, ...) only build nodes. Terminal
//! methods (to_vec, first, count, sum, ...) open the node's cursor stack and
//! pull. The operator families live in one module each, all as inherent
//! methods on `Query<T>`.

mod rebind;
mod query;

mod combine;
mod filter;
mod join;
mod order;
mod partition;
mod project;
mod set;

mod numeric;
mod terminal;

pub use numeric::{IntoDecimal, MAX_SCALE};
pub use order::OrderedQuery;
pub use query::{Query, QueryIter};
pub use rust_decimal::Decimal;
