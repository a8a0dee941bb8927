#![forbid(unsafe_code)]
//! lazyq: deferred-execution query chains.
//!
//! ```
//! use lazyq::Query;
//!
//! let evens = Query::from(vec![5, 2, 8, 3, 4])
//!     .filter(|x| x % 2 == 0)
//!     .order()
//!     .to_vec()
//!     .unwrap();
//! assert_eq!(evens, vec![2, 4, 8]);
//! ```

pub use lazyq_chain::{Decimal, IntoDecimal, OrderedQuery, Query, QueryIter, MAX_SCALE};
pub use lazyq_core::{
    Error, GroupJoinRow, Grouping, JoinRow, JoinType, QueryConfig, Result, Rounding,
    SizeEstimator,
};
pub use lazyq_operators::sort::{NullPlacement, OrderBy};
pub use lazyq_operators::{Context, Cursor, SeqRef, Sequence};

pub mod prelude {
    pub use crate::{Context, JoinType, OrderBy, OrderedQuery, Query, QueryConfig, Rounding};
    pub use lazyq_core::prelude::*;
}
