#![forbid(unsafe_code)]
//! lazyq-core: shared vocabulary for the lazyq workspace.
//!
//! Nothing here iterates. The operators crate builds cursors on top of these
//! types and the chain crate wires them into `Query` nodes.

pub mod config;
pub mod error;
pub mod join;
pub mod prelude;
pub mod row;
pub mod size;

pub use config::{QueryConfig, Rounding};
pub use error::{Error, Result};
pub use join::JoinType;
pub use row::{GroupJoinRow, Grouping, JoinRow};
pub use size::SizeEstimator;
