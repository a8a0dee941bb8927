//! Convenient re-exports for downstream crates.

pub use crate::config::{QueryConfig, Rounding};
pub use crate::error::{Error, Result};
pub use crate::join::JoinType;
pub use crate::row::{GroupJoinRow, Grouping, JoinRow};
pub use crate::size::SizeEstimator;
