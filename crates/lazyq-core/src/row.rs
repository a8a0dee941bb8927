//! Row holders produced by joins, zips and grouping.
//!
//! A missing side is `None`, never a sentinel value of the element type, so
//! element types that are themselves `Option` stay unambiguous.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinRow<L, R> {
    pub left: Option<L>,
    pub right: Option<R>,
}

impl<L, R> JoinRow<L, R> {
    pub fn new(left: Option<L>, right: Option<R>) -> Self {
        Self { left, right }
    }

    pub fn matched(left: L, right: R) -> Self {
        Self::new(Some(left), Some(right))
    }

    pub fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn into_parts(self) -> (Option<L>, Option<R>) {
        (self.left, self.right)
    }
}

/// One left element with every right element it matched.
///
/// The trailing row of a RIGHT/OUTER group join has `left == None` and carries
/// the right elements nobody matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupJoinRow<L, R> {
    pub left: Option<L>,
    pub right: Vec<R>,
}

impl<L, R> GroupJoinRow<L, R> {
    pub fn new(left: Option<L>, right: Vec<R>) -> Self {
        Self { left, right }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grouping<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

impl<K, V> Grouping<K, V> {
    pub fn new(key: K, values: Vec<V>) -> Self {
        Self { key, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
