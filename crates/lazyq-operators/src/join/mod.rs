//! Hash join and group join.
//!
//! Both buffer the right side once per cursor, on the first pull, then stream
//! the left side. A `Matcher` finds, for one left element, the positions of its
//! matching right elements in right-side order.

pub mod group;
pub mod hash;

use std::collections::HashMap;
use std::hash::Hash;

pub use group::GroupJoin;
pub use hash::HashJoin;

pub trait Matcher<L, R> {
    /// Called once with the buffered right side before any `matches` call.
    fn prepare(&mut self, right: &[R]);

    /// Ascending positions in `right` matching `left`.
    fn matches(&mut self, left: &L, right: &[R]) -> Vec<usize>;
}

/// Equality of derived keys, indexed by a hash table over the right side.
pub struct KeyMatcher<FL, FR, K> {
    left_key: FL,
    right_key: FR,
    index: HashMap<K, Vec<usize>>,
}

impl<FL, FR, K> KeyMatcher<FL, FR, K> {
    pub fn new(left_key: FL, right_key: FR) -> Self {
        Self {
            left_key,
            right_key,
            index: HashMap::new(),
        }
    }
}

impl<L, R, FL, FR, K> Matcher<L, R> for KeyMatcher<FL, FR, K>
where
    FL: FnMut(&L) -> K,
    FR: FnMut(&R) -> K,
    K: Hash + Eq,
{
    fn prepare(&mut self, right: &[R]) {
        self.index.clear();
        for (pos, item) in right.iter().enumerate() {
            self.index
                .entry((self.right_key)(item))
                .or_default()
                .push(pos);
        }
    }

    fn matches(&mut self, left: &L, _right: &[R]) -> Vec<usize> {
        self.index
            .get(&(self.left_key)(left))
            .cloned()
            .unwrap_or_default()
    }
}

/// Arbitrary pairwise predicate; scans the whole right side per left element.
pub struct PairMatcher<F>(pub F);

impl<L, R, F> Matcher<L, R> for PairMatcher<F>
where
    F: FnMut(&L, &R) -> bool,
{
    fn prepare(&mut self, _right: &[R]) {}

    fn matches(&mut self, left: &L, right: &[R]) -> Vec<usize> {
        right
            .iter()
            .enumerate()
            .filter(|(_, r)| (self.0)(left, r))
            .map(|(pos, _)| pos)
            .collect()
    }
}
