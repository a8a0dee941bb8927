//! Joins, group joins and positional zips.

use std::hash::Hash;
use std::rc::Rc;

use lazyq_core::error::Result;
use lazyq_core::{GroupJoinRow, JoinRow, JoinType, SizeEstimator};
use lazyq_operators::join::{GroupJoin, HashJoin, KeyMatcher, PairMatcher};
use lazyq_operators::zip::Zip;
use lazyq_operators::{Context, SeqRef};

use crate::query::{boxed, Query};

impl<T: Clone + 'static> Query<T> {
    /// Hash join on equal keys. Rows for one left element follow `right`'s order.
    pub fn join<R, K, FL, FR>(
        &self,
        join_type: JoinType,
        right: impl Into<SeqRef<R>>,
        left_key: FL,
        right_key: FR,
    ) -> Query<JoinRow<T, R>>
    where
        R: Clone + 'static,
        K: Hash + Eq + 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&R) -> K + 'static,
    {
        let right = right.into();
        let (left_key, right_key) = (Rc::new(left_key), Rc::new(right_key));
        self.derive(SizeEstimator::unknown(), move |up| {
            let (lk, rk) = (Rc::clone(&left_key), Rc::clone(&right_key));
            let matcher = KeyMatcher::new(move |l: &T| lk(l), move |r: &R| rk(r));
            boxed(HashJoin::new(up, right.clone(), matcher, join_type))
        })
    }

    /// Join on an arbitrary pairwise predicate.
    pub fn join_with<R, F>(
        &self,
        join_type: JoinType,
        right: impl Into<SeqRef<R>>,
        matcher: F,
    ) -> Query<JoinRow<T, R>>
    where
        R: Clone + 'static,
        F: Fn(&T, &R) -> bool + 'static,
    {
        let right = right.into();
        let matcher = Rc::new(matcher);
        self.derive(SizeEstimator::unknown(), move |up| {
            let matcher = Rc::clone(&matcher);
            let matcher = PairMatcher(move |l: &T, r: &R| matcher(l, r));
            boxed(HashJoin::new(up, right.clone(), matcher, join_type))
        })
    }

    /// One row per left element carrying all of its right matches.
    pub fn group_join<R, K, FL, FR>(
        &self,
        join_type: JoinType,
        right: impl Into<SeqRef<R>>,
        left_key: FL,
        right_key: FR,
    ) -> Query<GroupJoinRow<T, R>>
    where
        R: Clone + 'static,
        K: Hash + Eq + 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&R) -> K + 'static,
    {
        let right = right.into();
        let (left_key, right_key) = (Rc::new(left_key), Rc::new(right_key));
        self.derive(self.estimator().group_join(join_type), move |up| {
            let (lk, rk) = (Rc::clone(&left_key), Rc::clone(&right_key));
            let matcher = KeyMatcher::new(move |l: &T| lk(l), move |r: &R| rk(r));
            boxed(GroupJoin::new(up, right.clone(), matcher, join_type))
        })
    }

    pub fn group_join_with<R, F>(
        &self,
        join_type: JoinType,
        right: impl Into<SeqRef<R>>,
        matcher: F,
    ) -> Query<GroupJoinRow<T, R>>
    where
        R: Clone + 'static,
        F: Fn(&T, &R) -> bool + 'static,
    {
        let right = right.into();
        let matcher = Rc::new(matcher);
        self.derive(self.estimator().group_join(join_type), move |up| {
            let matcher = Rc::clone(&matcher);
            let matcher = PairMatcher(move |l: &T, r: &R| matcher(l, r));
            boxed(GroupJoin::new(up, right.clone(), matcher, join_type))
        })
    }

    /// Pair elements by position.
    pub fn zip<R>(&self, join_type: JoinType, right: impl Into<SeqRef<R>>) -> Query<JoinRow<T, R>>
    where
        R: Clone + 'static,
    {
        let right = right.into();
        let right_size = {
            let right = right.clone();
            SizeEstimator::from_fn(move || right.len_hint())
        };
        let size = self.estimator().zip(join_type, &right_size);
        self.derive(size, move |up| boxed(Zip::new(up, right.open()?, join_type)))
    }

    pub fn zip_by_index<R, S, F>(
        &self,
        join_type: JoinType,
        right: impl Into<SeqRef<R>>,
        zipper: F,
    ) -> Query<S>
    where
        R: Clone + 'static,
        S: 'static,
        F: Fn(JoinRow<T, R>, usize) -> S + 'static,
    {
        self.zip(join_type, right).map_by_index(zipper)
    }

    pub fn zip_by_context<R, S, F>(
        &self,
        join_type: JoinType,
        right: impl Into<SeqRef<R>>,
        zipper: F,
    ) -> Query<S>
    where
        R: Clone + 'static,
        S: 'static,
        F: Fn(JoinRow<T, R>, &mut Context<JoinRow<T, R>>) -> Result<S> + 'static,
    {
        self.zip(join_type, right).map_by_context(zipper)
    }
}
