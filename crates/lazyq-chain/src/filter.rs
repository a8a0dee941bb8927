//! Filtering operators: predicates, membership and type filtering.

use std::hash::Hash;
use std::rc::Rc;

use lazyq_core::error::Result;
use lazyq_core::SizeEstimator;
use lazyq_operators::filter::Where;
use lazyq_operators::map::OfType;
use lazyq_operators::set::{KeyLookup, MatchLookup, Membership};
use lazyq_operators::{ByContext, ByIndex, ByValue, Context, SeqRef};

use crate::query::{boxed, Query};

impl<T: Clone + 'static> Query<T> {
    pub fn filter<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(Where::new(up, ByValue(move |x: &T| predicate(x))))
        })
    }

    /// `predicate` also receives the element's position in this stage's input.
    pub fn filter_by_index<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(Where::new(
                up,
                ByIndex::new(move |x: &T, i: usize| predicate(x, i)),
            ))
        })
    }

    pub fn filter_by_context<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T, &mut Context<T>) -> Result<bool> + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(Where::new(
                Context::new(up),
                ByContext(move |x: &T, ctx: &mut Context<T>| predicate(x, ctx)),
            ))
        })
    }

    /// Keep elements whose key is (`inclusive`) or is not among the keys of `other`.
    pub(crate) fn keyed_membership<K>(
        &self,
        other: SeqRef<T>,
        key: Rc<dyn Fn(&T) -> K>,
        inclusive: bool,
    ) -> Query<T>
    where
        K: Hash + Eq + 'static,
    {
        self.derive(SizeEstimator::unknown(), move |up| {
            let (own, theirs) = (Rc::clone(&key), Rc::clone(&key));
            let lookup = KeyLookup::new(
                other.clone(),
                move |x: &T| own(x),
                move |x: &T| theirs(x),
            );
            boxed(Membership::new(up, lookup, inclusive))
        })
    }

    /// Matcher form of `keyed_membership`; scans `other` per element.
    pub(crate) fn matched_membership(
        &self,
        other: SeqRef<T>,
        matcher: Rc<dyn Fn(&T, &T) -> bool>,
        inclusive: bool,
    ) -> Query<T> {
        self.derive(SizeEstimator::unknown(), move |up| {
            let matcher = Rc::clone(&matcher);
            let lookup = MatchLookup::new(other.clone(), move |a: &T, b: &T| matcher(a, b));
            boxed(Membership::new(up, lookup, inclusive))
        })
    }

    /// Elements whose key occurs among the keys of `other`.
    pub fn where_in_by<K, F>(&self, other: impl Into<SeqRef<T>>, key: F) -> Query<T>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.keyed_membership(other.into(), Rc::new(key), true)
    }

    pub fn where_in_with<F>(&self, other: impl Into<SeqRef<T>>, matcher: F) -> Query<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        self.matched_membership(other.into(), Rc::new(matcher), true)
    }

    pub fn where_not_in_by<K, F>(&self, other: impl Into<SeqRef<T>>, key: F) -> Query<T>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.keyed_membership(other.into(), Rc::new(key), false)
    }

    pub fn where_not_in_with<F>(&self, other: impl Into<SeqRef<T>>, matcher: F) -> Query<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        self.matched_membership(other.into(), Rc::new(matcher), false)
    }

    /// Convert every element that converts into `S`; the rest are dropped.
    pub fn of_type<S>(&self) -> Query<S>
    where
        S: TryFrom<T> + Clone + 'static,
    {
        self.derive(SizeEstimator::unknown(), |up| boxed(OfType::<T, S, _>::new(up)))
    }
}

impl<T: Clone + Hash + Eq + 'static> Query<T> {
    pub fn where_in(&self, other: impl Into<SeqRef<T>>) -> Query<T> {
        self.where_in_by(other, T::clone)
    }

    pub fn where_not_in(&self, other: impl Into<SeqRef<T>>) -> Query<T> {
        self.where_not_in_by(other, T::clone)
    }
}
