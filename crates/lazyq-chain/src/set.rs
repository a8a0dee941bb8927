//! Set algebra: distinct, except, intersect, union.
//!
//! Each comes in three forms: the element's own `Hash + Eq`, a key selector
//! (`_by`), or a pairwise matcher (`_with`, linear scan per element).

use std::hash::Hash;
use std::rc::Rc;

use lazyq_core::SizeEstimator;
use lazyq_operators::set::{Distinct, SeenKeys, SeenMatches};
use lazyq_operators::SeqRef;

use crate::query::{boxed, Query};

impl<T: Clone + 'static> Query<T> {
    /// First element of each key, in order.
    pub fn distinct_by<K, F>(&self, key: F) -> Query<T>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.distinct_by_shared(Rc::new(key))
    }

    fn distinct_by_shared<K>(&self, key: Rc<dyn Fn(&T) -> K>) -> Query<T>
    where
        K: Hash + Eq + 'static,
    {
        self.derive(SizeEstimator::unknown(), move |up| {
            let key = Rc::clone(&key);
            boxed(Distinct::new(up, SeenKeys::new(move |x: &T| key(x))))
        })
    }

    pub fn distinct_with<F>(&self, matcher: F) -> Query<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        self.distinct_with_shared(Rc::new(matcher))
    }

    fn distinct_with_shared(&self, matcher: Rc<dyn Fn(&T, &T) -> bool>) -> Query<T> {
        self.derive(SizeEstimator::unknown(), move |up| {
            let matcher = Rc::clone(&matcher);
            boxed(Distinct::new(
                up,
                SeenMatches::new(move |a: &T, b: &T| matcher(a, b)),
            ))
        })
    }

    /// Distinct elements whose key does not occur in `exceptions`.
    pub fn except_by<K, F>(&self, exceptions: impl Into<SeqRef<T>>, key: F) -> Query<T>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let key: Rc<dyn Fn(&T) -> K> = Rc::new(key);
        self.keyed_membership(exceptions.into(), Rc::clone(&key), false)
            .distinct_by_shared(key)
    }

    pub fn except_with<F>(&self, exceptions: impl Into<SeqRef<T>>, matcher: F) -> Query<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        let matcher: Rc<dyn Fn(&T, &T) -> bool> = Rc::new(matcher);
        self.matched_membership(exceptions.into(), Rc::clone(&matcher), false)
            .distinct_with_shared(matcher)
    }

    /// Distinct elements whose key occurs in `intersections`.
    pub fn intersect_by<K, F>(&self, intersections: impl Into<SeqRef<T>>, key: F) -> Query<T>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let key: Rc<dyn Fn(&T) -> K> = Rc::new(key);
        self.keyed_membership(intersections.into(), Rc::clone(&key), true)
            .distinct_by_shared(key)
    }

    pub fn intersect_with<F>(&self, intersections: impl Into<SeqRef<T>>, matcher: F) -> Query<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        let matcher: Rc<dyn Fn(&T, &T) -> bool> = Rc::new(matcher);
        self.matched_membership(intersections.into(), Rc::clone(&matcher), true)
            .distinct_with_shared(matcher)
    }

    /// Distinct elements of this chain, then the novel elements of `unions`.
    pub fn union_by<K, F>(&self, unions: impl Into<SeqRef<T>>, key: F) -> Query<T>
    where
        K: Hash + Eq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.combine(unions).distinct_by(key)
    }

    pub fn union_with<F>(&self, unions: impl Into<SeqRef<T>>, matcher: F) -> Query<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        self.combine(unions).distinct_with(matcher)
    }
}

impl<T: Clone + Hash + Eq + 'static> Query<T> {
    pub fn distinct(&self) -> Query<T> {
        self.distinct_by(T::clone)
    }

    pub fn except(&self, exceptions: impl Into<SeqRef<T>>) -> Query<T> {
        self.except_by(exceptions, T::clone)
    }

    pub fn intersect(&self, intersections: impl Into<SeqRef<T>>) -> Query<T> {
        self.intersect_by(intersections, T::clone)
    }

    pub fn union(&self, unions: impl Into<SeqRef<T>>) -> Query<T> {
        self.union_by(unions, T::clone)
    }
}
