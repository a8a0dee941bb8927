//! Ordering operators. All of them materialize their input on first pull.

use std::cmp::Ordering;
use std::ops::Deref;
use std::rc::Rc;

use lazyq_operators::sort::{compose, Materialize, OrderBy, Reorder};

use crate::query::{boxed, Query};

/// A query sorted by one or more keys; `then_by*` adds tie-breakers.
#[derive(Clone, Debug)]
pub struct OrderedQuery<T> {
    sorted: Query<T>,
    unsorted: Query<T>,
    orderings: Rc<[OrderBy<T>]>,
}

impl<T> Deref for OrderedQuery<T> {
    type Target = Query<T>;

    fn deref(&self) -> &Query<T> {
        &self.sorted
    }
}

impl<T> From<OrderedQuery<T>> for Query<T> {
    fn from(ordered: OrderedQuery<T>) -> Self {
        ordered.sorted
    }
}

impl<T: Clone + 'static> OrderedQuery<T> {
    fn new(unsorted: Query<T>, orderings: Vec<OrderBy<T>>) -> Self {
        let orderings: Rc<[OrderBy<T>]> = orderings.into();
        let cmp = compose(&orderings);
        let sorted = unsorted.reordered(move || Reorder::Sort(Rc::clone(&cmp)));
        Self {
            sorted,
            unsorted,
            orderings,
        }
    }

    pub fn into_query(self) -> Query<T> {
        self.sorted
    }

    pub fn orderings(&self) -> &[OrderBy<T>] {
        &self.orderings
    }

    /// Sort again by the existing keys plus `ordering` as the least significant one.
    pub fn then_with(&self, ordering: OrderBy<T>) -> OrderedQuery<T> {
        let mut orderings = self.orderings.to_vec();
        orderings.push(ordering);
        OrderedQuery::new(self.unsorted.clone(), orderings)
    }

    pub fn then_by<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.then_with(OrderBy::key(key))
    }

    pub fn then_by_descending<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.then_with(OrderBy::key(key).descending())
    }

    /// Absent keys last.
    pub fn then_by_nullable<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.then_with(OrderBy::nullable_key(key))
    }

    pub fn then_by_nulls_first<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.then_with(OrderBy::nullable_key(key).nulls_first())
    }

    /// Descending, absent keys first.
    pub fn then_by_descending_nullable<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.then_with(OrderBy::nullable_key(key).descending())
    }

    pub fn then_by_descending_nulls_last<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.then_with(OrderBy::nullable_key(key).descending().nulls_last())
    }

    pub fn then_by_with<F>(&self, cmp: F) -> OrderedQuery<T>
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.then_with(OrderBy::comparator(cmp))
    }

    pub fn then_by_descending_with<F>(&self, cmp: F) -> OrderedQuery<T>
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.then_with(OrderBy::comparator(cmp).descending())
    }
}

impl<T: Clone + 'static> Query<T> {
    /// Buffer the whole input once per pull, reorder it, replay it.
    fn reordered<F>(&self, reorder: F) -> Query<T>
    where
        F: Fn() -> Reorder<T> + 'static,
    {
        let size = self.estimator().clone();
        let capacity = size.clone();
        self.derive(size, move |up| {
            boxed(Materialize::new(up, reorder(), capacity.estimate()))
        })
    }

    /// Stable sort by `ordering`.
    pub fn order_with(&self, ordering: OrderBy<T>) -> OrderedQuery<T> {
        OrderedQuery::new(self.clone(), vec![ordering])
    }

    pub fn order_by<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.order_with(OrderBy::key(key))
    }

    pub fn order_by_descending<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        self.order_with(OrderBy::key(key).descending())
    }

    /// Ascending, absent keys last.
    pub fn order_by_nullable<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.order_with(OrderBy::nullable_key(key))
    }

    pub fn order_by_nulls_first<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.order_with(OrderBy::nullable_key(key).nulls_first())
    }

    /// Descending, absent keys first.
    pub fn order_by_descending_nullable<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.order_with(OrderBy::nullable_key(key).descending())
    }

    pub fn order_by_descending_nulls_last<K, F>(&self, key: F) -> OrderedQuery<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        self.order_with(OrderBy::nullable_key(key).descending().nulls_last())
    }

    pub fn order_by_with<F>(&self, cmp: F) -> OrderedQuery<T>
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.order_with(OrderBy::comparator(cmp))
    }

    pub fn order_by_descending_with<F>(&self, cmp: F) -> OrderedQuery<T>
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.order_with(OrderBy::comparator(cmp).descending())
    }

    pub fn reverse(&self) -> Query<T> {
        self.reordered(|| Reorder::Reverse)
    }

    /// Random permutation, seeded from `QueryConfig::shuffle_seed` when set.
    pub fn shuffle(&self) -> Query<T> {
        let seed = self.config().shuffle_seed;
        self.reordered(move || Reorder::Shuffle(seed))
    }

    pub fn shuffle_with_seed(&self, seed: u64) -> Query<T> {
        self.reordered(move || Reorder::Shuffle(Some(seed)))
    }
}

impl<T: Clone + PartialOrd + 'static> Query<T> {
    pub fn order(&self) -> OrderedQuery<T> {
        self.order_with(OrderBy::natural())
    }

    pub fn order_descending(&self) -> OrderedQuery<T> {
        self.order_with(OrderBy::natural().descending())
    }
}

impl<U: Clone + PartialOrd + 'static> Query<Option<U>> {
    /// Ascending by the inner value, `None` last.
    pub fn order_nullable(&self) -> OrderedQuery<Option<U>> {
        self.order_with(OrderBy::natural_nullable())
    }

    pub fn order_nulls_first(&self) -> OrderedQuery<Option<U>> {
        self.order_with(OrderBy::natural_nullable().nulls_first())
    }

    /// Descending by the inner value, `None` first.
    pub fn order_descending_nullable(&self) -> OrderedQuery<Option<U>> {
        self.order_with(OrderBy::natural_nullable().descending())
    }

    pub fn order_descending_nulls_last(&self) -> OrderedQuery<Option<U>> {
        self.order_with(OrderBy::natural_nullable().descending().nulls_last())
    }
}
