//! Projection operators.

use std::hash::Hash;
use std::rc::Rc;

use lazyq_core::error::Result;
use lazyq_core::{Grouping, SizeEstimator};
use lazyq_operators::group::GroupBy;
use lazyq_operators::map::{Select, SelectMany};
use lazyq_operators::step::Convert;
use lazyq_operators::{ByContext, ByIndex, ByValue, Context};

use crate::query::{boxed, Query};

impl<T: Clone + 'static> Query<T> {
    pub fn map<S, F>(&self, selector: F) -> Query<S>
    where
        S: 'static,
        F: Fn(T) -> S + 'static,
    {
        let selector = Rc::new(selector);
        self.derive(self.estimator().clone(), move |up| {
            let selector = Rc::clone(&selector);
            boxed(Select::<T, _, _>::new(up, ByValue(move |x: T| selector(x))))
        })
    }

    pub fn map_by_index<S, F>(&self, selector: F) -> Query<S>
    where
        S: 'static,
        F: Fn(T, usize) -> S + 'static,
    {
        let selector = Rc::new(selector);
        self.derive(self.estimator().clone(), move |up| {
            let selector = Rc::clone(&selector);
            boxed(Select::<T, _, _>::new(
                up,
                ByIndex::new(move |x: T, i: usize| selector(x, i)),
            ))
        })
    }

    pub fn map_by_context<S, F>(&self, selector: F) -> Query<S>
    where
        S: 'static,
        F: Fn(T, &mut Context<T>) -> Result<S> + 'static,
    {
        let selector = Rc::new(selector);
        self.derive(self.estimator().clone(), move |up| {
            let selector = Rc::clone(&selector);
            boxed(Select::<T, _, _>::new(
                Context::new(up),
                ByContext(move |x: T, ctx: &mut Context<T>| selector(x, ctx)),
            ))
        })
    }

    /// Project every element to a sequence and concatenate the results.
    pub fn flat_map<I, F>(&self, selector: F) -> Query<I::Item>
    where
        I: IntoIterator + 'static,
        I::IntoIter: 'static,
        I::Item: 'static,
        F: Fn(T) -> I + 'static,
    {
        let selector = Rc::new(selector);
        self.derive(SizeEstimator::unknown(), move |up| {
            let selector = Rc::clone(&selector);
            boxed(SelectMany::<T, _, _, I>::new(
                up,
                ByValue(move |x: T| selector(x)),
            ))
        })
    }

    pub fn flat_map_by_index<I, F>(&self, selector: F) -> Query<I::Item>
    where
        I: IntoIterator + 'static,
        I::IntoIter: 'static,
        I::Item: 'static,
        F: Fn(T, usize) -> I + 'static,
    {
        let selector = Rc::new(selector);
        self.derive(SizeEstimator::unknown(), move |up| {
            let selector = Rc::clone(&selector);
            boxed(SelectMany::<T, _, _, I>::new(
                up,
                ByIndex::new(move |x: T, i: usize| selector(x, i)),
            ))
        })
    }

    pub fn flat_map_by_context<I, F>(&self, selector: F) -> Query<I::Item>
    where
        I: IntoIterator + 'static,
        I::IntoIter: 'static,
        I::Item: 'static,
        F: Fn(T, &mut Context<T>) -> Result<I> + 'static,
    {
        let selector = Rc::new(selector);
        self.derive(SizeEstimator::unknown(), move |up| {
            let selector = Rc::clone(&selector);
            boxed(SelectMany::<T, _, _, I>::new(
                Context::new(up),
                ByContext(move |x: T, ctx: &mut Context<T>| selector(x, ctx)),
            ))
        })
    }

    /// Convert every element into `S`; the first failure raises `TypeMismatch`.
    pub fn cast<S>(&self) -> Query<S>
    where
        S: TryFrom<T> + 'static,
    {
        self.derive(self.estimator().clone(), |up| {
            boxed(Select::<T, _, _>::new(up, Convert::<S>::new()))
        })
    }

    /// Run `action` on each element as it passes through.
    pub fn pipe<F>(&self, action: F) -> Query<T>
    where
        F: Fn(&T) + 'static,
    {
        self.map(move |x| {
            action(&x);
            x
        })
    }

    pub fn pipe_by_index<F>(&self, action: F) -> Query<T>
    where
        F: Fn(&T, usize) + 'static,
    {
        self.map_by_index(move |x, i| {
            action(&x, i);
            x
        })
    }

    pub fn pipe_by_context<F>(&self, action: F) -> Query<T>
    where
        F: Fn(&T, &mut Context<T>) -> Result<()> + 'static,
    {
        self.map_by_context(move |x, ctx| {
            action(&x, ctx)?;
            Ok(x)
        })
    }

    /// Group elements by key, keys in first-seen order.
    pub fn group_by<K, F>(&self, key: F) -> Query<Grouping<K, T>>
    where
        K: Hash + Eq + Clone + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.group_by_with(key, |x| x)
    }

    /// `group_by` with each element projected through `value` inside its group.
    pub fn group_by_with<K, V, FK, FV>(&self, key: FK, value: FV) -> Query<Grouping<K, V>>
    where
        K: Hash + Eq + Clone + 'static,
        V: 'static,
        FK: Fn(&T) -> K + 'static,
        FV: Fn(T) -> V + 'static,
    {
        let key = Rc::new(key);
        let value = Rc::new(value);
        self.derive(SizeEstimator::unknown(), move |up| {
            let (key, value) = (Rc::clone(&key), Rc::clone(&value));
            boxed(GroupBy::new(
                up,
                move |x: &T| key(x),
                move |x: T| value(x),
            ))
        })
    }
}
