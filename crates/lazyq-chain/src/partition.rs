//! Partitioning operators: prefixes, suffixes and excluded ranges.

use std::rc::Rc;

use lazyq_core::error::{Error, Result};
use lazyq_core::SizeEstimator;
use lazyq_operators::partition::{Exclude, SkipWhile, Take, TakeWhile};
use lazyq_operators::{ByContext, ByIndex, ByValue, Context};

use crate::query::{boxed, Query};

impl<T: Clone + 'static> Query<T> {
    /// Everything after the first `count` elements.
    pub fn skip(&self, count: usize) -> Query<T> {
        self.derive(self.estimator().skip(count), move |up| {
            boxed(SkipWhile::new(
                up,
                ByIndex::new(move |_: &T, i: usize| i < count),
            ))
        })
    }

    pub fn skip_while<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(SkipWhile::new(up, ByValue(move |x: &T| predicate(x))))
        })
    }

    pub fn skip_while_by_index<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(SkipWhile::new(
                up,
                ByIndex::new(move |x: &T, i: usize| predicate(x, i)),
            ))
        })
    }

    pub fn skip_while_by_context<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T, &mut Context<T>) -> Result<bool> + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(SkipWhile::new(
                Context::new(up),
                ByContext(move |x: &T, ctx: &mut Context<T>| predicate(x, ctx)),
            ))
        })
    }

    /// The first `count` elements.
    pub fn take(&self, count: usize) -> Query<T> {
        self.derive(self.estimator().take(count), move |up| {
            boxed(Take::new(up, count))
        })
    }

    pub fn take_while<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(TakeWhile::new(up, ByValue(move |x: &T| predicate(x))))
        })
    }

    pub fn take_while_by_index<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(TakeWhile::new(
                up,
                ByIndex::new(move |x: &T, i: usize| predicate(x, i)),
            ))
        })
    }

    pub fn take_while_by_context<F>(&self, predicate: F) -> Query<T>
    where
        F: Fn(&T, &mut Context<T>) -> Result<bool> + 'static,
    {
        let predicate = Rc::new(predicate);
        self.derive(SizeEstimator::unknown(), move |up| {
            let predicate = Rc::clone(&predicate);
            boxed(TakeWhile::new(
                Context::new(up),
                ByContext(move |x: &T, ctx: &mut Context<T>| predicate(x, ctx)),
            ))
        })
    }

    /// Drop `amount` elements starting at position `start`. An amount of zero
    /// passes everything through.
    pub fn exclude(&self, start: usize, amount: usize) -> Query<T> {
        match amount.checked_sub(1) {
            None => self.derive(self.estimator().clone(), Ok),
            Some(span) => self.exclude_range(start, start.saturating_add(span)),
        }
    }

    /// Drop the elements at positions `start..=end`.
    ///
    /// Fails with `InvalidArgument` when `end < start`.
    pub fn exclude_between(&self, start: usize, end: usize) -> Result<Query<T>> {
        if end < start {
            return Err(Error::invalid(format!(
                "exclude_between end {end} is before start {start}"
            )));
        }
        Ok(self.exclude_range(start, end))
    }

    fn exclude_range(&self, start: usize, end: usize) -> Query<T> {
        self.derive(self.estimator().exclude(start, end), move |up| {
            boxed(Exclude::new(up, start, end))
        })
    }
}
