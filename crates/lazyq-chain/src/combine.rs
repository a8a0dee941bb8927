//! Concatenation and insertion.

use lazyq_core::SizeEstimator;
use lazyq_operators::combine::Combine;
use lazyq_operators::SeqRef;

use crate::query::{boxed, Query};

fn estimator_of<T>(seq: &SeqRef<T>) -> SizeEstimator
where
    T: 'static,
{
    let seq = seq.clone();
    SizeEstimator::from_fn(move || seq.len_hint())
}

impl<T: Clone + 'static> Query<T> {
    /// This chain followed by `additions`.
    pub fn combine(&self, additions: impl Into<SeqRef<T>>) -> Query<T> {
        let additions = additions.into();
        let size = self.estimator().plus(&estimator_of(&additions));
        self.derive(size, move |up| boxed(Combine::append(up, additions.open()?)))
    }

    /// `target` followed by this chain.
    pub fn combine_after(&self, target: impl Into<SeqRef<T>>) -> Query<T> {
        let target = target.into();
        let size = estimator_of(&target).plus(self.estimator());
        self.derive(size, move |up| boxed(Combine::append(target.open()?, up)))
    }

    /// `insertions` spliced in before this chain's element at `index`, or
    /// appended when the chain is shorter than `index`.
    pub fn insert(&self, index: usize, insertions: impl Into<SeqRef<T>>) -> Query<T> {
        let insertions = insertions.into();
        let size = self.estimator().plus(&estimator_of(&insertions));
        self.derive(size, move |up| {
            boxed(Combine::insert_at(up, insertions.open()?, index))
        })
    }

    /// This chain spliced into `target` before its element at `index`.
    pub fn insert_into(&self, index: usize, target: impl Into<SeqRef<T>>) -> Query<T> {
        let target = target.into();
        let size = estimator_of(&target).plus(self.estimator());
        self.derive(size, move |up| {
            boxed(Combine::insert_at(target.open()?, up, index))
        })
    }
}
