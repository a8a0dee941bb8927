//! Materialize-then-reorder sink.
//!
//! The first `has_next` pulls the whole upstream into one buffer, applies the
//! reorder step in place, then hands the buffer out front to back.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use lazyq_core::error::Result;

use crate::sort::ordering::Comparator;
use crate::traits::{exhausted, BoxCursor, Cursor};

pub enum Reorder<T> {
    /// Stable sort.
    Sort(Comparator<T>),
    Reverse,
    /// Fisher-Yates; `None` seeds from the OS.
    Shuffle(Option<u64>),
}

impl<T> Reorder<T> {
    pub fn apply(&self, buffer: &mut [T]) {
        match self {
            Reorder::Sort(cmp) => buffer.sort_by(|a, b| cmp(a, b)),
            Reorder::Reverse => buffer.reverse(),
            Reorder::Shuffle(seed) => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                buffer.shuffle(&mut rng);
            }
        }
    }
}

pub struct Materialize<T> {
    source: BoxCursor<T>,
    reorder: Reorder<T>,
    capacity: usize,
    buffer: Option<std::vec::IntoIter<T>>,
}

impl<T> Materialize<T> {
    /// `capacity` pre-sizes the buffer when the upstream count is known.
    pub fn new(source: BoxCursor<T>, reorder: Reorder<T>, capacity: Option<usize>) -> Self {
        Self {
            source,
            reorder,
            capacity: capacity.unwrap_or(0),
            buffer: None,
        }
    }

    fn buffer(&mut self) -> Result<&mut std::vec::IntoIter<T>> {
        if self.buffer.is_none() {
            let mut items = Vec::with_capacity(self.capacity);
            while self.source.has_next()? {
                items.push(self.source.next()?);
            }
            self.reorder.apply(&mut items);
            #[cfg(feature = "tracing")]
            tracing::trace!(rows = items.len(), "reorder buffer materialized");
            self.buffer = Some(items.into_iter());
        }
        Ok(self.buffer.get_or_insert_with(|| Vec::new().into_iter()))
    }
}

impl<T> Cursor<T> for Materialize<T> {
    fn has_next(&mut self) -> Result<bool> {
        Ok(!self.buffer()?.as_slice().is_empty())
    }

    fn next(&mut self) -> Result<T> {
        self.buffer()?.next().ok_or_else(|| exhausted("order"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::ordering::{compose, OrderBy};
    use crate::source::SeqRef;

    fn run(items: Vec<i32>, reorder: Reorder<i32>) -> Vec<i32> {
        let source = SeqRef::from(items).open().unwrap();
        let mut c = Materialize::new(source, reorder, Some(4));
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            out.push(c.next().unwrap());
        }
        out
    }

    #[test]
    fn test_sort_and_reverse() {
        let cmp = compose(&[OrderBy::natural()]);
        assert_eq!(run(vec![3, 1, 2], Reorder::Sort(cmp)), vec![1, 2, 3]);
        assert_eq!(run(vec![3, 1, 2], Reorder::Reverse), vec![2, 1, 3]);
    }

    #[test]
    fn test_seeded_shuffle_is_repeatable_permutation() {
        let items: Vec<i32> = (0..32).collect();
        let a = run(items.clone(), Reorder::Shuffle(Some(42)));
        let b = run(items.clone(), Reorder::Shuffle(Some(42)));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, items);
    }
}
