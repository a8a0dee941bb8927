//! Concrete sequences a chain can be rooted on or combined with.
//!
//! A `Sequence` is re-iterable: every `open` returns a fresh cursor positioned
//! before the first element. `SeqRef` is the shared, clonable handle operators
//! keep for their second input (combine, join right side, set comparisons).

use std::fmt;
use std::rc::Rc;

use lazyq_core::error::Result;

use crate::traits::{exhausted, BoxCursor, Cursor};

pub trait Sequence<T> {
    fn open(&self) -> Result<BoxCursor<T>>;

    /// Element count when known without iterating.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

pub struct SeqRef<T>(Rc<dyn Sequence<T>>);

impl<T> Clone for SeqRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for SeqRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqRef")
            .field("len_hint", &self.0.len_hint())
            .finish()
    }
}

impl<T> SeqRef<T> {
    pub fn new<S: Sequence<T> + 'static>(seq: S) -> Self {
        Self(Rc::new(seq))
    }

    pub fn open(&self) -> Result<BoxCursor<T>> {
        self.0.open()
    }

    pub fn len_hint(&self) -> Option<usize> {
        self.0.len_hint()
    }

    /// Pull every element into a buffer sized from the hint.
    pub fn materialize(&self) -> Result<Vec<T>> {
        let mut cursor = self.open()?;
        let mut out = Vec::with_capacity(self.len_hint().unwrap_or(0));
        while cursor.has_next()? {
            out.push(cursor.next()?);
        }
        Ok(out)
    }
}

impl<T: Clone + 'static> SeqRef<T> {
    /// Re-iterable sequence over whatever `factory` yields each time it is opened.
    pub fn from_fn<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::new(FnSequence { factory })
    }
}

impl<T: Clone + 'static> From<Vec<T>> for SeqRef<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(Items(items.into()))
    }
}

impl<T: Clone + 'static> From<&[T]> for SeqRef<T> {
    fn from(items: &[T]) -> Self {
        Self::new(Items(items.into()))
    }
}

impl<T: Clone + 'static, const N: usize> From<[T; N]> for SeqRef<T> {
    fn from(items: [T; N]) -> Self {
        Self::from(Vec::from(items))
    }
}

impl<T: Clone + 'static> From<Rc<[T]>> for SeqRef<T> {
    fn from(items: Rc<[T]>) -> Self {
        Self::new(Items(items))
    }
}

/// Shared, immutable buffer. Cursors clone elements out of it.
pub struct Items<T>(pub Rc<[T]>);

impl<T: Clone + 'static> Sequence<T> for Items<T> {
    fn open(&self) -> Result<BoxCursor<T>> {
        Ok(Box::new(SliceCursor::new(Rc::clone(&self.0))))
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

pub struct SliceCursor<T> {
    items: Rc<[T]>,
    pos: usize,
}

impl<T> SliceCursor<T> {
    pub fn new(items: Rc<[T]>) -> Self {
        Self { items, pos: 0 }
    }
}

impl<T: Clone> Cursor<T> for SliceCursor<T> {
    fn has_next(&mut self) -> Result<bool> {
        Ok(self.pos < self.items.len())
    }

    fn next(&mut self) -> Result<T> {
        let item = self.items.get(self.pos).cloned().ok_or_else(|| exhausted("slice"))?;
        self.pos += 1;
        Ok(item)
    }
}

struct FnSequence<F> {
    factory: F,
}

impl<T, F, I> Sequence<T> for FnSequence<F>
where
    T: 'static,
    F: Fn() -> I,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
{
    fn open(&self) -> Result<BoxCursor<T>> {
        Ok(Box::new(IterCursor::new((self.factory)())))
    }
}

/// Adapts an infallible std iterator.
pub struct IterCursor<I: Iterator> {
    iter: I,
    peeked: Option<I::Item>,
}

impl<I: Iterator> IterCursor<I> {
    pub fn new<S: IntoIterator<IntoIter = I>>(iter: S) -> Self {
        Self {
            iter: iter.into_iter(),
            peeked: None,
        }
    }
}

impl<I: Iterator> Cursor<I::Item> for IterCursor<I> {
    fn has_next(&mut self) -> Result<bool> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next();
        }
        Ok(self.peeked.is_some())
    }

    fn next(&mut self) -> Result<I::Item> {
        match self.peeked.take() {
            Some(item) => Ok(item),
            None => self.iter.next().ok_or_else(|| exhausted("iterator")),
        }
    }
}

/// Cursor over nothing.
pub struct EmptyCursor;

impl<T> Cursor<T> for EmptyCursor {
    fn has_next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn next(&mut self) -> Result<T> {
        Err(exhausted("empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyq_core::Error;

    #[test]
    fn test_items_reopen() {
        let seq = SeqRef::from(vec![1, 2, 3]);
        assert_eq!(seq.len_hint(), Some(3));
        assert_eq!(seq.materialize().unwrap(), vec![1, 2, 3]);
        assert_eq!(seq.materialize().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_iter_cursor_peek_is_idempotent() {
        let mut cursor = IterCursor::new(vec!["a", "b"]);
        assert!(cursor.has_next().unwrap());
        assert!(cursor.has_next().unwrap());
        assert_eq!(cursor.next().unwrap(), "a");
        assert_eq!(cursor.next().unwrap(), "b");
        assert!(!cursor.has_next().unwrap());
        assert!(matches!(cursor.next(), Err(Error::NoSuchElement(_))));
    }

    #[test]
    fn test_from_fn_has_no_hint() {
        let seq = SeqRef::from_fn(|| (0..4).map(|i| i * 2));
        assert_eq!(seq.len_hint(), None);
        assert_eq!(seq.materialize().unwrap(), vec![0, 2, 4, 6]);
    }
}
