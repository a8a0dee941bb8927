//! Position-aware cursor handed to the `*_by_context` callbacks.
//!
//! Every element that has been pulled from upstream stays in `seen`, whether it
//! was handed out by `next` or only looked at through `peek_next`. Memory grows
//! with the number of elements visited, nothing is evicted.

use lazyq_core::error::{Error, Result};

use crate::traits::{BoxCursor, Cursor};

pub struct Context<T> {
    source: BoxCursor<T>,
    seen: Vec<T>,
    /// Number of elements handed out by `next`; the current index is `advanced - 1`.
    advanced: usize,
}

impl<T: Clone> Context<T> {
    pub fn new(source: BoxCursor<T>) -> Self {
        Self {
            source,
            seen: Vec::new(),
            advanced: 0,
        }
    }

    /// Index of the element most recently returned by `next`, `None` before the first.
    pub fn index(&self) -> Option<usize> {
        self.advanced.checked_sub(1)
    }

    pub fn is_first(&self) -> bool {
        self.advanced == 1
    }

    /// No unseen element remains after the current one.
    pub fn is_last(&mut self) -> Result<bool> {
        Ok(!self.has_next()?)
    }

    pub fn has_previous(&self) -> bool {
        self.advanced > 1
    }

    /// The element before the current one.
    pub fn previous(&self) -> Result<&T> {
        self.look_behind(1)
    }

    /// The element `distance` positions before the current one; `0` is the current element.
    pub fn look_behind(&self, distance: usize) -> Result<&T> {
        self.index()
            .and_then(|index| index.checked_sub(distance))
            .and_then(|pos| self.seen.get(pos))
            .ok_or_else(|| {
                Error::no_such_element(format!(
                    "cannot look {distance} behind index {:?}",
                    self.index()
                ))
            })
    }

    /// The element after the current one, without moving the index.
    pub fn peek_next(&mut self) -> Result<T> {
        if let Some(item) = self.seen.get(self.advanced) {
            return Ok(item.clone());
        }
        let item = self.source.next()?;
        self.seen.push(item.clone());
        Ok(item)
    }

    /// Elements visited so far, including any peeked one.
    pub fn seen(&self) -> &[T] {
        &self.seen
    }
}

impl<T: Clone> Cursor<T> for Context<T> {
    fn has_next(&mut self) -> Result<bool> {
        Ok(self.seen.len() > self.advanced || self.source.has_next()?)
    }

    fn next(&mut self) -> Result<T> {
        let item = self.peek_next()?;
        self.advanced += 1;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SeqRef;

    fn ctx(items: Vec<i32>) -> Context<i32> {
        Context::new(SeqRef::from(items).open().unwrap())
    }

    #[test]
    fn test_positions() {
        let mut c = ctx(vec![10, 20, 30]);
        assert_eq!(c.index(), None);
        assert!(!c.is_first());

        assert_eq!(c.next().unwrap(), 10);
        assert_eq!(c.index(), Some(0));
        assert!(c.is_first());
        assert!(!c.has_previous());
        assert!(matches!(c.previous(), Err(Error::NoSuchElement(_))));

        assert_eq!(c.peek_next().unwrap(), 20);
        assert_eq!(c.index(), Some(0));

        assert_eq!(c.next().unwrap(), 20);
        assert_eq!(*c.previous().unwrap(), 10);
        assert!(!c.is_last().unwrap());

        assert_eq!(c.next().unwrap(), 30);
        assert!(c.is_last().unwrap());
        assert_eq!(*c.look_behind(2).unwrap(), 10);
        assert_eq!(*c.look_behind(0).unwrap(), 30);
        assert!(c.look_behind(3).is_err());
    }

    #[test]
    fn test_peek_past_end_fails() {
        let mut c = ctx(vec![1]);
        c.next().unwrap();
        assert!(matches!(c.peek_next(), Err(Error::NoSuchElement(_))));
        assert!(!c.has_next().unwrap());
    }
}
