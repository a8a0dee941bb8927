//! Cursor trait + the ready-slot state machine shared by the combinators.

use lazyq_core::error::{Error, Result};

/// Forward-only, single-pass pull interface.
///
/// Invariants:
/// - `has_next` may be called any number of times between `next` calls and
///   returns the same answer without consuming anything further.
/// - `next` on an exhausted cursor fails with `NoSuchElement`.
pub trait Cursor<T> {
    fn has_next(&mut self) -> Result<bool>;

    fn next(&mut self) -> Result<T>;
}

pub type BoxCursor<T> = Box<dyn Cursor<T>>;

impl<T, C: Cursor<T> + ?Sized> Cursor<T> for Box<C> {
    fn has_next(&mut self) -> Result<bool> {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<T> {
        (**self).next()
    }
}

impl<T, C: Cursor<T> + ?Sized> Cursor<T> for &mut C {
    fn has_next(&mut self) -> Result<bool> {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<T> {
        (**self).next()
    }
}

/// Error for stepping past the end of `stage`.
pub fn exhausted(stage: &str) -> Error {
    Error::no_such_element(format!("{stage} cursor is exhausted"))
}

/// NOT_READY / READY / EXHAUSTED.
///
/// Combinators keep one of these next to their upstream. `poll_with` runs the
/// fill closure only in NOT_READY, so repeated `has_next` calls are free.
/// EXHAUSTED is terminal.
#[derive(Debug)]
pub enum Slot<T> {
    NotReady,
    Ready(T),
    Exhausted,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::NotReady
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Slot::NotReady
    }

    pub fn poll_with<F>(&mut self, fill: F) -> Result<bool>
    where
        F: FnOnce() -> Result<Option<T>>,
    {
        if let Slot::NotReady = self {
            *self = match fill()? {
                Some(value) => Slot::Ready(value),
                None => Slot::Exhausted,
            };
        }
        Ok(self.is_ready())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Slot::Ready(_))
    }

    /// Hand out the ready value, going back to NOT_READY.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Slot::Ready(value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }

    /// `take`, or the stage's `NoSuchElement` error.
    pub fn take_or(&mut self, stage: &str) -> Result<T> {
        self.take().ok_or_else(|| exhausted(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_fills_once() {
        let mut slot = Slot::new();
        let mut calls = 0;
        for _ in 0..3 {
            let ready = slot
                .poll_with(|| {
                    calls += 1;
                    Ok(Some(7))
                })
                .unwrap();
            assert!(ready);
        }
        assert_eq!(calls, 1);
        assert_eq!(slot.take(), Some(7));
        assert!(matches!(slot, Slot::NotReady));
    }

    #[test]
    fn test_slot_exhausted_is_terminal() {
        let mut slot: Slot<i32> = Slot::new();
        assert!(!slot.poll_with(|| Ok(None)).unwrap());
        assert!(!slot.poll_with(|| Ok(Some(1))).unwrap());
        assert!(matches!(slot.take_or("test"), Err(Error::NoSuchElement(_))));
    }
}
