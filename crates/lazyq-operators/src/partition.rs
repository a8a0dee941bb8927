//! Prefix/suffix partitioning: skip-while, take-while, counted take, exclude-range.

use lazyq_core::error::Result;

use crate::step::Test;
use crate::traits::{exhausted, Cursor, Slot};

/// Drops elements while the test holds, then passes everything through.
pub struct SkipWhile<T, C, P> {
    source: C,
    test: P,
    skipping: bool,
    slot: Slot<T>,
}

impl<T, C, P> SkipWhile<T, C, P>
where
    C: Cursor<T>,
    P: Test<T, C>,
{
    pub fn new(source: C, test: P) -> Self {
        Self {
            source,
            test,
            skipping: true,
            slot: Slot::new(),
        }
    }
}

impl<T, C, P> Cursor<T> for SkipWhile<T, C, P>
where
    C: Cursor<T>,
    P: Test<T, C>,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self {
            source,
            test,
            skipping,
            slot,
        } = self;
        slot.poll_with(|| {
            while source.has_next()? {
                let item = source.next()?;
                if *skipping && test.test(&item, source)? {
                    continue;
                }
                *skipping = false;
                return Ok(Some(item));
            }
            Ok(None)
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        self.slot.take_or("skip-while")
    }
}

/// Passes elements while the test holds; the first failure ends the stream.
pub struct TakeWhile<T, C, P> {
    source: C,
    test: P,
    slot: Slot<T>,
}

impl<T, C, P> TakeWhile<T, C, P>
where
    C: Cursor<T>,
    P: Test<T, C>,
{
    pub fn new(source: C, test: P) -> Self {
        Self {
            source,
            test,
            slot: Slot::new(),
        }
    }
}

impl<T, C, P> Cursor<T> for TakeWhile<T, C, P>
where
    C: Cursor<T>,
    P: Test<T, C>,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self { source, test, slot } = self;
        slot.poll_with(|| {
            if !source.has_next()? {
                return Ok(None);
            }
            let item = source.next()?;
            Ok(if test.test(&item, source)? {
                Some(item)
            } else {
                None
            })
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        self.slot.take_or("take-while")
    }
}

/// First `limit` elements. Never pulls the element after the last one taken.
pub struct Take<C> {
    source: C,
    remaining: usize,
}

impl<C> Take<C> {
    pub fn new(source: C, limit: usize) -> Self {
        Self {
            source,
            remaining: limit,
        }
    }
}

impl<T, C: Cursor<T>> Cursor<T> for Take<C> {
    fn has_next(&mut self) -> Result<bool> {
        Ok(self.remaining > 0 && self.source.has_next()?)
    }

    fn next(&mut self) -> Result<T> {
        if self.remaining == 0 {
            return Err(exhausted("take"));
        }
        let item = self.source.next()?;
        self.remaining -= 1;
        Ok(item)
    }
}

/// Drops the elements at positions `start..=end`.
pub struct Exclude<T, C> {
    source: C,
    start: usize,
    end: usize,
    pos: usize,
    slot: Slot<T>,
}

impl<T, C: Cursor<T>> Exclude<T, C> {
    pub fn new(source: C, start: usize, end: usize) -> Self {
        Self {
            source,
            start,
            end,
            pos: 0,
            slot: Slot::new(),
        }
    }
}

impl<T, C: Cursor<T>> Cursor<T> for Exclude<T, C> {
    fn has_next(&mut self) -> Result<bool> {
        let Self {
            source,
            start,
            end,
            pos,
            slot,
        } = self;
        slot.poll_with(|| {
            while source.has_next()? {
                let item = source.next()?;
                let at = *pos;
                *pos += 1;
                if at < *start || at > *end {
                    return Ok(Some(item));
                }
            }
            Ok(None)
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        self.slot.take_or("exclude")
    }
}
