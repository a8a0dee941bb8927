//! Concatenation, optionally splicing the second sequence in at an offset.

use lazyq_core::error::Result;

use crate::traits::{exhausted, Cursor};

pub struct Combine<A, B> {
    source: A,
    additions: B,
    /// Position in `source` before which `additions` are spliced; `None` appends.
    insert_at: Option<usize>,
    pos: usize,
}

impl<A, B> Combine<A, B> {
    pub fn append(source: A, additions: B) -> Self {
        Self {
            source,
            additions,
            insert_at: None,
            pos: 0,
        }
    }

    /// Past-the-end offsets degrade to appending.
    pub fn insert_at(source: A, additions: B, index: usize) -> Self {
        Self {
            source,
            additions,
            insert_at: Some(index),
            pos: 0,
        }
    }
}

impl<T, A, B> Cursor<T> for Combine<A, B>
where
    A: Cursor<T>,
    B: Cursor<T>,
{
    fn has_next(&mut self) -> Result<bool> {
        Ok(self.source.has_next()? || self.additions.has_next()?)
    }

    fn next(&mut self) -> Result<T> {
        let splicing = match self.insert_at {
            Some(at) => at <= self.pos && self.additions.has_next()?,
            None => false,
        };
        if !splicing && self.source.has_next()? {
            self.pos += 1;
            return self.source.next();
        }
        if self.additions.has_next()? {
            return self.additions.next();
        }
        Err(exhausted("combine"))
    }
}
