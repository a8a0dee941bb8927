//! Primitive producers: integer ranges and seed-driven generators.

use std::rc::Rc;

use lazyq_core::error::{Error, Result};

use crate::source::Sequence;
use crate::traits::{exhausted, BoxCursor, Cursor, Slot};

/// Inclusive run of consecutive integers, counting up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSeq {
    first: i64,
    /// Number of values; `0` is an empty range.
    count: u128,
    descending: bool,
}

impl RangeSeq {
    /// `length` values from `start`; a negative length counts down.
    pub fn with_length(start: i64, length: i64) -> Result<Self> {
        if length == 0 {
            return Ok(Self {
                first: start,
                count: 0,
                descending: false,
            });
        }
        let step = if length > 0 { length - 1 } else { length + 1 };
        let end = start.checked_add(step).ok_or_else(|| {
            Error::invalid(format!("range of {length} from {start} overflows i64"))
        })?;
        Ok(Self::between(start, end))
    }

    /// Every integer from `start` to `end`, both included.
    pub fn between(start: i64, end: i64) -> Self {
        Self {
            first: start,
            count: u128::from(start.abs_diff(end)) + 1,
            descending: start > end,
        }
    }
}

impl Sequence<i64> for RangeSeq {
    fn open(&self) -> Result<BoxCursor<i64>> {
        Ok(Box::new(RangeCursor {
            next: self.first,
            remaining: self.count,
            descending: self.descending,
        }))
    }

    fn len_hint(&self) -> Option<usize> {
        usize::try_from(self.count).ok()
    }
}

struct RangeCursor {
    next: i64,
    remaining: u128,
    descending: bool,
}

impl Cursor<i64> for RangeCursor {
    fn has_next(&mut self) -> Result<bool> {
        Ok(self.remaining > 0)
    }

    fn next(&mut self) -> Result<i64> {
        if self.remaining == 0 {
            return Err(exhausted("range"));
        }
        let value = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = if self.descending { value - 1 } else { value + 1 };
        }
        Ok(value)
    }
}

type StepFn<T> = Rc<dyn Fn(&T, usize) -> T>;

/// When a generator stops.
pub enum Limit<T> {
    /// Exactly this many values, the seed included.
    Count(usize),
    /// Stop at the first candidate the predicate accepts; that candidate is not emitted.
    Until(Rc<dyn Fn(&T) -> bool>),
}

impl<T> Clone for Limit<T> {
    fn clone(&self) -> Self {
        match self {
            Limit::Count(n) => Limit::Count(*n),
            Limit::Until(f) => Limit::Until(Rc::clone(f)),
        }
    }
}

/// `seed`, then `step(previous, index)` for index 1, 2, ...
pub struct GenerateSeq<T> {
    seed: T,
    step: StepFn<T>,
    limit: Limit<T>,
}

impl<T> GenerateSeq<T> {
    pub fn new<F>(seed: T, step: F, limit: Limit<T>) -> Self
    where
        F: Fn(&T, usize) -> T + 'static,
    {
        Self {
            seed,
            step: Rc::new(step),
            limit,
        }
    }
}

impl<T: Clone + 'static> Sequence<T> for GenerateSeq<T> {
    fn open(&self) -> Result<BoxCursor<T>> {
        Ok(Box::new(GenerateCursor {
            seed: Some(self.seed.clone()),
            last: None,
            step: Rc::clone(&self.step),
            limit: self.limit.clone(),
            produced: 0,
            slot: Slot::new(),
        }))
    }

    fn len_hint(&self) -> Option<usize> {
        match self.limit {
            Limit::Count(n) => Some(n),
            Limit::Until(_) => None,
        }
    }
}

struct GenerateCursor<T> {
    seed: Option<T>,
    last: Option<T>,
    step: StepFn<T>,
    limit: Limit<T>,
    produced: usize,
    slot: Slot<T>,
}

impl<T: Clone> Cursor<T> for GenerateCursor<T> {
    fn has_next(&mut self) -> Result<bool> {
        let Self {
            seed,
            last,
            step,
            limit,
            produced,
            slot,
        } = self;
        slot.poll_with(|| {
            if let Limit::Count(n) = limit {
                if *produced >= *n {
                    return Ok(None);
                }
            }
            let candidate = match (seed.take(), last.as_ref()) {
                (Some(seed), _) => seed,
                (None, Some(prev)) => step(prev, *produced),
                (None, None) => return Ok(None),
            };
            if let Limit::Until(done) = limit {
                if done(&candidate) {
                    return Ok(None);
                }
            }
            Ok(Some(candidate))
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        let value = self.slot.take_or("generate")?;
        self.last = Some(value.clone());
        self.produced += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SeqRef;

    #[test]
    fn test_range_directions() {
        let up = SeqRef::new(RangeSeq::with_length(3, 4).unwrap());
        assert_eq!(up.materialize().unwrap(), vec![3, 4, 5, 6]);
        assert_eq!(up.len_hint(), Some(4));

        let down = SeqRef::new(RangeSeq::with_length(3, -3).unwrap());
        assert_eq!(down.materialize().unwrap(), vec![3, 2, 1]);

        let empty = SeqRef::new(RangeSeq::with_length(3, 0).unwrap());
        assert!(empty.materialize().unwrap().is_empty());

        let between = SeqRef::new(RangeSeq::between(2, -1));
        assert_eq!(between.materialize().unwrap(), vec![2, 1, 0, -1]);
    }

    #[test]
    fn test_range_at_bounds() {
        let top = SeqRef::new(RangeSeq::between(i64::MAX - 1, i64::MAX));
        assert_eq!(top.materialize().unwrap(), vec![i64::MAX - 1, i64::MAX]);
        assert!(matches!(
            RangeSeq::with_length(i64::MAX, 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_generate_until_excludes_stop_value() {
        let seq = SeqRef::new(GenerateSeq::new(
            1,
            |x: &i32, _| x + 1,
            Limit::Until(Rc::new(|x: &i32| *x >= 5)),
        ));
        assert_eq!(seq.len_hint(), None);
        assert_eq!(seq.materialize().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_generate_count_passes_index() {
        let seq = SeqRef::new(GenerateSeq::new(
            1u64,
            |prev: &u64, i| prev * i as u64,
            Limit::Count(5),
        ));
        assert_eq!(seq.len_hint(), Some(5));
        assert_eq!(seq.materialize().unwrap(), vec![1, 1, 2, 6, 24]);
    }
}
