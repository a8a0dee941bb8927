//! Projection cursors: one-to-one (`Select`), one-to-many (`SelectMany`) and
//! conversion filtering (`OfType`).

use std::marker::PhantomData;

use lazyq_core::error::Result;

use crate::step::Transform;
use crate::traits::{exhausted, Cursor, Slot};

pub struct Select<T, C, F> {
    source: C,
    transform: F,
    _in: PhantomData<fn(T)>,
}

impl<T, C, F> Select<T, C, F> {
    pub fn new(source: C, transform: F) -> Self {
        Self {
            source,
            transform,
            _in: PhantomData,
        }
    }
}

impl<T, S, C, F> Cursor<S> for Select<T, C, F>
where
    C: Cursor<T>,
    F: Transform<T, S, C>,
{
    fn has_next(&mut self) -> Result<bool> {
        self.source.has_next()
    }

    fn next(&mut self) -> Result<S> {
        if !self.source.has_next()? {
            return Err(exhausted("select"));
        }
        let item = self.source.next()?;
        self.transform.apply(item, &mut self.source)
    }
}

/// Flattens the inner sequence each upstream element projects to.
pub struct SelectMany<T, C, F, I: IntoIterator> {
    source: C,
    transform: F,
    inner: Option<I::IntoIter>,
    slot: Slot<I::Item>,
    _in: PhantomData<fn(T)>,
}

impl<T, C, F, I: IntoIterator> SelectMany<T, C, F, I> {
    pub fn new(source: C, transform: F) -> Self {
        Self {
            source,
            transform,
            inner: None,
            slot: Slot::new(),
            _in: PhantomData,
        }
    }
}

impl<T, C, F, I> Cursor<I::Item> for SelectMany<T, C, F, I>
where
    C: Cursor<T>,
    F: Transform<T, I, C>,
    I: IntoIterator,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self {
            source,
            transform,
            inner,
            slot,
            ..
        } = self;
        slot.poll_with(|| loop {
            if let Some(item) = inner.as_mut().and_then(Iterator::next) {
                return Ok(Some(item));
            }
            if !source.has_next()? {
                *inner = None;
                return Ok(None);
            }
            let outer = source.next()?;
            *inner = Some(transform.apply(outer, source)?.into_iter());
        })
    }

    fn next(&mut self) -> Result<I::Item> {
        self.has_next()?;
        self.slot.take_or("select-many")
    }
}

/// Keeps the elements that convert into `S`, dropping the rest.
pub struct OfType<T, S, C> {
    source: C,
    slot: Slot<S>,
    _in: PhantomData<fn(T)>,
}

impl<T, S, C> OfType<T, S, C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            slot: Slot::new(),
            _in: PhantomData,
        }
    }
}

impl<T, S, C> Cursor<S> for OfType<T, S, C>
where
    C: Cursor<T>,
    S: TryFrom<T>,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self { source, slot, .. } = self;
        slot.poll_with(|| {
            while source.has_next()? {
                if let Ok(converted) = S::try_from(source.next()?) {
                    return Ok(Some(converted));
                }
            }
            Ok(None)
        })
    }

    fn next(&mut self) -> Result<S> {
        self.has_next()?;
        self.slot.take_or("of-type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::source::SeqRef;
    use crate::step::{ByContext, ByIndex, ByValue, Convert};
    use crate::traits::BoxCursor;
    use lazyq_core::Error;

    fn open<T: Clone + 'static>(items: Vec<T>) -> BoxCursor<T> {
        SeqRef::from(items).open().unwrap()
    }

    fn drain<T, C: Cursor<T>>(mut c: C) -> Vec<T> {
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            out.push(c.next().unwrap());
        }
        out
    }

    #[test]
    fn test_select_variants() {
        let c = Select::<i32, _, _>::new(open(vec![1, 2]), ByValue(|x: i32| x * 10));
        assert_eq!(drain(c), vec![10, 20]);

        let c = Select::<&str, _, _>::new(open(vec!["a", "b"]), ByIndex::new(|s: &str, i: usize| format!("{i}{s}")));
        assert_eq!(drain(c), vec!["0a".to_string(), "1b".to_string()]);

        let c = Select::<i32, _, _>::new(
            Context::new(open(vec![1, 2, 3])),
            ByContext(|x: i32, ctx: &mut Context<i32>| -> Result<(i32, bool)> {
                Ok((x, ctx.is_last()?))
            }),
        );
        assert_eq!(drain(c), vec![(1, false), (2, false), (3, true)]);
    }

    #[test]
    fn test_select_many_skips_empty_inners() {
        let c = SelectMany::<usize, _, _, Vec<usize>>::new(
            open(vec![0usize, 2, 0, 1]),
            ByValue(|n: usize| vec![n; n]),
        );
        assert_eq!(drain(c), vec![2, 2, 1]);
    }

    #[test]
    fn test_cast_and_of_type() {
        let mut cast = Select::<i64, _, _>::new(open(vec![1i64, -1]), Convert::<u8>::new());
        assert_eq!(cast.next().unwrap(), 1u8);
        assert!(matches!(cast.next(), Err(Error::TypeMismatch(_))));

        let filtered: OfType<i64, u8, _> = OfType::new(open(vec![1i64, -1, 300, 7]));
        assert_eq!(drain(filtered), vec![1u8, 7]);
    }
}
