//! Filter cursor: keeps the upstream elements a `Test` accepts.

use lazyq_core::error::Result;

use crate::step::Test;
use crate::traits::{Cursor, Slot};

pub struct Where<T, C, P> {
    source: C,
    test: P,
    slot: Slot<T>,
}

impl<T, C, P> Where<T, C, P>
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

impl<T, C, P> Cursor<T> for Where<T, C, P>
where
    C: Cursor<T>,
    P: Test<T, C>,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self { source, test, slot } = self;
        slot.poll_with(|| {
            while source.has_next()? {
                let item = source.next()?;
                if test.test(&item, source)? {
                    return Ok(Some(item));
                }
            }
            Ok(None)
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        self.slot.take_or("filter")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::source::SeqRef;
    use crate::step::{ByContext, ByIndex, ByValue};
    use crate::traits::BoxCursor;

    fn open(items: Vec<i32>) -> BoxCursor<i32> {
        SeqRef::from(items).open().unwrap()
    }

    fn drain<C: Cursor<i32>>(mut c: C) -> Vec<i32> {
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            out.push(c.next().unwrap());
        }
        out
    }

    #[test]
    fn test_where_by_value() {
        let c = Where::new(open(vec![1, 2, 3, 4]), ByValue(|x: &i32| x % 2 == 0));
        assert_eq!(drain(c), vec![2, 4]);
    }

    #[test]
    fn test_where_by_index() {
        let c = Where::new(open(vec![5, 6, 7]), ByIndex::new(|_: &i32, i: usize| i != 1));
        assert_eq!(drain(c), vec![5, 7]);
    }

    #[test]
    fn test_where_by_context_sees_neighbours() {
        // keep elements larger than their predecessor
        let source = Context::new(open(vec![3, 1, 4, 1, 5]));
        let c = Where::new(
            source,
            ByContext(|x: &i32, ctx: &mut Context<i32>| -> Result<bool> {
                Ok(!ctx.has_previous() || ctx.previous()? < x)
            }),
        );
        assert_eq!(drain(c), vec![3, 4, 5]);
    }

    #[test]
    fn test_has_next_idempotent() {
        let mut c = Where::new(open(vec![1, 2]), ByValue(|x: &i32| *x > 1));
        assert!(c.has_next().unwrap());
        assert!(c.has_next().unwrap());
        assert_eq!(c.next().unwrap(), 2);
        assert!(!c.has_next().unwrap());
        assert!(c.next().is_err());
    }
}
