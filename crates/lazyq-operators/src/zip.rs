//! Positional zip. The join type decides which side must still have elements.

use lazyq_core::error::Result;
use lazyq_core::{JoinRow, JoinType};

use crate::traits::{exhausted, BoxCursor, Cursor};

pub struct Zip<L, R> {
    left: BoxCursor<L>,
    right: BoxCursor<R>,
    join_type: JoinType,
}

impl<L, R> Zip<L, R> {
    pub fn new(left: BoxCursor<L>, right: BoxCursor<R>, join_type: JoinType) -> Self {
        Self {
            left,
            right,
            join_type,
        }
    }
}

fn pull<T>(cursor: &mut BoxCursor<T>) -> Result<Option<T>> {
    if cursor.has_next()? {
        cursor.next().map(Some)
    } else {
        Ok(None)
    }
}

impl<L, R> Cursor<JoinRow<L, R>> for Zip<L, R> {
    fn has_next(&mut self) -> Result<bool> {
        Ok(match self.join_type {
            JoinType::Inner => self.left.has_next()? && self.right.has_next()?,
            JoinType::Left => self.left.has_next()?,
            JoinType::Right => self.right.has_next()?,
            JoinType::Outer => self.left.has_next()? || self.right.has_next()?,
        })
    }

    fn next(&mut self) -> Result<JoinRow<L, R>> {
        if !self.has_next()? {
            return Err(exhausted("zip"));
        }
        let left = pull(&mut self.left)?;
        let right = pull(&mut self.right)?;
        Ok(JoinRow::new(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SeqRef;

    fn zip(join_type: JoinType) -> Vec<JoinRow<i32, char>> {
        let mut c = Zip::new(
            SeqRef::from(vec![1, 2]).open().unwrap(),
            SeqRef::from(vec!['x', 'y', 'z']).open().unwrap(),
            join_type,
        );
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            out.push(c.next().unwrap());
        }
        out
    }

    #[test]
    fn test_zip_outer_pads_shorter_side() {
        assert_eq!(
            zip(JoinType::Outer),
            vec![
                JoinRow::matched(1, 'x'),
                JoinRow::matched(2, 'y'),
                JoinRow::new(None, Some('z')),
            ]
        );
    }

    #[test]
    fn test_zip_inner_and_left_stop_with_left() {
        assert_eq!(zip(JoinType::Inner).len(), 2);
        assert_eq!(zip(JoinType::Left).len(), 2);
        assert_eq!(zip(JoinType::Right).len(), 3);
    }
}
