use lazyq_core::error::Result;
use lazyq_core::{GroupJoinRow, JoinType};

use crate::join::Matcher;
use crate::source::SeqRef;
use crate::traits::{BoxCursor, Cursor, Slot};

/// One row per left element with all of its right matches.
///
/// INNER/RIGHT drop left elements without matches. RIGHT/OUTER finish with a
/// single `(None, unmatched)` row when some right element was never matched.
pub struct GroupJoin<L, R, M> {
    left: BoxCursor<L>,
    right_source: SeqRef<R>,
    right: Option<Vec<R>>,
    matcher: M,
    join_type: JoinType,
    consumed: Vec<bool>,
    trailer_done: bool,
    slot: Slot<GroupJoinRow<L, R>>,
}

impl<L, R, M> GroupJoin<L, R, M>
where
    R: Clone,
    M: Matcher<L, R>,
{
    pub fn new(left: BoxCursor<L>, right: SeqRef<R>, matcher: M, join_type: JoinType) -> Self {
        Self {
            left,
            right_source: right,
            right: None,
            matcher,
            join_type,
            consumed: Vec::new(),
            trailer_done: false,
            slot: Slot::new(),
        }
    }

    fn load_right(&mut self) -> Result<()> {
        if self.right.is_none() {
            let right = self.right_source.materialize()?;
            #[cfg(feature = "tracing")]
            tracing::trace!(rows = right.len(), "group join right side buffered");
            self.matcher.prepare(&right);
            self.consumed = vec![false; right.len()];
            self.right = Some(right);
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<GroupJoinRow<L, R>>> {
        self.load_right()?;
        let right: &[R] = self.right.as_deref().unwrap_or_default();
        while self.left.has_next()? {
            let left = self.left.next()?;
            let positions = self.matcher.matches(&left, right);
            if positions.is_empty() && !self.join_type.is_left() {
                continue;
            }
            let mut matches = Vec::with_capacity(positions.len());
            for pos in positions {
                self.consumed[pos] = true;
                matches.push(right[pos].clone());
            }
            return Ok(Some(GroupJoinRow::new(Some(left), matches)));
        }

        if self.join_type.is_right() && !self.trailer_done {
            self.trailer_done = true;
            let unmatched: Vec<R> = right
                .iter()
                .zip(&self.consumed)
                .filter(|(_, consumed)| !**consumed)
                .map(|(item, _)| item.clone())
                .collect();
            if !unmatched.is_empty() {
                return Ok(Some(GroupJoinRow::new(None, unmatched)));
            }
        }
        Ok(None)
    }
}

impl<L, R, M> Cursor<GroupJoinRow<L, R>> for GroupJoin<L, R, M>
where
    R: Clone,
    M: Matcher<L, R>,
{
    fn has_next(&mut self) -> Result<bool> {
        if let Slot::NotReady = self.slot {
            self.slot = match self.advance()? {
                Some(row) => Slot::Ready(row),
                None => Slot::Exhausted,
            };
        }
        Ok(self.slot.is_ready())
    }

    fn next(&mut self) -> Result<GroupJoinRow<L, R>> {
        self.has_next()?;
        self.slot.take_or("group join")
    }
}
