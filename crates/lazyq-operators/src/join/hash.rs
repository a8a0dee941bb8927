use lazyq_core::error::Result;
use lazyq_core::{JoinRow, JoinType};

use crate::join::Matcher;
use crate::source::SeqRef;
use crate::traits::{BoxCursor, Cursor, Slot};

/// One left element and the right positions it still has to pair with.
struct Probe<L> {
    left: L,
    pending: std::vec::IntoIter<usize>,
    matched: bool,
}

/// Hash join over a streamed left side and a buffered right side.
///
/// Rows for one left element come out in right-side order. RIGHT/OUTER joins
/// append the never-matched right elements after the left side is exhausted.
pub struct HashJoin<L, R, M> {
    left: BoxCursor<L>,
    right_source: SeqRef<R>,
    right: Option<Vec<R>>,
    matcher: M,
    join_type: JoinType,
    probe: Option<Probe<L>>,
    /// Right positions consumed by some left element (RIGHT/OUTER only).
    consumed: Vec<bool>,
    trailing: usize,
    slot: Slot<JoinRow<L, R>>,
}

impl<L, R, M> HashJoin<L, R, M>
where
    L: Clone,
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
            probe: None,
            consumed: Vec::new(),
            trailing: 0,
            slot: Slot::new(),
        }
    }

    fn load_right(&mut self) -> Result<()> {
        if self.right.is_none() {
            let right = self.right_source.materialize()?;
            #[cfg(feature = "tracing")]
            tracing::trace!(rows = right.len(), "join right side buffered");
            self.matcher.prepare(&right);
            if self.join_type.is_right() {
                self.consumed = vec![false; right.len()];
            }
            self.right = Some(right);
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<JoinRow<L, R>>> {
        self.load_right()?;
        let right: &[R] = self.right.as_deref().unwrap_or_default();
        loop {
            if let Some(mut probe) = self.probe.take() {
                if let Some(pos) = probe.pending.next() {
                    if let Some(flag) = self.consumed.get_mut(pos) {
                        *flag = true;
                    }
                    probe.matched = true;
                    let row = JoinRow::matched(probe.left.clone(), right[pos].clone());
                    self.probe = Some(probe);
                    return Ok(Some(row));
                }
                if self.join_type.is_left() && !probe.matched {
                    return Ok(Some(JoinRow::new(Some(probe.left), None)));
                }
                continue;
            }

            if self.left.has_next()? {
                let left = self.left.next()?;
                let pending = self.matcher.matches(&left, right).into_iter();
                self.probe = Some(Probe {
                    left,
                    pending,
                    matched: false,
                });
                continue;
            }

            if self.join_type.is_right() {
                while self.trailing < right.len() {
                    let pos = self.trailing;
                    self.trailing += 1;
                    if !self.consumed[pos] {
                        return Ok(Some(JoinRow::new(None, Some(right[pos].clone()))));
                    }
                }
            }
            return Ok(None);
        }
    }
}

impl<L, R, M> Cursor<JoinRow<L, R>> for HashJoin<L, R, M>
where
    L: Clone,
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

    fn next(&mut self) -> Result<JoinRow<L, R>> {
        self.has_next()?;
        self.slot.take_or("join")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::{KeyMatcher, PairMatcher};

    fn rows(join_type: JoinType) -> Vec<JoinRow<&'static str, (&'static str, i32)>> {
        let left = SeqRef::from(vec!["A", "B", "C"]).open().unwrap();
        let right = SeqRef::from(vec![("A", 1), ("D", 4), ("A", 2)]);
        let mut c = HashJoin::new(
            left,
            right,
            KeyMatcher::new(|l: &&'static str| *l, |r: &(&'static str, i32)| r.0),
            join_type,
        );
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            out.push(c.next().unwrap());
        }
        out
    }

    #[test]
    fn test_inner_join_keeps_right_order() {
        assert_eq!(
            rows(JoinType::Inner),
            vec![JoinRow::matched("A", ("A", 1)), JoinRow::matched("A", ("A", 2))]
        );
    }

    #[test]
    fn test_left_join_pads_unmatched_left() {
        let out = rows(JoinType::Left);
        assert_eq!(out.len(), 4);
        assert_eq!(out[2], JoinRow::new(Some("B"), None));
        assert_eq!(out[3], JoinRow::new(Some("C"), None));
    }

    #[test]
    fn test_right_and_outer_append_unmatched_right() {
        let right = rows(JoinType::Right);
        assert_eq!(right.len(), 3);
        assert_eq!(right[2], JoinRow::new(None, Some(("D", 4))));

        let outer = rows(JoinType::Outer);
        assert_eq!(outer.len(), 5);
        assert_eq!(outer[4], JoinRow::new(None, Some(("D", 4))));
    }

    #[test]
    fn test_pair_matcher() {
        let left = SeqRef::from(vec![1, 5]).open().unwrap();
        let right = SeqRef::from(vec![2, 3, 6]);
        let mut c = HashJoin::new(
            left,
            right,
            PairMatcher(|l: &i32, r: &i32| r > l),
            JoinType::Inner,
        );
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            let row = c.next().unwrap();
            out.push((row.left.unwrap(), row.right.unwrap()));
        }
        assert_eq!(out, vec![(1, 2), (1, 3), (1, 6), (5, 6)]);
    }
}
