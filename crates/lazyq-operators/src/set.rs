//! Set algebra cursors.
//!
//! `Distinct` drops elements equivalent to an earlier accepted one. `Membership`
//! keeps elements whose presence in a comparison sequence matches the wanted
//! polarity (present for intersect, absent for except). Equivalence is either a
//! hashable key or a pairwise matcher; the matcher form compares linearly
//! against everything accepted so far.

use std::collections::HashSet;
use std::hash::Hash;

use lazyq_core::error::Result;

use crate::source::SeqRef;
use crate::traits::{Cursor, Slot};

/// Remembers what has been accepted.
pub trait Seen<T> {
    /// Record `item` and report whether it was new.
    fn insert(&mut self, item: &T) -> bool;
}

pub struct SeenKeys<F, K> {
    key: F,
    keys: HashSet<K>,
}

impl<F, K> SeenKeys<F, K> {
    pub fn new(key: F) -> Self {
        Self {
            key,
            keys: HashSet::new(),
        }
    }
}

impl<T, F, K> Seen<T> for SeenKeys<F, K>
where
    F: FnMut(&T) -> K,
    K: Hash + Eq,
{
    fn insert(&mut self, item: &T) -> bool {
        self.keys.insert((self.key)(item))
    }
}

pub struct SeenMatches<T, F> {
    matcher: F,
    accepted: Vec<T>,
}

impl<T, F> SeenMatches<T, F> {
    pub fn new(matcher: F) -> Self {
        Self {
            matcher,
            accepted: Vec::new(),
        }
    }
}

impl<T, F> Seen<T> for SeenMatches<T, F>
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    fn insert(&mut self, item: &T) -> bool {
        let matcher = &mut self.matcher;
        if self.accepted.iter().any(|prev| matcher(item, prev)) {
            return false;
        }
        self.accepted.push(item.clone());
        true
    }
}

pub struct Distinct<T, C, S> {
    source: C,
    seen: S,
    slot: Slot<T>,
}

impl<T, C, S> Distinct<T, C, S>
where
    C: Cursor<T>,
    S: Seen<T>,
{
    pub fn new(source: C, seen: S) -> Self {
        Self {
            source,
            seen,
            slot: Slot::new(),
        }
    }
}

impl<T, C, S> Cursor<T> for Distinct<T, C, S>
where
    C: Cursor<T>,
    S: Seen<T>,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self { source, seen, slot } = self;
        slot.poll_with(|| {
            while source.has_next()? {
                let item = source.next()?;
                if seen.insert(&item) {
                    return Ok(Some(item));
                }
            }
            Ok(None)
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        self.slot.take_or("distinct")
    }
}

/// Answers "is this element in the comparison sequence".
pub trait Lookup<T> {
    fn contains(&mut self, item: &T) -> Result<bool>;
}

/// Key set of the comparison sequence, built on first lookup.
pub struct KeyLookup<U, F, G, K> {
    other: SeqRef<U>,
    key: F,
    other_key: G,
    keys: Option<HashSet<K>>,
}

impl<U, F, G, K> KeyLookup<U, F, G, K> {
    pub fn new(other: SeqRef<U>, key: F, other_key: G) -> Self {
        Self {
            other,
            key,
            other_key,
            keys: None,
        }
    }
}

impl<T, U, F, G, K> Lookup<T> for KeyLookup<U, F, G, K>
where
    F: FnMut(&T) -> K,
    G: FnMut(&U) -> K,
    K: Hash + Eq,
{
    fn contains(&mut self, item: &T) -> Result<bool> {
        let keys = match &mut self.keys {
            Some(keys) => keys,
            slot @ None => {
                let mut cursor = self.other.open()?;
                let mut keys = HashSet::with_capacity(self.other.len_hint().unwrap_or(0));
                while cursor.has_next()? {
                    keys.insert((self.other_key)(&cursor.next()?));
                }
                #[cfg(feature = "tracing")]
                tracing::trace!(keys = keys.len(), "membership key set built");
                slot.insert(keys)
            }
        };
        Ok(keys.contains(&(self.key)(item)))
    }
}

/// Comparison sequence buffered on first lookup and scanned with a matcher.
pub struct MatchLookup<U, F> {
    other: SeqRef<U>,
    matcher: F,
    items: Option<Vec<U>>,
}

impl<U, F> MatchLookup<U, F> {
    pub fn new(other: SeqRef<U>, matcher: F) -> Self {
        Self {
            other,
            matcher,
            items: None,
        }
    }
}

impl<T, U, F> Lookup<T> for MatchLookup<U, F>
where
    F: FnMut(&T, &U) -> bool,
{
    fn contains(&mut self, item: &T) -> Result<bool> {
        let items = match &mut self.items {
            Some(items) => items,
            slot @ None => slot.insert(self.other.materialize()?),
        };
        let matcher = &mut self.matcher;
        Ok(items.iter().any(|other| matcher(item, other)))
    }
}

pub struct Membership<T, C, L> {
    source: C,
    lookup: L,
    /// `true` keeps members, `false` keeps non-members.
    inclusive: bool,
    slot: Slot<T>,
}

impl<T, C, L> Membership<T, C, L>
where
    C: Cursor<T>,
    L: Lookup<T>,
{
    pub fn new(source: C, lookup: L, inclusive: bool) -> Self {
        Self {
            source,
            lookup,
            inclusive,
            slot: Slot::new(),
        }
    }
}

impl<T, C, L> Cursor<T> for Membership<T, C, L>
where
    C: Cursor<T>,
    L: Lookup<T>,
{
    fn has_next(&mut self) -> Result<bool> {
        let Self {
            source,
            lookup,
            inclusive,
            slot,
        } = self;
        slot.poll_with(|| {
            while source.has_next()? {
                let item = source.next()?;
                if lookup.contains(&item)? == *inclusive {
                    return Ok(Some(item));
                }
            }
            Ok(None)
        })
    }

    fn next(&mut self) -> Result<T> {
        self.has_next()?;
        self.slot.take_or("where-in")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_distinct_by_key_and_matcher_agree() {
        let by_key = Distinct::new(open(vec![1, 2, 2, 3, 1]), SeenKeys::new(|x: &i32| *x));
        let by_match = Distinct::new(
            open(vec![1, 2, 2, 3, 1]),
            SeenMatches::new(|a: &i32, b: &i32| a == b),
        );
        assert_eq!(drain(by_key), vec![1, 2, 3]);
        assert_eq!(drain(by_match), vec![1, 2, 3]);
    }

    #[test]
    fn test_membership_polarity() {
        let other = SeqRef::from(vec![20, 40]);
        let key = |x: &i32| *x / 10;
        let other_key = |x: &i32| *x / 10;

        let kept = Membership::new(
            open(vec![1, 20, 25, 40]),
            KeyLookup::new(other.clone(), key, other_key),
            true,
        );
        assert_eq!(drain(kept), vec![20, 25, 40]);

        let dropped = Membership::new(
            open(vec![1, 20, 25, 40]),
            MatchLookup::new(other, |a: &i32, b: &i32| a == b),
            false,
        );
        assert_eq!(drain(dropped), vec![1, 25]);
    }
}
