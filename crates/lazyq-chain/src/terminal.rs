//! Terminal operations: the only calls that open a chain and pull from it.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Write as _};
use std::hash::Hash;
use std::ops::ControlFlow;

use lazyq_core::error::{Error, Result};
use lazyq_operators::{Context, Cursor, SeqRef};

use crate::query::Query;

impl<T: Clone + 'static> Query<T> {
    /// Pull elements into `visit` until it breaks or the chain runs dry.
    fn scan<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(T) -> Result<ControlFlow<()>>,
    {
        let mut cursor = self.open()?;
        while cursor.has_next()? {
            if visit(cursor.next()?)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(self.size_estimate().unwrap_or(0));
        self.collect_into(&mut out)?;
        Ok(out)
    }

    pub fn to_boxed_slice(&self) -> Result<Box<[T]>> {
        Ok(self.to_vec()?.into_boxed_slice())
    }

    pub fn collect_into<E: Extend<T>>(&self, target: &mut E) -> Result<()> {
        self.scan(|item| {
            target.extend(std::iter::once(item));
            Ok(ControlFlow::Continue(()))
        })
    }

    /// Fails with `DuplicateKey` on the first element whose key was already produced.
    pub fn to_map<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<HashMap<K, V>>
    where
        K: Hash + Eq,
        FK: Fn(&T) -> K,
        FV: Fn(&T) -> V,
    {
        let mut map = HashMap::with_capacity(self.size_estimate().unwrap_or(0));
        let mut index = 0;
        self.scan(|item| {
            if map.insert(key(&item), value(&item)).is_some() {
                return Err(Error::DuplicateKey { index });
            }
            index += 1;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(map)
    }

    /// Elements bucketed by key; each bucket keeps source order.
    pub fn to_group_map<K, F>(&self, key: F) -> Result<HashMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: Fn(&T) -> K,
    {
        let mut groups: HashMap<K, Vec<T>> = HashMap::new();
        self.scan(|item| {
            groups.entry(key(&item)).or_default().push(item);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(groups)
    }

    pub fn first_where_or_none<F>(&self, predicate: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut found = None;
        self.scan(|item| {
            if predicate(&item) {
                found = Some(item);
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    pub fn first_where<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        self.first_where_or_none(predicate)?
            .ok_or_else(|| Error::no_such_element("no element matched"))
    }

    pub fn first_where_or<F>(&self, predicate: F, fallback: T) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.first_where_or_none(predicate)?.unwrap_or(fallback))
    }

    pub fn first_or_none(&self) -> Result<Option<T>> {
        self.first_where_or_none(|_| true)
    }

    pub fn first(&self) -> Result<T> {
        self.first_or_none()?
            .ok_or_else(|| Error::no_such_element("sequence is empty"))
    }

    pub fn first_or(&self, fallback: T) -> Result<T> {
        Ok(self.first_or_none()?.unwrap_or(fallback))
    }

    pub fn last_where_or_none<F>(&self, predicate: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut found = None;
        self.scan(|item| {
            if predicate(&item) {
                found = Some(item);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    pub fn last_where<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        self.last_where_or_none(predicate)?
            .ok_or_else(|| Error::no_such_element("no element matched"))
    }

    pub fn last_where_or<F>(&self, predicate: F, fallback: T) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.last_where_or_none(predicate)?.unwrap_or(fallback))
    }

    pub fn last_or_none(&self) -> Result<Option<T>> {
        self.last_where_or_none(|_| true)
    }

    pub fn last(&self) -> Result<T> {
        self.last_or_none()?
            .ok_or_else(|| Error::no_such_element("sequence is empty"))
    }

    pub fn last_or(&self, fallback: T) -> Result<T> {
        Ok(self.last_or_none()?.unwrap_or(fallback))
    }

    /// The only element `predicate` accepts, `None` when there is none.
    ///
    /// More than one match is a `NonUniqueResult` carrying the full match
    /// count, so the whole chain is drained in that case.
    pub fn single_where_or_none<F>(&self, predicate: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut found = None;
        let mut count = 0;
        self.scan(|item| {
            if predicate(&item) {
                count += 1;
                if found.is_none() {
                    found = Some(item);
                }
            }
            Ok(ControlFlow::Continue(()))
        })?;
        if count > 1 {
            return Err(Error::NonUniqueResult { count });
        }
        Ok(found)
    }

    /// Unlike the `_or` forms, zero matches is an error here.
    pub fn single_where<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        self.single_where_or_none(predicate)?
            .ok_or_else(|| Error::no_such_element("no element matched"))
    }

    pub fn single_where_or<F>(&self, predicate: F, fallback: T) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.single_where_or_none(predicate)?.unwrap_or(fallback))
    }

    pub fn single_or_none(&self) -> Result<Option<T>> {
        self.single_where_or_none(|_| true)
    }

    pub fn single(&self) -> Result<T> {
        self.single_or_none()?
            .ok_or_else(|| Error::no_such_element("sequence is empty"))
    }

    pub fn single_or(&self, fallback: T) -> Result<T> {
        Ok(self.single_or_none()?.unwrap_or(fallback))
    }

    pub fn element_at_or_none(&self, index: usize) -> Result<Option<T>> {
        let mut position = 0;
        let mut found = None;
        self.scan(|item| {
            if position == index {
                found = Some(item);
                return Ok(ControlFlow::Break(()));
            }
            position += 1;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    pub fn element_at(&self, index: usize) -> Result<T> {
        self.element_at_or_none(index)?
            .ok_or_else(|| Error::no_such_element(format!("no element at index {index}")))
    }

    pub fn element_at_or(&self, index: usize, fallback: T) -> Result<T> {
        Ok(self.element_at_or_none(index)?.unwrap_or(fallback))
    }

    pub fn any(&self) -> Result<bool> {
        self.open()?.has_next()
    }

    pub fn any_where<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.first_where_or_none(predicate)?.is_some())
    }

    pub fn all<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(!self.any_where(|item| !predicate(item))?)
    }

    pub fn none(&self) -> Result<bool> {
        Ok(!self.any()?)
    }

    pub fn none_where<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(!self.any_where(predicate)?)
    }

    /// Uses the size estimate when there is one; otherwise drains the chain.
    pub fn count(&self) -> Result<usize> {
        if let Some(size) = self.size_estimate() {
            return Ok(size);
        }
        self.count_where(|_| true)
    }

    pub fn count_where<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&T) -> bool,
    {
        let mut count = 0;
        self.scan(|item| {
            if predicate(&item) {
                count += 1;
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(count)
    }

    /// Left fold from `seed`.
    pub fn aggregate<A, F>(&self, seed: A, mut fold: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        let mut cursor = self.open()?;
        let mut acc = seed;
        while cursor.has_next()? {
            acc = fold(acc, cursor.next()?);
        }
        Ok(acc)
    }

    pub fn aggregate_by_index<A, F>(&self, seed: A, mut fold: F) -> Result<A>
    where
        F: FnMut(A, T, usize) -> A,
    {
        let mut index = 0;
        self.aggregate(seed, |acc, item| {
            let acc = fold(acc, item, index);
            index += 1;
            acc
        })
    }

    pub fn aggregate_by_context<A, F>(&self, seed: A, mut fold: F) -> Result<A>
    where
        F: FnMut(A, T, &mut Context<T>) -> Result<A>,
    {
        let mut ctx = Context::new(self.open()?);
        let mut acc = seed;
        while ctx.has_next()? {
            let item = ctx.next()?;
            acc = fold(acc, item, &mut ctx)?;
        }
        Ok(acc)
    }

    pub fn for_each<F>(&self, mut action: F) -> Result<()>
    where
        F: FnMut(T),
    {
        self.scan(|item| {
            action(item);
            Ok(ControlFlow::Continue(()))
        })
    }

    pub fn for_each_by_index<F>(&self, mut action: F) -> Result<()>
    where
        F: FnMut(T, usize),
    {
        let mut index = 0;
        self.for_each(|item| {
            action(item, index);
            index += 1;
        })
    }

    pub fn for_each_by_context<F>(&self, mut action: F) -> Result<()>
    where
        F: FnMut(T, &mut Context<T>) -> Result<()>,
    {
        self.aggregate_by_context((), |(), item, ctx| action(item, ctx))
    }

    /// Pairwise comparison by position; `matcher` also receives the position.
    pub fn sequence_equal_by_index<F>(&self, other: impl Into<SeqRef<T>>, matcher: F) -> Result<bool>
    where
        F: Fn(&T, &T, usize) -> bool,
    {
        let other = other.into();
        if let (Some(a), Some(b)) = (self.size_estimate(), other.len_hint()) {
            if a != b {
                return Ok(false);
            }
        }
        let (mut left, mut right) = (self.open()?, other.open()?);
        let mut index = 0;
        loop {
            match (left.has_next()?, right.has_next()?) {
                (false, false) => return Ok(true),
                (true, true) => {
                    if !matcher(&left.next()?, &right.next()?, index) {
                        return Ok(false);
                    }
                    index += 1;
                }
                _ => return Ok(false),
            }
        }
    }

    pub fn sequence_equal_by<F>(&self, other: impl Into<SeqRef<T>>, matcher: F) -> Result<bool>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.sequence_equal_by_index(other, |a, b, _| matcher(a, b))
    }
}

impl<T: Clone + Default + 'static> Query<T> {
    pub fn first_or_default(&self) -> Result<T> {
        Ok(self.first_or_none()?.unwrap_or_default())
    }

    pub fn first_where_or_default<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.first_where_or_none(predicate)?.unwrap_or_default())
    }

    pub fn last_or_default(&self) -> Result<T> {
        Ok(self.last_or_none()?.unwrap_or_default())
    }

    pub fn last_where_or_default<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.last_where_or_none(predicate)?.unwrap_or_default())
    }

    pub fn single_or_default(&self) -> Result<T> {
        Ok(self.single_or_none()?.unwrap_or_default())
    }

    pub fn single_where_or_default<F>(&self, predicate: F) -> Result<T>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.single_where_or_none(predicate)?.unwrap_or_default())
    }

    pub fn element_at_or_default(&self, index: usize) -> Result<T> {
        Ok(self.element_at_or_none(index)?.unwrap_or_default())
    }
}

impl<T: Clone + PartialEq + 'static> Query<T> {
    pub fn contains(&self, value: &T) -> Result<bool> {
        self.any_where(|item| item == value)
    }

    /// Every element equals `value`; vacuously true when empty.
    pub fn all_eq(&self, value: &T) -> Result<bool> {
        self.all(|item| item == value)
    }

    pub fn none_eq(&self, value: &T) -> Result<bool> {
        Ok(!self.contains(value)?)
    }

    pub fn sequence_equal(&self, other: impl Into<SeqRef<T>>) -> Result<bool> {
        self.sequence_equal_by(other, |a, b| a == b)
    }
}

impl<T: Clone + Hash + Eq + 'static> Query<T> {
    pub fn to_set(&self) -> Result<HashSet<T>> {
        let mut set = HashSet::with_capacity(self.size_estimate().unwrap_or(0));
        self.collect_into(&mut set)?;
        Ok(set)
    }
}

impl<T: Clone + Display + 'static> Query<T> {
    pub fn join_to_string(&self, separator: &str) -> Result<String> {
        let mut out = String::new();
        let mut first = true;
        self.scan(|item| {
            if !first {
                out.push_str(separator);
            }
            first = false;
            // Writing into a String cannot fail.
            let _ = write!(out, "{item}");
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(items: Vec<i32>) -> Query<i32> {
        Query::from(items)
    }

    #[test]
    fn test_single_family_asymmetry() {
        assert!(matches!(q(vec![]).single(), Err(Error::NoSuchElement(_))));
        assert_eq!(q(vec![]).single_or(7).unwrap(), 7);
        assert_eq!(q(vec![]).single_or_none().unwrap(), None);
        assert_eq!(q(vec![4]).single_or(7).unwrap(), 4);
        assert_eq!(
            q(vec![1, 2, 3]).single_or(7),
            Err(Error::NonUniqueResult { count: 3 })
        );
        assert_eq!(
            q(vec![1, 2, 3, 4]).single_where(|x| x % 2 == 0),
            Err(Error::NonUniqueResult { count: 2 })
        );
    }

    #[test]
    fn test_first_last_element_at() {
        let items = q(vec![5, 6, 7]);
        assert_eq!(items.first().unwrap(), 5);
        assert_eq!(items.last().unwrap(), 7);
        assert_eq!(items.element_at(1).unwrap(), 6);
        assert_eq!(items.element_at_or(9, -1).unwrap(), -1);
        assert_eq!(items.first_where(|x| *x > 5).unwrap(), 6);
        assert_eq!(items.last_where_or_default(|x| *x > 10).unwrap(), 0);
        assert!(matches!(q(vec![]).first(), Err(Error::NoSuchElement(_))));
    }

    #[test]
    fn test_to_map_reports_duplicate_position() {
        let err = q(vec![1, 2, 11]).to_map(|x| x % 10, |x| *x).unwrap_err();
        assert_eq!(err, Error::DuplicateKey { index: 2 });
    }

    #[test]
    fn test_count_prefers_estimate() {
        let items = q(vec![1, 2, 3]);
        assert_eq!(items.count().unwrap(), 3);
        assert_eq!(items.filter(|x| *x > 1).count().unwrap(), 2);
    }

    #[test]
    fn test_sequence_equal_lengths() {
        assert!(q(vec![1, 2]).sequence_equal(vec![1, 2]).unwrap());
        assert!(!q(vec![1, 2]).sequence_equal(vec![1, 2, 3]).unwrap());
        assert!(!q(vec![1, 2]).filter(|_| true).sequence_equal(vec![1]).unwrap());
    }

    #[test]
    fn test_join_to_string() {
        assert_eq!(q(vec![1, 2, 3]).join_to_string(", ").unwrap(), "1, 2, 3");
        assert_eq!(q(vec![]).join_to_string(", ").unwrap(), "");
    }
}
