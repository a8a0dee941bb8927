//! Group-by: buckets the whole upstream on first demand, then yields one
//! `Grouping` per key in first-seen key order.

use std::collections::HashMap;
use std::hash::Hash;

use lazyq_core::error::Result;
use lazyq_core::Grouping;

use crate::traits::{exhausted, BoxCursor, Cursor};

pub struct GroupBy<T, K, V, FK, FV> {
    source: BoxCursor<T>,
    key: FK,
    value: FV,
    groups: Option<std::vec::IntoIter<Grouping<K, V>>>,
}

impl<T, K, V, FK, FV> GroupBy<T, K, V, FK, FV>
where
    K: Hash + Eq + Clone,
    FK: FnMut(&T) -> K,
    FV: FnMut(T) -> V,
{
    pub fn new(source: BoxCursor<T>, key: FK, value: FV) -> Self {
        Self {
            source,
            key,
            value,
            groups: None,
        }
    }

    fn groups(&mut self) -> Result<&mut std::vec::IntoIter<Grouping<K, V>>> {
        if self.groups.is_none() {
            let groups = bucket(&mut self.source, &mut self.key, &mut self.value)?;
            #[cfg(feature = "tracing")]
            tracing::trace!(groups = groups.len(), "group-by buckets built");
            self.groups = Some(groups.into_iter());
        }
        Ok(self.groups.get_or_insert_with(|| Vec::new().into_iter()))
    }
}

/// Bucket every element of `source`, keeping first-seen key order.
pub fn bucket<T, K, V, C, FK, FV>(
    source: &mut C,
    key: &mut FK,
    value: &mut FV,
) -> Result<Vec<Grouping<K, V>>>
where
    C: Cursor<T> + ?Sized,
    K: Hash + Eq + Clone,
    FK: FnMut(&T) -> K,
    FV: FnMut(T) -> V,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Grouping<K, V>> = Vec::new();
    while source.has_next()? {
        let item = source.next()?;
        let k = key(&item);
        let v = value(item);
        match positions.get(&k) {
            Some(&pos) => groups[pos].values.push(v),
            None => {
                positions.insert(k.clone(), groups.len());
                groups.push(Grouping::new(k, vec![v]));
            }
        }
    }
    Ok(groups)
}

impl<T, K, V, FK, FV> Cursor<Grouping<K, V>> for GroupBy<T, K, V, FK, FV>
where
    K: Hash + Eq + Clone,
    FK: FnMut(&T) -> K,
    FV: FnMut(T) -> V,
{
    fn has_next(&mut self) -> Result<bool> {
        Ok(!self.groups()?.as_slice().is_empty())
    }

    fn next(&mut self) -> Result<Grouping<K, V>> {
        self.groups()?.next().ok_or_else(|| exhausted("group-by"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SeqRef;

    #[test]
    fn test_groups_in_first_seen_order() {
        let source = SeqRef::from(vec!["apple", "bean", "avocado", "beet", "cherry"])
            .open()
            .unwrap();
        let mut c = GroupBy::new(source, |s: &&str| s.as_bytes()[0], |s: &str| s.len());
        let mut out = Vec::new();
        while c.has_next().unwrap() {
            out.push(c.next().unwrap());
        }
        assert_eq!(
            out,
            vec![
                Grouping::new(b'a', vec![5, 7]),
                Grouping::new(b'b', vec![4, 4]),
                Grouping::new(b'c', vec![6]),
            ]
        );
    }
}
