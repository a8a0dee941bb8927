use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Where absent keys go, regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullPlacement {
    First,
    Last,
}

/// Outcome of comparing the keys of two elements.
enum KeyOrder {
    Values(Ordering),
    LeftNull,
    RightNull,
    BothNull,
}

/// Mixed or incomparable keys (NaN) are treated as equal.
fn classify<K: PartialOrd>(a: Option<&K>, b: Option<&K>) -> KeyOrder {
    match (a, b) {
        (Some(a), Some(b)) => KeyOrder::Values(a.partial_cmp(b).unwrap_or(Ordering::Equal)),
        (None, Some(_)) => KeyOrder::LeftNull,
        (Some(_), None) => KeyOrder::RightNull,
        (None, None) => KeyOrder::BothNull,
    }
}

type KeyCompare<T> = Rc<dyn Fn(&T, &T) -> KeyOrder>;

pub type Comparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// One sort key: how to compare, which direction, where absent keys go.
///
/// Build with `key`, `nullable_key`, `comparator` or `natural`, then adjust
/// with `descending()` / `nulls_first()` / `nulls_last()`. Without an explicit
/// placement, absent keys go last when ascending and first when descending.
pub struct OrderBy<T> {
    keys: KeyCompare<T>,
    descending: bool,
    nulls: Option<NullPlacement>,
}

impl<T> Clone for OrderBy<T> {
    fn clone(&self) -> Self {
        Self {
            keys: Rc::clone(&self.keys),
            descending: self.descending,
            nulls: self.nulls,
        }
    }
}

impl<T> fmt::Debug for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("descending", &self.descending)
            .field("nulls", &self.null_placement())
            .finish()
    }
}

impl<T: 'static> OrderBy<T> {
    fn from_keys(keys: KeyCompare<T>) -> Self {
        Self {
            keys,
            descending: false,
            nulls: None,
        }
    }

    pub fn key<K, F>(key: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K + 'static,
    {
        Self::from_keys(Rc::new(move |a: &T, b: &T| {
            classify(Some(&key(a)), Some(&key(b)))
        }))
    }

    /// Key that may be absent; see `NullPlacement`.
    pub fn nullable_key<K, F>(key: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> Option<K> + 'static,
    {
        Self::from_keys(Rc::new(move |a: &T, b: &T| {
            classify(key(a).as_ref(), key(b).as_ref())
        }))
    }

    pub fn comparator<F>(cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        Self::from_keys(Rc::new(move |a: &T, b: &T| KeyOrder::Values(cmp(a, b))))
    }

    /// Every pair compares equal; a stable sort keeps upstream order.
    pub fn unordered() -> Self {
        Self::comparator(|_, _| Ordering::Equal)
    }

    pub fn ascending(mut self) -> Self {
        self.descending = false;
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullPlacement::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullPlacement::Last);
        self
    }
}

impl<T: PartialOrd + 'static> OrderBy<T> {
    /// The element's own `PartialOrd`.
    pub fn natural() -> Self {
        Self::from_keys(Rc::new(|a: &T, b: &T| classify(Some(a), Some(b))))
    }
}

impl<U: PartialOrd + 'static> OrderBy<Option<U>> {
    /// `PartialOrd` of the inner value, with `None` placed per `NullPlacement`.
    pub fn natural_nullable() -> Self {
        Self::from_keys(Rc::new(|a: &Option<U>, b: &Option<U>| {
            classify(a.as_ref(), b.as_ref())
        }))
    }
}

impl<T> OrderBy<T> {
    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn null_placement(&self) -> NullPlacement {
        match (self.nulls, self.descending) {
            (Some(placement), _) => placement,
            (None, false) => NullPlacement::Last,
            (None, true) => NullPlacement::First,
        }
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let nulls_first = self.null_placement() == NullPlacement::First;
        match (self.keys)(a, b) {
            KeyOrder::Values(ord) if self.descending => ord.reverse(),
            KeyOrder::Values(ord) => ord,
            KeyOrder::BothNull => Ordering::Equal,
            KeyOrder::LeftNull if nulls_first => Ordering::Less,
            KeyOrder::LeftNull => Ordering::Greater,
            KeyOrder::RightNull if nulls_first => Ordering::Greater,
            KeyOrder::RightNull => Ordering::Less,
        }
    }
}

/// Fold descriptors from last to first so the first one is the primary key.
pub fn compose<T: 'static>(orderings: &[OrderBy<T>]) -> Comparator<T> {
    let tie: Comparator<T> = Rc::new(|_: &T, _: &T| Ordering::Equal);
    orderings.iter().rev().fold(tie, |next, ordering| {
        let ordering = ordering.clone();
        let cmp: Comparator<T> =
            Rc::new(move |a: &T, b: &T| ordering.compare(a, b).then_with(|| next(a, b)));
        cmp
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted<T: Clone + 'static>(items: &[T], orderings: &[OrderBy<T>]) -> Vec<T> {
        let cmp = compose(orderings);
        let mut out = items.to_vec();
        out.sort_by(|a, b| cmp(a, b));
        out
    }

    #[test]
    fn test_null_placement_defaults_follow_direction() {
        let items = [Some(2), None, Some(1)];
        let asc = OrderBy::natural_nullable();
        assert_eq!(sorted(&items, &[asc.clone()]), vec![Some(1), Some(2), None]);
        assert_eq!(
            sorted(&items, &[asc.nulls_first()]),
            vec![None, Some(1), Some(2)]
        );

        let desc = OrderBy::natural_nullable().descending();
        assert_eq!(sorted(&items, &[desc.clone()]), vec![None, Some(2), Some(1)]);
        assert_eq!(
            sorted(&items, &[desc.nulls_last()]),
            vec![Some(2), Some(1), None]
        );
    }

    #[test]
    fn test_first_descriptor_is_primary() {
        let items = [(1, 'b'), (0, 'b'), (1, 'a'), (0, 'a')];
        let by_letter = OrderBy::key(|p: &(i32, char)| p.1);
        let by_number_desc = OrderBy::key(|p: &(i32, char)| p.0).descending();
        assert_eq!(
            sorted(&items, &[by_letter, by_number_desc]),
            vec![(1, 'a'), (0, 'a'), (1, 'b'), (0, 'b')]
        );
    }

    #[test]
    fn test_unordered_is_stable_noop() {
        let items = [3, 1, 2];
        assert_eq!(sorted(&items, &[OrderBy::unordered()]), vec![3, 1, 2]);
    }

    #[test]
    fn test_nan_keys_compare_equal() {
        let items = [2.0, f64::NAN, 1.0];
        let out = sorted(&items, &[OrderBy::natural()]);
        assert_eq!(out.len(), 3);
    }
}
