//! Lazily evaluated cardinality prediction.
//!
//! A `SizeEstimator` answers "how many elements will this stage produce" without
//! pulling anything. Each operator derives its estimator from its parent's at
//! construction time; the arithmetic only runs when somebody asks. `None` means
//! the count cannot be known without iterating.

use std::fmt;
use std::rc::Rc;

use crate::join::JoinType;

type EstimateFn = Rc<dyn Fn() -> Option<usize>>;

#[derive(Clone, Default)]
pub struct SizeEstimator {
    f: Option<EstimateFn>,
}

impl SizeEstimator {
    /// Count cannot be predicted.
    pub fn unknown() -> Self {
        Self { f: None }
    }

    pub fn exact(n: usize) -> Self {
        Self::from_fn(move || Some(n))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Option<usize> + 'static,
    {
        Self { f: Some(Rc::new(f)) }
    }

    /// Evaluate the prediction now.
    pub fn estimate(&self) -> Option<usize> {
        self.f.as_ref().and_then(|f| f())
    }

    /// Derive a new estimator from this one; stays unknown when this one is.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(usize) -> usize + 'static,
    {
        match &self.f {
            None => Self::unknown(),
            Some(parent) => {
                let parent = Rc::clone(parent);
                Self::from_fn(move || parent().map(&f))
            }
        }
    }

    fn map2<F>(&self, other: &SizeEstimator, f: F) -> Self
    where
        F: Fn(usize, usize) -> usize + 'static,
    {
        match (&self.f, &other.f) {
            (Some(a), Some(b)) => {
                let (a, b) = (Rc::clone(a), Rc::clone(b));
                Self::from_fn(move || Some(f(a()?, b()?)))
            }
            _ => Self::unknown(),
        }
    }

    /// Elements left after dropping the first `n`.
    pub fn skip(&self, n: usize) -> Self {
        self.map(move |size| size.saturating_sub(n))
    }

    /// At most `n` leading elements.
    pub fn take(&self, n: usize) -> Self {
        self.map(move |size| size.min(n))
    }

    /// Elements left after dropping positions `start..=end`.
    pub fn exclude(&self, start: usize, end: usize) -> Self {
        self.map(move |size| {
            let prefix = start.min(size);
            let length = end.saturating_sub(start).saturating_add(1);
            let suffix = size.saturating_sub(prefix.saturating_add(length));
            prefix + suffix
        })
    }

    /// Concatenation of two stages.
    pub fn plus(&self, other: &SizeEstimator) -> Self {
        self.map2(other, |a, b| a.saturating_add(b))
    }

    /// Positional zip of this (left) stage with `right`.
    pub fn zip(&self, join_type: JoinType, right: &SizeEstimator) -> Self {
        match join_type {
            JoinType::Left => self.clone(),
            JoinType::Right => right.clone(),
            JoinType::Inner => self.map2(right, usize::min),
            JoinType::Outer => self.map2(right, usize::max),
        }
    }

    /// Group join emits one row per left element only for LEFT.
    pub fn group_join(&self, join_type: JoinType) -> Self {
        match join_type {
            JoinType::Left => self.clone(),
            _ => Self::unknown(),
        }
    }
}

impl fmt::Debug for SizeEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.f {
            None => f.write_str("SizeEstimator(unknown)"),
            Some(_) => f.write_str("SizeEstimator(deferred)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_partition_arithmetic() {
        let five = SizeEstimator::exact(5);
        assert_eq!(five.skip(2).estimate(), Some(3));
        assert_eq!(five.skip(9).estimate(), Some(0));
        assert_eq!(five.take(2).estimate(), Some(2));
        assert_eq!(five.take(0).estimate(), Some(0));
        assert_eq!(five.take(9).estimate(), Some(5));
        assert_eq!(five.skip(1).take(1).estimate(), Some(1));
    }

    #[test]
    fn test_exclude_arithmetic() {
        let five = SizeEstimator::exact(5);
        assert_eq!(five.exclude(1, 2).estimate(), Some(3));
        assert_eq!(five.exclude(3, 10).estimate(), Some(3));
        assert_eq!(five.exclude(7, 9).estimate(), Some(5));
        assert_eq!(five.exclude(0, 4).estimate(), Some(0));
    }

    #[test]
    fn test_unknown_propagates() {
        let unknown = SizeEstimator::unknown();
        let three = SizeEstimator::exact(3);
        assert_eq!(unknown.skip(1).estimate(), None);
        assert_eq!(three.plus(&unknown).estimate(), None);
        assert_eq!(three.plus(&SizeEstimator::exact(4)).estimate(), Some(7));
        assert_eq!(three.group_join(JoinType::Outer).estimate(), None);
        assert_eq!(three.group_join(JoinType::Left).estimate(), Some(3));
    }

    #[test]
    fn test_zip_rules() {
        let two = SizeEstimator::exact(2);
        let three = SizeEstimator::exact(3);
        let unknown = SizeEstimator::unknown();
        assert_eq!(two.zip(JoinType::Inner, &three).estimate(), Some(2));
        assert_eq!(two.zip(JoinType::Outer, &three).estimate(), Some(3));
        assert_eq!(two.zip(JoinType::Left, &unknown).estimate(), Some(2));
        assert_eq!(unknown.zip(JoinType::Right, &three).estimate(), Some(3));
        assert_eq!(two.zip(JoinType::Inner, &unknown).estimate(), None);
    }

    #[test]
    fn test_estimate_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let root = SizeEstimator::from_fn(move || {
            counter.set(counter.get() + 1);
            Some(10)
        });
        let derived = root.skip(2).take(5);
        assert_eq!(calls.get(), 0);
        assert_eq!(derived.estimate(), Some(5));
        assert_eq!(calls.get(), 1);
    }
}
