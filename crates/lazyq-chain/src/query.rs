//! `Query`: one immutable node of a deferred chain.
//!
//! A node is three shared handles: the pipeline that opens a fresh cursor
//! stack, the size estimator, and the chain's root cell. Operators never pull
//! anything; they wrap the parent pipeline in one more cursor and return a new
//! node. Terminals (see `terminal.rs`, `numeric.rs`) open the pipeline and pull.

use std::any::type_name;
use std::fmt;
use std::rc::Rc;

use lazyq_core::error::{Error, Result};
use lazyq_core::{QueryConfig, SizeEstimator};
use lazyq_operators::generate::{GenerateSeq, Limit, RangeSeq};
use lazyq_operators::{BoxCursor, Cursor, SeqRef, Sequence};

use crate::rebind::{Rebind, RootSlot};

type Pipeline<T> = Rc<dyn Fn() -> Result<BoxCursor<T>>>;

pub struct Query<T> {
    pipeline: Pipeline<T>,
    size: SizeEstimator,
    root: Rc<dyn Rebind>,
    config: Rc<QueryConfig>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Rc::clone(&self.pipeline),
            size: self.size.clone(),
            root: Rc::clone(&self.root),
            config: Rc::clone(&self.config),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("element", &type_name::<T>())
            .field("root", &self.root.element_type())
            .field("size", &self.size.estimate())
            .finish()
    }
}

/// Box a concrete cursor for a pipeline stage.
pub(crate) fn boxed<S, C>(cursor: C) -> Result<BoxCursor<S>>
where
    C: Cursor<S> + 'static,
{
    Ok(Box::new(cursor))
}

impl<T: Clone + 'static> Query<T> {
    fn root(initial: Option<SeqRef<T>>) -> Self {
        let slot = Rc::new(RootSlot::new(initial));
        let opener = Rc::clone(&slot);
        let sizer = Rc::clone(&slot);
        Self {
            pipeline: Rc::new(move || match opener.current() {
                Some(seq) => seq.open(),
                None => Err(Error::UnboundSource),
            }),
            size: SizeEstimator::from_fn(move || sizer.current().and_then(|seq| seq.len_hint())),
            root: slot,
            config: Rc::new(QueryConfig::default()),
        }
    }

    /// A chain with no source yet. Iterating it fails with `UnboundSource`
    /// until `rebind` supplies one.
    pub fn unbound() -> Self {
        Self::root(None)
    }

    /// Root a chain on a concrete sequence or another query.
    pub fn from_seq(source: impl Into<SeqRef<T>>) -> Self {
        Self::root(Some(source.into()))
    }

    /// Root a chain on whatever `factory` yields each time the chain is iterated.
    pub fn from_fn<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::root(Some(SeqRef::from_fn(factory)))
    }

    pub fn empty() -> Self {
        Self::from_seq(Vec::new())
    }

    pub fn repeat(count: usize, value: T) -> Self {
        Self::generate_by_index(count, value, |prev, _| prev.clone())
    }

    /// `count` values: `seed`, `step(seed)`, `step(step(seed))`, ...
    pub fn generate<F>(count: usize, seed: T, step: F) -> Self
    where
        F: Fn(&T) -> T + 'static,
    {
        Self::generate_by_index(count, seed, move |prev, _| step(prev))
    }

    /// Like `generate`, `step` also receives the index of the value it produces.
    pub fn generate_by_index<F>(count: usize, seed: T, step: F) -> Self
    where
        F: Fn(&T, usize) -> T + 'static,
    {
        Self::from_seq(SeqRef::new(GenerateSeq::new(seed, step, Limit::Count(count))))
    }

    /// `seed`, `step(seed)`, ... up to but excluding the first value `done` accepts.
    pub fn generate_until<F, D>(seed: T, step: F, done: D) -> Self
    where
        F: Fn(&T) -> T + 'static,
        D: Fn(&T) -> bool + 'static,
    {
        Self::generate_until_by_index(seed, move |prev, _| step(prev), done)
    }

    pub fn generate_until_by_index<F, D>(seed: T, step: F, done: D) -> Self
    where
        F: Fn(&T, usize) -> T + 'static,
        D: Fn(&T) -> bool + 'static,
    {
        let limit = Limit::Until(Rc::new(done));
        Self::from_seq(SeqRef::new(GenerateSeq::new(seed, step, limit)))
    }

    /// New node downstream of this one. `build` wraps the parent's cursor each
    /// time the new node is opened.
    pub(crate) fn derive<S, F>(&self, size: SizeEstimator, build: F) -> Query<S>
    where
        F: Fn(BoxCursor<T>) -> Result<BoxCursor<S>> + 'static,
    {
        let upstream = Rc::clone(&self.pipeline);
        Query {
            pipeline: Rc::new(move || build(upstream()?)),
            size,
            root: Rc::clone(&self.root),
            config: Rc::clone(&self.config),
        }
    }

    pub(crate) fn estimator(&self) -> &SizeEstimator {
        &self.size
    }

    /// Open a fresh cursor stack over the chain.
    pub fn open(&self) -> Result<BoxCursor<T>> {
        (self.pipeline)()
    }

    pub fn iter(&self) -> QueryIter<T> {
        QueryIter {
            pipeline: Rc::clone(&self.pipeline),
            cursor: None,
            done: false,
        }
    }

    /// Predicted element count, `None` when it cannot be known without iterating.
    pub fn size_estimate(&self) -> Option<usize> {
        self.size.estimate()
    }

    /// Swap the sequence the chain's root reads from. Every node derived from
    /// the same root sees the new sequence on its next iteration.
    ///
    /// Fails with `TypeMismatch` when `R` is not the root's element type.
    pub fn rebind<R: 'static>(&self, source: impl Into<SeqRef<R>>) -> Result<()> {
        self.root.rebind(Box::new(source.into()), type_name::<R>())
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Same chain, read under `config` from this node on.
    pub fn with_config(&self, config: QueryConfig) -> Query<T> {
        Query {
            pipeline: Rc::clone(&self.pipeline),
            size: self.size.clone(),
            root: Rc::clone(&self.root),
            config: Rc::new(config),
        }
    }

    /// `f(self)` when `condition` holds, otherwise this chain unchanged.
    pub fn when<F>(&self, condition: bool, f: F) -> Query<T>
    where
        F: FnOnce(&Query<T>) -> Query<T>,
    {
        if condition {
            f(self)
        } else {
            self.clone()
        }
    }
}

impl Query<i64> {
    /// `length` consecutive integers from `start`; negative lengths count down.
    pub fn range(start: i64, length: i64) -> Result<Self> {
        Ok(Self::from_seq(SeqRef::new(RangeSeq::with_length(start, length)?)))
    }

    /// Every integer from `start` to `end` inclusive, counting down when `start > end`.
    pub fn range_between(start: i64, end: i64) -> Self {
        Self::from_seq(SeqRef::new(RangeSeq::between(start, end)))
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Query<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_seq(items)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Query<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_seq(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Clone + 'static> Sequence<T> for Query<T> {
    fn open(&self) -> Result<BoxCursor<T>> {
        Query::open(self)
    }

    fn len_hint(&self) -> Option<usize> {
        self.size_estimate()
    }
}

impl<T: Clone + 'static> From<Query<T>> for SeqRef<T> {
    fn from(query: Query<T>) -> Self {
        SeqRef::new(query)
    }
}

impl<T: Clone + 'static> From<&Query<T>> for SeqRef<T> {
    fn from(query: &Query<T>) -> Self {
        SeqRef::new(query.clone())
    }
}

/// `Iterator` over a chain. The cursor stack is opened on the first `next`,
/// so an unbound root surfaces as the first item. Fused after an error.
pub struct QueryIter<T> {
    pipeline: Pipeline<T>,
    cursor: Option<BoxCursor<T>>,
    done: bool,
}

impl<T> QueryIter<T> {
    fn step(&mut self) -> Result<Option<T>> {
        let cursor = match &mut self.cursor {
            Some(cursor) => cursor,
            slot @ None => slot.insert((self.pipeline)()?),
        };
        if cursor.has_next()? {
            cursor.next().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<T> Iterator for QueryIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T> std::iter::FusedIterator for QueryIter<T> {}

impl<'a, T: Clone + 'static> IntoIterator for &'a Query<T> {
    type Item = Result<T>;
    type IntoIter = QueryIter<T>;

    fn into_iter(self) -> QueryIter<T> {
        self.iter()
    }
}
