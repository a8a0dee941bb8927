//! Per-element callbacks in their three flavours.
//!
//! Filtering and partitioning cursors take a `Test`, projecting cursors take a
//! `Transform`. The caller's closure is wrapped in one of:
//! - `ByValue`: sees the element only.
//! - `ByIndex`: also sees a 0-based counter owned by the cursor.
//! - `ByContext`: also sees the upstream `Context`, for first/last/peek queries.

use std::any::type_name;
use std::marker::PhantomData;

use lazyq_core::error::{Error, Result};

use crate::context::Context;

pub trait Test<T, C: ?Sized> {
    fn test(&mut self, item: &T, upstream: &mut C) -> Result<bool>;
}

pub trait Transform<T, S, C: ?Sized> {
    fn apply(&mut self, item: T, upstream: &mut C) -> Result<S>;
}

pub struct ByValue<F>(pub F);

pub struct ByIndex<F> {
    f: F,
    next_index: usize,
}

impl<F> ByIndex<F> {
    pub fn new(f: F) -> Self {
        Self { f, next_index: 0 }
    }

    fn bump(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }
}

pub struct ByContext<F>(pub F);

impl<T, C: ?Sized, F> Test<T, C> for ByValue<F>
where
    F: FnMut(&T) -> bool,
{
    fn test(&mut self, item: &T, _upstream: &mut C) -> Result<bool> {
        Ok((self.0)(item))
    }
}

impl<T, C: ?Sized, F> Test<T, C> for ByIndex<F>
where
    F: FnMut(&T, usize) -> bool,
{
    fn test(&mut self, item: &T, _upstream: &mut C) -> Result<bool> {
        let index = self.bump();
        Ok((self.f)(item, index))
    }
}

impl<T, F> Test<T, Context<T>> for ByContext<F>
where
    F: FnMut(&T, &mut Context<T>) -> Result<bool>,
{
    fn test(&mut self, item: &T, upstream: &mut Context<T>) -> Result<bool> {
        (self.0)(item, upstream)
    }
}

impl<T, S, C: ?Sized, F> Transform<T, S, C> for ByValue<F>
where
    F: FnMut(T) -> S,
{
    fn apply(&mut self, item: T, _upstream: &mut C) -> Result<S> {
        Ok((self.0)(item))
    }
}

impl<T, S, C: ?Sized, F> Transform<T, S, C> for ByIndex<F>
where
    F: FnMut(T, usize) -> S,
{
    fn apply(&mut self, item: T, _upstream: &mut C) -> Result<S> {
        let index = self.bump();
        Ok((self.f)(item, index))
    }
}

impl<T, S, F> Transform<T, S, Context<T>> for ByContext<F>
where
    F: FnMut(T, &mut Context<T>) -> Result<S>,
{
    fn apply(&mut self, item: T, upstream: &mut Context<T>) -> Result<S> {
        (self.0)(item, upstream)
    }
}

/// `TryFrom` conversion; a failed conversion is a `TypeMismatch`.
pub struct Convert<S>(PhantomData<fn() -> S>);

impl<S> Convert<S> {
    pub fn new() -> Self {
        Convert(PhantomData)
    }
}

impl<S> Default for Convert<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, C: ?Sized> Transform<T, S, C> for Convert<S>
where
    S: TryFrom<T>,
{
    fn apply(&mut self, item: T, _upstream: &mut C) -> Result<S> {
        S::try_from(item).map_err(|_| {
            Error::TypeMismatch(format!(
                "cannot convert {} into {}",
                type_name::<T>(),
                type_name::<S>()
            ))
        })
    }
}
