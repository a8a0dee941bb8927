//! The root cell every node of a chain shares.
//!
//! A chain's root owns the only mutable state a query has: which sequence it
//! currently reads from. Derived nodes hold the cell type-erased so that any
//! node, whatever its element type, can swap the root's sequence.

use std::any::{type_name, Any};
use std::cell::RefCell;

use lazyq_core::error::{Error, Result};
use lazyq_operators::SeqRef;

pub(crate) trait Rebind {
    /// `source` must be a `SeqRef<R>` for the root's element type `R`.
    fn rebind(&self, source: Box<dyn Any>, offered: &'static str) -> Result<()>;

    fn element_type(&self) -> &'static str;
}

pub(crate) struct RootSlot<R> {
    current: RefCell<Option<SeqRef<R>>>,
}

impl<R> RootSlot<R> {
    pub(crate) fn new(initial: Option<SeqRef<R>>) -> Self {
        Self {
            current: RefCell::new(initial),
        }
    }

    pub(crate) fn current(&self) -> Option<SeqRef<R>> {
        self.current.borrow().clone()
    }
}

impl<R: 'static> Rebind for RootSlot<R> {
    fn rebind(&self, source: Box<dyn Any>, offered: &'static str) -> Result<()> {
        let source = source.downcast::<SeqRef<R>>().map_err(|_| {
            Error::TypeMismatch(format!(
                "root reads {} but was offered {offered}",
                type_name::<R>()
            ))
        })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            element = type_name::<R>(),
            len_hint = ?source.len_hint(),
            "query root rebound"
        );
        *self.current.borrow_mut() = Some(*source);
        Ok(())
    }

    fn element_type(&self) -> &'static str {
        type_name::<R>()
    }
}
