use std::{fmt, sync::Weak};

use self::error::ContextGone;
use super::ContextId;

pub mod error;

/// A weak reference to a shared context cell that provides a scoped
/// [`view`](Self::view).
///
/// Handles never extend a cell's life: the owning
/// [`ContextMap`](super::ContextMap) keeps the only strong reference, and a
/// handle held past removal simply reports [`ContextGone`].
pub struct ContextHandle<T> {
    context_id: ContextId,
    weak_cell: Weak<T>,
}

impl<T> ContextHandle<T> {
    pub(super) fn new(context_id: ContextId, weak_cell: Weak<T>) -> ContextHandle<T> {
        Self {
            context_id,
            weak_cell,
        }
    }

    /// The identifier this handle refers to.
    pub fn context_id(&self) -> &ContextId {
        &self.context_id
    }

    /// Scoped access via `view_fn` to the cell behind this handle.
    ///
    /// If the cell is still live returns the value `R` computed by
    /// `view_fn`, else returns [`ContextGone`]. The upgrade lives only for
    /// the duration of the closure, so long-lived strong references can't
    /// leak out and undermine the map's lifecycle control.
    pub fn view<F: FnOnce(&T) -> R, R>(&self, view_fn: F) -> Result<R, ContextGone> {
        Weak::upgrade(&self.weak_cell)
            .map(|cell| view_fn(&cell))
            .ok_or(ContextGone {
                context_id: self.context_id.clone(),
            })
    }
}

impl<T> fmt::Debug for ContextHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("context_id", &self.context_id)
            .field("live", &(Weak::strong_count(&self.weak_cell) > 0))
            .finish()
    }
}

impl<T> Clone for ContextHandle<T> {
    fn clone(&self) -> Self {
        Self {
            context_id: self.context_id.clone(),
            weak_cell: self.weak_cell.clone(),
        }
    }
}

/// A [`ContextHandle`] is defined only by the underlying [`ContextId`] matching.
impl<T> PartialEq<ContextId> for ContextHandle<T> {
    fn eq(&self, other: &ContextId) -> bool {
        self.context_id == *other
    }
}

/// A [`ContextHandle`] is defined only by the underlying [`ContextId`] matching.
impl<T> PartialEq<ContextHandle<T>> for ContextId {
    fn eq(&self, other: &ContextHandle<T>) -> bool {
        *self == other.context_id
    }
}
