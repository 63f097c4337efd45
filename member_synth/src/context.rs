//! Per-request recursion guard.
//!
//! Augmenting a type can make the host resolve other types, which can ask
//! for augmentation again. The request context records the types currently
//! being augmented on this call chain; re-entering one of them yields an
//! empty result instead of recursing.

use std::cell::RefCell;

use tracing::trace;

use crate::model::TypeId;

/// State shared along one augmentation call chain.
#[derive(Debug, Default)]
pub struct RequestContext {
    in_progress: RefCell<Vec<TypeId>>,
}

impl RequestContext {
    /// Fresh context with nothing in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as in progress.
    ///
    /// Returns `None` if it already is. The mark is released when the guard
    /// drops, including during unwinding.
    #[must_use]
    pub fn enter(&self, id: &TypeId) -> Option<InProgressGuard<'_>> {
        let mut stack = self.in_progress.borrow_mut();
        if stack.contains(id) {
            trace!(type_id = %id, depth = stack.len(), "recursive augmentation suppressed");
            return None;
        }
        stack.push(id.clone());
        Some(InProgressGuard {
            context: self,
            id: id.clone(),
        })
    }

    /// Whether `id` is being augmented on this call chain.
    #[must_use]
    pub fn is_in_progress(&self, id: &TypeId) -> bool {
        self.in_progress.borrow().contains(id)
    }

    /// Number of nested augmentations in progress.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.in_progress.borrow().len()
    }
}

/// Releases an in-progress mark on drop.
#[derive(Debug)]
pub struct InProgressGuard<'a> {
    context: &'a RequestContext,
    id: TypeId,
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.context.in_progress.borrow_mut();
        if let Some(pos) = stack.iter().rposition(|id| *id == self.id) {
            stack.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_is_refused_until_guard_drops() {
        let ctx = RequestContext::new();
        let id = TypeId::from("a.B");
        let guard = ctx.enter(&id);
        assert!(guard.is_some());
        assert!(ctx.enter(&id).is_none());
        assert_eq!(ctx.depth(), 1);
        drop(guard);
        assert!(!ctx.is_in_progress(&id));
        assert!(ctx.enter(&id).is_some());
    }

    #[test]
    fn guard_releases_on_panic() {
        let ctx = RequestContext::new();
        let id = TypeId::from("a.B");
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ctx.enter(&id);
            panic!("host failure");
        }));
        assert!(outcome.is_err());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn distinct_types_nest() {
        let ctx = RequestContext::new();
        let outer = TypeId::from("a.Outer");
        let inner = TypeId::from("a.Inner");
        let _outer_guard = ctx.enter(&outer);
        let inner_guard = ctx.enter(&inner);
        assert!(inner_guard.is_some());
        assert_eq!(ctx.depth(), 2);
    }
}
