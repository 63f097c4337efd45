//! Memoization of augmentation results.
//!
//! One entry per type id, tagged with the modification stamp it was computed
//! at. A lookup with any other stamp misses, and storing a result for a new
//! stamp replaces the whole entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::augment::Augmentation;
use crate::model::TypeId;

/// Thread-safe cache of whole augmentation results.
#[derive(Debug, Default)]
pub struct AugmentCache {
    entries: RwLock<HashMap<TypeId, (u64, Arc<Augmentation>)>>,
}

impl AugmentCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `id` at `stamp`.
    #[must_use]
    pub fn get(&self, id: &TypeId, stamp: u64) -> Option<Arc<Augmentation>> {
        self.entries
            .read()
            .get(id)
            .filter(|(cached, _)| *cached == stamp)
            .map(|(_, value)| Arc::clone(value))
    }

    /// Stores `value` for `id` at `stamp`, replacing any older entry.
    pub fn insert(&self, id: &TypeId, stamp: u64, value: Arc<Augmentation>) {
        self.entries.write().insert(id.clone(), (stamp, value));
    }

    /// Drops every entry for `id`.
    pub fn invalidate(&self, id: &TypeId) {
        self.entries.write().remove(id);
    }

    /// Drops everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
