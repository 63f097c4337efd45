//! A re-entrant host that records what it was asked.
//!
//! [`RecordingHost`] answers from a [`SnapshotHost`] but, before handing out
//! a snapshot, augments the types it was told to follow through the same
//! request context. This mimics a real symbol table that resolves a
//! supertype (and therefore augments it) while building a subtype, and lets
//! tests observe how the recursion guard cuts cycles.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use member_synth::model::{
    AnnotationUsage, DeclaredType, MemberKind, TypeId, TypeRef,
};
use member_synth::{
    Augmenter, ConfigKey, ConfigSource, ConfigValue, Host, RequestContext, SnapshotHost, Symbol,
};
use parking_lot::Mutex;

/// Augmenter over a shared [`RecordingHost`].
pub type RecordingAugmenter = Augmenter<Arc<RecordingHost>>;

/// One nested augmentation the host performed while answering a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedCall {
    /// Type being looked up.
    pub from: TypeId,
    /// Type the host augmented in turn.
    pub to: TypeId,
    /// Methods that nested call returned.
    pub methods: usize,
    /// Depth of the request context during the call.
    pub depth: usize,
}

/// Snapshot host that records lookups and re-enters the augmenter.
#[derive(Debug)]
pub struct RecordingHost {
    snapshots: SnapshotHost,
    follows: HashMap<TypeId, Vec<TypeId>>,
    augmenter: Weak<RecordingAugmenter>,
    lookups: Mutex<Vec<TypeId>>,
    nested: Mutex<Vec<NestedCall>>,
}

impl RecordingHost {
    /// Builds an augmenter whose host answers from `snapshots` and, when
    /// asked for a key of `follows`, first augments each listed type.
    #[must_use]
    pub fn augmenter(
        snapshots: SnapshotHost,
        follows: HashMap<TypeId, Vec<TypeId>>,
    ) -> Arc<RecordingAugmenter> {
        Arc::new_cyclic(|weak| {
            Augmenter::new(Arc::new(Self {
                snapshots,
                follows,
                augmenter: weak.clone(),
                lookups: Mutex::new(Vec::new()),
                nested: Mutex::new(Vec::new()),
            }))
        })
    }

    /// Every id passed to [`Host::declared_members`], in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<TypeId> {
        self.lookups.lock().clone()
    }

    /// Nested augmentations performed so far.
    #[must_use]
    pub fn nested_calls(&self) -> Vec<NestedCall> {
        self.nested.lock().clone()
    }
}

impl ConfigSource for RecordingHost {
    fn effective_config(&self, key: ConfigKey, scope: &DeclaredType) -> Option<ConfigValue> {
        self.snapshots.effective_config(key, scope)
    }
}

impl Host for RecordingHost {
    fn declared_members(&self, id: &TypeId, ctx: &RequestContext) -> Option<DeclaredType> {
        self.lookups.lock().push(id.clone());
        let targets = self.follows.get(id).map(Vec::as_slice).unwrap_or_default();
        if let Some(augmenter) = self.augmenter.upgrade() {
            for target in targets {
                let depth = ctx.depth();
                let methods = augmenter
                    .augment_in(ctx, target, MemberKind::Method)
                    .map_or(0, |members| members.len());
                self.nested.lock().push(NestedCall {
                    from: id.clone(),
                    to: target.clone(),
                    methods,
                    depth,
                });
            }
        }
        self.snapshots.get(id).cloned()
    }

    fn annotations_on(&self, symbol: &Symbol) -> Vec<AnnotationUsage> {
        self.snapshots.annotations_on(symbol)
    }

    fn resolve_type(&self, reference: &TypeRef) -> Option<DeclaredType> {
        self.snapshots.resolve_type(reference)
    }

    fn modification_stamp(&self, id: &TypeId) -> u64 {
        self.snapshots.modification_stamp(id)
    }
}
