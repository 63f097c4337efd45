//! Host boundary.
//!
//! The host owns the symbol table. The engine asks it for declared
//! snapshots, extra annotations, type resolution, configuration and change
//! stamps, and hands synthesized members back through [`SyntheticFactory`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigKey, ConfigSource, ConfigValue, LayeredConfig};
use crate::context::RequestContext;
use crate::model::{AnnotationUsage, DeclaredType, Signature, SynthesizedMember, TypeId, TypeRef};

/// A symbol the host may attach annotations to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "symbol", rename_all = "snake_case")]
pub enum Symbol {
    /// A declared type.
    Type {
        /// Type identity.
        id: TypeId,
    },
    /// A field of `owner`.
    Field {
        /// Owning type.
        owner: TypeId,
        /// Field name.
        name: String,
    },
    /// A method or constructor of `owner`.
    Method {
        /// Owning type.
        owner: TypeId,
        /// Method signature.
        signature: Signature,
    },
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { id } => write!(f, "{id}"),
            Self::Field { owner, name } => write!(f, "{owner}#{name}"),
            Self::Method { owner, signature } => write!(f, "{owner}#{signature}"),
        }
    }
}

/// Services the engine consumes from its host.
pub trait Host: ConfigSource {
    /// Declared snapshot of `id`, or `None` if unknown.
    ///
    /// Re-entrant hosts may call [`crate::Augmenter::augment_in`] with `ctx`
    /// while answering.
    fn declared_members(&self, id: &TypeId, ctx: &RequestContext) -> Option<DeclaredType>;

    /// Annotations the host attaches to `symbol` beyond those in the
    /// snapshot (for example, inherited or configuration-driven ones).
    fn annotations_on(&self, _symbol: &Symbol) -> Vec<AnnotationUsage> {
        Vec::new()
    }

    /// Resolves a type reference to its declaration when the host knows it.
    fn resolve_type(&self, reference: &TypeRef) -> Option<DeclaredType>;

    /// Change stamp of `id`; any edit must produce a different value.
    fn modification_stamp(&self, id: &TypeId) -> u64;
}

impl<H: Host + ?Sized> Host for Arc<H> {
    fn declared_members(&self, id: &TypeId, ctx: &RequestContext) -> Option<DeclaredType> {
        (**self).declared_members(id, ctx)
    }

    fn annotations_on(&self, symbol: &Symbol) -> Vec<AnnotationUsage> {
        (**self).annotations_on(symbol)
    }

    fn resolve_type(&self, reference: &TypeRef) -> Option<DeclaredType> {
        (**self).resolve_type(reference)
    }

    fn modification_stamp(&self, id: &TypeId) -> u64 {
        (**self).modification_stamp(id)
    }
}

/// Maps synthesized members onto host symbols.
pub trait SyntheticFactory {
    /// Host-side handle.
    type Handle;

    /// Creates the host representation of `member` inside `owner`.
    fn create(&self, owner: &DeclaredType, member: &SynthesizedMember) -> Self::Handle;
}

/// A host backed by in-memory snapshots.
///
/// Nested types are indexed under their own ids. Used by the CLI and handy
/// for embedding the engine where no live symbol table exists.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHost {
    types: HashMap<TypeId, DeclaredType>,
    extra: HashMap<Symbol, Vec<AnnotationUsage>>,
    stamps: HashMap<TypeId, u64>,
    config: LayeredConfig,
}

impl SnapshotHost {
    /// Empty host with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host over `types`.
    #[must_use]
    pub fn from_types<I>(types: I) -> Self
    where
        I: IntoIterator<Item = DeclaredType>,
    {
        let mut host = Self::new();
        for ty in types {
            host.insert(ty);
        }
        host
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: LayeredConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds or replaces a type (and its nested types), bumping stamps.
    pub fn insert(&mut self, ty: DeclaredType) {
        for nested in &ty.nested {
            self.insert(nested.clone());
        }
        let id = ty.id.clone();
        *self.stamps.entry(id.clone()).or_insert(0) += 1;
        self.types.insert(id, ty);
    }

    /// Attaches host-side annotations to `symbol`.
    pub fn annotate(&mut self, symbol: Symbol, annotation: AnnotationUsage) {
        self.extra.entry(symbol).or_default().push(annotation);
    }

    /// Snapshot lookup without a request context.
    #[must_use]
    pub fn get(&self, id: &TypeId) -> Option<&DeclaredType> {
        self.types.get(id)
    }

    /// Ids of every known type, sorted.
    #[must_use]
    pub fn type_ids(&self) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> = self.types.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ConfigSource for SnapshotHost {
    fn effective_config(&self, key: ConfigKey, scope: &DeclaredType) -> Option<ConfigValue> {
        self.config.effective_config(key, scope)
    }
}

impl Host for SnapshotHost {
    fn declared_members(&self, id: &TypeId, _ctx: &RequestContext) -> Option<DeclaredType> {
        self.types.get(id).cloned()
    }

    fn annotations_on(&self, symbol: &Symbol) -> Vec<AnnotationUsage> {
        self.extra.get(symbol).cloned().unwrap_or_default()
    }

    fn resolve_type(&self, reference: &TypeRef) -> Option<DeclaredType> {
        let name = reference.raw_name()?;
        if let Some(ty) = self.types.get(&TypeId::from(name)) {
            return Some(ty.clone());
        }
        let simple = reference.simple_name()?;
        let mut matches = self.types.values().filter(|ty| ty.name == simple);
        let first = matches.next()?;
        // Ambiguous simple names stay unresolved.
        matches.next().is_none().then(|| first.clone())
    }

    fn modification_stamp(&self, id: &TypeId) -> u64 {
        self.stamps.get(id).copied().unwrap_or(0)
    }
}
