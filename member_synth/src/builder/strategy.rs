//! How a builder accumulates one value.

use crate::model::TypeRef;

use super::singular::Container;

/// Accumulation strategy selected for one builder entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccumulationStrategy {
    /// One field, one setter.
    Plain,
    /// Element-wise accumulation materialized at build time.
    Singular(SingularSpec),
}

impl AccumulationStrategy {
    /// Singular details, if any.
    #[must_use]
    pub const fn singular(&self) -> Option<&SingularSpec> {
        match self {
            Self::Plain => None,
            Self::Singular(spec) => Some(spec),
        }
    }
}

/// A recognised `@Singular` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingularSpec {
    /// Container type family.
    pub container: Container,
    /// Name of the add-one method.
    pub singular_name: String,
    /// Element types: one for collections, key and value for maps.
    pub elements: Vec<TypeRef>,
    /// Skip null collections passed to the add-all method.
    pub ignore_null: bool,
}

impl SingularSpec {
    /// Whether this accumulates key/value pairs.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        self.container.is_map()
    }
}
