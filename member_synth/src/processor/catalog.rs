//! The static processor table.
//!
//! Order matters: later processors see what earlier ones generated, and the
//! conflict resolver lets the first accepted member win.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::builder::BuilderProcessor;
use crate::handlers::accessors::{AccessorKind, AccessorProcessor};
use crate::handlers::composite::{CompositeKind, CompositeProcessor};
use crate::handlers::constructors::{ConstructorKind, ConstructorProcessor};
use crate::handlers::equality::EqualsAndHashCodeProcessor;
use crate::handlers::field_name_constants::FieldNameConstantsProcessor;
use crate::handlers::log::LogProcessor;
use crate::handlers::markers::BuilderMarkerProcessor;
use crate::handlers::to_string::ToStringProcessor;
use crate::handlers::utility_class::UtilityClassProcessor;
use crate::model::Stereotype;

use super::{Processor, TargetKind};

/// Processors in run order, indexed by claimed stereotype.
pub struct Catalog {
    processors: Vec<Box<dyn Processor>>,
    claims: BTreeMap<Stereotype, Vec<usize>>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.processors.iter().map(|p| p.name()))
            .finish()
    }
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::standard);

/// The shared catalog, built on first use.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    fn standard() -> Self {
        Self::from_processors(vec![
            Box::new(UtilityClassProcessor),
            Box::new(LogProcessor),
            Box::new(FieldNameConstantsProcessor),
            Box::new(AccessorProcessor::new(AccessorKind::Getter, TargetKind::Field)),
            Box::new(AccessorProcessor::new(AccessorKind::Getter, TargetKind::Type)),
            Box::new(AccessorProcessor::new(AccessorKind::Setter, TargetKind::Field)),
            Box::new(AccessorProcessor::new(AccessorKind::Setter, TargetKind::Type)),
            Box::new(AccessorProcessor::new(AccessorKind::Wither, TargetKind::Field)),
            Box::new(AccessorProcessor::new(AccessorKind::Wither, TargetKind::Type)),
            Box::new(ConstructorProcessor::new(ConstructorKind::NoArgs)),
            Box::new(ConstructorProcessor::new(ConstructorKind::RequiredArgs)),
            Box::new(ConstructorProcessor::new(ConstructorKind::AllArgs)),
            Box::new(CompositeProcessor::new(CompositeKind::Value)),
            Box::new(CompositeProcessor::new(CompositeKind::Data)),
            Box::new(EqualsAndHashCodeProcessor),
            Box::new(ToStringProcessor),
            Box::new(BuilderProcessor::new(TargetKind::Type)),
            Box::new(BuilderProcessor::new(TargetKind::Method)),
            Box::new(BuilderMarkerProcessor),
        ])
    }

    /// Catalog over `processors`, run in the given order.
    #[must_use]
    pub fn from_processors(processors: Vec<Box<dyn Processor>>) -> Self {
        let mut claims: BTreeMap<Stereotype, Vec<usize>> = BTreeMap::new();
        for (index, processor) in processors.iter().enumerate() {
            for stereotype in processor.stereotypes() {
                claims.entry(*stereotype).or_default().push(index);
            }
        }
        Self { processors, claims }
    }

    /// Processors in run order.
    pub fn processors(&self) -> impl Iterator<Item = &dyn Processor> {
        self.processors.iter().map(|p| &**p)
    }

    /// Processors claiming `stereotype`, in run order.
    pub fn claimants(&self, stereotype: Stereotype) -> impl Iterator<Item = &dyn Processor> {
        self.claims
            .get(&stereotype)
            .into_iter()
            .flatten()
            .filter_map(|index| self.processors.get(*index))
            .map(|p| &**p)
    }

    /// Whether any processor claims `stereotype`.
    #[must_use]
    pub fn is_claimed(&self, stereotype: Stereotype) -> bool {
        self.claims.contains_key(&stereotype)
    }

    /// Number of processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether the catalog has no processors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
