//! Processor contract.
//!
//! A processor claims one or more stereotypes on one kind of declaration.
//! For every matching annotation usage the augmenter first calls
//! [`Processor::validate`]; only when that produced no error does it call
//! [`Processor::generate`]. Both are pure functions of the context, the
//! usage and the declaration.

mod catalog;

pub use catalog::{Catalog, catalog};

use std::fmt;

use crate::config::ConfigView;
use crate::context::RequestContext;
use crate::host::Host;
use crate::model::{
    AnnotationUsage, DeclaredField, DeclaredMethod, DeclaredType, Signature, Stereotype,
    SynthesizedMember,
};
use crate::naming::AccessorPolicy;
use crate::problem::Problem;

/// Declaration kind a processor attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Type-level usages.
    Type,
    /// Field-level usages.
    Field,
    /// Method- and constructor-level usages.
    Method,
}

/// The annotated declaration a processor runs against.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    /// A type.
    Type(&'a DeclaredType),
    /// A field and its owner.
    Field {
        /// Owning type.
        owner: &'a DeclaredType,
        /// Annotated field.
        field: &'a DeclaredField,
    },
    /// A method or constructor and its owner.
    Method {
        /// Owning type.
        owner: &'a DeclaredType,
        /// Annotated method.
        method: &'a DeclaredMethod,
    },
}

impl<'a> Declaration<'a> {
    /// Type that receives generated members.
    #[must_use]
    pub const fn owner(&self) -> &'a DeclaredType {
        match self {
            Self::Type(owner) | Self::Field { owner, .. } | Self::Method { owner, .. } => owner,
        }
    }

    /// Target kind of this declaration.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Type(_) => TargetKind::Type,
            Self::Field { .. } => TargetKind::Field,
            Self::Method { .. } => TargetKind::Method,
        }
    }

    /// Navigation symbol, e.g. `a.Foo`, `a.Foo#name` or `a.Foo#of(int)`.
    #[must_use]
    pub fn symbol(&self) -> String {
        match self {
            Self::Type(owner) => owner.id.to_string(),
            Self::Field { owner, field } => format!("{}#{}", owner.id, field.name),
            Self::Method { owner, method } => {
                format!("{}#{}", owner.id, Signature::of_declared_method(method))
            }
        }
    }
}

impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

/// Everything a processor may consult besides the usage and declaration.
#[derive(Clone, Copy)]
pub struct ProcessorContext<'a> {
    host: &'a dyn Host,
    request: &'a RequestContext,
    config: ConfigView<'a>,
    owner: &'a DeclaredType,
    enclosing: &'a [DeclaredType],
    synthesized: &'a [SynthesizedMember],
}

impl fmt::Debug for ProcessorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorContext")
            .field("owner", &self.owner.id)
            .field("synthesized", &self.synthesized.len())
            .finish_non_exhaustive()
    }
}

impl<'a> ProcessorContext<'a> {
    /// Builds a context for augmenting `owner`.
    ///
    /// `enclosing` lists the enclosing types nearest first; `synthesized`
    /// holds the members accepted earlier in the same pass.
    #[must_use]
    pub fn new(
        host: &'a dyn Host,
        request: &'a RequestContext,
        owner: &'a DeclaredType,
        enclosing: &'a [DeclaredType],
        synthesized: &'a [SynthesizedMember],
    ) -> Self {
        Self {
            host,
            request,
            config: ConfigView::new(host, owner),
            owner,
            enclosing,
            synthesized,
        }
    }

    /// Host services.
    #[must_use]
    pub fn host(&self) -> &'a dyn Host {
        self.host
    }

    /// Current request.
    #[must_use]
    pub const fn request(&self) -> &'a RequestContext {
        self.request
    }

    /// Configuration scoped to the owner.
    #[must_use]
    pub const fn config(&self) -> &ConfigView<'a> {
        &self.config
    }

    /// Type being augmented (effective snapshot).
    #[must_use]
    pub const fn owner(&self) -> &'a DeclaredType {
        self.owner
    }

    /// Enclosing types, nearest first.
    #[must_use]
    pub const fn enclosing(&self) -> &'a [DeclaredType] {
        self.enclosing
    }

    /// Members accepted earlier in this pass.
    #[must_use]
    pub const fn synthesized(&self) -> &'a [SynthesizedMember] {
        self.synthesized
    }

    /// Whether a declared or already-synthesized method has `name` (ignoring
    /// case) and `params` parameters.
    #[must_use]
    pub fn method_exists(&self, name: &str, params: usize) -> bool {
        let declared = self
            .owner
            .methods
            .iter()
            .filter(|m| !m.is_constructor())
            .any(|m| m.name.eq_ignore_ascii_case(name) && m.params.len() == params);
        declared
            || self
                .synthesized
                .iter()
                .filter_map(SynthesizedMember::as_method)
                .filter(|m| !m.is_constructor())
                .any(|m| m.name.eq_ignore_ascii_case(name) && m.params.len() == params)
    }

    /// Whether any of `names` already exists with `params` parameters.
    #[must_use]
    pub fn any_method_exists(&self, names: &[String], params: usize) -> bool {
        names.iter().any(|name| self.method_exists(name, params))
    }

    /// Whether a declared or synthesized constructor exists.
    #[must_use]
    pub fn constructor_exists(&self, params: Option<usize>) -> bool {
        let matches = |count: usize| params.is_none_or(|wanted| wanted == count);
        self.owner.constructors().any(|c| matches(c.params.len()))
            || self
                .synthesized
                .iter()
                .filter_map(SynthesizedMember::as_method)
                .filter(|m| m.is_constructor())
                .any(|m| matches(m.params.len()))
    }

    /// Accessor naming policy for `field`: field `@Accessors`, then the
    /// owner's, then each enclosing type's, then configuration.
    #[must_use]
    pub fn accessor_policy(&self, field: Option<&DeclaredField>) -> AccessorPolicy {
        let usages = field
            .and_then(|f| f.annotation(Stereotype::Accessors))
            .into_iter()
            .chain(self.owner.annotation(Stereotype::Accessors))
            .chain(
                self.enclosing
                    .iter()
                    .filter_map(|ty| ty.annotation(Stereotype::Accessors)),
            );
        AccessorPolicy::resolve(usages, &self.config)
    }
}

/// A stereotype handler.
pub trait Processor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Stereotypes this processor claims.
    fn stereotypes(&self) -> &'static [Stereotype];

    /// Whether this processor handles `stereotype`.
    fn supports(&self, stereotype: Stereotype) -> bool {
        self.stereotypes().contains(&stereotype)
    }

    /// Declaration kind this processor attaches to.
    fn target_kind(&self) -> TargetKind;

    /// Checks the usage; any error blocks generation for it.
    fn validate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem>;

    /// Produces candidate members; the conflict resolver prunes them.
    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember>;
}
