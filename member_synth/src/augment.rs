//! Augmentation entry point.
//!
//! [`Augmenter`] ties the pieces together: it asks the host for a declared
//! snapshot, applies host annotations and modifier transformation, runs the
//! processor catalog in order and returns the members that survive conflict
//! resolution, together with every problem reported on the way.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::cache::AugmentCache;
use crate::config::{ConfigView, FlagUsage};
use crate::conflict::ConflictResolver;
use crate::context::RequestContext;
use crate::error::{SynthError, SynthResult};
use crate::host::{Host, Symbol, SyntheticFactory};
use crate::infer::{InferredType, PlaceholderUse, infer_placeholder};
use crate::model::{
    AnnotationUsage, DeclaredType, MemberKind, Modifiers, Provenance, Signature, Stereotype,
    SynthesizedMember, TypeId,
};
use crate::modifiers;
use crate::problem::Problem;
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind, catalog};

/// Result of augmenting one type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    /// Accepted members in generation order.
    pub members: Vec<SynthesizedMember>,
    /// Problems from every processor that ran.
    pub problems: Vec<Problem>,
}

impl Augmentation {
    /// Accepted members of `kind`.
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &SynthesizedMember> {
        self.members.iter().filter(move |m| m.kind() == kind)
    }

    /// Whether any problem is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(Problem::is_error)
    }
}

/// Synthesizes members for the types a [`Host`] knows about.
///
/// # Examples
///
/// ```
/// use member_synth::host::SnapshotHost;
/// use member_synth::model::{AnnotationUsage, DeclaredField, DeclaredType, MemberKind, TypeId, TypeRef};
/// use member_synth::Augmenter;
///
/// let person = DeclaredType::class("a.Person").with_field(
///     DeclaredField::new("name", TypeRef::class("String")).annotated(AnnotationUsage::new("Getter")),
/// );
/// let augmenter = Augmenter::new(SnapshotHost::from_types([person]));
/// let methods = augmenter.augment(&TypeId::from("a.Person"), MemberKind::Method)?;
/// assert_eq!(methods.first().map(|m| m.name()), Some("getName"));
/// # Ok::<(), member_synth::SynthError>(())
/// ```
#[derive(Debug)]
pub struct Augmenter<H> {
    host: H,
    cache: Option<AugmentCache>,
}

impl<H: Host> Augmenter<H> {
    /// Augmenter without memoization.
    #[must_use]
    pub const fn new(host: H) -> Self {
        Self { host, cache: None }
    }

    /// Augmenter that memoizes results per `(type, modification stamp)`.
    #[must_use]
    pub fn with_cache(host: H) -> Self {
        Self {
            host,
            cache: Some(AugmentCache::new()),
        }
    }

    /// The wrapped host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The memo cache, when enabled.
    #[must_use]
    pub const fn cache(&self) -> Option<&AugmentCache> {
        self.cache.as_ref()
    }

    /// Forgets any cached result for `id`.
    pub fn invalidate(&self, id: &TypeId) {
        if let Some(cache) = &self.cache {
            cache.invalidate(id);
        }
    }

    /// Synthesized members of `kind` for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::OwnerMismatch`] when the host's snapshot holds
    /// a field whose owner back reference names another type.
    pub fn augment(&self, id: &TypeId, kind: MemberKind) -> SynthResult<Vec<SynthesizedMember>> {
        self.augment_in(&RequestContext::new(), id, kind)
    }

    /// As [`Augmenter::augment`], continuing the call chain of `ctx`.
    ///
    /// Re-entrant hosts pass the context they received in
    /// [`Host::declared_members`]; a type already in progress on that chain
    /// yields no members.
    ///
    /// # Errors
    ///
    /// See [`Augmenter::augment`].
    pub fn augment_in(
        &self,
        ctx: &RequestContext,
        id: &TypeId,
        kind: MemberKind,
    ) -> SynthResult<Vec<SynthesizedMember>> {
        let analysis = self.analyse_in(ctx, id)?;
        Ok(analysis.members_of(kind).cloned().collect())
    }

    /// Every accepted member of `id` plus the problems found.
    ///
    /// # Errors
    ///
    /// See [`Augmenter::augment`].
    pub fn analyse(&self, id: &TypeId) -> SynthResult<Arc<Augmentation>> {
        self.analyse_in(&RequestContext::new(), id)
    }

    /// As [`Augmenter::analyse`], continuing the call chain of `ctx`.
    ///
    /// # Errors
    ///
    /// See [`Augmenter::augment`].
    pub fn analyse_in(&self, ctx: &RequestContext, id: &TypeId) -> SynthResult<Arc<Augmentation>> {
        let Some(_guard) = ctx.enter(id) else {
            return Ok(Arc::default());
        };
        let stamp = self.host.modification_stamp(id);
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(id, stamp)) {
            trace!(type_id = %id, stamp, "augmentation served from cache");
            return Ok(cached);
        }
        let Some(declared) = self.host.declared_members(id, ctx) else {
            debug!(type_id = %id, "host does not know the type");
            return Ok(Arc::default());
        };
        check_owners(&declared)?;
        let enclosing = self.enclosing_chain(&declared, ctx);
        let snapshot = self.effective(&declared, enclosing.first());
        let result = Arc::new(self.run(ctx, &snapshot, &enclosing));
        if let Some(cache) = &self.cache {
            cache.insert(id, stamp, Arc::clone(&result));
        }
        Ok(result)
    }

    /// Modifiers the host should report for `symbol`, given the ones it
    /// declares. Unknown symbols keep `declared`.
    #[must_use]
    pub fn transform_modifiers(&self, symbol: &Symbol, declared: &Modifiers) -> Modifiers {
        let ctx = RequestContext::new();
        let owner_id = match symbol {
            Symbol::Type { id } => id,
            Symbol::Field { owner, .. } | Symbol::Method { owner, .. } => owner,
        };
        let Some(raw) = self.host.declared_members(owner_id, &ctx) else {
            return declared.clone();
        };
        let owner = self.with_host_annotations(raw);
        match symbol {
            Symbol::Type { .. } => {
                let enclosing = self.enclosing_chain(&owner, &ctx);
                modifiers::type_modifiers(declared, &owner, enclosing.first())
            }
            Symbol::Field { name, .. } => owner.field(name).map_or_else(
                || declared.clone(),
                |field| {
                    let config = ConfigView::new(&self.host, &owner);
                    modifiers::field_modifiers(declared, field, &owner, &config)
                },
            ),
            Symbol::Method { signature, .. } => owner
                .methods
                .iter()
                .find(|m| Signature::of_declared_method(m) == *signature)
                .map_or_else(
                    || declared.clone(),
                    |method| modifiers::method_modifiers(declared, method, &owner),
                ),
        }
    }

    /// Type of a `val`/`var` local.
    ///
    /// # Errors
    ///
    /// Returns an error [`Problem`] when the type cannot be inferred.
    pub fn infer_placeholder_type(&self, usage: &PlaceholderUse) -> Result<InferredType, Problem> {
        infer_placeholder(&self.host, usage)
    }

    /// Hands every member of `kind` for `id` to `factory`.
    ///
    /// # Errors
    ///
    /// See [`Augmenter::augment`].
    pub fn materialize<F>(
        &self,
        factory: &F,
        id: &TypeId,
        kind: MemberKind,
    ) -> SynthResult<Vec<F::Handle>>
    where
        F: SyntheticFactory,
    {
        let ctx = RequestContext::new();
        let Some(owner) = self.host.declared_members(id, &ctx) else {
            return Ok(Vec::new());
        };
        let members = self.augment_in(&ctx, id, kind)?;
        Ok(members
            .iter()
            .map(|member| factory.create(&owner, member))
            .collect())
    }

    /// Enclosing types of `ty`, nearest first, with host annotations.
    fn enclosing_chain(&self, ty: &DeclaredType, ctx: &RequestContext) -> Vec<DeclaredType> {
        let mut chain = Vec::new();
        let mut seen: HashSet<TypeId> = HashSet::from([ty.id.clone()]);
        let mut next = ty.enclosing.clone();
        while let Some(id) = next {
            if !seen.insert(id.clone()) {
                warn!(type_id = %id, "cyclic enclosing chain");
                break;
            }
            let Some(outer) = self.host.declared_members(&id, ctx) else {
                break;
            };
            next = outer.enclosing.clone();
            chain.push(self.with_host_annotations(outer));
        }
        chain
    }

    fn effective(&self, declared: &DeclaredType, enclosing: Option<&DeclaredType>) -> DeclaredType {
        let annotated = self.with_host_annotations(declared.clone());
        modifiers::effective_snapshot(&annotated, enclosing, &self.host)
    }

    /// Adds host-side annotations the snapshot does not already carry.
    fn with_host_annotations(&self, mut ty: DeclaredType) -> DeclaredType {
        let owner = ty.id.clone();
        merge_annotations(
            &mut ty.annotations,
            self.host.annotations_on(&Symbol::Type { id: owner.clone() }),
        );
        for field in &mut ty.fields {
            let symbol = Symbol::Field {
                owner: owner.clone(),
                name: field.name.clone(),
            };
            merge_annotations(&mut field.annotations, self.host.annotations_on(&symbol));
        }
        for method in &mut ty.methods {
            let symbol = Symbol::Method {
                owner: owner.clone(),
                signature: Signature::of_declared_method(method),
            };
            merge_annotations(&mut method.annotations, self.host.annotations_on(&symbol));
        }
        ty
    }

    fn run(
        &self,
        request: &RequestContext,
        owner: &DeclaredType,
        enclosing: &[DeclaredType],
    ) -> Augmentation {
        let config = ConfigView::new(&self.host, owner);
        let mut problems = Vec::new();
        let rejected = flag_usages(&config, owner, &mut problems);
        let mut resolver = ConflictResolver::new(owner);
        let mut members: Vec<SynthesizedMember> = Vec::new();
        for processor in catalog().processors() {
            for decl in declarations(owner, processor.target_kind()) {
                for usage in usages(&decl) {
                    let claimed = usage
                        .stereotype()
                        .is_some_and(|s| processor.supports(s) && !rejected.contains(&s));
                    if !claimed {
                        continue;
                    }
                    let ctx = ProcessorContext::new(&self.host, request, owner, enclosing, &members);
                    let accepted = run_one(processor, &ctx, usage, &decl, &mut problems, &mut resolver);
                    members.extend(accepted);
                }
            }
        }
        debug!(
            type_id = %owner.id,
            members = members.len(),
            problems = problems.len(),
            "augmented type"
        );
        Augmentation { members, problems }
    }
}

fn run_one(
    processor: &dyn Processor,
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    decl: &Declaration<'_>,
    problems: &mut Vec<Problem>,
    resolver: &mut ConflictResolver,
) -> Vec<SynthesizedMember> {
    let found = processor.validate(ctx, usage, decl);
    let blocked = found.iter().any(Problem::is_error);
    problems.extend(found);
    if blocked {
        debug!(processor = processor.name(), symbol = %decl, "validation failed; nothing generated");
        return Vec::new();
    }
    let generated = processor.generate(ctx, usage, decl);
    let candidates = generated.len();
    let accepted = resolver.filter(generated);
    debug!(
        processor = processor.name(),
        symbol = %decl,
        candidates,
        accepted = accepted.len(),
        "processor ran"
    );
    accepted
}

fn check_owners(ty: &DeclaredType) -> SynthResult<()> {
    let mismatch = ty
        .fields
        .iter()
        .find_map(|field| field.owner.as_ref().filter(|owner| **owner != ty.id).map(|owner| (field, owner)));
    match mismatch {
        Some((field, claimed)) => {
            warn!(
                type_id = %ty.id,
                field = %field.name,
                claimed = %claimed,
                "field owner does not match the containing snapshot"
            );
            Err(SynthError::OwnerMismatch {
                field: field.name.clone(),
                claimed: claimed.clone(),
                actual: ty.id.clone(),
            })
        }
        None => Ok(()),
    }
}

fn merge_annotations(into: &mut Vec<AnnotationUsage>, extra: Vec<AnnotationUsage>) {
    for annotation in extra {
        if !into.iter().any(|existing| existing.name == annotation.name) {
            into.push(annotation);
        }
    }
}

fn declarations(owner: &DeclaredType, kind: TargetKind) -> Vec<Declaration<'_>> {
    match kind {
        TargetKind::Type => vec![Declaration::Type(owner)],
        TargetKind::Field => owner
            .fields
            .iter()
            .map(|field| Declaration::Field { owner, field })
            .collect(),
        TargetKind::Method => owner
            .methods
            .iter()
            .map(|method| Declaration::Method { owner, method })
            .collect(),
    }
}

fn usages<'a>(decl: &Declaration<'a>) -> &'a [AnnotationUsage] {
    match *decl {
        Declaration::Type(owner) => &owner.annotations,
        Declaration::Field { field, .. } => &field.annotations,
        Declaration::Method { method, .. } => &method.annotations,
    }
}

/// Reports usages flagged by `flag_usage` configuration and returns the
/// stereotypes whose usages are rejected outright.
fn flag_usages(
    config: &ConfigView<'_>,
    owner: &DeclaredType,
    problems: &mut Vec<Problem>,
) -> BTreeSet<Stereotype> {
    let mut rejected = BTreeSet::new();
    let field_usages = owner.fields.iter().flat_map(|field| {
        field
            .annotations
            .iter()
            .map(move |usage| (format!("{}#{}", owner.id, field.name), usage))
    });
    let method_usages = owner.methods.iter().flat_map(|method| {
        method.annotations.iter().map(move |usage| {
            (
                format!("{}#{}", owner.id, Signature::of_declared_method(method)),
                usage,
            )
        })
    });
    let all = owner
        .annotations
        .iter()
        .map(|usage| (owner.id.to_string(), usage))
        .chain(field_usages)
        .chain(method_usages);
    for (symbol, usage) in all {
        let Some(stereotype) = usage.stereotype() else {
            continue;
        };
        let anchor = Provenance::new(stereotype, symbol);
        match config.flag_usage(stereotype) {
            FlagUsage::Allow => {}
            FlagUsage::Warning => problems.push(Problem::warning(
                anchor,
                format!("use of {stereotype} is flagged by configuration"),
            )),
            FlagUsage::Error => {
                problems.push(Problem::error(
                    anchor,
                    format!("use of {stereotype} is forbidden by configuration"),
                ));
                rejected.insert(stereotype);
            }
        }
    }
    rejected
}
