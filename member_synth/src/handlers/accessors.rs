//! `@Getter`, `@Setter` and `@With`.

use crate::model::{
    AccessLevel, AnnotationUsage, Body, DeclaredField, Modifier, Primitive, Provenance,
    Stereotype, SynthMethod, SynthesizedMember, TypeKind, TypeRef,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

use super::{member_modifiers, needs_null_check, provenance, require_kind, requested_access};

fn receiver(ctx: &ProcessorContext<'_>, field: &DeclaredField) -> String {
    if field.is_static() {
        ctx.owner().name.clone()
    } else {
        "this".to_owned()
    }
}

/// Getter for `field`, or `None` if access is `NONE` or the name is rejected.
#[must_use]
pub fn getter(
    ctx: &ProcessorContext<'_>,
    field: &DeclaredField,
    access: AccessLevel,
    lazy: bool,
    provenance: &Provenance,
) -> Option<SynthMethod> {
    if access == AccessLevel::None {
        return None;
    }
    let name = ctx
        .accessor_policy(Some(field))
        .getter_name(&field.name, &field.ty)?;
    let body = if lazy {
        Body::LazyGetter {
            field: field.name.clone(),
            initializer: field.initializer.clone().unwrap_or_default(),
        }
    } else {
        Body::Return(format!("{}.{}", receiver(ctx, field), field.name))
    };
    Some(
        SynthMethod::new(
            name,
            Some(field.ty.clone()),
            member_modifiers(access, field.is_static()),
            body,
            provenance.clone(),
        )
        .from_field(&field.name),
    )
}

/// Setter for `field`, or `None` if access is `NONE` or the name is rejected.
#[must_use]
pub fn setter(
    ctx: &ProcessorContext<'_>,
    field: &DeclaredField,
    access: AccessLevel,
    provenance: &Provenance,
) -> Option<SynthMethod> {
    if access == AccessLevel::None {
        return None;
    }
    let policy = ctx.accessor_policy(Some(field));
    let name = policy.setter_name(&field.name, &field.ty)?;
    let returns_this = policy.chain && !field.is_static();
    let return_type = if returns_this {
        ctx.owner().self_type()
    } else {
        TypeRef::Primitive(Primitive::Void)
    };
    let body = Body::Assign {
        target: format!("{}.{}", receiver(ctx, field), field.name),
        value: field.name.clone(),
        null_check: needs_null_check(field).then(|| field.name.clone()),
        returns_this,
    };
    Some(
        SynthMethod::new(
            name,
            Some(return_type),
            member_modifiers(access, field.is_static()),
            body,
            provenance.clone(),
        )
        .with_param(&field.name, field.ty.clone())
        .from_field(&field.name),
    )
}

/// Wither for `field`, or `None` if access is `NONE` or the name is rejected.
#[must_use]
pub fn wither(
    ctx: &ProcessorContext<'_>,
    field: &DeclaredField,
    access: AccessLevel,
    provenance: &Provenance,
) -> Option<SynthMethod> {
    if access == AccessLevel::None {
        return None;
    }
    let owner = ctx.owner();
    let name = ctx
        .accessor_policy(Some(field))
        .wither_name(&field.name, &field.ty)?;
    let is_abstract = owner.modifiers.has(Modifier::Abstract);
    let body = if is_abstract {
        Body::Abstract
    } else {
        Body::Wither {
            field: field.name.clone(),
            type_expr: owner.self_type().to_string(),
            args: owner
                .all_args_fields()
                .map(|f| {
                    if f.name == field.name {
                        f.name.clone()
                    } else {
                        format!("this.{}", f.name)
                    }
                })
                .collect(),
            null_check: needs_null_check(field).then(|| field.name.clone()),
        }
    };
    let mut modifiers = member_modifiers(access, false);
    if is_abstract {
        modifiers = modifiers.with(Modifier::Abstract);
    }
    Some(
        SynthMethod::new(name, Some(owner.self_type()), modifiers, body, provenance.clone())
            .with_param(&field.name, field.ty.clone())
            .from_field(&field.name),
    )
}

/// Which accessor an [`AccessorProcessor`] generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// `@Getter`
    Getter,
    /// `@Setter`
    Setter,
    /// `@With`
    Wither,
}

impl AccessorKind {
    const fn stereotype(self) -> Stereotype {
        match self {
            Self::Getter => Stereotype::Getter,
            Self::Setter => Stereotype::Setter,
            Self::Wither => Stereotype::With,
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Wither => "wither",
        }
    }

    const fn param_count(self) -> usize {
        match self {
            Self::Getter => 0,
            Self::Setter | Self::Wither => 1,
        }
    }

    /// Reason `field` never gets this accessor, if any.
    fn unsupported(self, field: &DeclaredField) -> Option<&'static str> {
        match self {
            Self::Getter => None,
            Self::Setter if field.is_final() => Some("setters cannot be generated for final fields"),
            Self::Setter => None,
            Self::Wither if field.is_static() => Some("withers cannot be generated for static fields"),
            Self::Wither if field.is_final() && field.has_initializer() => {
                Some("withers cannot be generated for final, initialized fields")
            }
            Self::Wither => None,
        }
    }

    fn names(self, ctx: &ProcessorContext<'_>, field: &DeclaredField) -> Vec<String> {
        let policy = ctx.accessor_policy(Some(field));
        match self {
            Self::Getter => policy.all_getter_names(&field.name, &field.ty),
            Self::Setter => policy.all_setter_names(&field.name, &field.ty),
            Self::Wither => policy
                .wither_name(&field.name, &field.ty)
                .into_iter()
                .collect(),
        }
    }

    fn build(
        self,
        ctx: &ProcessorContext<'_>,
        field: &DeclaredField,
        access: AccessLevel,
        lazy: bool,
        provenance: &Provenance,
    ) -> Option<SynthMethod> {
        match self {
            Self::Getter => getter(ctx, field, access, lazy, provenance),
            Self::Setter => setter(ctx, field, access, provenance),
            Self::Wither => wither(ctx, field, access, provenance),
        }
    }

    /// Generates the accessor for `field` unless it is unsupported or an
    /// equivalent method exists. Used by type-level and composite usages.
    #[must_use]
    pub fn implicit(
        self,
        ctx: &ProcessorContext<'_>,
        field: &DeclaredField,
        access: AccessLevel,
        provenance: &Provenance,
    ) -> Option<SynthMethod> {
        if field.is_synthetic() || self.unsupported(field).is_some() {
            return None;
        }
        if ctx.any_method_exists(&self.names(ctx, field), self.param_count()) {
            return None;
        }
        self.build(ctx, field, access, false, provenance)
    }
}

/// `@Getter`/`@Setter`/`@With` on a field or on a type.
#[derive(Debug, Clone, Copy)]
pub struct AccessorProcessor {
    kind: AccessorKind,
    target: TargetKind,
}

impl AccessorProcessor {
    /// Processor for `kind` at `target`.
    #[must_use]
    pub const fn new(kind: AccessorKind, target: TargetKind) -> Self {
        Self { kind, target }
    }

    fn validate_field(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        field: &DeclaredField,
        sink: &mut ProblemSink,
    ) {
        let access = requested_access(usage, "value", AccessLevel::Public);
        let lazy = usage.flag("lazy", false);
        if self.kind == AccessorKind::Getter && lazy {
            if !(field.modifiers.has(Modifier::Private) && field.is_final()) {
                sink.error("'lazy' requires the field to be private and final")
                    .fix(Remediation::AddModifier {
                        modifier: "private".to_owned(),
                    })
                    .fix(Remediation::AddModifier {
                        modifier: "final".to_owned(),
                    });
            }
            if !field.has_initializer() {
                sink.error("'lazy' requires field initialization");
            }
        }
        if access == AccessLevel::None {
            return;
        }
        if let Some(reason) = self.kind.unsupported(field) {
            let problem = sink.warning(format!(
                "not generating {} for '{}': {reason}",
                self.kind.noun(),
                field.name
            ));
            if field.is_final() {
                problem.fix(Remediation::RemoveModifier {
                    modifier: "final".to_owned(),
                });
            }
            return;
        }
        let policy = ctx.accessor_policy(Some(field));
        let primary = match self.kind {
            AccessorKind::Getter => policy.getter_name(&field.name, &field.ty),
            AccessorKind::Setter => policy.setter_name(&field.name, &field.ty),
            AccessorKind::Wither => policy.wither_name(&field.name, &field.ty),
        };
        let Some(primary) = primary else {
            sink.warning(format!(
                "not generating {} for '{}': it does not fit the configured accessor prefixes",
                self.kind.noun(),
                field.name
            ));
            return;
        };
        let names = self.kind.names(ctx, field);
        if let Some(existing) = names
            .iter()
            .find(|name| ctx.method_exists(name, self.kind.param_count()))
        {
            sink.warning(format!(
                "not generating {primary}(): a method named {existing} already exists"
            ));
        }
    }
}

impl Processor for AccessorProcessor {
    fn name(&self) -> &'static str {
        match (self.kind, self.target) {
            (AccessorKind::Getter, TargetKind::Field) => "getter.field",
            (AccessorKind::Getter, _) => "getter.type",
            (AccessorKind::Setter, TargetKind::Field) => "setter.field",
            (AccessorKind::Setter, _) => "setter.type",
            (AccessorKind::Wither, TargetKind::Field) => "with.field",
            (AccessorKind::Wither, _) => "with.type",
        }
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        match self.kind {
            AccessorKind::Getter => &[Stereotype::Getter],
            AccessorKind::Setter => &[Stereotype::Setter],
            AccessorKind::Wither => &[Stereotype::With],
        }
    }

    fn target_kind(&self) -> TargetKind {
        self.target
    }

    fn validate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem> {
        let mut sink = ProblemSink::new(self.kind.stereotype(), decl.symbol());
        match decl {
            Declaration::Field { field, .. } => self.validate_field(ctx, usage, field, &mut sink),
            Declaration::Type(owner) => {
                let allowed: &[TypeKind] = match self.kind {
                    AccessorKind::Getter => &[TypeKind::Class, TypeKind::Enum],
                    AccessorKind::Setter | AccessorKind::Wither => &[TypeKind::Class],
                };
                require_kind(owner, allowed, "a class or a field", &mut sink);
                if usage.has("lazy") {
                    sink.error("'lazy' is only supported on field-level @Getter")
                        .fix(Remediation::SetAttribute {
                            name: "lazy".to_owned(),
                            value: "false".to_owned(),
                        });
                }
            }
            Declaration::Method { .. } => {}
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        let access = requested_access(usage, "value", AccessLevel::Public);
        let origin = provenance(self.kind.stereotype(), decl);
        match decl {
            Declaration::Field { field, .. } => {
                if self.kind.unsupported(field).is_some() {
                    return Vec::new();
                }
                let lazy = usage.flag("lazy", false);
                self.kind
                    .build(ctx, field, access, lazy, &origin)
                    .map(SynthesizedMember::Method)
                    .into_iter()
                    .collect()
            }
            Declaration::Type(owner) => owner
                .instance_fields()
                .filter(|f| !f.has_annotation(self.kind.stereotype()))
                .filter_map(|f| self.kind.implicit(ctx, f, access, &origin))
                .map(SynthesizedMember::Method)
                .collect(),
            Declaration::Method { .. } => Vec::new(),
        }
    }
}
