//! `@EqualsAndHashCode`.

use crate::config::ConfigKey;
use crate::model::{
    AccessLevel, AnnotationUsage, Body, DeclaredType, FieldComparison, Modifier, Primitive,
    Provenance, Stereotype, SynthMethod, SynthesizedMember, TypeKind, TypeRef,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink};
use crate::selection::{SelectedField, SelectionKind, resolve_call_super, select_fields};

use super::{
    boolean_type, field_access, member_modifiers, object_type, provenance, require_kind,
    value_kind,
};

const OVERRIDE: &str = "@java.lang.Override";

struct EqualityPlan<'a> {
    fields: Vec<SelectedField<'a>>,
    call_super: bool,
    use_getters: bool,
}

fn plan<'a>(
    ctx: &ProcessorContext<'a>,
    usage: &AnnotationUsage,
    sink: &mut ProblemSink,
) -> EqualityPlan<'a> {
    let owner = ctx.owner();
    let config = ctx.config();
    let fields = select_fields(
        SelectionKind::Equality,
        owner,
        usage,
        config.redundancy(),
        sink,
    );
    let call_super = resolve_call_super(
        SelectionKind::Equality,
        owner,
        usage,
        config.call_super(ConfigKey::EqualsCallSuper),
        sink,
    );
    let do_not_use_getters = usage
        .bool_attr("doNotUseGetters")
        .unwrap_or_else(|| config.flag(ConfigKey::EqualsDoNotUseGetters));
    EqualityPlan {
        fields,
        call_super,
        use_getters: !do_not_use_getters,
    }
}

/// Whether `equals(Object)` or `hashCode()` already exists.
#[must_use]
pub fn equality_exists(ctx: &ProcessorContext<'_>) -> bool {
    ctx.method_exists("equals", 1) || ctx.method_exists("hashCode", 0)
}

/// Validation shared by the explicit stereotype and the composites.
///
/// Composites skip silently when the methods already exist.
pub fn check_equality(
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    implicit: bool,
    sink: &mut ProblemSink,
) {
    if equality_exists(ctx) {
        if !implicit {
            sink.warning(
                "not generating equals and hashCode: a method with one of those names already exists",
            );
        }
        return;
    }
    plan(ctx, usage, sink);
}

/// `Type<?, ?>` for generic owners, the plain name otherwise.
fn wildcard_name(owner: &DeclaredType) -> String {
    if owner.type_params.is_empty() {
        return owner.name.clone();
    }
    let wildcards = vec!["?"; owner.type_params.len()].join(", ");
    format!("{}<{wildcards}>", owner.name)
}

/// `equals`, `canEqual` (non-final types) and `hashCode` for `usage`.
///
/// `pending` holds accessors generated by the same composite usage.
#[must_use]
pub fn equality_members(
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    provenance: &Provenance,
    pending: &[SynthesizedMember],
) -> Vec<SynthesizedMember> {
    if equality_exists(ctx) {
        return Vec::new();
    }
    let owner = ctx.owner();
    let mut scratch = ProblemSink::new(provenance.stereotype, provenance.symbol.clone());
    let plan = plan(ctx, usage, &mut scratch);
    let fields: Vec<FieldComparison> = plan
        .fields
        .iter()
        .map(|selected| FieldComparison {
            name: selected.field.name.clone(),
            this_access: field_access(ctx, selected.field, "this", plan.use_getters, pending),
            other_access: field_access(ctx, selected.field, "other", plan.use_getters, pending),
            kind: value_kind(&selected.field.ty),
        })
        .collect();
    let can_equal = !owner.modifiers.has(Modifier::Final);

    let mut equals = SynthMethod::new(
        "equals",
        Some(boolean_type()),
        member_modifiers(AccessLevel::Public, false),
        Body::Equals {
            type_name: wildcard_name(owner),
            call_super: plan.call_super,
            can_equal,
            fields: fields.clone(),
        },
        provenance.clone(),
    )
    .with_param("o", object_type());
    equals.annotations.push(OVERRIDE.to_owned());

    let mut hash_code = SynthMethod::new(
        "hashCode",
        Some(TypeRef::Primitive(Primitive::Int)),
        member_modifiers(AccessLevel::Public, false),
        Body::HashCode {
            call_super: plan.call_super,
            fields,
        },
        provenance.clone(),
    );
    hash_code.annotations.push(OVERRIDE.to_owned());

    let mut members = vec![SynthesizedMember::Method(equals)];
    if can_equal {
        members.push(SynthesizedMember::Method(
            SynthMethod::new(
                "canEqual",
                Some(boolean_type()),
                member_modifiers(AccessLevel::Protected, false),
                Body::Return(format!("other instanceof {}", wildcard_name(owner))),
                provenance.clone(),
            )
            .with_param("other", object_type()),
        ));
    }
    members.push(SynthesizedMember::Method(hash_code));
    members
}

/// `@EqualsAndHashCode` on a class.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualsAndHashCodeProcessor;

impl Processor for EqualsAndHashCodeProcessor {
    fn name(&self) -> &'static str {
        "equals_and_hash_code"
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &[Stereotype::EqualsAndHashCode]
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Type
    }

    fn validate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem> {
        let mut sink = ProblemSink::new(Stereotype::EqualsAndHashCode, decl.symbol());
        if require_kind(decl.owner(), &[TypeKind::Class], "classes", &mut sink) {
            check_equality(ctx, usage, false, &mut sink);
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        equality_members(
            ctx,
            usage,
            &provenance(Stereotype::EqualsAndHashCode, decl),
            &[],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclaredField, DeclaredMethod};
    use crate::testing::{body_of, names, with_context};

    fn point() -> DeclaredType {
        DeclaredType::class("geo.Point")
            .with_field(DeclaredField::new("x", TypeRef::Primitive(Primitive::Double)))
            .with_field(DeclaredField::new("label", TypeRef::class("String")))
            .with_field(DeclaredField::new(
                "tags",
                TypeRef::class("String").array_of(),
            ))
    }

    #[test]
    fn generates_equals_can_equal_and_hash_code() {
        let ty = point();
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode");
            let members = EqualsAndHashCodeProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            assert_eq!(names(&members), ["equals", "canEqual", "hashCode"]);
            let equals = body_of(&members, "equals");
            assert!(equals.contains("java.lang.Double.compare(this.x, other.x)"), "{equals}");
            assert!(equals.contains("java.util.Arrays.deepEquals(this.tags, other.tags)"), "{equals}");
            let hash = body_of(&members, "hashCode");
            assert!(hash.contains("java.lang.Double.doubleToLongBits(this.x)"), "{hash}");
        });
    }

    #[test]
    fn final_types_have_no_can_equal() {
        let ty = point().with_modifier(Modifier::Final);
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode");
            let members = EqualsAndHashCodeProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            assert_eq!(names(&members), ["equals", "hashCode"]);
        });
    }

    #[test]
    fn uses_existing_getters_unless_told_not_to() {
        let ty = point().with_method(DeclaredMethod::new("getLabel", TypeRef::class("String")));
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode");
            let members = EqualsAndHashCodeProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            assert!(body_of(&members, "equals").contains("this.getLabel()"));

            let direct = usage.with_bool("doNotUseGetters", true);
            let members = EqualsAndHashCodeProcessor.generate(ctx, &direct, &Declaration::Type(&ty));
            assert!(!body_of(&members, "equals").contains("getLabel()"));
        });
    }

    #[test]
    fn generic_types_compare_against_wildcards() {
        let ty = point().with_type_param("T");
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode");
            let members = EqualsAndHashCodeProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            assert!(body_of(&members, "equals").contains("instanceof Point<?>"));
        });
    }

    #[test]
    fn existing_equals_warns_and_blocks_generation() {
        let ty = point().with_method(
            DeclaredMethod::new("equals", boolean_type())
                .with_param(crate::model::Param::new("o", object_type())),
        );
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode");
            let decl = Declaration::Type(&ty);
            let problems = EqualsAndHashCodeProcessor.validate(ctx, &usage, &decl);
            assert_eq!(problems.len(), 1);
            assert!(EqualsAndHashCodeProcessor.generate(ctx, &usage, &decl).is_empty());
        });
    }

    #[test]
    fn call_super_on_root_type_is_an_error() {
        let ty = point();
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode").with_bool("callSuper", true);
            let problems = EqualsAndHashCodeProcessor.validate(ctx, &usage, &Declaration::Type(&ty));
            assert!(problems.iter().any(Problem::is_error));
        });
    }

    #[test]
    fn subclass_without_call_super_warns_by_default() {
        let ty = point().extending(TypeRef::class("geo.Shape"));
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("EqualsAndHashCode");
            let problems = EqualsAndHashCodeProcessor.validate(ctx, &usage, &Declaration::Type(&ty));
            assert_eq!(problems.len(), 1);
            assert!(!problems.iter().any(Problem::is_error));
        });
    }
}
