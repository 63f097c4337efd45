//! `@ToString`.

use crate::config::ConfigKey;
use crate::model::{
    AccessLevel, AnnotationUsage, Body, Provenance, Stereotype, SynthMethod, SynthesizedMember,
    ToStringPart, TypeKind, TypeRef, ValueKind,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink};
use crate::selection::{SelectionKind, resolve_call_super, select_fields};

use super::{field_access, member_modifiers, nested_label, provenance, require_kind, value_kind};

/// Whether `toString()` already exists.
#[must_use]
pub fn to_string_exists(ctx: &ProcessorContext<'_>) -> bool {
    ctx.method_exists("toString", 0)
}

/// Validation shared by the explicit stereotype and `@Data`/`@Value`.
pub fn check_to_string(
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    implicit: bool,
    sink: &mut ProblemSink,
) {
    if to_string_exists(ctx) {
        if !implicit {
            sink.warning("not generating toString(): a method with that name already exists");
        }
        return;
    }
    let owner = ctx.owner();
    let config = ctx.config();
    select_fields(SelectionKind::ToString, owner, usage, config.redundancy(), sink);
    resolve_call_super(
        SelectionKind::ToString,
        owner,
        usage,
        config.call_super(ConfigKey::ToStringCallSuper),
        sink,
    );
}

/// The `toString()` member for `usage`.
#[must_use]
pub fn to_string_member(
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    provenance: &Provenance,
    pending: &[SynthesizedMember],
) -> Option<SynthesizedMember> {
    if to_string_exists(ctx) {
        return None;
    }
    let owner = ctx.owner();
    let config = ctx.config();
    let mut scratch = ProblemSink::new(provenance.stereotype, provenance.symbol.clone());
    let selected = select_fields(
        SelectionKind::ToString,
        owner,
        usage,
        config.redundancy(),
        &mut scratch,
    );
    let call_super = resolve_call_super(
        SelectionKind::ToString,
        owner,
        usage,
        config.call_super(ConfigKey::ToStringCallSuper),
        &mut scratch,
    );
    let include_names = usage
        .bool_attr("includeFieldNames")
        .unwrap_or_else(|| config.flag(ConfigKey::ToStringIncludeFieldNames));
    let use_getters = !usage
        .bool_attr("doNotUseGetters")
        .unwrap_or_else(|| config.flag(ConfigKey::ToStringDoNotUseGetters));

    let parts = selected
        .iter()
        .map(|s| {
            let kind = value_kind(&s.field.ty);
            ToStringPart {
                label: include_names.then(|| s.label.clone()),
                expr: field_access(ctx, s.field, "this", use_getters, pending),
                array: matches!(kind, ValueKind::Array { .. }).then_some(kind),
            }
        })
        .collect();

    let mut method = SynthMethod::new(
        "toString",
        Some(TypeRef::class("java.lang.String")),
        member_modifiers(AccessLevel::Public, false),
        Body::ToString {
            label: nested_label(ctx, owner),
            call_super,
            parts,
        },
        provenance.clone(),
    );
    method.annotations.push("@java.lang.Override".to_owned());
    Some(SynthesizedMember::Method(method))
}

/// `@ToString` on a class or enum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToStringProcessor;

impl Processor for ToStringProcessor {
    fn name(&self) -> &'static str {
        "to_string"
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &[Stereotype::ToString]
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
        let mut sink = ProblemSink::new(Stereotype::ToString, decl.symbol());
        if require_kind(
            decl.owner(),
            &[TypeKind::Class, TypeKind::Enum],
            "classes and enums",
            &mut sink,
        ) {
            check_to_string(ctx, usage, false, &mut sink);
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        to_string_member(ctx, usage, &provenance(Stereotype::ToString, decl), &[])
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayeredConfig, Settings, ToStringSettings};
    use crate::model::{AttrValue, DeclaredField, DeclaredType, Modifier, Primitive};
    use crate::testing::{body_of, with_config, with_context};
    use rstest::rstest;

    fn order() -> DeclaredType {
        DeclaredType::class("shop.Order")
            .with_field(DeclaredField::new("id", TypeRef::Primitive(Primitive::Int)))
            .with_field(DeclaredField::new(
                "lines",
                TypeRef::Primitive(Primitive::Int).array_of(),
            ))
            .with_field(
                DeclaredField::new("secret", TypeRef::class("String"))
                    .annotated(AnnotationUsage::new("ToString.Exclude")),
            )
            .with_field(
                DeclaredField::new("VERSION", TypeRef::class("String"))
                    .with_modifier(Modifier::Static),
            )
    }

    fn render(ty: &DeclaredType, usage: &AnnotationUsage) -> String {
        with_context(ty, |ctx| {
            let members = ToStringProcessor.generate(ctx, usage, &Declaration::Type(ty));
            body_of(&members, "toString")
        })
    }

    #[test]
    fn prints_labels_and_arrays() {
        let text = render(&order(), &AnnotationUsage::new("ToString"));
        assert_eq!(
            text,
            "return \"Order(\" + \"id=\" + this.id + \", \" + \"lines=\" + java.util.Arrays.toString(this.lines) + \")\";"
        );
    }

    #[rstest]
    #[case(AnnotationUsage::new("ToString").with_bool("includeFieldNames", false), "\"Order(\" + this.id")]
    #[case(AnnotationUsage::new("ToString").with_list("of", ["secret"]), "\"secret=\" + this.secret")]
    fn attributes_shape_output(#[case] usage: AnnotationUsage, #[case] fragment: &str) {
        let text = render(&order(), &usage);
        assert!(text.contains(fragment), "{text}");
    }

    #[test]
    fn include_marker_renames_the_label() {
        let mut ty = order();
        if let Some(field) = ty.fields.iter_mut().find(|f| f.name == "id") {
            field.annotations.push(
                AnnotationUsage::new("ToString.Include")
                    .with_str("name", "orderId")
                    .with("rank", AttrValue::Int(1)),
            );
        }
        let text = render(&ty, &AnnotationUsage::new("ToString"));
        assert!(text.contains("\"orderId=\" + this.id"), "{text}");
    }

    #[test]
    fn nested_types_are_labelled_with_their_outer_type() {
        let outer = DeclaredType::class("shop.Cart").with_nested(order());
        let Some(inner) = outer.nested.first().cloned() else {
            panic!("nested fixture missing");
        };
        let host = crate::host::SnapshotHost::from_types([outer.clone()]);
        let request = crate::context::RequestContext::new();
        let enclosing = [outer];
        let ctx = ProcessorContext::new(&host, &request, &inner, &enclosing, &[]);
        let usage = AnnotationUsage::new("ToString");
        let members = ToStringProcessor.generate(&ctx, &usage, &Declaration::Type(&inner));
        assert!(body_of(&members, "toString").starts_with("return \"Cart.Order(\""));
    }

    #[test]
    fn configuration_can_drop_field_names() {
        let config = LayeredConfig::from_settings(Settings {
            to_string: ToStringSettings {
                include_field_names: Some(false),
                ..ToStringSettings::default()
            },
            ..Settings::default()
        });
        let ty = order();
        let text = with_config(&ty, config, |ctx| {
            let usage = AnnotationUsage::new("ToString");
            body_of(
                &ToStringProcessor.generate(ctx, &usage, &Declaration::Type(&ty)),
                "toString",
            )
        });
        assert!(!text.contains("id="), "{text}");
    }
}
