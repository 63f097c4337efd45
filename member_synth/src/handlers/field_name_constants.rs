//! `@FieldNameConstants`: an inner type holding one constant per field name.

use heck::ToShoutySnakeCase;

use crate::config::ConfigKey;
use crate::model::{
    AccessLevel, AnnotationUsage, Body, DeclaredField, DeclaredType, Modifier, Modifiers,
    Stereotype, SynthField, SynthMethod, SynthType, SynthesizedMember, TypeKind, TypeRef,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

use super::{provenance, require_kind, requested_access};

struct Layout {
    inner_name: String,
    as_enum: bool,
    uppercase: bool,
    access: AccessLevel,
}

impl Layout {
    fn read(ctx: &ProcessorContext<'_>, usage: &AnnotationUsage) -> Self {
        let config = ctx.config();
        let inner_name = usage
            .str_attr("innerTypeName")
            .filter(|n| !n.is_empty())
            .map_or_else(
                || config.text(ConfigKey::FieldNameConstantsInnerTypeName),
                str::to_owned,
            );
        Self {
            inner_name,
            as_enum: usage.flag("asEnum", false),
            uppercase: config.flag(ConfigKey::FieldNameConstantsUppercase),
            access: requested_access(usage, "level", AccessLevel::Public),
        }
    }

    fn kind(&self) -> TypeKind {
        if self.as_enum {
            TypeKind::Enum
        } else {
            TypeKind::Class
        }
    }

    fn constant_name(&self, field: &str) -> String {
        if self.uppercase {
            field.to_shouty_snake_case()
        } else {
            field.to_owned()
        }
    }
}

/// Fields that get a constant, in declaration order.
fn participating<'a>(owner: &'a DeclaredType, usage: &AnnotationUsage) -> Vec<&'a DeclaredField> {
    let only_explicit = usage.flag("onlyExplicitlyIncluded", false);
    owner
        .instance_fields()
        .filter(|f| !f.has_annotation(Stereotype::FieldNameConstantsExclude))
        .filter(|f| !only_explicit || f.has_annotation(Stereotype::FieldNameConstantsInclude))
        .collect()
}

/// `@FieldNameConstants` on a class or enum.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNameConstantsProcessor;

impl Processor for FieldNameConstantsProcessor {
    fn name(&self) -> &'static str {
        "field_name_constants"
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &[Stereotype::FieldNameConstants]
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
        let owner = decl.owner();
        let mut sink = ProblemSink::new(Stereotype::FieldNameConstants, decl.symbol());
        if !require_kind(owner, &[TypeKind::Class, TypeKind::Enum], "classes and enums", &mut sink) {
            return sink.into_problems();
        }
        let layout = Layout::read(ctx, usage);
        if let Some(existing) = owner.nested.iter().find(|t| t.name == layout.inner_name) {
            if existing.kind != layout.kind() {
                let wanted = if layout.as_enum { "an enum" } else { "a class" };
                sink.error(format!(
                    "existing type '{}' is not {wanted}",
                    layout.inner_name
                ))
                .fix(Remediation::SetAttribute {
                    name: "asEnum".to_owned(),
                    value: (!layout.as_enum).to_string(),
                });
            }
        }
        if participating(owner, usage).is_empty() {
            sink.warning("no fields qualify; the generated type will be empty");
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        let owner = decl.owner();
        let layout = Layout::read(ctx, usage);
        if layout.access == AccessLevel::None {
            return Vec::new();
        }
        let origin = provenance(Stereotype::FieldNameConstants, decl);
        let existing = owner.nested.iter().find(|t| t.name == layout.inner_name);
        let already_declared = |name: &str| {
            existing.is_some_and(|t| t.fields.iter().any(|f| f.name == name))
        };

        let constant_modifiers = Modifiers::of_access(AccessLevel::Public)
            .with(Modifier::Static)
            .with(Modifier::Final);
        let mut members: Vec<SynthesizedMember> = participating(owner, usage)
            .into_iter()
            .map(|f| (layout.constant_name(&f.name), f.name.as_str()))
            .filter(|(constant, _)| !already_declared(constant))
            .map(|(constant, field)| {
                let (ty, initializer) = if layout.as_enum {
                    (TypeRef::class(layout.inner_name.clone()), None)
                } else {
                    (TypeRef::class("java.lang.String"), Some(format!("\"{field}\"")))
                };
                SynthesizedMember::Field(SynthField {
                    name: constant,
                    ty,
                    modifiers: constant_modifiers.clone(),
                    initializer,
                    provenance: origin.clone(),
                })
            })
            .collect();

        let has_constructor = existing.is_some_and(|t| t.constructors().next().is_some());
        if !layout.as_enum && !has_constructor {
            members.push(SynthesizedMember::Method(SynthMethod::new(
                layout.inner_name.clone(),
                None,
                Modifiers::of_access(AccessLevel::Private),
                Body::Constructor {
                    null_checks: Vec::new(),
                    assignments: Vec::new(),
                },
                origin.clone(),
            )));
        }

        let mut modifiers = Modifiers::of_access(layout.access).with(Modifier::Static);
        if !layout.as_enum {
            modifiers = modifiers.with(Modifier::Final);
        }
        vec![SynthesizedMember::NestedType(SynthType {
            name: layout.inner_name.clone(),
            kind: layout.kind(),
            modifiers,
            type_params: Vec::new(),
            members,
            merges_into_declared: existing.is_some(),
            provenance: origin,
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldNameConstantSettings, LayeredConfig, Settings};
    use crate::testing::{with_config, with_context};

    fn user() -> DeclaredType {
        DeclaredType::class("a.User")
            .with_field(DeclaredField::new("firstName", TypeRef::class("String")))
            .with_field(
                DeclaredField::new("password", TypeRef::class("String"))
                    .annotated(AnnotationUsage::new("FieldNameConstants.Exclude")),
            )
            .with_field(
                DeclaredField::new("COUNT", TypeRef::Primitive(crate::model::Primitive::Int))
                    .with_modifier(Modifier::Static),
            )
    }

    fn nested(members: &[SynthesizedMember]) -> Option<&SynthType> {
        members.first().and_then(SynthesizedMember::as_nested_type)
    }

    fn constant_names(ty: &SynthType) -> Vec<&str> {
        ty.members
            .iter()
            .filter_map(SynthesizedMember::as_field)
            .map(|f| f.name.as_str())
            .collect()
    }

    #[test]
    fn class_layout_holds_string_constants() {
        let ty = user();
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("FieldNameConstants");
            let members = FieldNameConstantsProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            let Some(inner) = nested(&members) else {
                panic!("expected a nested type");
            };
            assert_eq!(inner.name, "Fields");
            assert_eq!(inner.kind, TypeKind::Class);
            assert_eq!(constant_names(inner), ["firstName"]);
            let initializer = inner
                .members
                .iter()
                .filter_map(SynthesizedMember::as_field)
                .find_map(|f| f.initializer.clone());
            assert_eq!(initializer.as_deref(), Some("\"firstName\""));
        });
    }

    #[test]
    fn enum_layout_and_uppercase_configuration() {
        let ty = user();
        let config = LayeredConfig::from_settings(Settings {
            field_name_constants: FieldNameConstantSettings {
                inner_type_name: Some("Props".to_owned()),
                uppercase: Some(true),
            },
            ..Settings::default()
        });
        with_config(&ty, config, |ctx| {
            let usage = AnnotationUsage::new("FieldNameConstants").with_bool("asEnum", true);
            let members = FieldNameConstantsProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            let Some(inner) = nested(&members) else {
                panic!("expected a nested type");
            };
            assert_eq!(inner.name, "Props");
            assert_eq!(inner.kind, TypeKind::Enum);
            assert_eq!(constant_names(inner), ["FIRST_NAME"]);
        });
    }

    #[test]
    fn existing_inner_type_is_filled_in() {
        let ty = user().with_nested(
            DeclaredType::class("a.User.Fields")
                .with_field(DeclaredField::new("firstName", TypeRef::class("String"))),
        );
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("FieldNameConstants");
            let members = FieldNameConstantsProcessor.generate(ctx, &usage, &Declaration::Type(&ty));
            let Some(inner) = nested(&members) else {
                panic!("expected a nested type");
            };
            assert!(inner.merges_into_declared);
            assert!(constant_names(inner).is_empty());
        });
    }

    #[test]
    fn existing_inner_type_of_the_wrong_kind_is_an_error() {
        let ty = user().with_nested(DeclaredType::class("a.User.Fields"));
        with_context(&ty, |ctx| {
            let usage = AnnotationUsage::new("FieldNameConstants").with_bool("asEnum", true);
            let problems = FieldNameConstantsProcessor.validate(ctx, &usage, &Declaration::Type(&ty));
            assert!(problems.iter().any(Problem::is_error));
        });
    }
}
