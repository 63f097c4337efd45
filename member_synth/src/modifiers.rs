//! Effective modifiers.
//!
//! `@FieldDefaults`, `@Value` and `@UtilityClass` change the modifiers a
//! host should report for declared fields, methods and types, without
//! touching source. The augmenter runs processors over a snapshot with
//! these modifiers applied, so for instance `@Value` fields count as final
//! when constructors pick their parameters.

use crate::config::{ConfigKey, ConfigSource, ConfigView};
use crate::model::{
    AccessLevel, DeclaredField, DeclaredMethod, DeclaredType, Modifier, Modifiers, Stereotype,
    TypeKind,
};

/// Field defaults in force for one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldDefaults {
    level: Option<AccessLevel>,
    make_final: bool,
    skip_static: bool,
}

impl FieldDefaults {
    /// Explicit `@FieldDefaults` wins over `@Value`, which wins over
    /// configuration.
    fn for_owner(owner: &DeclaredType, config: &ConfigView<'_>) -> Self {
        if let Some(usage) = owner.annotation(Stereotype::FieldDefaults) {
            return Self {
                level: usage
                    .access_attr("level")
                    .filter(|level| *level != AccessLevel::None),
                make_final: usage.flag("makeFinal", false),
                skip_static: false,
            };
        }
        if owner.has_annotation(Stereotype::Value) {
            return Self {
                level: Some(AccessLevel::Private),
                make_final: true,
                skip_static: true,
            };
        }
        Self {
            level: config
                .flag(ConfigKey::FieldDefaultsPrivate)
                .then_some(AccessLevel::Private),
            make_final: config.flag(ConfigKey::FieldDefaultsFinal),
            skip_static: false,
        }
    }
}

/// Modifiers `field` effectively has, starting from `declared`.
#[must_use]
pub fn field_modifiers(
    declared: &Modifiers,
    field: &DeclaredField,
    owner: &DeclaredType,
    config: &ConfigView<'_>,
) -> Modifiers {
    let mut modifiers = declared.clone();
    if owner.has_annotation(Stereotype::UtilityClass) {
        modifiers = modifiers.with(Modifier::Static);
    }
    if field.name.starts_with('$') || !matches!(owner.kind, TypeKind::Class | TypeKind::Enum) {
        return modifiers;
    }
    let defaults = FieldDefaults::for_owner(owner, config);
    if defaults.skip_static && modifiers.is_static() {
        return modifiers;
    }
    if let Some(level) = defaults.level {
        let package_private = modifiers.access() == AccessLevel::Package;
        if package_private && !field.has_annotation(Stereotype::PackagePrivate) {
            modifiers = modifiers.with_access(level);
        }
    }
    if defaults.make_final && !field.has_annotation(Stereotype::NonFinal) {
        modifiers = modifiers.with(Modifier::Final);
    }
    modifiers
}

/// Modifiers `method` effectively has; members of utility classes are static.
#[must_use]
pub fn method_modifiers(
    declared: &Modifiers,
    method: &DeclaredMethod,
    owner: &DeclaredType,
) -> Modifiers {
    if owner.has_annotation(Stereotype::UtilityClass) && !method.is_constructor() {
        declared.clone().with(Modifier::Static)
    } else {
        declared.clone()
    }
}

/// Modifiers `ty` effectively has. `enclosing` is the directly enclosing
/// type, if any.
#[must_use]
pub fn type_modifiers(
    declared: &Modifiers,
    ty: &DeclaredType,
    enclosing: Option<&DeclaredType>,
) -> Modifiers {
    let mut modifiers = declared.clone();
    if ty.has_annotation(Stereotype::Value) && !ty.has_annotation(Stereotype::NonFinal) {
        modifiers = modifiers.with(Modifier::Final);
    }
    if ty.has_annotation(Stereotype::UtilityClass) {
        modifiers = modifiers.with(Modifier::Final);
        if enclosing.is_some() {
            modifiers = modifiers.with(Modifier::Static);
        }
    }
    if enclosing.is_some_and(|outer| outer.has_annotation(Stereotype::UtilityClass)) {
        modifiers = modifiers.with(Modifier::Static);
    }
    modifiers
}

/// Copy of `ty` with effective modifiers applied throughout, nested types
/// included.
#[must_use]
pub fn effective_snapshot(
    ty: &DeclaredType,
    enclosing: Option<&DeclaredType>,
    source: &dyn ConfigSource,
) -> DeclaredType {
    let config = ConfigView::new(source, ty);
    let mut effective = ty.clone();
    effective.modifiers = type_modifiers(&ty.modifiers, ty, enclosing);
    for field in &mut effective.fields {
        field.modifiers = field_modifiers(&field.modifiers, field, ty, &config);
    }
    for method in &mut effective.methods {
        method.modifiers = method_modifiers(&method.modifiers, method, ty);
    }
    effective.nested = ty
        .nested
        .iter()
        .map(|nested| effective_snapshot(nested, Some(ty), source))
        .collect();
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldDefaultSettings, LayeredConfig, Settings};
    use crate::model::{AnnotationUsage, TypeRef};
    use rstest::rstest;

    fn field(name: &str) -> DeclaredField {
        DeclaredField::new(name, TypeRef::class("String"))
    }

    fn effective_field(ty: &DeclaredType, name: &str, config: &LayeredConfig) -> Modifiers {
        let Some(found) = ty.field(name) else {
            panic!("fixture field {name} missing");
        };
        field_modifiers(&found.modifiers, found, ty, &ConfigView::new(config, ty))
    }

    #[rstest]
    #[case::value_fields(AnnotationUsage::new("Value"), "private final")]
    #[case::field_defaults(
        AnnotationUsage::new("FieldDefaults").with_str("level", "PROTECTED"),
        "protected"
    )]
    #[case::make_final_only(
        AnnotationUsage::new("FieldDefaults").with_bool("makeFinal", true),
        "final"
    )]
    fn package_private_fields(#[case] annotation: AnnotationUsage, #[case] expected: &str) {
        let ty = DeclaredType::class("a.Point")
            .annotated(annotation)
            .with_field(field("x"));
        let modifiers = effective_field(&ty, "x", &LayeredConfig::defaults());
        assert_eq!(modifiers.to_string(), expected);
    }

    #[test]
    fn exemptions_are_honoured() {
        let ty = DeclaredType::class("a.Point")
            .annotated(AnnotationUsage::new("Value"))
            .with_field(field("x").annotated(AnnotationUsage::new("NonFinal")))
            .with_field(field("y").annotated(AnnotationUsage::new("PackagePrivate")))
            .with_field(field("z").with_modifier(Modifier::Public))
            .with_field(field("COUNT").with_modifier(Modifier::Static));
        let config = LayeredConfig::defaults();
        assert_eq!(effective_field(&ty, "x", &config).to_string(), "private");
        assert_eq!(effective_field(&ty, "y", &config).to_string(), "final");
        assert_eq!(effective_field(&ty, "z", &config).to_string(), "public final");
        assert_eq!(effective_field(&ty, "COUNT", &config).to_string(), "static");
    }

    #[test]
    fn configured_defaults_apply_without_annotations() {
        let ty = DeclaredType::class("a.Point").with_field(field("x"));
        let config = LayeredConfig::from_settings(Settings {
            field_defaults: FieldDefaultSettings {
                default_private: Some(true),
                default_final: Some(true),
            },
            ..Settings::default()
        });
        assert_eq!(effective_field(&ty, "x", &config).to_string(), "private final");
    }

    #[test]
    fn utility_class_makes_members_static() {
        let ty = DeclaredType::class("a.Outer").with_nested(
            DeclaredType::class("a.Outer.Strings")
                .annotated(AnnotationUsage::new("UtilityClass"))
                .with_field(field("EMPTY"))
                .with_method(DeclaredMethod::new("trim", TypeRef::class("String")))
                .with_nested(DeclaredType::class("a.Outer.Strings.Inner")),
        );
        let effective = effective_snapshot(&ty, None, &LayeredConfig::defaults());
        let Some(strings) = effective.nested.first() else {
            panic!("nested type missing");
        };
        assert_eq!(strings.modifiers.to_string(), "static final");
        assert!(strings.fields.iter().all(|f| f.is_static()));
        assert!(strings.methods.iter().all(|m| m.modifiers.is_static()));
        assert!(strings.nested.iter().all(|n| n.modifiers.is_static()));
    }

    #[test]
    fn value_types_become_final() {
        let ty = DeclaredType::class("a.Point").annotated(AnnotationUsage::new("Value"));
        assert!(type_modifiers(&ty.modifiers, &ty, None).is_final());
        let open = ty.annotated(AnnotationUsage::new("NonFinal"));
        assert!(!type_modifiers(&open.modifiers, &open, None).is_final());
    }
}
