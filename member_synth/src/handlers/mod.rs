//! Stereotype processors and the generators they share.
//!
//! Generators are free functions so that composite stereotypes can call
//! the narrower ones directly instead of dispatching through the catalog.

pub mod accessors;
pub mod composite;
pub mod constructors;
pub mod equality;
pub mod field_name_constants;
pub mod log;
pub mod markers;
pub mod to_string;
pub mod utility_class;

use crate::model::{
    AccessLevel, AnnotationUsage, DeclaredField, DeclaredType, Modifier, Modifiers, Primitive,
    Provenance, Stereotype, SynthesizedMember, TypeKind, TypeRef, ValueKind,
};
use crate::processor::{Declaration, ProcessorContext};
use crate::problem::ProblemSink;

/// Comparison/printing shape of a value of type `ty`.
#[must_use]
pub fn value_kind(ty: &TypeRef) -> ValueKind {
    match ty {
        TypeRef::Primitive(p) => ValueKind::Primitive(*p),
        TypeRef::Array(component) => ValueKind::Array {
            deep: !component.is_primitive(),
        },
        TypeRef::Class { .. } | TypeRef::Wildcard(_) => ValueKind::Reference,
    }
}

/// Whether assigning `field` from a parameter needs a null check.
#[must_use]
pub fn needs_null_check(field: &DeclaredField) -> bool {
    field.has_annotation(Stereotype::NonNull) && !field.ty.is_primitive()
}

/// Access level requested by `attr`, falling back to `default`.
#[must_use]
pub fn requested_access(usage: &AnnotationUsage, attr: &str, default: AccessLevel) -> AccessLevel {
    usage.access_attr(attr).unwrap_or(default)
}

/// Modifiers for a generated member with `access`; static when `is_static`.
#[must_use]
pub fn member_modifiers(access: AccessLevel, is_static: bool) -> Modifiers {
    let modifiers = Modifiers::of_access(access);
    if is_static {
        modifiers.with(Modifier::Static)
    } else {
        modifiers
    }
}

/// Reads `field` on `receiver`, through its getter when one exists and
/// `use_getters` is set. `pending` holds members generated by the caller
/// that are not yet accepted.
#[must_use]
pub fn field_access(
    ctx: &ProcessorContext<'_>,
    field: &DeclaredField,
    receiver: &str,
    use_getters: bool,
    pending: &[SynthesizedMember],
) -> String {
    if use_getters {
        let policy = ctx.accessor_policy(Some(field));
        if let Some(getter) = policy.getter_name(&field.name, &field.ty) {
            let pending_has = pending
                .iter()
                .filter_map(SynthesizedMember::as_method)
                .any(|m| m.name == getter && m.params.is_empty());
            let declared_has = ctx
                .owner()
                .methods
                .iter()
                .any(|m| m.name == getter && m.params.is_empty());
            let synthesized_has = ctx
                .synthesized()
                .iter()
                .filter_map(SynthesizedMember::as_method)
                .any(|m| m.name == getter && m.params.is_empty());
            if pending_has || declared_has || synthesized_has {
                return format!("{receiver}.{getter}()");
            }
        }
    }
    format!("{receiver}.{}", field.name)
}

/// Reports an error unless `owner` is one of `allowed` kinds.
pub fn require_kind(
    owner: &DeclaredType,
    allowed: &[TypeKind],
    what: &str,
    sink: &mut ProblemSink,
) -> bool {
    if allowed.contains(&owner.kind) {
        return true;
    }
    let message = format!("{} is only supported on {what}", sink.anchor().stereotype);
    sink.error(message);
    false
}

/// Dotted label of `owner` including enclosing types, outermost first.
#[must_use]
pub fn nested_label(ctx: &ProcessorContext<'_>, owner: &DeclaredType) -> String {
    let mut parts: Vec<&str> = ctx.enclosing().iter().rev().map(|t| t.name.as_str()).collect();
    parts.push(&owner.name);
    parts.join(".")
}

/// `java.lang.Object`, the parameter type of `equals`.
#[must_use]
pub fn object_type() -> TypeRef {
    TypeRef::class("java.lang.Object")
}

/// Primitive `boolean`.
#[must_use]
pub const fn boolean_type() -> TypeRef {
    TypeRef::Primitive(Primitive::Boolean)
}

/// Provenance of members generated for `stereotype` on `decl`.
#[must_use]
pub fn provenance(stereotype: Stereotype, decl: &Declaration<'_>) -> Provenance {
    Provenance::new(stereotype, decl.symbol())
}
