//! Builders for declared snapshots used across test suites.

use member_synth::model::{AnnotationUsage, DeclaredField, DeclaredType, SynthesizedMember, TypeRef};

/// Parses `text` as a type reference.
///
/// # Panics
///
/// Panics if `text` is not a valid type; fixtures are expected to be.
#[must_use]
pub fn ty(text: &str) -> TypeRef {
    TypeRef::parse(text).unwrap_or_else(|err| panic!("fixture type {text}: {err}"))
}

/// A field of type `text` carrying one annotation per entry in `annotations`.
///
/// # Panics
///
/// Panics if `text` is not a valid type.
#[must_use]
pub fn field(name: &str, text: &str, annotations: &[&str]) -> DeclaredField {
    annotations
        .iter()
        .fold(DeclaredField::new(name, ty(text)), |acc, annotation| {
            acc.annotated(AnnotationUsage::new(*annotation))
        })
}

/// `a.Post`: a `@Builder` class with two `@Singular` string lists, `tags`
/// and `notes`, and a plain `title`.
#[must_use]
pub fn post() -> DeclaredType {
    DeclaredType::class("a.Post")
        .annotated(AnnotationUsage::new("Builder"))
        .with_field(field("title", "String", &[]))
        .with_field(field("tags", "java.util.List<String>", &["Singular"]))
        .with_field(field("notes", "java.util.List<String>", &["Singular"]))
}

/// `a.Person`: a `@Data` class with a `@NonNull` name, an age and an
/// `isActive` boolean.
#[must_use]
pub fn person() -> DeclaredType {
    DeclaredType::class("a.Person")
        .annotated(AnnotationUsage::new("Data"))
        .with_field(field("name", "String", &["NonNull"]))
        .with_field(field("age", "int", &[]))
        .with_field(field("isActive", "boolean", &[]))
}

/// `a.Point`: a `@Value` class with two coordinates.
#[must_use]
pub fn point() -> DeclaredType {
    DeclaredType::class("a.Point")
        .annotated(AnnotationUsage::new("Value"))
        .with_field(field("x", "int", &[]))
        .with_field(field("y", "int", &[]))
}

/// Names of `members`, in order.
#[must_use]
pub fn names(members: &[SynthesizedMember]) -> Vec<&str> {
    members.iter().map(SynthesizedMember::name).collect()
}

/// The nested type called `name` among `members`.
#[must_use]
pub fn nested<'a>(members: &'a [SynthesizedMember], name: &str) -> Option<&'a [SynthesizedMember]> {
    members
        .iter()
        .filter_map(SynthesizedMember::as_nested_type)
        .find(|t| t.name == name)
        .map(|t| t.members.as_slice())
}

/// Rendered signatures of the methods in `members`, e.g.
/// `public PostBuilder tag(String tag)`.
#[must_use]
pub fn rendered(members: &[SynthesizedMember]) -> Vec<String> {
    members
        .iter()
        .filter(|m| m.as_method().is_some())
        .map(ToString::to_string)
        .collect()
}
