//! Symbol model: declared snapshots in, synthesized members out.

mod annotation;
mod body;
mod declared;
mod member;
mod stereotype;
mod types;

pub use annotation::{AnnotationUsage, AttrValue, Attribute};
pub use body::{
    Body, BuildArg, BuildSource, FieldComparison, MaterializeArm, Materialization, ToStringPart,
    ValueKind,
};
pub use declared::{
    AccessLevel, DeclaredField, DeclaredMethod, DeclaredType, Modifier, Modifiers, Param, TypeId,
    TypeKind,
};
pub use member::{
    CONSTRUCTOR_NAME, MemberKind, Provenance, Signature, SynthField, SynthMethod, SynthType,
    SynthesizedMember,
};
pub use stereotype::{LogFlavor, Stereotype};
pub use types::{Primitive, TypeRef, WildcardBound};
