//! A [`SyntheticFactory`] that turns synthesized members into declarations.
//!
//! Folding the handles back into the owner simulates a host that has
//! materialized the generated source, which is how idempotence is checked.

use member_synth::SyntheticFactory;
use member_synth::model::{
    DeclaredField, DeclaredMethod, DeclaredType, SynthMethod, SynthType, SynthesizedMember,
};

/// A synthesized member, as the host would declare it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declared {
    /// A field.
    Field(DeclaredField),
    /// A method or constructor.
    Method(DeclaredMethod),
    /// A nested type.
    Type(DeclaredType),
}

/// Factory producing [`Declared`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaringFactory;

impl SyntheticFactory for DeclaringFactory {
    type Handle = Declared;

    fn create(&self, owner: &DeclaredType, member: &SynthesizedMember) -> Declared {
        declare(&owner.id.to_string(), member)
    }
}

fn declare(owner: &str, member: &SynthesizedMember) -> Declared {
    match member {
        SynthesizedMember::Method(method) => Declared::Method(declare_method(method)),
        SynthesizedMember::Field(field) => {
            let mut declared = DeclaredField::new(field.name.clone(), field.ty.clone());
            declared.modifiers = field.modifiers.clone();
            declared.initializer = field.initializer.clone();
            Declared::Field(declared)
        }
        SynthesizedMember::NestedType(nested) => Declared::Type(declare_type(owner, nested)),
    }
}

fn declare_method(method: &SynthMethod) -> DeclaredMethod {
    let mut declared = match &method.return_type {
        Some(ret) => DeclaredMethod::new(method.name.clone(), ret.clone()),
        None => DeclaredMethod::constructor(method.name.clone()),
    };
    declared.params = method.params.clone();
    declared.modifiers = method.modifiers.clone();
    declared.type_params = method.type_params.clone();
    declared
}

fn declare_type(owner: &str, nested: &SynthType) -> DeclaredType {
    let qualified = format!("{owner}.{}", nested.name);
    let mut declared = DeclaredType::new(&qualified, nested.kind);
    declared.modifiers = nested.modifiers.clone();
    declared.type_params = nested.type_params.clone();
    let handles: Vec<Declared> = nested
        .members
        .iter()
        .map(|member| declare(&qualified, member))
        .collect();
    fold(declared, handles)
}

/// Adds `handles` to `ty` as declared members.
#[must_use]
pub fn fold(ty: DeclaredType, handles: Vec<Declared>) -> DeclaredType {
    handles.into_iter().fold(ty, |acc, handle| match handle {
        Declared::Field(field) => acc.with_field(field),
        Declared::Method(method) => acc.with_method(method),
        Declared::Type(nested) => acc.with_nested(nested),
    })
}
