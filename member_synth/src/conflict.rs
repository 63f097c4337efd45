//! Signature-based conflict resolution.
//!
//! Declared members always win. Among synthesized members the first one
//! accepted wins, which makes the outcome depend only on the fixed
//! processor order. Members that request shadow or merge semantics may
//! coexist with a declared member of the same signature, but never with a
//! second synthesized one. A shadowing method whose declared twin also has
//! the same return type and staticness is its own materialized copy and
//! conflicts like any other member.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::model::{DeclaredType, Signature, SynthesizedMember, TypeRef};

/// Return type and staticness of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MethodShape {
    return_type: Option<TypeRef>,
    is_static: bool,
}

impl MethodShape {
    fn of(member: &SynthesizedMember) -> Option<Self> {
        member.as_method().map(|m| Self {
            return_type: m.return_type.clone(),
            is_static: m.modifiers.is_static(),
        })
    }
}

/// Tracks taken signatures for one augmentation pass.
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    declared: HashMap<Signature, Option<MethodShape>>,
    synthesized: HashSet<Signature>,
}

impl ConflictResolver {
    /// Seeds the resolver with every declared member of `ty`.
    #[must_use]
    pub fn new(ty: &DeclaredType) -> Self {
        let declared = ty
            .fields
            .iter()
            .map(|f| (Signature::of_declared_field(f), None))
            .chain(ty.methods.iter().map(|m| {
                let shape = MethodShape {
                    return_type: m.return_type.clone(),
                    is_static: m.modifiers.is_static(),
                };
                (Signature::of_declared_method(m), Some(shape))
            }))
            .chain(ty.nested.iter().map(|t| (Signature::of_declared_type(t), None)))
            .collect();
        Self {
            declared,
            synthesized: HashSet::new(),
        }
    }

    /// Whether `signature` is taken by a declared or accepted member.
    #[must_use]
    pub fn is_taken(&self, signature: &Signature) -> bool {
        self.declared.contains_key(signature) || self.synthesized.contains(signature)
    }

    fn clashes_declared(&self, signature: &Signature, member: &SynthesizedMember) -> bool {
        match self.declared.get(signature) {
            None => false,
            Some(_) if !member.allows_shadow() => true,
            Some(shape) => shape.is_some() && *shape == MethodShape::of(member),
        }
    }

    /// Accepts `member` unless its signature collides.
    pub fn admit(&mut self, member: SynthesizedMember) -> Option<SynthesizedMember> {
        let signature = member.signature();
        if self.clashes_declared(&signature, &member) || self.synthesized.contains(&signature) {
            trace!(
                %signature,
                provenance = %member.provenance(),
                "dropping conflicting synthesized member"
            );
            return None;
        }
        self.synthesized.insert(signature);
        Some(member)
    }

    /// Filters `candidates`, keeping the accepted ones in order.
    pub fn filter(&mut self, candidates: Vec<SynthesizedMember>) -> Vec<SynthesizedMember> {
        candidates
            .into_iter()
            .filter_map(|member| self.admit(member))
            .collect()
    }
}
