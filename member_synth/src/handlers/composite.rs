//! `@Data` and `@Value`.
//!
//! Both call the narrower generators directly. An explicit narrower
//! stereotype on the same type always wins, and `@Value` wins over `@Data`.

use crate::model::{
    AccessLevel, AnnotationUsage, DeclaredType, Provenance, Stereotype, SynthesizedMember,
    TypeKind,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

use super::accessors::AccessorKind;
use super::constructors::{
    ConstructorKind, ConstructorRequest, constructor, has_explicit_constructor_annotation,
};
use super::equality::{check_equality, equality_members};
use super::provenance;
use super::to_string::{check_to_string, to_string_member};

/// Which composite a [`CompositeProcessor`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    /// Mutable data class.
    Data,
    /// Immutable value class.
    Value,
}

impl CompositeKind {
    const fn stereotype(self) -> Stereotype {
        match self {
            Self::Data => Stereotype::Data,
            Self::Value => Stereotype::Value,
        }
    }

    const fn constructor_kind(self) -> ConstructorKind {
        match self {
            Self::Data => ConstructorKind::RequiredArgs,
            Self::Value => ConstructorKind::AllArgs,
        }
    }

    /// `@Data` steps aside when `@Value` is present.
    fn is_shadowed(self, owner: &DeclaredType) -> bool {
        self == Self::Data && owner.has_annotation(Stereotype::Value)
    }
}

fn equality_usage() -> AnnotationUsage {
    AnnotationUsage::new(Stereotype::EqualsAndHashCode.name())
}

fn to_string_usage() -> AnnotationUsage {
    AnnotationUsage::new(Stereotype::ToString.name())
}

fn wants_constructor(ctx: &ProcessorContext<'_>, owner: &DeclaredType) -> bool {
    !has_explicit_constructor_annotation(owner)
        && !owner.has_annotation(Stereotype::Builder)
        && !ctx.constructor_exists(None)
}

fn accessors(
    ctx: &ProcessorContext<'_>,
    kind: AccessorKind,
    stereotype: Stereotype,
    origin: &Provenance,
) -> Vec<SynthesizedMember> {
    let owner = ctx.owner();
    if owner.has_annotation(stereotype) {
        return Vec::new();
    }
    owner
        .instance_fields()
        .filter(|f| !f.has_annotation(stereotype))
        .filter_map(|f| kind.implicit(ctx, f, AccessLevel::Public, origin))
        .map(SynthesizedMember::Method)
        .collect()
}

/// `@Data` or `@Value` on a class.
#[derive(Debug, Clone, Copy)]
pub struct CompositeProcessor {
    kind: CompositeKind,
}

impl CompositeProcessor {
    /// Processor for `kind`.
    #[must_use]
    pub const fn new(kind: CompositeKind) -> Self {
        Self { kind }
    }
}

impl Processor for CompositeProcessor {
    fn name(&self) -> &'static str {
        match self.kind {
            CompositeKind::Data => "data",
            CompositeKind::Value => "value",
        }
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        match self.kind {
            CompositeKind::Data => &[Stereotype::Data],
            CompositeKind::Value => &[Stereotype::Value],
        }
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Type
    }

    fn validate(
        &self,
        ctx: &ProcessorContext<'_>,
        _usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem> {
        let owner = decl.owner();
        let mut sink = ProblemSink::new(self.kind.stereotype(), decl.symbol());
        if !super::require_kind(owner, &[TypeKind::Class], "classes", &mut sink) {
            return sink.into_problems();
        }
        if self.kind.is_shadowed(owner) {
            sink.warning("@Data is redundant next to @Value and is ignored")
                .fix(Remediation::RemoveAnnotation);
            return sink.into_problems();
        }
        if !owner.has_annotation(Stereotype::EqualsAndHashCode) {
            check_equality(ctx, &equality_usage(), true, &mut sink);
        }
        if !owner.has_annotation(Stereotype::ToString) {
            check_to_string(ctx, &to_string_usage(), true, &mut sink);
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
        if self.kind.is_shadowed(owner) {
            return Vec::new();
        }
        let origin = provenance(self.kind.stereotype(), decl);

        let mut members = accessors(ctx, AccessorKind::Getter, Stereotype::Getter, &origin);
        if self.kind == CompositeKind::Data {
            members.extend(accessors(ctx, AccessorKind::Setter, Stereotype::Setter, &origin));
        }
        if wants_constructor(ctx, owner) {
            let request = ConstructorRequest {
                kind: self.kind.constructor_kind(),
                access: AccessLevel::Public,
                static_name: usage.str_attr("staticConstructor").filter(|n| !n.is_empty()),
                force: false,
            };
            members.extend(constructor(ctx, &request, &origin));
        }
        if !owner.has_annotation(Stereotype::EqualsAndHashCode) {
            let equality = equality_members(ctx, &equality_usage(), &origin, &members);
            members.extend(equality);
        }
        if !owner.has_annotation(Stereotype::ToString) {
            let to_string = to_string_member(ctx, &to_string_usage(), &origin, &members);
            members.extend(to_string);
        }
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclaredField, DeclaredMethod, Modifier, Primitive, TypeRef};
    use crate::testing::{body_of, names, with_context};

    fn person() -> DeclaredType {
        DeclaredType::class("a.Person")
            .with_field(
                DeclaredField::new("name", TypeRef::class("String"))
                    .with_modifier(Modifier::Private)
                    .with_modifier(Modifier::Final),
            )
            .with_field(
                DeclaredField::new("age", TypeRef::Primitive(Primitive::Int))
                    .with_modifier(Modifier::Private),
            )
    }

    fn run(kind: CompositeKind, ty: &DeclaredType, usage: &AnnotationUsage) -> Vec<SynthesizedMember> {
        with_context(ty, |ctx| {
            CompositeProcessor::new(kind).generate(ctx, usage, &Declaration::Type(ty))
        })
    }

    #[test]
    fn data_generates_the_full_set() {
        let ty = person().annotated(AnnotationUsage::new("Data"));
        let members = run(CompositeKind::Data, &ty, &AnnotationUsage::new("Data"));
        assert_eq!(
            names(&members),
            ["getName", "getAge", "setAge", "Person", "equals", "canEqual", "hashCode", "toString"]
        );
        assert!(body_of(&members, "equals").contains("this.getName()"));
        assert!(body_of(&members, "toString").contains("this.getAge()"));
    }

    #[test]
    fn value_is_immutable() {
        let ty = person().with_modifier(Modifier::Final);
        let members = run(CompositeKind::Value, &ty, &AnnotationUsage::new("Value"));
        assert_eq!(
            names(&members),
            ["getName", "getAge", "Person", "equals", "hashCode", "toString"]
        );
        let ctor = members
            .iter()
            .filter_map(SynthesizedMember::as_method)
            .find(|m| m.is_constructor())
            .map(|m| m.params.len());
        assert_eq!(ctor, Some(2));
    }

    #[test]
    fn explicit_narrow_stereotypes_take_precedence() {
        let ty = person()
            .annotated(AnnotationUsage::new("ToString"))
            .annotated(AnnotationUsage::new("NoArgsConstructor"))
            .with_method(DeclaredMethod::new("getName", TypeRef::class("String")));
        let members = run(CompositeKind::Data, &ty, &AnnotationUsage::new("Data"));
        assert_eq!(
            names(&members),
            ["getAge", "setAge", "equals", "canEqual", "hashCode"]
        );
    }

    #[test]
    fn data_next_to_value_warns_and_yields() {
        let ty = person().annotated(AnnotationUsage::new("Value"));
        let usage = AnnotationUsage::new("Data");
        with_context(&ty, |ctx| {
            let processor = CompositeProcessor::new(CompositeKind::Data);
            let problems = processor.validate(ctx, &usage, &Declaration::Type(&ty));
            assert_eq!(problems.len(), 1);
            assert!(processor.generate(ctx, &usage, &Declaration::Type(&ty)).is_empty());
        });
    }

    #[test]
    fn static_constructor_is_honoured() {
        let ty = person();
        let usage = AnnotationUsage::new("Data").with_str("staticConstructor", "of");
        let members = run(CompositeKind::Data, &ty, &usage);
        assert!(names(&members).contains(&"of"));
    }
}
