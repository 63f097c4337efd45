//! `@UtilityClass`: a private constructor that always throws.
//!
//! Making members static and the class final is a modifier transformation,
//! see [`crate::modifiers`].

use crate::model::{
    AccessLevel, AnnotationUsage, Body, Modifiers, Stereotype, SynthMethod, SynthesizedMember,
    TypeKind,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

use super::{provenance, require_kind};

const EXCEPTION: &str = "java.lang.UnsupportedOperationException";
const MESSAGE: &str = "This is a utility class and cannot be instantiated";

/// `@UtilityClass` on a class.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityClassProcessor;

impl Processor for UtilityClassProcessor {
    fn name(&self) -> &'static str {
        "utility_class"
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &[Stereotype::UtilityClass]
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Type
    }

    fn validate(
        &self,
        _ctx: &ProcessorContext<'_>,
        _usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem> {
        let owner = decl.owner();
        let mut sink = ProblemSink::new(Stereotype::UtilityClass, decl.symbol());
        if !require_kind(owner, &[TypeKind::Class], "classes", &mut sink) {
            return sink.into_problems();
        }
        if owner.constructors().next().is_some() {
            sink.error("utility classes cannot have declared constructors")
                .fix(Remediation::RemoveAnnotation);
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        _ctx: &ProcessorContext<'_>,
        _usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        let owner = decl.owner();
        vec![SynthesizedMember::Method(SynthMethod::new(
            owner.name.clone(),
            None,
            Modifiers::of_access(AccessLevel::Private),
            Body::Throw {
                exception: EXCEPTION.to_owned(),
                message: MESSAGE.to_owned(),
            },
            provenance(Stereotype::UtilityClass, decl),
        ))]
    }
}
