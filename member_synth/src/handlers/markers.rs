//! Validation of the builder field markers `@Builder.Default` and `@Singular`.
//!
//! The builder engine consumes both markers; this processor only reports
//! misuse and never generates anything.

use crate::model::{AnnotationUsage, DeclaredType, Stereotype, SynthesizedMember};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

fn builder_present(owner: &DeclaredType) -> bool {
    owner.has_annotation(Stereotype::Builder)
        || owner
            .methods
            .iter()
            .any(|m| m.annotation(Stereotype::Builder).is_some())
}

/// `@Builder.Default` and `@Singular` on fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderMarkerProcessor;

impl Processor for BuilderMarkerProcessor {
    fn name(&self) -> &'static str {
        "builder.markers"
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &[Stereotype::BuilderDefault, Stereotype::Singular]
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Field
    }

    fn validate(
        &self,
        _ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem> {
        let Declaration::Field { owner, field } = decl else {
            return Vec::new();
        };
        let Some(stereotype) = usage.stereotype() else {
            return Vec::new();
        };
        let mut sink = ProblemSink::new(stereotype, decl.symbol());
        if stereotype == Stereotype::BuilderDefault {
            if !field.has_initializer() {
                sink.error("@Builder.Default requires an initializing expression")
                    .fix(Remediation::RemoveAnnotation);
            }
            if field.has_annotation(Stereotype::Singular) {
                sink.error("@Builder.Default and @Singular cannot be mixed")
                    .fix(Remediation::RemoveAnnotation);
            }
            if field.is_static() {
                sink.error("@Builder.Default cannot be placed on a static field");
            }
        }
        if !builder_present(owner) {
            sink.warning(format!(
                "{stereotype} only takes effect together with @Builder"
            ))
            .fix(Remediation::RemoveAnnotation);
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        _ctx: &ProcessorContext<'_>,
        _usage: &AnnotationUsage,
        _decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        Vec::new()
    }
}
