//! Logger field stereotypes.

use crate::config::ConfigKey;
use crate::model::{
    AccessLevel, AnnotationUsage, LogFlavor, Modifier, Modifiers, Stereotype, SynthField,
    SynthesizedMember, TypeKind, TypeRef,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

use super::{provenance, require_kind};

/// Initializer expression for a logger of `flavor` in `owner_name`.
#[must_use]
pub fn logger_initializer(flavor: LogFlavor, owner_name: &str, topic: Option<&str>) -> String {
    let argument = match topic {
        Some(topic) if flavor.supports_topic() => format!("\"{topic}\""),
        _ if flavor.wants_class_name() => format!("{owner_name}.class.getName()"),
        _ => format!("{owner_name}.class"),
    };
    flavor.factory().replace("{}", &argument)
}

/// Every logger stereotype on a type.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProcessor;

static STEREOTYPES: [Stereotype; 8] = [
    Stereotype::Log(LogFlavor::Slf4j),
    Stereotype::Log(LogFlavor::XSlf4j),
    Stereotype::Log(LogFlavor::Jul),
    Stereotype::Log(LogFlavor::Log4j),
    Stereotype::Log(LogFlavor::Log4j2),
    Stereotype::Log(LogFlavor::CommonsLog),
    Stereotype::Log(LogFlavor::JBossLog),
    Stereotype::Log(LogFlavor::Flogger),
];

fn flavor_of(usage: &AnnotationUsage) -> Option<LogFlavor> {
    match usage.stereotype()? {
        Stereotype::Log(flavor) => Some(flavor),
        _ => None,
    }
}

fn topic(usage: &AnnotationUsage) -> Option<&str> {
    usage.str_attr("topic").filter(|t| !t.is_empty())
}

impl Processor for LogProcessor {
    fn name(&self) -> &'static str {
        "log"
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &STEREOTYPES
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
        let Some(flavor) = flavor_of(usage) else {
            return Vec::new();
        };
        let owner = decl.owner();
        let mut sink = ProblemSink::new(Stereotype::Log(flavor), decl.symbol());
        if !require_kind(owner, &[TypeKind::Class, TypeKind::Enum], "classes and enums", &mut sink) {
            return sink.into_problems();
        }
        let field_name = ctx.config().text(ConfigKey::LogFieldName);
        if owner.field(&field_name).is_some() {
            sink.warning(format!("field '{field_name}' already exists"));
        }
        if topic(usage).is_some() && !flavor.supports_topic() {
            sink.warning(format!("{} does not support a topic", Stereotype::Log(flavor)))
                .fix(Remediation::SetAttribute {
                    name: "topic".to_owned(),
                    value: String::new(),
                });
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        let Some(flavor) = flavor_of(usage) else {
            return Vec::new();
        };
        let owner = decl.owner();
        let config = ctx.config();
        let mut modifiers = Modifiers::of_access(AccessLevel::Private).with(Modifier::Final);
        if config.flag(ConfigKey::LogFieldIsStatic) {
            modifiers = modifiers.with(Modifier::Static);
        }
        vec![SynthesizedMember::Field(SynthField {
            name: config.text(ConfigKey::LogFieldName),
            ty: TypeRef::class(flavor.logger_type()),
            modifiers,
            initializer: Some(logger_initializer(flavor, &owner.name, topic(usage))),
            provenance: provenance(Stereotype::Log(flavor), decl),
        })]
    }
}
