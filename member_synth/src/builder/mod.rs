//! `@Builder`: a nested fluent builder plus its entry points.
//!
//! A builder collects one [`BuilderInfo`] per field (type level) or per
//! parameter (constructor and static-method level). Plain entries get one
//! setter; `@Builder.Default` entries track whether they were set; entries
//! marked `@Singular` accumulate element-wise and are materialized three
//! ways in `build()`.

mod info;
mod materialize;
mod singular;
mod strategy;

pub use info::BuilderInfo;
pub use materialize::{ListAccumulator, MapAccumulator, Materialized};
pub use singular::{Container, select_strategy};
pub use strategy::{AccumulationStrategy, SingularSpec};

use crate::config::ConfigKey;
use crate::handlers::constructors::has_explicit_constructor_annotation;
use crate::handlers::{member_modifiers, nested_label, provenance, requested_access};
use crate::model::{
    AccessLevel, AnnotationUsage, Body, DeclaredField, DeclaredMethod, DeclaredType, Modifiers,
    Primitive, Provenance, Signature, Stereotype, SynthMethod, SynthType, SynthesizedMember,
    TypeKind, TypeRef,
};
use crate::naming::capitalize;
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

const OVERRIDE: &str = "@java.lang.Override";

/// What the builder ultimately calls.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    /// Type level: a generated package-private all-args constructor.
    Type,
    /// An annotated constructor.
    Constructor(&'a DeclaredMethod),
    /// An annotated static method.
    StaticMethod(&'a DeclaredMethod),
}

/// Attribute values of one `@Builder` usage.
#[derive(Debug, Clone)]
struct Options {
    class_name: String,
    builder_method: String,
    build_method: String,
    to_builder: bool,
    access: AccessLevel,
    setter_prefix: String,
    fluent: bool,
}

fn text_attr(usage: &AnnotationUsage, name: &str, default: &str) -> String {
    usage
        .str_attr(name)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_owned()
}

impl Options {
    fn read(ctx: &ProcessorContext<'_>, usage: &AnnotationUsage, built: &TypeRef) -> Self {
        let simple = built
            .simple_name()
            .map_or_else(|| capitalize(&built.to_string()), str::to_owned);
        let class_name = usage
            .str_attr("builderClassName")
            .filter(|name| !name.is_empty())
            .map_or_else(
                || ctx.config().text(ConfigKey::BuilderClassName).replace('*', &simple),
                str::to_owned,
            );
        Self {
            class_name,
            builder_method: usage.str_attr("builderMethodName").unwrap_or("builder").to_owned(),
            build_method: text_attr(usage, "buildMethodName", "build"),
            to_builder: usage.flag("toBuilder", false),
            access: requested_access(usage, "access", AccessLevel::Public),
            setter_prefix: usage.str_attr("setterPrefix").unwrap_or_default().to_owned(),
            fluent: usage.flag("fluent", ctx.config().flag(ConfigKey::BuilderFluent)),
        }
    }
}

/// Fields a type-level builder collects.
///
/// Initialised finals are skipped unless they carry `@Builder.Default`.
fn builder_fields(owner: &DeclaredType) -> impl Iterator<Item = &DeclaredField> {
    owner
        .instance_fields()
        .filter(|f| !f.name.starts_with('$'))
        .filter(|f| {
            !(f.is_final() && f.has_initializer()) || f.has_annotation(Stereotype::BuilderDefault)
        })
}

/// Everything needed to emit one builder.
struct Plan<'a> {
    owner: &'a DeclaredType,
    target: Target<'a>,
    options: Options,
    infos: Vec<BuilderInfo>,
    type_params: Vec<String>,
    built: TypeRef,
}

impl Plan<'_> {
    fn builder_type(&self) -> TypeRef {
        TypeRef::generic(
            self.options.class_name.clone(),
            self.type_params.iter().map(TypeRef::class).collect(),
        )
    }

    /// Return type of builder setters: the builder when fluent, else `void`.
    fn setter_return(&self) -> TypeRef {
        if self.options.fluent {
            self.builder_type()
        } else {
            TypeRef::Primitive(Primitive::Void)
        }
    }

    fn returns_void(&self) -> bool {
        self.built == TypeRef::Primitive(Primitive::Void)
    }

    fn call(&self) -> String {
        let names: Vec<&str> = self.infos.iter().map(|i| i.name.as_str()).collect();
        let args = names.join(", ");
        match self.target {
            Target::Type | Target::Constructor(_) => {
                format!("new {}({args})", self.owner.self_type())
            }
            Target::StaticMethod(method) => format!("{}.{}({args})", self.owner.name, method.name),
        }
    }
}

fn plan<'a>(
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    decl: &Declaration<'a>,
    sink: &mut ProblemSink,
) -> Option<Plan<'a>> {
    let singular_auto = ctx.config().flag(ConfigKey::SingularAuto);
    let (owner, target, infos, type_params, built) = match *decl {
        Declaration::Type(owner) => {
            if owner.kind != TypeKind::Class {
                sink.error("@Builder is only supported on classes, constructors and static methods");
                return None;
            }
            let infos: Vec<BuilderInfo> = builder_fields(owner)
                .map(|field| {
                    let prefix = ctx.accessor_policy(Some(field)).prefix;
                    BuilderInfo::from_field(field, &prefix, singular_auto, sink)
                })
                .collect();
            (owner, Target::Type, infos, owner.type_params.clone(), owner.self_type())
        }
        Declaration::Method { owner, method } => {
            let infos: Vec<BuilderInfo> = method
                .params
                .iter()
                .map(|param| BuilderInfo::from_param(param, singular_auto, sink))
                .collect();
            if method.is_constructor() {
                let built = owner.self_type();
                (owner, Target::Constructor(method), infos, owner.type_params.clone(), built)
            } else if method.modifiers.is_static() {
                let built = method
                    .return_type
                    .clone()
                    .unwrap_or(TypeRef::Primitive(Primitive::Void));
                (owner, Target::StaticMethod(method), infos, method.type_params.clone(), built)
            } else {
                sink.error("@Builder on a method requires it to be static")
                    .fix(Remediation::AddModifier {
                        modifier: "static".to_owned(),
                    });
                return None;
            }
        }
        Declaration::Field { .. } => return None,
    };
    let options = Options::read(ctx, usage, &built);
    Some(Plan {
        owner,
        target,
        options,
        infos,
        type_params,
        built,
    })
}

fn report_collisions(infos: &[BuilderInfo], sink: &mut ProblemSink) {
    for (index, info) in infos.iter().enumerate() {
        let Some(spec) = info.strategy.singular() else {
            continue;
        };
        let clash = infos
            .iter()
            .enumerate()
            .any(|(other, candidate)| other != index && candidate.name == spec.singular_name);
        if clash {
            sink.warning(format!(
                "singular name '{}' of '{}' collides with another builder entry",
                spec.singular_name, info.name
            ))
            .fix(Remediation::SetAttribute {
                name: "value".to_owned(),
                value: format!("{}Item", spec.singular_name),
            });
        }
    }
}

fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}{}", capitalize(name))
    }
}

fn plain_setter(plan: &Plan<'_>, info: &BuilderInfo, origin: &Provenance) -> SynthMethod {
    let null_check = info.non_null.then(|| info.name.clone());
    let body = if info.has_default() {
        let mut lines = Vec::new();
        if let Some(param) = &null_check {
            lines.push(format!(
                "if ({param} == null) throw new java.lang.NullPointerException(\"{param} is marked non-null but is null\");"
            ));
        }
        lines.push(format!("this.{0}$value = {0};", info.name));
        lines.push(format!("this.{}$set = true;", info.name));
        if plan.options.fluent {
            lines.push("return this;".to_owned());
        }
        Body::Statements(lines)
    } else {
        Body::Assign {
            target: format!("this.{}", info.name),
            value: info.name.clone(),
            null_check,
            returns_this: plan.options.fluent,
        }
    };
    SynthMethod::new(
        prefixed(&plan.options.setter_prefix, &info.name),
        Some(plan.setter_return()),
        Modifiers::of_access(AccessLevel::Public),
        body,
        origin.clone(),
    )
    .with_param(&info.name, info.ty.clone())
    .from_field(&info.source_name)
}

fn build_method(plan: &Plan<'_>, origin: &Provenance) -> SynthMethod {
    let call = plan.call();
    let build = Body::Build {
        args: plan
            .infos
            .iter()
            .map(|info| info.build_arg(&plan.owner.name))
            .collect(),
        result: call.clone(),
    };
    let body = if plan.returns_void() {
        let mut lines = build.lines();
        if let Some(last) = lines.last_mut() {
            *last = format!("{call};");
        }
        Body::Statements(lines)
    } else {
        build
    };
    SynthMethod::new(
        plan.options.build_method.clone(),
        Some(plan.built.clone()),
        Modifiers::of_access(AccessLevel::Public),
        body,
        origin.clone(),
    )
}

fn builder_to_string(ctx: &ProcessorContext<'_>, plan: &Plan<'_>, origin: &Provenance) -> SynthMethod {
    let mut method = SynthMethod::new(
        "toString",
        Some(TypeRef::class("java.lang.String")),
        Modifiers::of_access(AccessLevel::Public),
        Body::ToString {
            label: format!("{}.{}", nested_label(ctx, plan.owner), plan.options.class_name),
            call_super: false,
            parts: plan.infos.iter().map(BuilderInfo::to_string_part).collect(),
        },
        origin.clone(),
    );
    method.annotations.push(OVERRIDE.to_owned());
    method
}

/// The builder class, or only what a declared builder class still lacks.
///
/// `None` when a declared builder already has every member.
fn builder_type(
    ctx: &ProcessorContext<'_>,
    plan: &Plan<'_>,
    origin: &Provenance,
) -> Option<SynthType> {
    let builder = plan.builder_type();
    let mut members: Vec<SynthesizedMember> = plan
        .infos
        .iter()
        .flat_map(|info| info.builder_fields(origin))
        .map(SynthesizedMember::Field)
        .collect();
    members.push(SynthesizedMember::Method(SynthMethod::new(
        plan.options.class_name.clone(),
        None,
        Modifiers::new(),
        Body::Constructor {
            null_checks: Vec::new(),
            assignments: Vec::new(),
        },
        origin.clone(),
    )));
    for info in &plan.infos {
        match &info.strategy {
            AccumulationStrategy::Plain => {
                members.push(SynthesizedMember::Method(plain_setter(plan, info, origin)));
            }
            AccumulationStrategy::Singular(spec) => members.extend(
                singular::mutators(
                    info,
                    spec,
                    &builder,
                    &plan.options.setter_prefix,
                    plan.options.fluent,
                    origin,
                )
                    .into_iter()
                    .map(SynthesizedMember::Method),
            ),
        }
    }
    members.push(SynthesizedMember::Method(build_method(plan, origin)));
    members.push(SynthesizedMember::Method(builder_to_string(ctx, plan, origin)));

    let existing = plan
        .owner
        .nested
        .iter()
        .find(|t| t.name == plan.options.class_name);
    if let Some(declared) = existing {
        let taken: Vec<Signature> = declared
            .fields
            .iter()
            .map(Signature::of_declared_field)
            .chain(declared.methods.iter().map(Signature::of_declared_method))
            .collect();
        members.retain(|m| !taken.contains(&m.signature()));
        if members.is_empty() {
            return None;
        }
    }

    Some(SynthType {
        name: plan.options.class_name.clone(),
        kind: TypeKind::Class,
        modifiers: member_modifiers(plan.options.access, true),
        type_params: plan.type_params.clone(),
        members,
        merges_into_declared: existing.is_some(),
        provenance: origin.clone(),
    })
}

fn all_args_constructor(plan: &Plan<'_>, origin: &Provenance) -> Option<SynthMethod> {
    let owner = plan.owner;
    if owner.constructors().next().is_some() || has_explicit_constructor_annotation(owner) {
        return None;
    }
    let fields: Vec<&DeclaredField> = builder_fields(owner).collect();
    let mut ctor = SynthMethod::new(
        owner.name.clone(),
        None,
        Modifiers::new(),
        Body::Constructor {
            null_checks: fields
                .iter()
                .filter(|f| crate::handlers::needs_null_check(f))
                .map(|f| f.name.clone())
                .collect(),
            assignments: fields
                .iter()
                .map(|f| (f.name.clone(), f.name.clone()))
                .collect(),
        },
        origin.clone(),
    );
    for field in fields {
        ctor = ctor.with_param(&field.name, field.ty.clone());
    }
    Some(ctor)
}

fn default_suppliers(plan: &Plan<'_>, origin: &Provenance) -> Vec<SynthMethod> {
    plan.infos
        .iter()
        .filter_map(|info| {
            let initializer = info.default_initializer.as_ref()?;
            let mut supplier = SynthMethod::new(
                info.default_supplier(),
                Some(info.ty.clone()),
                member_modifiers(AccessLevel::Private, true),
                Body::Return(initializer.clone()),
                origin.clone(),
            )
            .with_type_params(&plan.owner.type_params)
            .from_field(&info.source_name);
            supplier.shadows = true;
            Some(supplier)
        })
        .collect()
}

fn to_builder(plan: &Plan<'_>, origin: &Provenance) -> SynthMethod {
    let builder = plan.builder_type();
    let mut lines = vec![format!("final {builder} builder = new {builder}();")];
    for info in &plan.infos {
        let source = format!("this.{}", info.source_name);
        match &info.strategy {
            AccumulationStrategy::Plain => lines.push(format!(
                "builder.{}({source});",
                prefixed(&plan.options.setter_prefix, &info.name)
            )),
            AccumulationStrategy::Singular(_) => lines.push(format!(
                "if ({source} != null) builder.{}({source});",
                prefixed(&plan.options.setter_prefix, &info.name)
            )),
        }
    }
    lines.push("return builder;".to_owned());
    SynthMethod::new(
        "toBuilder",
        Some(builder),
        Modifiers::of_access(plan.options.access),
        Body::Statements(lines),
        origin.clone(),
    )
}

/// Members generated for one `@Builder` usage; empty for an invalid one.
#[must_use]
pub fn builder_members(
    ctx: &ProcessorContext<'_>,
    usage: &AnnotationUsage,
    decl: &Declaration<'_>,
) -> Vec<SynthesizedMember> {
    let mut scratch = ProblemSink::new(Stereotype::Builder, decl.symbol());
    let Some(plan) = plan(ctx, usage, decl, &mut scratch) else {
        return Vec::new();
    };
    if plan.options.access == AccessLevel::None {
        return Vec::new();
    }
    let origin = provenance(Stereotype::Builder, decl);
    let mut members = Vec::new();
    if matches!(plan.target, Target::Type) {
        members.extend(all_args_constructor(&plan, &origin).map(SynthesizedMember::Method));
    }
    members.extend(
        default_suppliers(&plan, &origin)
            .into_iter()
            .map(SynthesizedMember::Method),
    );
    if !plan.options.builder_method.is_empty() {
        let builder = plan.builder_type();
        members.push(SynthesizedMember::Method(
            SynthMethod::new(
                plan.options.builder_method.clone(),
                Some(builder.clone()),
                member_modifiers(plan.options.access, true),
                Body::Return(format!("new {builder}()")),
                origin.clone(),
            )
            .with_type_params(&plan.type_params),
        ));
    }
    if plan.options.to_builder && !matches!(plan.target, Target::StaticMethod(_)) {
        members.push(SynthesizedMember::Method(to_builder(&plan, &origin)));
    }
    members.extend(builder_type(ctx, &plan, &origin).map(SynthesizedMember::NestedType));
    members
}

/// `@Builder` on a type, constructor or static method.
#[derive(Debug, Clone, Copy)]
pub struct BuilderProcessor {
    target: TargetKind,
}

impl BuilderProcessor {
    /// Processor for type- or method-level usages.
    #[must_use]
    pub const fn new(target: TargetKind) -> Self {
        Self { target }
    }
}

impl Processor for BuilderProcessor {
    fn name(&self) -> &'static str {
        match self.target {
            TargetKind::Type => "builder.type",
            TargetKind::Field | TargetKind::Method => "builder.method",
        }
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        &[Stereotype::Builder]
    }

    fn target_kind(&self) -> TargetKind {
        self.target
    }

    fn validate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<Problem> {
        let mut sink = ProblemSink::new(Stereotype::Builder, decl.symbol());
        let Some(plan) = plan(ctx, usage, decl, &mut sink) else {
            return sink.into_problems();
        };
        report_collisions(&plan.infos, &mut sink);
        if plan.options.to_builder && matches!(plan.target, Target::StaticMethod(_)) {
            sink.warning("toBuilder is only generated for type- and constructor-level builders")
                .fix(Remediation::SetAttribute {
                    name: "toBuilder".to_owned(),
                    value: "false".to_owned(),
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
        builder_members(ctx, usage, decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuilderSettings, LayeredConfig, Settings};
    use crate::model::{Modifier, Param};
    use crate::testing::{body_of, names, with_config, with_context};
    use rstest::rstest;

    fn post() -> DeclaredType {
        DeclaredType::class("blog.Post")
            .annotated(AnnotationUsage::new("Builder"))
            .with_field(DeclaredField::new("title", TypeRef::class("String")))
            .with_field(
                DeclaredField::new(
                    "tags",
                    TypeRef::generic("java.util.List", vec![TypeRef::class("String")]),
                )
                .annotated(AnnotationUsage::new("Singular")),
            )
            .with_field(
                DeclaredField::new("retries", TypeRef::Primitive(Primitive::Int))
                    .with_initializer("3")
                    .annotated(AnnotationUsage::new("Builder.Default")),
            )
    }

    fn generate(ty: &DeclaredType, usage: &AnnotationUsage) -> Vec<SynthesizedMember> {
        with_context(ty, |ctx| builder_members(ctx, usage, &Declaration::Type(ty)))
    }

    fn nested(members: &[SynthesizedMember]) -> &SynthType {
        let Some(ty) = members.iter().find_map(SynthesizedMember::as_nested_type) else {
            panic!("expected a builder type");
        };
        ty
    }

    #[test]
    fn type_level_builder_shape() {
        let ty = post();
        let members = generate(&ty, &AnnotationUsage::new("Builder"));
        assert_eq!(names(&members), ["Post", "$default$retries", "builder", "PostBuilder"]);
        let builder = nested(&members);
        assert_eq!(
            names(&builder.members),
            [
                "title",
                "tags",
                "retries$value",
                "retries$set",
                "PostBuilder",
                "title",
                "tag",
                "tags",
                "clearTags",
                "retries",
                "build",
                "toString",
            ]
        );
        assert!(builder.modifiers.is_static());
    }

    #[test]
    fn build_materializes_and_applies_defaults() {
        let ty = post();
        let members = generate(&ty, &AnnotationUsage::new("Builder"));
        let build = body_of(&nested(&members).members, "build");
        assert!(build.contains("case 0: tags = java.util.Collections.emptyList(); break;"), "{build}");
        assert!(build.contains("if (!this.retries$set) retries = Post.$default$retries();"), "{build}");
        assert!(build.ends_with("return new Post(title, tags, retries);"), "{build}");
    }

    #[test]
    fn default_supplier_shadows_declared_members() {
        let ty = post();
        let members = generate(&ty, &AnnotationUsage::new("Builder"));
        let supplier = members
            .iter()
            .filter_map(SynthesizedMember::as_method)
            .find(|m| m.name == "$default$retries");
        assert!(supplier.is_some_and(|m| m.shadows && m.modifiers.is_static()));
    }

    #[test]
    fn to_builder_copies_current_values() {
        let ty = post();
        let usage = AnnotationUsage::new("Builder").with_bool("toBuilder", true);
        let members = generate(&ty, &usage);
        let body = body_of(&members, "toBuilder");
        assert!(body.contains("builder.title(this.title);"), "{body}");
        assert!(body.contains("if (this.tags != null) builder.tags(this.tags);"), "{body}");
    }

    #[test]
    fn class_name_comes_from_configuration_pattern() {
        let ty = DeclaredType::class("a.Job")
            .with_field(DeclaredField::new("name", TypeRef::class("String")));
        let usage = AnnotationUsage::new("Builder")
            .with_str("builderClassName", "Maker")
            .with_str("setterPrefix", "with");
        let members = generate(&ty, &usage);
        let builder = nested(&members);
        assert_eq!(builder.name, "Maker");
        assert!(names(&builder.members).contains(&"withName"));
    }

    #[test]
    fn declared_builder_type_is_completed() {
        let ty = DeclaredType::class("a.Job")
            .with_field(DeclaredField::new("name", TypeRef::class("String")))
            .with_nested(DeclaredType::class("a.Job.JobBuilder").with_method(
                DeclaredMethod::new("name", TypeRef::class("JobBuilder"))
                    .with_param(Param::new("name", TypeRef::class("String"))),
            ));
        let members = generate(&ty, &AnnotationUsage::new("Builder"));
        let builder = nested(&members);
        assert!(builder.merges_into_declared);
        let setters = builder
            .members
            .iter()
            .filter_map(SynthesizedMember::as_method)
            .filter(|m| m.name == "name")
            .count();
        assert_eq!(setters, 0);
    }

    fn setter(builder: &SynthType, name: &str) -> SynthMethod {
        builder
            .members
            .iter()
            .filter_map(SynthesizedMember::as_method)
            .find(|m| m.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no setter {name}"))
    }

    #[rstest]
    #[case::fluent(true)]
    #[case::non_fluent(false)]
    fn plain_setters_follow_builder_fluency(#[case] fluent: bool) {
        let ty = post();
        let usage = AnnotationUsage::new("Builder").with_bool("fluent", fluent);
        let members = generate(&ty, &usage);
        let builder = nested(&members);
        for name in ["title", "retries", "tag", "clearTags"] {
            let method = setter(builder, name);
            let body = method.body.to_string();
            let expected = if fluent {
                TypeRef::class("PostBuilder")
            } else {
                TypeRef::Primitive(Primitive::Void)
            };
            assert_eq!(method.return_type, Some(expected), "{name}");
            assert_eq!(body.contains("return this;"), fluent, "{name}: {body}");
        }
    }

    #[test]
    fn fluency_defaults_to_configuration() {
        let ty = post();
        let config = LayeredConfig::from_settings(Settings {
            builder: BuilderSettings {
                fluent: Some(false),
                ..BuilderSettings::default()
            },
            ..Settings::default()
        });
        let usage = AnnotationUsage::new("Builder");
        let members = with_config(&ty, config, |ctx| {
            builder_members(ctx, &usage, &Declaration::Type(&ty))
        });
        let title = setter(nested(&members), "title");
        assert_eq!(title.return_type, Some(TypeRef::Primitive(Primitive::Void)));
        assert_eq!(title.body.to_string(), "this.title = title;");
    }

    #[test]
    fn complete_declared_builder_is_not_offered_again() {
        let ty = DeclaredType::class("a.Job")
            .with_field(DeclaredField::new("name", TypeRef::class("String")))
            .with_nested(
                DeclaredType::class("a.Job.JobBuilder")
                    .with_field(DeclaredField::new("name", TypeRef::class("String")))
                    .with_method(DeclaredMethod::constructor("JobBuilder"))
                    .with_method(
                        DeclaredMethod::new("name", TypeRef::class("JobBuilder"))
                            .with_param(Param::new("name", TypeRef::class("String"))),
                    )
                    .with_method(DeclaredMethod::new("build", TypeRef::class("Job")))
                    .with_method(DeclaredMethod::new("toString", TypeRef::class("String"))),
            );
        let members = generate(&ty, &AnnotationUsage::new("Builder"));
        assert!(
            members.iter().all(|m| m.as_nested_type().is_none()),
            "{:?}",
            names(&members)
        );
    }

    #[test]
    fn static_method_builder_calls_the_method() {
        let factory = DeclaredMethod::new("of", TypeRef::class("Point"))
            .with_modifier(Modifier::Static)
            .with_param(Param::new("x", TypeRef::Primitive(Primitive::Int)))
            .with_param(Param::new("y", TypeRef::Primitive(Primitive::Int)));
        let ty = DeclaredType::class("geo.Points").with_method(factory);
        let Some(method) = ty.methods.first() else {
            panic!("fixture method missing");
        };
        let usage = AnnotationUsage::new("Builder");
        let decl = Declaration::Method { owner: &ty, method };
        let members = with_context(&ty, |ctx| builder_members(ctx, &usage, &decl));
        let builder = nested(&members);
        assert_eq!(builder.name, "PointBuilder");
        assert!(body_of(&builder.members, "build").ends_with("return Points.of(x, y);"));
    }

    #[test]
    fn instance_method_is_an_error() {
        let ty = DeclaredType::class("geo.Points")
            .with_method(DeclaredMethod::new("make", TypeRef::class("Point")));
        let Some(method) = ty.methods.first() else {
            panic!("fixture method missing");
        };
        let usage = AnnotationUsage::new("Builder");
        let decl = Declaration::Method { owner: &ty, method };
        let problems = with_context(&ty, |ctx| {
            BuilderProcessor::new(TargetKind::Method).validate(ctx, &usage, &decl)
        });
        assert!(problems.iter().any(Problem::is_error));
    }

    #[test]
    fn singular_collision_warns() {
        let list = TypeRef::generic("java.util.List", vec![TypeRef::class("String")]);
        let ty = DeclaredType::class("a.Bag")
            .with_field(DeclaredField::new("item", TypeRef::class("String")))
            .with_field(
                DeclaredField::new("items", list).annotated(AnnotationUsage::new("Singular")),
            );
        let usage = AnnotationUsage::new("Builder");
        let problems = with_context(&ty, |ctx| {
            BuilderProcessor::new(TargetKind::Type).validate(ctx, &usage, &Declaration::Type(&ty))
        });
        assert_eq!(problems.len(), 1);
        assert!(!problems.iter().any(Problem::is_error));
    }
}
