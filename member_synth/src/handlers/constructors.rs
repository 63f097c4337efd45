//! `@NoArgsConstructor`, `@RequiredArgsConstructor` and `@AllArgsConstructor`.

use crate::config::ConfigKey;
use crate::model::{
    AccessLevel, AnnotationUsage, Body, DeclaredField, DeclaredType, Provenance, Signature,
    Stereotype, SynthMethod, SynthesizedMember, TypeKind, TypeRef,
};
use crate::processor::{Declaration, Processor, ProcessorContext, TargetKind};
use crate::problem::{Problem, ProblemSink, Remediation};

use super::{member_modifiers, needs_null_check, provenance, require_kind, requested_access};

/// Which fields a constructor assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorKind {
    /// No parameters.
    NoArgs,
    /// Final and `@NonNull` fields without initializer.
    RequiredArgs,
    /// Every assignable instance field.
    AllArgs,
}

impl ConstructorKind {
    const fn stereotype(self) -> Stereotype {
        match self {
            Self::NoArgs => Stereotype::NoArgsConstructor,
            Self::RequiredArgs => Stereotype::RequiredArgsConstructor,
            Self::AllArgs => Stereotype::AllArgsConstructor,
        }
    }

    /// Parameter fields in declaration order.
    #[must_use]
    pub fn fields(self, owner: &DeclaredType) -> Vec<&DeclaredField> {
        match self {
            Self::NoArgs => Vec::new(),
            Self::RequiredArgs => owner.required_fields().collect(),
            Self::AllArgs => owner.all_args_fields().collect(),
        }
    }
}

/// Whether any of the three constructor stereotypes is on `owner`.
#[must_use]
pub fn has_explicit_constructor_annotation(owner: &DeclaredType) -> bool {
    [
        Stereotype::NoArgsConstructor,
        Stereotype::RequiredArgsConstructor,
        Stereotype::AllArgsConstructor,
    ]
    .into_iter()
    .any(|st| owner.has_annotation(st))
}

/// Shape of a constructor request.
#[derive(Debug, Clone)]
pub struct ConstructorRequest<'a> {
    /// Field selection.
    pub kind: ConstructorKind,
    /// Requested access.
    pub access: AccessLevel,
    /// Name of a static factory; the constructor then becomes private.
    pub static_name: Option<&'a str>,
    /// Initialise final fields with zero values (no-args only).
    pub force: bool,
}

impl<'a> ConstructorRequest<'a> {
    /// Reads the request from a constructor annotation.
    #[must_use]
    pub fn from_usage(kind: ConstructorKind, usage: &'a AnnotationUsage) -> Self {
        Self {
            kind,
            access: requested_access(usage, "access", AccessLevel::Public),
            static_name: usage.str_attr("staticName").filter(|n| !n.is_empty()),
            force: kind == ConstructorKind::NoArgs && usage.flag("force", false),
        }
    }
}

fn zero_value(ty: &TypeRef) -> &'static str {
    match ty {
        TypeRef::Primitive(p) => p.zero_literal(),
        _ => "null",
    }
}

/// Builds the constructor and, with a static name, its factory.
#[must_use]
pub fn constructor(
    ctx: &ProcessorContext<'_>,
    request: &ConstructorRequest<'_>,
    provenance: &Provenance,
) -> Vec<SynthesizedMember> {
    let owner = ctx.owner();
    if request.access == AccessLevel::None {
        return Vec::new();
    }
    let fields = request.kind.fields(owner);
    let ctor_access = if owner.kind == TypeKind::Enum || request.static_name.is_some() {
        AccessLevel::Private
    } else {
        request.access
    };

    let mut assignments: Vec<(String, String)> = fields
        .iter()
        .map(|f| (f.name.clone(), f.name.clone()))
        .collect();
    if request.force {
        assignments.extend(
            owner
                .instance_fields()
                .filter(|f| f.is_final() && !f.has_initializer())
                .map(|f| (f.name.clone(), zero_value(&f.ty).to_owned())),
        );
    }
    let null_checks = fields
        .iter()
        .filter(|f| needs_null_check(f))
        .map(|f| f.name.clone())
        .collect();

    let mut ctor = SynthMethod::new(
        owner.name.clone(),
        None,
        member_modifiers(ctor_access, false),
        Body::Constructor {
            null_checks,
            assignments,
        },
        provenance.clone(),
    );
    for field in &fields {
        ctor = ctor.with_param(&field.name, field.ty.clone());
    }
    let wants_properties = !fields.is_empty()
        && request.static_name.is_none()
        && ctx.config().flag(ConfigKey::AddConstructorProperties);
    if wants_properties {
        let names: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f.name)).collect();
        ctor.annotations.push(format!(
            "@java.beans.ConstructorProperties({{{}}})",
            names.join(", ")
        ));
    }

    let mut members = vec![SynthesizedMember::Method(ctor)];
    if let Some(name) = request.static_name {
        let self_type = owner.self_type();
        let args: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        let mut factory = SynthMethod::new(
            name,
            Some(self_type.clone()),
            member_modifiers(request.access, true),
            Body::Return(format!("new {self_type}({})", args.join(", "))),
            provenance.clone(),
        )
        .with_type_params(&owner.type_params);
        for field in &fields {
            factory = factory.with_param(&field.name, field.ty.clone());
        }
        members.push(SynthesizedMember::Method(factory));
    }
    members
}

/// One of the three constructor stereotypes on a type.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorProcessor {
    kind: ConstructorKind,
}

impl ConstructorProcessor {
    /// Processor for `kind`.
    #[must_use]
    pub const fn new(kind: ConstructorKind) -> Self {
        Self { kind }
    }
}

impl Processor for ConstructorProcessor {
    fn name(&self) -> &'static str {
        match self.kind {
            ConstructorKind::NoArgs => "constructor.no_args",
            ConstructorKind::RequiredArgs => "constructor.required_args",
            ConstructorKind::AllArgs => "constructor.all_args",
        }
    }

    fn stereotypes(&self) -> &'static [Stereotype] {
        match self.kind {
            ConstructorKind::NoArgs => &[Stereotype::NoArgsConstructor],
            ConstructorKind::RequiredArgs => &[Stereotype::RequiredArgsConstructor],
            ConstructorKind::AllArgs => &[Stereotype::AllArgsConstructor],
        }
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
        let owner = decl.owner();
        let mut sink = ProblemSink::new(self.kind.stereotype(), decl.symbol());
        if !require_kind(owner, &[TypeKind::Class, TypeKind::Enum], "classes and enums", &mut sink) {
            return sink.into_problems();
        }
        let request = ConstructorRequest::from_usage(self.kind, usage);
        if self.kind == ConstructorKind::NoArgs && !request.force {
            let uninitialized: Vec<&str> = owner
                .instance_fields()
                .filter(|f| f.is_final() && !f.has_initializer())
                .map(|f| f.name.as_str())
                .collect();
            if !uninitialized.is_empty() {
                sink.error(format!(
                    "a no-args constructor cannot initialize final field(s) {}",
                    uninitialized.join(", ")
                ))
                .fix(Remediation::SetAttribute {
                    name: "force".to_owned(),
                    value: "true".to_owned(),
                });
            }
        }
        let fields = self.kind.fields(owner);
        let signature = Signature::method(&owner.name, true, fields.iter().map(|f| &f.ty));
        let exists = owner
            .constructors()
            .any(|c| Signature::of_declared_method(c) == signature);
        if exists {
            sink.warning("a constructor with the same signature already exists");
        }
        if let Some(name) = request.static_name {
            if ctx.method_exists(name, fields.len()) {
                sink.warning(format!("a method named {name} already exists"));
            }
        }
        sink.into_problems()
    }

    fn generate(
        &self,
        ctx: &ProcessorContext<'_>,
        usage: &AnnotationUsage,
        decl: &Declaration<'_>,
    ) -> Vec<SynthesizedMember> {
        let request = ConstructorRequest::from_usage(self.kind, usage);
        constructor(ctx, &request, &provenance(self.kind.stereotype(), decl))
    }
}
