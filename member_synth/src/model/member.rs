//! Synthesized members handed back to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Body, DeclaredField, DeclaredMethod, DeclaredType, Modifiers, Param, Stereotype, TypeKind, TypeRef};

/// Member kinds a host may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Fields.
    Field,
    /// Methods and constructors.
    Method,
    /// Nested types.
    NestedType,
}

/// Name plus erased parameter types; constructors use `<init>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    /// Member kind.
    pub kind: MemberKind,
    /// Member name.
    pub name: String,
    /// Erased parameter types (methods only).
    pub params: Vec<String>,
}

/// Name used in signatures for constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

impl Signature {
    /// Signature of a method.
    #[must_use]
    pub fn method<'a, I>(name: &str, is_constructor: bool, params: I) -> Self
    where
        I: IntoIterator<Item = &'a TypeRef>,
    {
        Self {
            kind: MemberKind::Method,
            name: if is_constructor {
                CONSTRUCTOR_NAME.to_owned()
            } else {
                name.to_owned()
            },
            params: params.into_iter().map(TypeRef::erasure).collect(),
        }
    }

    /// Signature of a field.
    #[must_use]
    pub fn field(name: &str) -> Self {
        Self {
            kind: MemberKind::Field,
            name: name.to_owned(),
            params: Vec::new(),
        }
    }

    /// Signature of a nested type.
    #[must_use]
    pub fn nested_type(name: &str) -> Self {
        Self {
            kind: MemberKind::NestedType,
            name: name.to_owned(),
            params: Vec::new(),
        }
    }

    /// Signature of a declared method.
    #[must_use]
    pub fn of_declared_method(method: &DeclaredMethod) -> Self {
        Self::method(
            &method.name,
            method.is_constructor(),
            method.params.iter().map(|p| &p.ty),
        )
    }

    /// Signature of a declared field.
    #[must_use]
    pub fn of_declared_field(field: &DeclaredField) -> Self {
        Self::field(&field.name)
    }

    /// Signature of a declared nested type.
    #[must_use]
    pub fn of_declared_type(ty: &DeclaredType) -> Self {
        Self::nested_type(&ty.name)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{}({})", self.name, self.params.join(", ")),
            MemberKind::Field | MemberKind::NestedType => f.write_str(&self.name),
        }
    }
}

/// Where a synthesized member came from; navigation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Triggering stereotype.
    pub stereotype: Stereotype,
    /// Annotated symbol, e.g. `com.example.Foo#name`.
    pub symbol: String,
}

impl Provenance {
    /// Builds a provenance record.
    #[must_use]
    pub fn new(stereotype: Stereotype, symbol: impl Into<String>) -> Self {
        Self {
            stereotype,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.stereotype, self.symbol)
    }
}

/// A synthesized method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthMethod {
    /// Method name; constructors carry the type's simple name.
    pub name: String,
    /// Parameters.
    pub params: Vec<Param>,
    /// Return type; `None` for constructors.
    pub return_type: Option<TypeRef>,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Method type parameters.
    pub type_params: Vec<String>,
    /// Annotations emitted on the member, as source text.
    pub annotations: Vec<String>,
    /// Semantic body.
    pub body: Body,
    /// Originating field, for navigation.
    pub origin_field: Option<String>,
    /// Generated even if a declared member has the same signature.
    pub shadows: bool,
    /// Trigger.
    pub provenance: Provenance,
}

impl SynthMethod {
    /// A method with no parameters.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        return_type: Option<TypeRef>,
        modifiers: Modifiers,
        body: Body,
        provenance: Provenance,
    ) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type,
            modifiers,
            type_params: Vec::new(),
            annotations: Vec::new(),
            body,
            origin_field: None,
            shadows: false,
            provenance,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    /// Records the field this member was derived from.
    #[must_use]
    pub fn from_field(mut self, field: impl Into<String>) -> Self {
        self.origin_field = Some(field.into());
        self
    }

    /// Copies type parameters.
    #[must_use]
    pub fn with_type_params(mut self, type_params: &[String]) -> Self {
        self.type_params = type_params.to_vec();
        self
    }

    /// Whether this is a constructor.
    #[must_use]
    pub const fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    /// Computed signature.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature::method(
            &self.name,
            self.is_constructor(),
            self.params.iter().map(|p| &p.ty),
        )
    }
}

/// A synthesized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthField {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Initializer expression.
    pub initializer: Option<String>,
    /// Trigger.
    pub provenance: Provenance,
}

/// A synthesized nested type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthType {
    /// Simple name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Type parameters.
    pub type_params: Vec<String>,
    /// Members of the nested type.
    pub members: Vec<SynthesizedMember>,
    /// Members are merged into a user-declared type of the same name.
    pub merges_into_declared: bool,
    /// Trigger.
    pub provenance: Provenance,
}

/// Any synthesized member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum SynthesizedMember {
    /// A method or constructor.
    Method(SynthMethod),
    /// A field.
    Field(SynthField),
    /// A nested type.
    NestedType(SynthType),
}

impl SynthesizedMember {
    /// Member kind.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Method(_) => MemberKind::Method,
            Self::Field(_) => MemberKind::Field,
            Self::NestedType(_) => MemberKind::NestedType,
        }
    }

    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Method(m) => &m.name,
            Self::Field(f) => &f.name,
            Self::NestedType(t) => &t.name,
        }
    }

    /// Computed signature.
    #[must_use]
    pub fn signature(&self) -> Signature {
        match self {
            Self::Method(m) => m.signature(),
            Self::Field(f) => Signature::field(&f.name),
            Self::NestedType(t) => Signature::nested_type(&t.name),
        }
    }

    /// Whether the member may coexist with a declared one of equal signature.
    #[must_use]
    pub const fn allows_shadow(&self) -> bool {
        match self {
            Self::Method(m) => m.shadows,
            Self::Field(_) => false,
            Self::NestedType(t) => t.merges_into_declared,
        }
    }

    /// Trigger.
    #[must_use]
    pub const fn provenance(&self) -> &Provenance {
        match self {
            Self::Method(m) => &m.provenance,
            Self::Field(f) => &f.provenance,
            Self::NestedType(t) => &t.provenance,
        }
    }

    /// Method view.
    #[must_use]
    pub const fn as_method(&self) -> Option<&SynthMethod> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Nested-type view.
    #[must_use]
    pub const fn as_nested_type(&self) -> Option<&SynthType> {
        match self {
            Self::NestedType(t) => Some(t),
            _ => None,
        }
    }

    /// Field view.
    #[must_use]
    pub const fn as_field(&self) -> Option<&SynthField> {
        match self {
            Self::Field(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for SynthesizedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(m) => {
                let params = m
                    .params
                    .iter()
                    .map(|p| format!("{} {}", p.ty, p.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let modifiers = m.modifiers.to_string();
                let prefix = if modifiers.is_empty() {
                    String::new()
                } else {
                    format!("{modifiers} ")
                };
                match &m.return_type {
                    Some(ret) => write!(f, "{prefix}{ret} {}({params})", m.name),
                    None => write!(f, "{prefix}{}({params})", m.name),
                }
            }
            Self::Field(field) => {
                let modifiers = field.modifiers.to_string();
                let sep = if modifiers.is_empty() { "" } else { " " };
                write!(f, "{modifiers}{sep}{} {}", field.ty, field.name)
            }
            Self::NestedType(t) => {
                let keyword = match t.kind {
                    TypeKind::Class => "class",
                    TypeKind::Enum => "enum",
                    TypeKind::Interface => "interface",
                    TypeKind::Annotation => "@interface",
                };
                let modifiers = t.modifiers.to_string();
                let sep = if modifiers.is_empty() { "" } else { " " };
                write!(f, "{modifiers}{sep}{keyword} {}", t.name)
            }
        }
    }
}
