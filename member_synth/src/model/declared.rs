//! Declared symbols as supplied by the host.
//!
//! These types are plain data: the host owns the real symbol table and hands
//! the engine a snapshot for the duration of one augmentation request.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AnnotationUsage, Stereotype, TypeRef};

/// Identity of a declared type (its qualified name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub String);

impl TypeId {
    /// Qualified name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Source modifiers. Package-private is the absence of an access keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
    /// `transient`
    Transient,
    /// `volatile`
    Volatile,
}

impl Modifier {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Final => "final",
            Self::Abstract => "abstract",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
        }
    }
}

/// Access level requested by a stereotype attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// No access keyword.
    Package,
    /// `private`
    Private,
    /// Do not generate the member at all.
    None,
}

impl AccessLevel {
    /// Parses `PUBLIC`, `AccessLevel.PUBLIC` or `lombok.AccessLevel.PUBLIC`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let constant = text.rsplit('.').next().unwrap_or(text);
        match constant.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Some(Self::Public),
            "PROTECTED" => Some(Self::Protected),
            "PACKAGE" => Some(Self::Package),
            "PRIVATE" => Some(Self::Private),
            "NONE" => Some(Self::None),
            // MODULE has no distinct meaning for synthesized members.
            "MODULE" => Some(Self::Package),
            _ => None,
        }
    }

    const fn modifier(self) -> Option<Modifier> {
        match self {
            Self::Public => Some(Modifier::Public),
            Self::Protected => Some(Modifier::Protected),
            Self::Private => Some(Modifier::Private),
            Self::Package | Self::None => None,
        }
    }
}

/// An ordered modifier set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(BTreeSet<Modifier>);

impl Modifiers {
    /// Empty set (package-private, instance).
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Set containing only the keyword for `access`.
    #[must_use]
    pub fn of_access(access: AccessLevel) -> Self {
        Self::new().with_access(access)
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.0.insert(modifier);
        self
    }

    /// Removes a modifier.
    #[must_use]
    pub fn without(mut self, modifier: Modifier) -> Self {
        self.0.remove(&modifier);
        self
    }

    /// Replaces the access keyword.
    #[must_use]
    pub fn with_access(mut self, access: AccessLevel) -> Self {
        for keyword in [Modifier::Public, Modifier::Protected, Modifier::Private] {
            self.0.remove(&keyword);
        }
        if let Some(modifier) = access.modifier() {
            self.0.insert(modifier);
        }
        self
    }

    /// Whether `modifier` is present.
    #[must_use]
    pub fn has(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    /// Effective access level.
    #[must_use]
    pub fn access(&self) -> AccessLevel {
        if self.has(Modifier::Public) {
            AccessLevel::Public
        } else if self.has(Modifier::Protected) {
            AccessLevel::Protected
        } else if self.has(Modifier::Private) {
            AccessLevel::Private
        } else {
            AccessLevel::Package
        }
    }

    /// `static` shorthand.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.has(Modifier::Static)
    }

    /// `final` shorthand.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.has(Modifier::Final)
    }

    /// Iterates the modifiers in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, modifier) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(modifier.keyword())?;
        }
        Ok(())
    }
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A class.
    Class,
    /// An enum.
    Enum,
    /// An interface.
    Interface,
    /// An annotation type.
    Annotation,
}

/// Finds the first annotation denoting `stereotype`.
fn find_stereotype(
    annotations: &[AnnotationUsage],
    stereotype: Stereotype,
) -> Option<&AnnotationUsage> {
    annotations
        .iter()
        .find(|a| a.stereotype() == Some(stereotype))
}

/// A field as declared in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredField {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Initializer expression text, if any.
    #[serde(default)]
    pub initializer: Option<String>,
    /// Annotations on the field.
    #[serde(default)]
    pub annotations: Vec<AnnotationUsage>,
    /// Owning type; a back reference, not ownership.
    #[serde(default)]
    pub owner: Option<TypeId>,
}

impl DeclaredField {
    /// Creates a package-private instance field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::new(),
            initializer: None,
            annotations: Vec::new(),
            owner: None,
        }
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers = self.modifiers.with(modifier);
        self
    }

    /// Sets the initializer expression.
    #[must_use]
    pub fn with_initializer(mut self, expr: impl Into<String>) -> Self {
        self.initializer = Some(expr.into());
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationUsage) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Whether an initializer is present.
    #[must_use]
    pub const fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }

    /// `static` shorthand.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// `final` shorthand.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.modifiers.is_final()
    }

    /// Compiler-internal names start with `$` and never take part in
    /// generation.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.name.starts_with('$')
    }

    /// First annotation denoting `stereotype`.
    #[must_use]
    pub fn annotation(&self, stereotype: Stereotype) -> Option<&AnnotationUsage> {
        find_stereotype(&self.annotations, stereotype)
    }

    /// Whether the field carries `stereotype`.
    #[must_use]
    pub fn has_annotation(&self, stereotype: Stereotype) -> bool {
        self.annotation(stereotype).is_some()
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Annotations on the parameter.
    #[serde(default)]
    pub annotations: Vec<AnnotationUsage>,
}

impl Param {
    /// Creates an unannotated parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationUsage) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// First annotation denoting `stereotype`.
    #[must_use]
    pub fn annotation(&self, stereotype: Stereotype) -> Option<&AnnotationUsage> {
        find_stereotype(&self.annotations, stereotype)
    }
}

/// A method or constructor as declared in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMethod {
    /// Method name; constructors carry the type's simple name.
    pub name: String,
    /// Parameters in order.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return type; `None` denotes a constructor.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Declared thrown types.
    #[serde(default)]
    pub throws: Vec<TypeRef>,
    /// Method type parameters.
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Annotations on the method.
    #[serde(default)]
    pub annotations: Vec<AnnotationUsage>,
}

impl DeclaredMethod {
    /// Creates a package-private method.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: Some(return_type),
            modifiers: Modifiers::new(),
            throws: Vec::new(),
            type_params: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Creates a package-private constructor for the type named `type_name`.
    #[must_use]
    pub fn constructor(type_name: impl Into<String>) -> Self {
        Self {
            return_type: None,
            ..Self::new(type_name, TypeRef::Primitive(super::Primitive::Void))
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers = self.modifiers.with(modifier);
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationUsage) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Whether this is a constructor.
    #[must_use]
    pub const fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    /// First annotation denoting `stereotype`.
    #[must_use]
    pub fn annotation(&self, stereotype: Stereotype) -> Option<&AnnotationUsage> {
        find_stereotype(&self.annotations, stereotype)
    }
}

/// A type as declared in source, with its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    /// Qualified name used as identity.
    pub id: TypeId,
    /// Simple name.
    pub name: String,
    /// Enclosing type for nested types.
    #[serde(default)]
    pub enclosing: Option<TypeId>,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Type parameter names.
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Direct superclass, if written.
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    /// Implemented or extended interfaces.
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<DeclaredField>,
    /// Methods and constructors in declaration order.
    #[serde(default)]
    pub methods: Vec<DeclaredMethod>,
    /// Nested types.
    #[serde(default)]
    pub nested: Vec<DeclaredType>,
    /// Annotations on the type.
    #[serde(default)]
    pub annotations: Vec<AnnotationUsage>,
}

impl DeclaredType {
    /// Creates an empty type of `kind` from its qualified name.
    #[must_use]
    pub fn new(qualified_name: &str, kind: TypeKind) -> Self {
        let name = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(qualified_name)
            .to_owned();
        Self {
            id: TypeId::from(qualified_name),
            name,
            enclosing: None,
            kind,
            modifiers: Modifiers::new(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Creates an empty class.
    #[must_use]
    pub fn class(qualified_name: &str) -> Self {
        Self::new(qualified_name, TypeKind::Class)
    }

    /// Adds a field, setting its owner back reference.
    #[must_use]
    pub fn with_field(mut self, mut field: DeclaredField) -> Self {
        field.owner = Some(self.id.clone());
        self.fields.push(field);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: DeclaredMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a nested type, setting its enclosing back reference.
    #[must_use]
    pub fn with_nested(mut self, mut nested: Self) -> Self {
        nested.enclosing = Some(self.id.clone());
        self.nested.push(nested);
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationUsage) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers = self.modifiers.with(modifier);
        self
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extending(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implementing(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Adds a type parameter.
    #[must_use]
    pub fn with_type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// First annotation denoting `stereotype`.
    #[must_use]
    pub fn annotation(&self, stereotype: Stereotype) -> Option<&AnnotationUsage> {
        find_stereotype(&self.annotations, stereotype)
    }

    /// Whether the type carries `stereotype`.
    #[must_use]
    pub fn has_annotation(&self, stereotype: Stereotype) -> bool {
        self.annotation(stereotype).is_some()
    }

    /// Whether a superclass other than the universal root is declared.
    #[must_use]
    pub fn has_real_superclass(&self) -> bool {
        self.superclass.as_ref().is_some_and(|s| !s.is_object())
    }

    /// The type as a reference, parameterised by its own type parameters.
    #[must_use]
    pub fn self_type(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.type_params.iter().map(TypeRef::class).collect(),
        )
    }

    /// Declared constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &DeclaredMethod> {
        self.methods.iter().filter(|m| m.is_constructor())
    }

    /// Field lookup by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&DeclaredField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Instance fields that are candidates for generation.
    pub fn instance_fields(&self) -> impl Iterator<Item = &DeclaredField> {
        self.fields
            .iter()
            .filter(|f| !f.is_static() && !f.is_synthetic())
    }

    /// Fields assigned by an all-args constructor, in declaration order.
    ///
    /// Initialised final fields cannot be reassigned and are skipped.
    pub fn all_args_fields(&self) -> impl Iterator<Item = &DeclaredField> {
        self.instance_fields()
            .filter(|f| !(f.is_final() && f.has_initializer()))
    }

    /// Fields a required-args constructor must assign.
    pub fn required_fields(&self) -> impl Iterator<Item = &DeclaredField> {
        self.all_args_fields()
            .filter(|f| f.is_final() || f.has_annotation(Stereotype::NonNull))
            .filter(|f| !f.has_initializer())
    }
}
