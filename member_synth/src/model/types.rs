//! Source-level type references.
//!
//! Types are kept in the shape the host wrote them: a raw name (simple or
//! qualified) plus type arguments. Erasure only ever needs the simple name of
//! the raw type, which keeps signature comparison independent of whether the
//! host resolved imports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Primitive value types of the host language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `char`
    Char,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `void`
    Void,
}

impl Primitive {
    const ALL: [Self; 9] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Char,
        Self::Float,
        Self::Double,
        Self::Void,
    ];

    /// Keyword spelling of the primitive.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    /// Qualified name of the boxed counterpart.
    #[must_use]
    pub const fn boxed(self) -> &'static str {
        match self {
            Self::Boolean => "java.lang.Boolean",
            Self::Byte => "java.lang.Byte",
            Self::Short => "java.lang.Short",
            Self::Int => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Char => "java.lang.Character",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
            Self::Void => "java.lang.Void",
        }
    }

    /// Literal used when a field of this type must be force-initialised.
    #[must_use]
    pub const fn zero_literal(self) -> &'static str {
        match self {
            Self::Boolean => "false",
            Self::Char => "'\\u0000'",
            Self::Float => "0.0F",
            Self::Double => "0.0D",
            Self::Long => "0L",
            Self::Byte | Self::Short | Self::Int => "0",
            Self::Void => "null",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == word)
    }
}

/// Direction of a bounded wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardBound {
    /// `? extends T`
    Extends,
    /// `? super T`
    Super,
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// A primitive such as `int`.
    Primitive(Primitive),
    /// A class or interface type, optionally parameterised.
    Class {
        /// Raw name exactly as written (`List`, `java.util.List`).
        name: String,
        /// Type arguments in declaration order.
        args: Vec<TypeRef>,
    },
    /// An array of the component type.
    Array(Box<TypeRef>),
    /// A wildcard type argument.
    Wildcard(Option<(WildcardBound, Box<TypeRef>)>),
}

impl TypeRef {
    /// Builds a non-generic class type.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Builds a parameterised class type.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Class {
            name: name.into(),
            args,
        }
    }

    /// Builds an array of `self`.
    #[must_use]
    pub fn array_of(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Parses a type from its source spelling.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::TypeSyntax`] when `text` is not a well-formed
    /// type reference.
    pub fn parse(text: &str) -> Result<Self, SynthError> {
        let mut parser = Parser::new(text);
        let ty = parser.parse_type()?;
        parser.expect_end()?;
        Ok(ty)
    }

    /// Returns `true` for the primitive `boolean` only.
    #[must_use]
    pub const fn is_primitive_boolean(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Boolean))
    }

    /// Returns `true` for any primitive.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Returns `true` for array types.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Raw name for class types.
    #[must_use]
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Self::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Last segment of the raw name (`java.util.List` → `List`).
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        self.raw_name()
            .map(|name| name.rsplit('.').next().unwrap_or(name))
    }

    /// Type arguments of a class type; empty for everything else.
    #[must_use]
    pub fn type_args(&self) -> &[Self] {
        match self {
            Self::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// Component type of an array.
    #[must_use]
    pub fn component(&self) -> Option<&Self> {
        match self {
            Self::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns `true` if the raw name refers to the universal root type.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.raw_name(), Some("Object" | "java.lang.Object"))
    }

    /// Replaces a wildcard with the type it stands for as an element.
    ///
    /// `? extends T` and `? super T` yield `T`; an unbounded `?` yields
    /// `java.lang.Object`. Primitives are boxed since they cannot be type
    /// arguments.
    #[must_use]
    pub fn as_element(&self) -> Self {
        match self {
            Self::Wildcard(Some((_, bound))) => bound.as_element(),
            Self::Wildcard(None) => Self::class("java.lang.Object"),
            Self::Primitive(p) => Self::class(p.boxed()),
            other => other.clone(),
        }
    }

    /// Erased form used for signature comparison.
    #[must_use]
    pub fn erasure(&self) -> String {
        match self {
            Self::Primitive(p) => p.keyword().to_owned(),
            Self::Class { .. } => self.simple_name().unwrap_or_default().to_owned(),
            Self::Array(inner) => format!("{}[]", inner.erasure()),
            Self::Wildcard(Some((WildcardBound::Extends, bound))) => bound.erasure(),
            Self::Wildcard(_) => "Object".to_owned(),
        }
    }

    /// Whether this is a `float`/`double` needing bit-wise equality.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(
            self,
            Self::Primitive(Primitive::Float | Primitive::Double)
        )
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.keyword()),
            Self::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::Wildcard(None) => f.write_str("?"),
            Self::Wildcard(Some((WildcardBound::Extends, bound))) => {
                write!(f, "? extends {bound}")
            }
            Self::Wildcard(Some((WildcardBound::Super, bound))) => write!(f, "? super {bound}"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = SynthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> SynthError {
        SynthError::TypeSyntax {
            input: self.input.to_owned(),
            message: format!("{} at offset {}", message.into(), self.pos),
        }
    }

    fn expect_end(&mut self) -> Result<(), SynthError> {
        self.skip_ws();
        if self.rest().is_empty() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }

    fn identifier(&mut self) -> Result<&'a str, SynthError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.')))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        let word = rest.get(..len).unwrap_or_default();
        self.pos += len;
        Ok(word)
    }

    fn parse_type(&mut self) -> Result<TypeRef, SynthError> {
        let mut ty = if self.eat('?') {
            self.parse_wildcard()?
        } else {
            let word = self.identifier()?;
            if let Some(primitive) = Primitive::from_keyword(word) {
                TypeRef::Primitive(primitive)
            } else {
                let args = if self.eat('<') {
                    self.parse_args()?
                } else {
                    Vec::new()
                };
                TypeRef::generic(word, args)
            }
        };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            ty = ty.array_of();
        }
        Ok(ty)
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, SynthError> {
        self.skip_ws();
        let rest = self.rest();
        let bound = if rest.starts_with("extends") {
            WildcardBound::Extends
        } else if rest.starts_with("super") {
            WildcardBound::Super
        } else {
            return Ok(TypeRef::Wildcard(None));
        };
        self.identifier()?;
        let inner = self.parse_type()?;
        Ok(TypeRef::Wildcard(Some((bound, Box::new(inner)))))
    }

    fn parse_args(&mut self) -> Result<Vec<TypeRef>, SynthError> {
        let mut args = Vec::new();
        if self.eat('>') {
            return Ok(args);
        }
        loop {
            args.push(self.parse_type()?);
            if self.eat(',') {
                continue;
            }
            if self.eat('>') {
                return Ok(args);
            }
            return Err(self.error("expected ',' or '>'"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int", "int")]
    #[case("java.util.List<String>", "List")]
    #[case("Map<String, List<Integer>>", "Map")]
    #[case("String[][]", "String[][]")]
    #[case("List<? extends Number>", "List")]
    fn erases_to_simple_raw_name(#[case] text: &str, #[case] erased: &str) {
        let ty = TypeRef::parse(text).expect("type parses");
        assert_eq!(ty.erasure(), erased);
    }

    #[rstest]
    #[case("java.util.Map<String, java.util.List<Integer>>")]
    #[case("List<? super Number>")]
    #[case("byte[]")]
    #[case("Optional<?>")]
    fn display_round_trips_source_spelling(#[case] text: &str) {
        let ty = TypeRef::parse(text).expect("type parses");
        assert_eq!(ty.to_string(), text);
    }

    #[rstest]
    #[case("List<String")]
    #[case("List<>>")]
    #[case("")]
    #[case("int[")]
    fn rejects_malformed_types(#[case] text: &str) {
        assert!(TypeRef::parse(text).is_err(), "{text} should not parse");
    }

    #[test]
    fn element_view_unwraps_wildcards_and_boxes_primitives() {
        let extends = TypeRef::parse("? extends Number").expect("wildcard parses");
        assert_eq!(extends.as_element(), TypeRef::class("Number"));
        let unbounded = TypeRef::parse("?").expect("wildcard parses");
        assert_eq!(unbounded.as_element(), TypeRef::class("java.lang.Object"));
        let int = TypeRef::Primitive(Primitive::Int);
        assert_eq!(int.as_element(), TypeRef::class("java.lang.Integer"));
    }
}
