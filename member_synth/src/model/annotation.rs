//! Annotation usages read from a host snapshot.

use serde::{Deserialize, Serialize};

use super::{AccessLevel, Stereotype, TypeRef};

/// A typed annotation attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    /// String literal or enum constant spelling.
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Class literal.
    Type(TypeRef),
    /// Array initialiser.
    List(Vec<AttrValue>),
}

impl AttrValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A named attribute inside an annotation usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (`value` for the positional attribute).
    pub name: String,
    /// Attribute value.
    pub value: AttrValue,
}

/// An annotation as it appears on a symbol.
///
/// Attribute order is preserved so that diagnostics and rendering stay
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationUsage {
    /// Annotation name, simple or qualified.
    pub name: String,
    /// Attributes in source order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl AnnotationUsage {
    /// Creates an annotation without attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute, replacing an earlier one with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        let name = name.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute { name, value });
        }
        self
    }

    /// Convenience for string attributes.
    #[must_use]
    pub fn with_str(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, AttrValue::Str(value.into()))
    }

    /// Convenience for boolean attributes.
    #[must_use]
    pub fn with_bool(self, name: impl Into<String>, value: bool) -> Self {
        self.with(name, AttrValue::Bool(value))
    }

    /// Convenience for string-array attributes.
    #[must_use]
    pub fn with_list<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| AttrValue::Str(v.into()))
            .collect();
        self.with(name, AttrValue::List(values))
    }

    /// The stereotype this usage denotes, if any.
    #[must_use]
    pub fn stereotype(&self) -> Option<Stereotype> {
        Stereotype::from_name(&self.name)
    }

    /// Returns `true` if the attribute was written explicitly.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Raw attribute lookup.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// String attribute, if present and a string.
    #[must_use]
    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(AttrValue::as_str)
    }

    /// Boolean attribute, if present and a boolean.
    #[must_use]
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        match self.attr(name)? {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Boolean attribute with a fallback.
    #[must_use]
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.bool_attr(name).unwrap_or(default)
    }

    /// String-array attribute; a lone string reads as a one-element array.
    #[must_use]
    pub fn list_attr(&self, name: &str) -> Vec<String> {
        match self.attr(name) {
            Some(AttrValue::List(items)) => items
                .iter()
                .filter_map(AttrValue::as_str)
                .map(str::to_owned)
                .collect(),
            Some(AttrValue::Str(single)) => vec![single.clone()],
            _ => Vec::new(),
        }
    }

    /// Access-level attribute (`value` for accessor stereotypes, `access`
    /// for constructors and builders).
    ///
    /// Accepts `PUBLIC`, `AccessLevel.PUBLIC` and
    /// `lombok.AccessLevel.PUBLIC` spellings.
    #[must_use]
    pub fn access_attr(&self, name: &str) -> Option<AccessLevel> {
        self.str_attr(name).and_then(AccessLevel::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_string_reads_as_list() {
        let usage = AnnotationUsage::new("ToString").with_str("exclude", "secret");
        assert_eq!(usage.list_attr("exclude"), vec!["secret".to_owned()]);
        assert!(usage.list_attr("of").is_empty());
    }

    #[test]
    fn later_attribute_replaces_earlier_one() {
        let usage = AnnotationUsage::new("Builder")
            .with_bool("toBuilder", false)
            .with_str("builderMethodName", "create")
            .with_bool("toBuilder", true);
        assert_eq!(usage.attributes.len(), 2);
        assert_eq!(usage.bool_attr("toBuilder"), Some(true));
        assert_eq!(
            usage.attributes.first().map(|a| a.name.as_str()),
            Some("toBuilder")
        );
    }

    #[test]
    fn access_levels_accept_qualified_spellings() {
        let usage = AnnotationUsage::new("Getter").with_str("value", "lombok.AccessLevel.PROTECTED");
        assert_eq!(usage.access_attr("value"), Some(AccessLevel::Protected));
    }
}
