//! Configuration keys, values and policy enums.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Stereotype;

/// What to do about `callSuper` when the annotation does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSuperPolicy {
    /// Call the superclass implementation.
    Call,
    /// Silently skip the superclass implementation.
    Skip,
    /// Skip, but warn when a real superclass exists.
    Warn,
}

impl CallSuperPolicy {
    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "call" => Some(Self::Call),
            "skip" => Some(Self::Skip),
            "warn" => Some(Self::Warn),
            _ => None,
        }
    }
}

/// Whether redundant field-list entries are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedundancyPolicy {
    /// Report a warning.
    Warn,
    /// Say nothing.
    Silent,
}

/// Per-stereotype usage flagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagUsage {
    /// No diagnostic.
    Allow,
    /// Warn on every usage.
    Warning,
    /// Reject every usage.
    Error,
}

/// A configuration value as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean switch.
    Bool(bool),
    /// String or enum constant.
    Text(String),
    /// String list.
    List(Vec<String>),
}

impl ConfigValue {
    /// Boolean view.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// List view; a lone string reads as a one-element list.
    #[must_use]
    pub fn to_list(&self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(items.clone()),
            Self::Text(single) => Some(vec![single.clone()]),
            Self::Bool(_) => None,
        }
    }

    /// `callSuper` policy view.
    #[must_use]
    pub fn as_call_super(&self) -> Option<CallSuperPolicy> {
        self.as_text().and_then(CallSuperPolicy::parse)
    }
}

/// Keys the engine consults, scoped by declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// `accessors.prefix`
    AccessorsPrefix,
    /// `accessors.prefix_case_sensitive`
    AccessorsPrefixCaseSensitive,
    /// `accessors.prefix_must_match`
    AccessorsPrefixMustMatch,
    /// `accessors.fluent`
    AccessorsFluent,
    /// `accessors.chain`
    AccessorsChain,
    /// `getter.no_is_prefix`
    GetterNoIsPrefix,
    /// `field_defaults.default_private`
    FieldDefaultsPrivate,
    /// `field_defaults.default_final`
    FieldDefaultsFinal,
    /// `any_constructor.add_constructor_properties`
    AddConstructorProperties,
    /// `equals_and_hash_code.call_super`
    EqualsCallSuper,
    /// `equals_and_hash_code.do_not_use_getters`
    EqualsDoNotUseGetters,
    /// `to_string.call_super`
    ToStringCallSuper,
    /// `to_string.include_field_names`
    ToStringIncludeFieldNames,
    /// `to_string.do_not_use_getters`
    ToStringDoNotUseGetters,
    /// `singular.auto`
    SingularAuto,
    /// `builder.class_name`
    BuilderClassName,
    /// `builder.fluent`
    BuilderFluent,
    /// `log.field_name`
    LogFieldName,
    /// `log.field_is_static`
    LogFieldIsStatic,
    /// `field_name_constants.inner_type_name`
    FieldNameConstantsInnerTypeName,
    /// `field_name_constants.uppercase`
    FieldNameConstantsUppercase,
    /// `field_lists.redundancy`
    FieldListRedundancy,
    /// `flag_usage.<stereotype>`
    FlagUsage(Stereotype),
}

impl ConfigKey {
    /// Dotted key path.
    #[must_use]
    pub fn path(self) -> String {
        let fixed = match self {
            Self::AccessorsPrefix => "accessors.prefix",
            Self::AccessorsPrefixCaseSensitive => "accessors.prefix_case_sensitive",
            Self::AccessorsPrefixMustMatch => "accessors.prefix_must_match",
            Self::AccessorsFluent => "accessors.fluent",
            Self::AccessorsChain => "accessors.chain",
            Self::GetterNoIsPrefix => "getter.no_is_prefix",
            Self::FieldDefaultsPrivate => "field_defaults.default_private",
            Self::FieldDefaultsFinal => "field_defaults.default_final",
            Self::AddConstructorProperties => "any_constructor.add_constructor_properties",
            Self::EqualsCallSuper => "equals_and_hash_code.call_super",
            Self::EqualsDoNotUseGetters => "equals_and_hash_code.do_not_use_getters",
            Self::ToStringCallSuper => "to_string.call_super",
            Self::ToStringIncludeFieldNames => "to_string.include_field_names",
            Self::ToStringDoNotUseGetters => "to_string.do_not_use_getters",
            Self::SingularAuto => "singular.auto",
            Self::BuilderClassName => "builder.class_name",
            Self::BuilderFluent => "builder.fluent",
            Self::LogFieldName => "log.field_name",
            Self::LogFieldIsStatic => "log.field_is_static",
            Self::FieldNameConstantsInnerTypeName => "field_name_constants.inner_type_name",
            Self::FieldNameConstantsUppercase => "field_name_constants.uppercase",
            Self::FieldListRedundancy => "field_lists.redundancy",
            Self::FlagUsage(stereotype) => {
                return format!("flag_usage.{}", stereotype.config_name());
            }
        };
        fixed.to_owned()
    }

    /// Value used when no layer configures the key.
    #[must_use]
    pub fn default_value(self) -> ConfigValue {
        match self {
            Self::AccessorsPrefix => ConfigValue::List(Vec::new()),
            Self::AccessorsPrefixCaseSensitive
            | Self::AccessorsPrefixMustMatch
            | Self::ToStringIncludeFieldNames
            | Self::SingularAuto
            | Self::BuilderFluent
            | Self::LogFieldIsStatic => ConfigValue::Bool(true),
            Self::AccessorsFluent
            | Self::AccessorsChain
            | Self::GetterNoIsPrefix
            | Self::FieldDefaultsPrivate
            | Self::FieldDefaultsFinal
            | Self::AddConstructorProperties
            | Self::EqualsDoNotUseGetters
            | Self::ToStringDoNotUseGetters
            | Self::FieldNameConstantsUppercase => ConfigValue::Bool(false),
            Self::EqualsCallSuper => ConfigValue::Text("warn".to_owned()),
            Self::ToStringCallSuper => ConfigValue::Text("skip".to_owned()),
            Self::BuilderClassName => ConfigValue::Text("*Builder".to_owned()),
            Self::LogFieldName => ConfigValue::Text("log".to_owned()),
            Self::FieldNameConstantsInnerTypeName => ConfigValue::Text("Fields".to_owned()),
            Self::FieldListRedundancy => ConfigValue::Text("warn".to_owned()),
            Self::FlagUsage(_) => ConfigValue::Text("allow".to_owned()),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
