//! Serde-backed configuration document.
//!
//! Every value is optional so that layers can be merged with figment's
//! `Serialized` provider: an absent key never overrides a lower layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::keys::{CallSuperPolicy, ConfigKey, ConfigValue, FlagUsage, RedundancyPolicy};

/// `[accessors]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorSettings {
    /// Field-name prefixes stripped before accessor naming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<String>>,
    /// Whether prefix matching is case-sensitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_case_sensitive: Option<bool>,
    /// Whether fields not matching any prefix are rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_must_match: Option<bool>,
    /// Fluent accessor names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluent: Option<bool>,
    /// Setters return `this`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<bool>,
}

/// `[getter]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetterSettings {
    /// Use `get` even for primitive booleans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_is_prefix: Option<bool>,
}

/// `[field_defaults]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaultSettings {
    /// Package-private fields become private.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_private: Option<bool>,
    /// Fields become final.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_final: Option<bool>,
}

/// `[any_constructor]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorSettings {
    /// Emit `@java.beans.ConstructorProperties` on generated constructors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_constructor_properties: Option<bool>,
}

/// `[equals_and_hash_code]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualitySettings {
    /// Policy when `callSuper` is not written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_super: Option<CallSuperPolicy>,
    /// Read fields directly instead of through getters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_use_getters: Option<bool>,
}

/// `[to_string]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToStringSettings {
    /// Policy when `callSuper` is not written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_super: Option<CallSuperPolicy>,
    /// Print `name=` labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_field_names: Option<bool>,
    /// Read fields directly instead of through getters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_use_getters: Option<bool>,
}

/// `[singular]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingularSettings {
    /// Derive singular names automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
}

/// `[builder]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    /// Builder class name pattern; `*` stands for the built type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Whether builder setters return the builder instead of `void`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluent: Option<bool>,
}

/// `[log]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Logger field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// Whether the logger field is static.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_is_static: Option<bool>,
}

/// `[field_name_constants]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNameConstantSettings {
    /// Name of the generated inner type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_type_name: Option<String>,
    /// Constant names in `UPPER_SNAKE_CASE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uppercase: Option<bool>,
}

/// `[field_lists]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldListSettings {
    /// Reporting of redundant exclusions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redundancy: Option<RedundancyPolicy>,
}

/// One configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Accessor naming.
    pub accessors: AccessorSettings,
    /// Getter naming.
    pub getter: GetterSettings,
    /// Field modifier defaults.
    pub field_defaults: FieldDefaultSettings,
    /// Constructors.
    pub any_constructor: ConstructorSettings,
    /// `equals`/`hashCode`.
    pub equals_and_hash_code: EqualitySettings,
    /// `toString`.
    pub to_string: ToStringSettings,
    /// Singular names.
    pub singular: SingularSettings,
    /// Builders.
    pub builder: BuilderSettings,
    /// Logger fields.
    pub log: LogSettings,
    /// Field-name constants.
    pub field_name_constants: FieldNameConstantSettings,
    /// Include/exclude lists.
    pub field_lists: FieldListSettings,
    /// Usage flagging keyed by stereotype config name (`data`, `builder`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flag_usage: BTreeMap<String, FlagUsage>,
}

fn bool_value(value: Option<bool>) -> Option<ConfigValue> {
    value.map(ConfigValue::Bool)
}

fn text_value(value: Option<&String>) -> Option<ConfigValue> {
    value.cloned().map(ConfigValue::Text)
}

fn policy_text<T: Serialize>(value: Option<T>) -> Option<ConfigValue> {
    let value = value?;
    match serde_json::to_value(value).ok()? {
        serde_json::Value::String(text) => Some(ConfigValue::Text(text)),
        _ => None,
    }
}

impl Settings {
    /// Value explicitly set in this layer, if any.
    #[must_use]
    pub fn value(&self, key: ConfigKey) -> Option<ConfigValue> {
        match key {
            ConfigKey::AccessorsPrefix => self.accessors.prefix.clone().map(ConfigValue::List),
            ConfigKey::AccessorsPrefixCaseSensitive => {
                bool_value(self.accessors.prefix_case_sensitive)
            }
            ConfigKey::AccessorsPrefixMustMatch => bool_value(self.accessors.prefix_must_match),
            ConfigKey::AccessorsFluent => bool_value(self.accessors.fluent),
            ConfigKey::AccessorsChain => bool_value(self.accessors.chain),
            ConfigKey::GetterNoIsPrefix => bool_value(self.getter.no_is_prefix),
            ConfigKey::FieldDefaultsPrivate => bool_value(self.field_defaults.default_private),
            ConfigKey::FieldDefaultsFinal => bool_value(self.field_defaults.default_final),
            ConfigKey::AddConstructorProperties => {
                bool_value(self.any_constructor.add_constructor_properties)
            }
            ConfigKey::EqualsCallSuper => policy_text(self.equals_and_hash_code.call_super),
            ConfigKey::EqualsDoNotUseGetters => {
                bool_value(self.equals_and_hash_code.do_not_use_getters)
            }
            ConfigKey::ToStringCallSuper => policy_text(self.to_string.call_super),
            ConfigKey::ToStringIncludeFieldNames => {
                bool_value(self.to_string.include_field_names)
            }
            ConfigKey::ToStringDoNotUseGetters => bool_value(self.to_string.do_not_use_getters),
            ConfigKey::SingularAuto => bool_value(self.singular.auto),
            ConfigKey::BuilderClassName => text_value(self.builder.class_name.as_ref()),
            ConfigKey::BuilderFluent => bool_value(self.builder.fluent),
            ConfigKey::LogFieldName => text_value(self.log.field_name.as_ref()),
            ConfigKey::LogFieldIsStatic => bool_value(self.log.field_is_static),
            ConfigKey::FieldNameConstantsInnerTypeName => {
                text_value(self.field_name_constants.inner_type_name.as_ref())
            }
            ConfigKey::FieldNameConstantsUppercase => {
                bool_value(self.field_name_constants.uppercase)
            }
            ConfigKey::FieldListRedundancy => policy_text(self.field_lists.redundancy),
            ConfigKey::FlagUsage(stereotype) => {
                policy_text(self.flag_usage.get(&stereotype.config_name()).copied())
            }
        }
    }
}
