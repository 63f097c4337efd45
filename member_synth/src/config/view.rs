//! Typed reads of configuration for one declared type.

use super::ConfigSource;
use super::keys::{CallSuperPolicy, ConfigKey, ConfigValue, FlagUsage, RedundancyPolicy};
use crate::model::{DeclaredType, Stereotype};

/// Configuration as seen from one declared type, with defaults applied.
#[derive(Clone, Copy)]
pub struct ConfigView<'a> {
    source: &'a dyn ConfigSource,
    scope: &'a DeclaredType,
}

impl std::fmt::Debug for ConfigView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigView")
            .field("scope", &self.scope.id)
            .finish_non_exhaustive()
    }
}

impl<'a> ConfigView<'a> {
    /// Creates a view of `source` scoped to `scope`.
    #[must_use]
    pub fn new(source: &'a dyn ConfigSource, scope: &'a DeclaredType) -> Self {
        Self { source, scope }
    }

    /// Value configured by some layer, without defaults.
    #[must_use]
    pub fn explicit(&self, key: ConfigKey) -> Option<ConfigValue> {
        self.source.effective_config(key, self.scope)
    }

    /// Value with the built-in default applied.
    #[must_use]
    pub fn value(&self, key: ConfigKey) -> ConfigValue {
        self.explicit(key).unwrap_or_else(|| key.default_value())
    }

    /// Boolean key; a mistyped value falls back to the default.
    #[must_use]
    pub fn flag(&self, key: ConfigKey) -> bool {
        self.explicit(key)
            .and_then(|v| v.as_bool())
            .or_else(|| key.default_value().as_bool())
            .unwrap_or(false)
    }

    /// Explicit boolean, if configured.
    #[must_use]
    pub fn explicit_flag(&self, key: ConfigKey) -> Option<bool> {
        self.explicit(key).and_then(|v| v.as_bool())
    }

    /// Text key.
    #[must_use]
    pub fn text(&self, key: ConfigKey) -> String {
        self.explicit(key)
            .and_then(|v| v.as_text().map(str::to_owned))
            .or_else(|| key.default_value().as_text().map(str::to_owned))
            .unwrap_or_default()
    }

    /// List key.
    #[must_use]
    pub fn list(&self, key: ConfigKey) -> Vec<String> {
        self.value(key).to_list().unwrap_or_default()
    }

    /// `callSuper` policy for `equals_and_hash_code` or `to_string`.
    #[must_use]
    pub fn call_super(&self, key: ConfigKey) -> CallSuperPolicy {
        self.explicit(key)
            .and_then(|v| v.as_call_super())
            .or_else(|| key.default_value().as_call_super())
            .unwrap_or(CallSuperPolicy::Skip)
    }

    /// Redundant include/exclude reporting.
    #[must_use]
    pub fn redundancy(&self) -> RedundancyPolicy {
        match self.text(ConfigKey::FieldListRedundancy).as_str() {
            "silent" => RedundancyPolicy::Silent,
            _ => RedundancyPolicy::Warn,
        }
    }

    /// Usage flagging for `stereotype`.
    #[must_use]
    pub fn flag_usage(&self, stereotype: Stereotype) -> FlagUsage {
        match self.text(ConfigKey::FlagUsage(stereotype)).as_str() {
            "warning" => FlagUsage::Warning,
            "error" => FlagUsage::Error,
            _ => FlagUsage::Allow,
        }
    }

    /// Declared type the view is scoped to.
    #[must_use]
    pub const fn scope(&self) -> &'a DeclaredType {
        self.scope
    }
}
