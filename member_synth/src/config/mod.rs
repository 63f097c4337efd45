//! Configuration boundary.
//!
//! The engine only ever asks for the effective value of a [`ConfigKey`] in
//! the scope of a declared type. Hosts answer through [`ConfigSource`]; the
//! bundled [`LayeredConfig`] implements it over figment layers.

mod keys;
mod layered;
mod settings;
mod view;

pub use keys::{CallSuperPolicy, ConfigKey, ConfigValue, FlagUsage, RedundancyPolicy};
pub use layered::{ENV_PREFIX, LayeredConfig};
pub use settings::{
    AccessorSettings, BuilderSettings, ConstructorSettings, EqualitySettings,
    FieldDefaultSettings, FieldListSettings, FieldNameConstantSettings, GetterSettings,
    LogSettings, Settings, SingularSettings, ToStringSettings,
};
pub use view::ConfigView;

use crate::model::DeclaredType;

/// Source of effective configuration values.
pub trait ConfigSource: Send + Sync {
    /// Value of `key` for `scope`, or `None` when no layer sets it.
    fn effective_config(&self, key: ConfigKey, scope: &DeclaredType) -> Option<ConfigValue>;
}

impl<C: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<C> {
    fn effective_config(&self, key: ConfigKey, scope: &DeclaredType) -> Option<ConfigValue> {
        (**self).effective_config(key, scope)
    }
}
