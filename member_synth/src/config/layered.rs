//! Layered configuration loading.
//!
//! Layers are merged with figment in increasing precedence: built-in
//! defaults, a TOML document, then `MEMBER_SYNTH_*` environment variables
//! (`__` separates nested keys). The document may carry
//! `[scopes."<prefix>"]` tables that override the base settings for every
//! type whose qualified name starts with the prefix; nested scopes apply
//! from shortest to longest prefix.

use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ConfigSource;
use super::keys::{ConfigKey, ConfigValue};
use super::settings::Settings;
use crate::error::{SynthError, SynthResult};
use crate::model::DeclaredType;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MEMBER_SYNTH_";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigDocument {
    #[serde(flatten)]
    base: Settings,
    scopes: BTreeMap<String, Settings>,
}

/// Merges `layer` over `base`; absent keys in `layer` keep the base value.
fn overlay(base: &Settings, layer: &Settings) -> SynthResult<Settings> {
    Figment::from(Serialized::defaults(base))
        .merge(Serialized::defaults(layer))
        .extract()
        .map_err(SynthError::config)
}

/// Whether `prefix` covers `qualified` on a segment boundary.
fn scope_matches(prefix: &str, qualified: &str) -> bool {
    qualified
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.') || prefix.ends_with('.'))
}

/// Fully merged configuration with per-scope overlays precomputed.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    base: Settings,
    /// Scope overlays as written.
    raw: BTreeMap<String, Settings>,
    /// Resolved scopes, longest prefix first.
    scopes: Vec<(String, Settings)>,
}

impl LayeredConfig {
    /// Built-in defaults only.
    #[must_use]
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Uses `settings` as the base layer without scopes.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            base: settings,
            raw: BTreeMap::new(),
            scopes: Vec::new(),
        }
    }

    /// Extracts the configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Config`] when extraction fails.
    pub fn from_figment(figment: &Figment) -> SynthResult<Self> {
        let document: ConfigDocument = figment.extract().map_err(SynthError::config)?;
        let mut config = Self::from_settings(document.base);
        for (prefix, settings) in document.scopes {
            config = config.with_scope(prefix, settings)?;
        }
        Ok(config)
    }

    /// Parses a TOML document (no environment layer).
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Config`] if the document is malformed.
    pub fn from_toml_str(text: &str) -> SynthResult<Self> {
        let figment = Figment::from(Serialized::defaults(ConfigDocument::default()))
            .merge(Toml::string(text));
        Self::from_figment(&figment)
    }

    /// Loads defaults, the optional TOML file at `path`, then environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Config`] if any layer fails to parse.
    pub fn load(path: Option<&Path>) -> SynthResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(ConfigDocument::default()));
        if let Some(file) = path {
            debug!(path = %file.display(), "loading configuration file");
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Adds (or extends) a scope overlay for types under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Config`] if the overlay cannot be merged.
    pub fn with_scope(mut self, prefix: impl Into<String>, settings: Settings) -> SynthResult<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(SynthError::invalid_config(
                "scopes",
                "scope prefix must not be empty",
            ));
        }
        let merged = match self.raw.remove(&prefix) {
            Some(existing) => overlay(&existing, &settings)?,
            None => settings,
        };
        self.raw.insert(prefix, merged);
        self.scopes = Self::resolve(&self.base, &self.raw)?;
        Ok(self)
    }

    fn resolve(
        base: &Settings,
        raw: &BTreeMap<String, Settings>,
    ) -> SynthResult<Vec<(String, Settings)>> {
        let mut resolved = Vec::with_capacity(raw.len());
        for prefix in raw.keys() {
            let mut chain: Vec<(&String, &Settings)> = raw
                .iter()
                .filter(|(outer, _)| scope_matches(outer, prefix))
                .collect();
            chain.sort_by_key(|(outer, _)| outer.len());
            let mut effective = base.clone();
            for (_, layer) in chain {
                effective = overlay(&effective, layer)?;
            }
            resolved.push((prefix.clone(), effective));
        }
        resolved.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Ok(resolved)
    }

    /// Effective settings for a type with the given qualified name.
    #[must_use]
    pub fn settings_for(&self, qualified: &str) -> &Settings {
        self.scopes
            .iter()
            .find(|(prefix, _)| scope_matches(prefix, qualified))
            .map_or(&self.base, |(_, settings)| settings)
    }

    /// Base settings without scope overlays.
    #[must_use]
    pub const fn base(&self) -> &Settings {
        &self.base
    }
}

impl ConfigSource for LayeredConfig {
    fn effective_config(&self, key: ConfigKey, scope: &DeclaredType) -> Option<ConfigValue> {
        self.settings_for(scope.id.as_str()).value(key)
    }
}
