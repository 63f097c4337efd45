//! Accessor naming rules.
//!
//! Names are derived from the field name after prefix stripping. Primitive
//! booleans use `is`, except that a field already named `isX` keeps its
//! name for the getter and drops the `is` for the setter and wither.

mod prefix;
mod singular;

pub use prefix::{PrefixPolicy, Stripped};
pub use singular::singularize;

use crate::config::{ConfigKey, ConfigView};
use crate::model::{AnnotationUsage, TypeRef};

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Lower-cases the first character.
#[must_use]
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Splits `isFoo` into `Foo`; `None` for names like `island`.
fn strip_is(name: &str) -> Option<&str> {
    name.strip_prefix("is")
        .filter(|rest| rest.chars().next().is_some_and(|c| !c.is_lowercase()))
}

/// Effective accessor naming policy for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessorPolicy {
    /// Prefix stripping.
    pub prefix: PrefixPolicy,
    /// Bare names without `get`/`set`.
    pub fluent: bool,
    /// Setters return `this`.
    pub chain: bool,
    /// Use `get` for primitive booleans too.
    pub no_is_prefix: bool,
}

impl AccessorPolicy {
    /// Resolves the policy from `@Accessors` usages ordered narrowest first
    /// (field, type, enclosing types) and then configuration.
    ///
    /// Each attribute is taken from the nearest usage that writes it.
    #[must_use]
    pub fn resolve<'a, I>(accessors: I, config: &ConfigView<'_>) -> Self
    where
        I: IntoIterator<Item = &'a AnnotationUsage>,
    {
        let mut fluent = None;
        let mut chain = None;
        let mut prefixes = None;
        for usage in accessors {
            if fluent.is_none() {
                fluent = usage.bool_attr("fluent");
            }
            if chain.is_none() {
                chain = usage.bool_attr("chain");
            }
            if prefixes.is_none() && usage.has("prefix") {
                prefixes = Some(usage.list_attr("prefix"));
            }
        }
        let fluent = fluent.unwrap_or_else(|| config.flag(ConfigKey::AccessorsFluent));
        let chain = chain
            .or_else(|| config.explicit_flag(ConfigKey::AccessorsChain))
            .unwrap_or(fluent);
        Self {
            prefix: PrefixPolicy {
                prefixes: prefixes.unwrap_or_else(|| config.list(ConfigKey::AccessorsPrefix)),
                case_sensitive: config.flag(ConfigKey::AccessorsPrefixCaseSensitive),
                must_match: config.flag(ConfigKey::AccessorsPrefixMustMatch),
            },
            fluent,
            chain,
            no_is_prefix: config.flag(ConfigKey::GetterNoIsPrefix),
        }
    }

    fn uses_is(&self, ty: &TypeRef) -> bool {
        ty.is_primitive_boolean() && !self.no_is_prefix
    }

    /// Getter name, or `None` if the field is rejected by the prefixes.
    #[must_use]
    pub fn getter_name(&self, field: &str, ty: &TypeRef) -> Option<String> {
        let base = self.prefix.base_name(field)?;
        if self.fluent {
            return Some(decapitalize(&base));
        }
        if self.uses_is(ty) {
            if strip_is(&base).is_some() {
                return Some(base);
            }
            return Some(format!("is{}", capitalize(&base)));
        }
        Some(format!("get{}", capitalize(&base)))
    }

    fn mutator_name(&self, verb: &str, field: &str, ty: &TypeRef) -> Option<String> {
        let base = self.prefix.base_name(field)?;
        let base = if self.uses_is(ty) {
            strip_is(&base).map_or(base.clone(), str::to_owned)
        } else {
            base
        };
        Some(format!("{verb}{}", capitalize(&base)))
    }

    /// Setter name, or `None` if rejected.
    #[must_use]
    pub fn setter_name(&self, field: &str, ty: &TypeRef) -> Option<String> {
        if self.fluent {
            return self.prefix.base_name(field).map(|b| decapitalize(&b));
        }
        self.mutator_name("set", field, ty)
    }

    /// Wither name, or `None` if rejected. Fluent mode keeps `with`.
    #[must_use]
    pub fn wither_name(&self, field: &str, ty: &TypeRef) -> Option<String> {
        self.mutator_name("with", field, ty)
    }

    /// Every getter name treated as equivalent when checking for collisions.
    ///
    /// For `isReady: boolean` this is `isReady`, `getReady`, `isIsReady`
    /// and `getIsReady`.
    #[must_use]
    pub fn all_getter_names(&self, field: &str, ty: &TypeRef) -> Vec<String> {
        self.all_names(field, ty, &["is", "get"])
    }

    /// Every setter name treated as equivalent when checking for collisions.
    #[must_use]
    pub fn all_setter_names(&self, field: &str, ty: &TypeRef) -> Vec<String> {
        self.all_names(field, ty, &["set"])
    }

    fn all_names(&self, field: &str, ty: &TypeRef, verbs: &[&str]) -> Vec<String> {
        let Some(base) = self.prefix.base_name(field) else {
            return Vec::new();
        };
        if self.fluent {
            return vec![decapitalize(&base)];
        }
        if !ty.is_primitive_boolean() {
            let verb = if verbs.contains(&"get") { "get" } else { "set" };
            return vec![format!("{verb}{}", capitalize(&base))];
        }
        let mut bases = Vec::new();
        if let Some(bare) = strip_is(&base) {
            bases.push(bare.to_owned());
        }
        bases.push(base);
        let mut names = Vec::new();
        for stem in &bases {
            for verb in verbs {
                let name = format!("{verb}{}", capitalize(stem));
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}
