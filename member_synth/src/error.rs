//! Error types for contract violations and configuration loading.
//!
//! User-facing policy violations are never errors: they travel as
//! [`crate::problem::Problem`] values. `SynthError` is reserved for the host
//! handing the engine something structurally impossible, or for
//! configuration that cannot be read at all.

use figment::Error as FigmentError;
use thiserror::Error;

use crate::model::TypeId;

/// Errors raised by the engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// A type reference could not be parsed.
    #[error("malformed type '{input}': {message}")]
    TypeSyntax {
        /// Offending source text.
        input: String,
        /// What went wrong.
        message: String,
    },

    /// A field's owner back reference names a different type.
    #[error("field '{field}' claims owner '{claimed}' but was supplied inside '{actual}'")]
    OwnerMismatch {
        /// Field name.
        field: String,
        /// Owner recorded on the field.
        claimed: TypeId,
        /// Type whose snapshot contained the field.
        actual: TypeId,
    },

    /// Configuration layers could not be merged or extracted.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<FigmentError>),

    /// A configuration value had the wrong shape.
    #[error("invalid value for '{key}': {message}")]
    InvalidConfig {
        /// Dotted key.
        key: String,
        /// Explanation.
        message: String,
    },
}

impl SynthError {
    /// Construct a configuration error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use member_synth::SynthError;
    /// let err = SynthError::config(figment::Error::from("boom"));
    /// assert!(matches!(err, SynthError::Config(_)));
    /// ```
    #[must_use]
    pub fn config(source: FigmentError) -> Self {
        Self::Config(Box::new(source))
    }

    /// Construct an invalid-value error.
    #[must_use]
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the crate.
pub type SynthResult<T> = Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_mismatch_names_both_types() {
        let err = SynthError::OwnerMismatch {
            field: "name".to_owned(),
            claimed: TypeId::from("a.Other"),
            actual: TypeId::from("a.Person"),
        };
        let text = err.to_string();
        assert!(text.contains("a.Other"), "{text}");
        assert!(text.contains("a.Person"), "{text}");
    }

    #[test]
    fn figment_errors_convert() {
        let err: SynthError = Box::new(FigmentError::from("bad toml")).into();
        assert!(err.to_string().contains("bad toml"));
    }
}
