//! Stereotype-driven member synthesis.
//!
//! This crate computes the members a build-time generator would add to a
//! class because of stereotype annotations such as `@Getter`, `@Data` or
//! `@Builder`, without touching source text. A development tool hands the
//! engine declared snapshots through the [`Host`] trait and receives
//! synthesized fields, methods and nested types plus any [`Problem`]s found
//! while validating the annotations.
//!
//! The [`Augmenter`] is the entry point. Processors run in a fixed order from
//! the static [`processor::catalog`], and the [`conflict`] resolver makes sure
//! declared members always win and that the first synthesized member with a
//! given signature is the one that survives.

pub mod augment;
pub mod builder;
pub mod cache;
pub mod config;
pub mod conflict;
pub mod context;
mod error;
pub mod handlers;
pub mod host;
pub mod infer;
pub mod model;
pub mod modifiers;
pub mod naming;
pub mod problem;
pub mod processor;
pub mod selection;

#[cfg(test)]
mod testing;

pub use augment::{Augmentation, Augmenter};
pub use cache::AugmentCache;
pub use config::{ConfigKey, ConfigSource, ConfigValue, LayeredConfig, Settings};
pub use context::RequestContext;
pub use error::{SynthError, SynthResult};
pub use host::{Host, SnapshotHost, Symbol, SyntheticFactory};
pub use infer::{InferredType, PlaceholderKeyword, PlaceholderUse};
pub use problem::{Problem, Remediation, Severity};
