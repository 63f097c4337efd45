//! Test helpers shared across crates.
//!
//! This crate provides snapshot builders for common declared types, a
//! re-entrant host that records lookups, a factory that turns synthesized
//! members back into declarations, and `figment::Jail` plumbing for
//! configuration tests.

pub mod factory;
pub mod figment;
pub mod host;
pub mod snapshot;
