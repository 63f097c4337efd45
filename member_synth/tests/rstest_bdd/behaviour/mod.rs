//! Behavioural scenarios for the augmenter.
//!
//! Step implementations live under [`steps`], while [`scenarios`] binds the
//! feature files to the shared fixtures.

mod scenarios;
pub mod steps;
