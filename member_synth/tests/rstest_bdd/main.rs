//! `rstest-bdd` behaviour suite for `member_synth`.
//!
//! [`fixtures`] holds the per-scenario state, while the `behaviour` module
//! registers the steps and binds the `.feature` files under
//! `tests/features/` to them.

mod behaviour;
mod fixtures;
