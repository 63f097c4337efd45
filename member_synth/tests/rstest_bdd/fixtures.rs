//! Shared fixtures for the behaviour suite.

use std::sync::Arc;

use member_synth::Augmentation;
use member_synth::builder::Materialized;
use member_synth::model::DeclaredType;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// State shared by the steps of one scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct SynthContext {
    /// Type assembled by the `given` steps.
    pub declared: Slot<DeclaredType>,
    /// Dotted-key TOML lines written by the configuration steps.
    pub config_toml: Slot<String>,
    /// Result of augmenting the declared type.
    pub analysis: Slot<Arc<Augmentation>>,
    /// List produced by the accumulator steps.
    pub built: Slot<Materialized<String>>,
}

/// Creates an empty scenario state.
#[fixture]
pub fn synth_context() -> SynthContext {
    SynthContext::default()
}
