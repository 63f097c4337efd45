//! Binds the `member_synth` feature files to the step registry.

use crate::fixtures::{SynthContext, synth_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/singular_builder.feature",
    fixtures = [synth_context: SynthContext]
);
scenarios!(
    "tests/features/prefix_stripping.feature",
    fixtures = [synth_context: SynthContext]
);
scenarios!(
    "tests/features/boolean_naming.feature",
    fixtures = [synth_context: SynthContext]
);
