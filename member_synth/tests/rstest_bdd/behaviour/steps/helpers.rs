//! Lookups shared by the `then` steps.

use anyhow::{Context, Result};
use member_synth::model::{MemberKind, SynthesizedMember};
use test_helpers::snapshot::{nested, rendered};

use crate::fixtures::SynthContext;

/// Splits a comma-separated step argument into trimmed names.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Names of the synthesized methods, in generation order.
pub fn method_names(synth_context: &SynthContext) -> Result<Vec<String>> {
    synth_context
        .analysis
        .with_ref(|analysis| {
            analysis
                .members_of(MemberKind::Method)
                .map(|member| member.name().to_owned())
                .collect()
        })
        .context("the type has not been augmented")
}

/// Messages of the warnings reported while augmenting.
pub fn warnings(synth_context: &SynthContext) -> Result<Vec<String>> {
    synth_context
        .analysis
        .with_ref(|analysis| {
            analysis
                .problems
                .iter()
                .filter(|problem| !problem.is_error())
                .map(|problem| problem.message.clone())
                .collect()
        })
        .context("the type has not been augmented")
}

/// Rendered method signatures of the nested type `builder`.
pub fn builder_methods(synth_context: &SynthContext, builder: &str) -> Result<Vec<String>> {
    synth_context
        .analysis
        .with_ref(|analysis| nested(&analysis.members, builder).map(rendered))
        .context("the type has not been augmented")?
        .with_context(|| format!("no nested type named {builder}"))
}

/// Body of the `build()` method of the nested type `builder`.
pub fn build_body(synth_context: &SynthContext, builder: &str) -> Result<String> {
    synth_context
        .analysis
        .with_ref(|analysis| {
            nested(&analysis.members, builder).and_then(|members| {
                members
                    .iter()
                    .filter_map(SynthesizedMember::as_method)
                    .find(|method| method.name == "build")
                    .map(|method| method.body.to_string())
            })
        })
        .context("the type has not been augmented")?
        .with_context(|| format!("{builder} has no build method"))
}
