//! Steps covering generated builders and the singular accumulators.

use anyhow::{Context, Result, anyhow, ensure};
use member_synth::builder::ListAccumulator;
use member_synth::model::MaterializeArm;
use rstest_bdd_macros::{then, when};

use super::helpers::{build_body, builder_methods};
use crate::fixtures::SynthContext;

#[then("the builder {builder} declares {signature}")]
fn builder_declares(synth_context: &SynthContext, builder: String, signature: String) -> Result<()> {
    let methods = builder_methods(synth_context, &builder)?;
    ensure!(methods.contains(&signature), "{signature} not in {methods:?}");
    Ok(())
}

#[then("the build method of {builder} contains {text}")]
fn build_contains(synth_context: &SynthContext, builder: String, text: String) -> Result<()> {
    let body = build_body(synth_context, &builder)?;
    ensure!(body.contains(&text), "{text} not in {body}");
    Ok(())
}

#[when("{count:usize} tags are added and the list is built")]
fn build_tags(synth_context: &SynthContext, count: usize) {
    let mut tags = ListAccumulator::new();
    for index in 0..count {
        tags.add(format!("tag{index}"));
    }
    synth_context.built.set(tags.materialize());
}

#[then("the built list is {arm}")]
fn built_arm(synth_context: &SynthContext, arm: String) -> Result<()> {
    let expected = match arm.as_str() {
        "empty" => MaterializeArm::Empty,
        "singleton" => MaterializeArm::Singleton,
        "copy" => MaterializeArm::Copy,
        other => return Err(anyhow!("unknown materialization '{other}'")),
    };
    let actual = synth_context
        .built
        .with_ref(|built| built.arm())
        .context("no list has been built")?;
    ensure!(actual == expected, "built {actual:?}, expected {expected:?}");
    Ok(())
}

#[then("the built list holds {count:usize} tags")]
fn built_len(synth_context: &SynthContext, count: usize) -> Result<()> {
    let built = synth_context
        .built
        .with_ref(|built| built.as_slice().to_vec())
        .context("no list has been built")?;
    ensure!(built.len() == count, "built {built:?}");
    let expected: Vec<String> = (0..count).map(|index| format!("tag{index}")).collect();
    ensure!(built == expected, "insertion order lost: {built:?}");
    Ok(())
}
