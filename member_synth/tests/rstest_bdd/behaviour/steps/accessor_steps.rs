//! Assertions over synthesized accessor names and reported warnings.

use anyhow::{Result, ensure};
use rstest_bdd_macros::then;

use super::helpers::{method_names, split_names, warnings};
use crate::fixtures::SynthContext;

#[then("the methods are {names}")]
fn methods_are(synth_context: &SynthContext, names: String) -> Result<()> {
    let found = method_names(synth_context)?;
    ensure!(found == split_names(&names), "methods were {found:?}");
    Ok(())
}

#[then("the methods include {names}")]
fn methods_include(synth_context: &SynthContext, names: String) -> Result<()> {
    let found = method_names(synth_context)?;
    for expected in split_names(&names) {
        ensure!(found.contains(&expected), "{expected} not in {found:?}");
    }
    Ok(())
}

#[then("the methods exclude {names}")]
fn methods_exclude(synth_context: &SynthContext, names: String) -> Result<()> {
    let found = method_names(synth_context)?;
    for unexpected in split_names(&names) {
        ensure!(!found.contains(&unexpected), "{unexpected} in {found:?}");
    }
    Ok(())
}

#[then("a warning mentions {text}")]
fn warning_mentions(synth_context: &SynthContext, text: String) -> Result<()> {
    let found = warnings(synth_context)?;
    ensure!(
        found.iter().any(|message| message.contains(&text)),
        "no warning mentions {text}: {found:?}"
    );
    Ok(())
}

#[then("no warning is reported")]
fn no_warning(synth_context: &SynthContext) -> Result<()> {
    let found = warnings(synth_context)?;
    ensure!(found.is_empty(), "unexpected warnings: {found:?}");
    Ok(())
}
