//! Steps that declare a type, configure the engine and run the augmenter.

use anyhow::{Context, Result, ensure};
use member_synth::model::{AnnotationUsage, DeclaredType};
use member_synth::{Augmenter, LayeredConfig, SnapshotHost};
use rstest_bdd_macros::{given, when};
use test_helpers::figment::to_anyhow;
use test_helpers::snapshot::field;

use crate::fixtures::SynthContext;

fn add_field(synth_context: &SynthContext, name: &str, ty: &str, annotations: &[&str]) -> Result<()> {
    let declared = synth_context
        .declared
        .take()
        .context("no type has been declared")?;
    synth_context
        .declared
        .set(declared.with_field(field(name, ty, annotations)));
    Ok(())
}

fn configure(synth_context: &SynthContext, line: &str) {
    let mut text = synth_context.config_toml.take().unwrap_or_default();
    text.push_str(line);
    text.push('\n');
    synth_context.config_toml.set(text);
}

#[given("the {stereotype} type {id}")]
fn annotated_type(synth_context: &SynthContext, stereotype: String, id: String) -> Result<()> {
    ensure!(synth_context.declared.is_empty(), "a type is already declared");
    synth_context
        .declared
        .set(DeclaredType::class(&id).annotated(AnnotationUsage::new(stereotype)));
    Ok(())
}

#[given("it has a field {name} of type {ty}")]
fn plain_field(synth_context: &SynthContext, name: String, ty: String) -> Result<()> {
    add_field(synth_context, &name, &ty, &[])
}

#[given("it has a singular field {name} of type {ty}")]
fn singular_field(synth_context: &SynthContext, name: String, ty: String) -> Result<()> {
    add_field(synth_context, &name, &ty, &["Singular"])
}

#[given("the configuration strips the prefix {prefix}")]
fn strip_prefix(synth_context: &SynthContext, prefix: String) {
    configure(synth_context, &format!("accessors.prefix = [\"{prefix}\"]"));
}

#[given("the configuration keeps names that match no prefix")]
fn optional_prefix(synth_context: &SynthContext) {
    configure(synth_context, "accessors.prefix_must_match = false");
}

#[given("the configuration disables the is prefix")]
fn no_is_prefix(synth_context: &SynthContext) {
    configure(synth_context, "getter.no_is_prefix = true");
}

#[when("the type is augmented")]
fn augment(synth_context: &SynthContext) -> Result<()> {
    let declared = synth_context
        .declared
        .take()
        .context("no type has been declared")?;
    let id = declared.id.clone();
    let toml = synth_context.config_toml.take().unwrap_or_default();
    let config = to_anyhow(LayeredConfig::from_toml_str(&toml))?;
    let augmenter = Augmenter::new(SnapshotHost::from_types([declared]).with_config(config));
    synth_context.analysis.set(to_anyhow(augmenter.analyse(&id))?);
    Ok(())
}
