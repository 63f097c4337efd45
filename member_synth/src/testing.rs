//! Unit-test harness for processors.

use crate::config::LayeredConfig;
use crate::context::RequestContext;
use crate::host::SnapshotHost;
use crate::model::{DeclaredType, SynthesizedMember};
use crate::processor::ProcessorContext;

/// Runs `f` with a context over `ty` and default configuration.
pub fn with_context<R>(ty: &DeclaredType, f: impl FnOnce(&ProcessorContext<'_>) -> R) -> R {
    with_config(ty, LayeredConfig::defaults(), f)
}

/// Runs `f` with a context over `ty` and `config`.
pub fn with_config<R>(
    ty: &DeclaredType,
    config: LayeredConfig,
    f: impl FnOnce(&ProcessorContext<'_>) -> R,
) -> R {
    with_synthesized(ty, config, &[], f)
}

/// Runs `f` as if `synthesized` had already been accepted in this pass.
pub fn with_synthesized<R>(
    ty: &DeclaredType,
    config: LayeredConfig,
    synthesized: &[SynthesizedMember],
    f: impl FnOnce(&ProcessorContext<'_>) -> R,
) -> R {
    let host = SnapshotHost::from_types([ty.clone()]).with_config(config);
    let request = RequestContext::new();
    let ctx = ProcessorContext::new(&host, &request, ty, &[], synthesized);
    f(&ctx)
}

/// Names of `members`, in order.
pub fn names(members: &[SynthesizedMember]) -> Vec<&str> {
    members.iter().map(SynthesizedMember::name).collect()
}

/// Rendered body of the first method called `name`.
pub fn body_of(members: &[SynthesizedMember], name: &str) -> String {
    members
        .iter()
        .filter_map(SynthesizedMember::as_method)
        .find(|m| m.name == name)
        .map(|m| m.body.to_string())
        .unwrap_or_default()
}
