//! Whole-pipeline properties of the augmenter.

use std::sync::Arc;
use std::thread;

use anyhow::{Result, anyhow, ensure};
use member_synth::model::{DeclaredType, MemberKind, SynthesizedMember, TypeId};
use member_synth::{Augmenter, SnapshotHost, SynthResult};
use rstest::rstest;
use test_helpers::factory::{DeclaringFactory, fold};
use test_helpers::figment::to_anyhow;
use test_helpers::snapshot::{field, names, person, point, post};

/// `post()` plus a `@Builder.Default` counter, so a default supplier is
/// generated on the built type.
fn post_with_default() -> DeclaredType {
    post().with_field(field("retries", "int", &["Builder.Default"]).with_initializer("3"))
}

fn augment(ty: &DeclaredType) -> SynthResult<Vec<SynthesizedMember>> {
    let id = ty.id.clone();
    let augmenter = Augmenter::new(SnapshotHost::from_types([ty.clone()]));
    let analysis = augmenter.analyse(&id)?;
    Ok(analysis.members.clone())
}

#[test]
fn data_expands_into_accessors_equality_and_constructor() -> Result<()> {
    let members = to_anyhow(augment(&person()))?;
    let found = names(&members);
    for expected in [
        "getName",
        "getAge",
        "isActive",
        "setName",
        "setAge",
        "setActive",
        "equals",
        "canEqual",
        "hashCode",
        "toString",
    ] {
        ensure!(found.contains(&expected), "{expected} not in {found:?}");
    }
    let constructor = members
        .iter()
        .filter_map(SynthesizedMember::as_method)
        .find(|m| m.is_constructor())
        .ok_or_else(|| anyhow!("no constructor in {found:?}"))?;
    ensure!(constructor.params.len() == 1, "{constructor:?}");
    Ok(())
}

#[test]
fn value_types_get_getters_but_no_setters() -> Result<()> {
    let members = to_anyhow(augment(&point()))?;
    let found = names(&members);
    ensure!(found.contains(&"getX") && found.contains(&"getY"), "{found:?}");
    ensure!(!found.iter().any(|n| n.starts_with("set")), "{found:?}");
    Ok(())
}

#[rstest]
#[case::data(person())]
#[case::value(point())]
#[case::builder(post())]
fn augmentation_is_deterministic(#[case] ty: DeclaredType) -> Result<()> {
    let first = to_anyhow(augment(&ty))?;
    let second = to_anyhow(augment(&ty))?;
    ensure!(first == second, "results differ between runs");
    let first_json = serde_json::to_string(&first)?;
    let second_json = serde_json::to_string(&second)?;
    ensure!(first_json == second_json, "serialized results differ");
    Ok(())
}

#[rstest]
#[case::data(person())]
#[case::value(point())]
#[case::builder(post())]
#[case::builder_default(post_with_default())]
fn materialized_members_are_not_synthesized_again(#[case] ty: DeclaredType) -> Result<()> {
    let id = ty.id.clone();
    let augmenter = Augmenter::new(SnapshotHost::from_types([ty.clone()]));
    let mut handles = Vec::new();
    for kind in [MemberKind::Field, MemberKind::Method, MemberKind::NestedType] {
        handles.extend(to_anyhow(augmenter.materialize(&DeclaringFactory, &id, kind))?);
    }
    ensure!(!handles.is_empty(), "nothing synthesized for {id}");
    let materialized = fold(ty, handles);
    let again = to_anyhow(augment(&materialized))?;
    ensure!(again.is_empty(), "re-synthesized {:?}", names(&again));
    Ok(())
}

#[test]
fn concurrent_requests_agree() -> Result<()> {
    let host = SnapshotHost::from_types([person(), point(), post()]);
    let augmenter = Arc::new(Augmenter::with_cache(host));
    let ids = ["a.Person", "a.Point", "a.Post"].map(TypeId::from);
    let baseline: Vec<Vec<SynthesizedMember>> = ids
        .iter()
        .map(|id| to_anyhow(augmenter.augment(id, MemberKind::Method)))
        .collect::<Result<_>>()?;
    augmenter.cache().into_iter().for_each(|cache| cache.clear());
    let outcomes: Vec<bool> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let shared = Arc::clone(&augmenter);
                let ids = &ids;
                let baseline = &baseline;
                scope.spawn(move || {
                    ids.iter().zip(baseline).cycle().skip(worker).take(6).all(|(id, expected)| {
                        shared
                            .augment(id, MemberKind::Method)
                            .is_ok_and(|members| members == *expected)
                    })
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|handle| handle.join().unwrap_or(false))
            .collect()
    });
    ensure!(outcomes.iter().all(|ok| *ok), "{outcomes:?}");
    ensure!(
        augmenter.cache().map(member_synth::AugmentCache::len) == Some(3),
        "every type should be cached once"
    );
    Ok(())
}
