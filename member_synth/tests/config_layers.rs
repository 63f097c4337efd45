//! Configuration files and environment overrides change what is generated.

use anyhow::{Result, ensure};
use member_synth::model::{AnnotationUsage, DeclaredType, MemberKind, TypeId};
use member_synth::{Augmenter, SnapshotHost};
use test_helpers::figment::{load_config, to_anyhow, with_jail};
use test_helpers::snapshot::{field, names, person};

fn method_names(host: SnapshotHost, id: &str) -> Result<Vec<String>> {
    let methods = to_anyhow(Augmenter::new(host).augment(&TypeId::from(id), MemberKind::Method))?;
    Ok(names(&methods).into_iter().map(str::to_owned).collect())
}

#[test]
fn fluent_accessors_from_file() -> Result<()> {
    with_jail(|jail| {
        let config = load_config(
            jail,
            r"
            [accessors]
            fluent = true
            ",
        )?;
        let found = method_names(SnapshotHost::from_types([person()]).with_config(config), "a.Person")?;
        ensure!(found.iter().any(|n| n == "name"), "{found:?}");
        ensure!(!found.iter().any(|n| n == "getName"), "{found:?}");
        Ok(())
    })
}

#[test]
fn environment_overrides_file() -> Result<()> {
    with_jail(|jail| {
        jail.set_env("MEMBER_SYNTH_LOG__FIELD_NAME", "LOGGER");
        let config = load_config(
            jail,
            r#"
            [log]
            field_name = "logger"
            "#,
        )?;
        let ty = DeclaredType::class("a.Service").annotated(AnnotationUsage::new("Slf4j"));
        let host = SnapshotHost::from_types([ty]).with_config(config);
        let fields = to_anyhow(Augmenter::new(host).augment(&TypeId::from("a.Service"), MemberKind::Field))?;
        ensure!(names(&fields) == ["LOGGER"], "{:?}", names(&fields));
        Ok(())
    })
}

#[test]
fn scoped_prefixes_strip_field_names() -> Result<()> {
    with_jail(|jail| {
        let config = load_config(
            jail,
            r#"
            [scopes."legacy".accessors]
            prefix = ["m_"]
            "#,
        )?;
        let legacy = DeclaredType::class("legacy.Account")
            .annotated(AnnotationUsage::new("Getter"))
            .with_field(field("m_balance", "long", &[]));
        let modern = DeclaredType::class("modern.Account")
            .annotated(AnnotationUsage::new("Getter"))
            .with_field(field("m_balance", "long", &[]));
        let host = SnapshotHost::from_types([legacy, modern]).with_config(config);
        let augmenter = Augmenter::new(host);
        let scoped = to_anyhow(augmenter.augment(&TypeId::from("legacy.Account"), MemberKind::Method))?;
        let unscoped = to_anyhow(augmenter.augment(&TypeId::from("modern.Account"), MemberKind::Method))?;
        ensure!(names(&scoped) == ["getBalance"], "{:?}", names(&scoped));
        ensure!(names(&unscoped) == ["getM_balance"], "{:?}", names(&unscoped));
        Ok(())
    })
}

#[test]
fn flagged_usage_is_reported() -> Result<()> {
    with_jail(|jail| {
        let config = load_config(
            jail,
            r#"
            [flag_usage]
            data = "warning"
            "#,
        )?;
        let host = SnapshotHost::from_types([person()]).with_config(config);
        let analysis = to_anyhow(Augmenter::new(host).analyse(&TypeId::from("a.Person")))?;
        ensure!(!analysis.members.is_empty(), "warnings must not block generation");
        ensure!(
            analysis
                .problems
                .iter()
                .any(|p| p.message.contains("@Data") && !p.is_error()),
            "{:?}",
            analysis.problems
        );
        Ok(())
    })
}
