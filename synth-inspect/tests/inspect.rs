//! Snapshot files on disk through the inspection pipeline.

use std::fs;

use anyhow::{Context, Result, anyhow, ensure};
use camino::Utf8PathBuf;
use member_synth::Augmenter;
use member_synth::model::MemberKind;
use rstest::{fixture, rstest};
use synth_inspect::cli::KindArg;
use synth_inspect::input::{load_config, load_snapshot};
use synth_inspect::report::build_report;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "types": [{
        "id": "shop.Order",
        "name": "Order",
        "kind": "class",
        "annotations": [{ "name": "Data" }],
        "fields": [
            { "name": "id", "type": "long" },
            { "name": "items", "type": "java.util.List<String>" }
        ]
    }]
}"#;

struct Workspace {
    _dir: TempDir,
    snapshot: Utf8PathBuf,
    config: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non UTF-8 temp path {}", path.display()));
    let snapshot = root.join("snapshot.json");
    let config = root.join("member-synth.toml");
    fs::write(&snapshot, SNAPSHOT).unwrap_or_else(|err| panic!("write snapshot: {err}"));
    fs::write(&config, "[accessors]\nchain = true\n").unwrap_or_else(|err| panic!("write config: {err}"));
    Workspace {
        _dir: dir,
        snapshot,
        config,
    }
}

#[rstest]
fn methods_reflect_the_configuration(workspace: Workspace) -> Result<()> {
    let document = load_snapshot(&workspace.snapshot)?;
    let config = load_config(Some(&workspace.config))?;
    let augmenter = Augmenter::new(document.host(config));
    let report = build_report(&document, &augmenter, &[], Some(KindArg::Method.member_kind()))?;
    let order = report.types.first().context("no type reported")?;
    let setter = order
        .members
        .iter()
        .filter_map(|m| m.as_method())
        .find(|m| m.name == "setItems")
        .ok_or_else(|| anyhow!("setItems missing: {}", report.render_text()))?;
    ensure!(
        setter.return_type.as_ref().map(ToString::to_string) == Some("Order".to_owned()),
        "chained setters return the type: {setter:?}"
    );
    ensure!(order.members.iter().all(|m| m.kind() == MemberKind::Method));
    Ok(())
}

#[rstest]
fn json_report_round_trips_through_serde(workspace: Workspace) -> Result<()> {
    let document = load_snapshot(&workspace.snapshot)?;
    let augmenter = Augmenter::new(document.host(load_config(None)?));
    let report = build_report(&document, &augmenter, &["shop.Order".to_owned()], None)?;
    let json: serde_json::Value = serde_json::to_value(&report)?;
    let members = json
        .pointer("/types/0/members")
        .and_then(serde_json::Value::as_array)
        .context("members array missing")?;
    ensure!(!members.is_empty(), "{json}");
    ensure!(report.error_count() == 0, "{}", report.render_text());
    Ok(())
}

#[test]
fn missing_snapshot_names_the_path() {
    let path = Utf8PathBuf::from("does/not/exist.json");
    let err = load_snapshot(&path).err().map(|e| e.to_string()).unwrap_or_default();
    assert!(err.contains("does/not/exist.json"), "{err}");
}
