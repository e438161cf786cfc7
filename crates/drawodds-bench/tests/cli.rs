use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, catalog: &str) -> std::path::PathBuf {
    let catalog_path = dir.join("catalog.json");
    fs::write(&catalog_path, catalog).expect("catalog written");
    let config_path = dir.join("bench.yaml");
    let yaml = format!(
        r#"
run_id: "cli"
catalog: "{catalog}"
sampling:
  seed: 7
  samples: 500
queries:
  - name: "lands"
    kind: draw
    draws: 7
    category: land
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        catalog = catalog_path.display(),
        jsonl = dir.join("out/{run_id}.jsonl").display(),
        summary = dir.join("out/{run_id}.md").display(),
    );
    fs::write(&config_path, yaml).expect("config written");
    config_path
}

const CATALOG: &str = r#"[
  {"name": "Island", "count": 24, "categories": ["land"]},
  {"name": "Opt", "count": 36, "categories": ["instant"], "mana_value": 1}
]"#;

#[test]
fn validate_only_skips_execution() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), CATALOG);

    Command::cargo_bin("drawodds-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog OK: 60 cards"))
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("out/cli.jsonl").exists());
}

#[test]
fn run_writes_outputs_with_overrides() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), CATALOG);

    Command::cargo_bin("drawodds-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .args(["--run-id", "override", "--samples", "2000", "--seed", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run complete for 'override'"));

    let jsonl = fs::read_to_string(dir.path().join("out/override.jsonl")).expect("jsonl");
    assert!(jsonl.contains("\"samples\":2000"));
    assert!(dir.path().join("out/override.md").exists());
}

#[test]
fn invalid_catalog_fails() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(
        dir.path(),
        r#"[{"name": "Island", "count": 0, "categories": ["land"]}]"#,
    );

    Command::cargo_bin("drawodds-bench")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Island"));
}
