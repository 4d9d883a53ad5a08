use std::fs;
use std::process::Command;

use tempfile::tempdir;

#[test]
fn validate_only_leaves_no_artifacts() {
    let dir = tempdir().expect("temp dir");
    let out = dir.path().join("out");
    let config_path = dir.path().join("bench.yaml");
    let yaml = format!(
        r#"
run_id: "validate"
matches:
  count: 2
players:
  - name: "greedy"
    kind: "greedy"
  - name: "random"
    kind: "random"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: true
"#,
        jsonl = out.join("matches.jsonl").display(),
        summary = out.join("summary.md").display()
    );
    fs::write(&config_path, yaml).expect("config written");

    let status = Command::new(env!("CARGO_BIN_EXE_tablic-bench"))
        .arg("--config")
        .arg(&config_path)
        .arg("--validate-only")
        .status()
        .expect("binary runs");

    assert!(status.success());
    assert!(!out.exists());
}
