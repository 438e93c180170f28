use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TYPES: &str = r#"
module: types
namespace: "urn:example:types"
prefix: t
revision: "2013-07-01"
body:
  - statement: grouping
    name: endpoint
    description: Address and port
    body:
      - { statement: leaf, name: address, type: string }
      - { statement: leaf, name: port, type: uint16 }
"#;

const OPS: &str = r#"
module: ops
namespace: "urn:example:ops"
prefix: ops
imports: [{ module: types, prefix: t }]
body:
  - statement: container
    name: server
    body:
      - statement: uses
        grouping: "t:endpoint"
        augments:
          - target: ""
            body:
              - { statement: leaf, name: vrf, type: string }
  - statement: rpc
    name: reset
    body:
      - statement: input
        body:
          - { statement: leaf, name: delay, type: uint32 }
      - statement: output
"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write document");
    path
}

fn sample_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_file(dir.path(), "types.yaml", TYPES);
    write_file(dir.path(), "ops.yaml", OPS);
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yang-compile"))
        .args(args)
        .output()
        .expect("failed to run yang-compile")
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_module_counts() {
    let dir = sample_dir();
    let out = run(&["check", dir.path().to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Compiled 2 module(s): 1 grouping(s), 1 rpc(s)."),
        "unexpected output: {stdout}"
    );
}

#[test]
fn check_fails_on_rpc_with_direct_leaf() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "bad.yaml",
        r#"
module: bad
namespace: "urn:bad"
prefix: bad
body:
  - statement: rpc
    name: reboot
    body:
      - { statement: leaf, name: delay, type: uint32 }
"#,
    );
    let out = run(&["check", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: module bad: cannot add leaf to rpc"));
}

#[test]
fn check_fails_on_missing_import() {
    let dir = sample_dir();
    let out = run(&[
        "check",
        dir.path().join("ops.yaml").to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("imported module 'types' is not loaded"));
}

#[test]
fn check_honors_max_depth() {
    let dir = sample_dir();
    let out = run(&["check", dir.path().to_str().unwrap(), "--max-depth", "1"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("maximum depth of 1"));
}

#[test]
fn check_without_sources_fails() {
    let out = run(&["check"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no schema sources available"));
}

// ---------------------------------------------------------------------------
// compile
// ---------------------------------------------------------------------------

#[test]
fn compile_writes_json_model() {
    let dir = sample_dir();
    let output = dir.path().join("out").join("model.json");
    let out = run(&[
        "compile",
        dir.path().join("types.yaml").to_str().unwrap(),
        dir.path().join("ops.yaml").to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let raw = fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let ops = &value["modules"]["ops"];
    assert_eq!(ops["prefix"], "ops");
    let uses = &ops["children"][0]["uses"][0];
    let names: Vec<_> = uses["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["qname"]["local_name"].as_str().unwrap())
        .collect();
    // Augmented nodes keep the augmenting module's namespace, which sorts first here.
    assert_eq!(names, vec!["vrf", "address", "port"]);
}

#[test]
fn compile_with_config_and_exclude() {
    let dir = sample_dir();
    let config = write_file(
        dir.path(),
        "compile.conf",
        "version: \"1.0\"\nsources: [\"types.yaml\"]\n",
    );
    let out = run(&[
        "compile",
        "--config",
        config.to_str().unwrap(),
        "--format",
        "yaml",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("name: types"));
    assert!(!stdout.contains("name: ops"));

    let out = run(&[
        "compile",
        dir.path().to_str().unwrap(),
        "--exclude",
        "ops",
        "--format",
        "table",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Module: types"));
    assert!(!stdout.contains("Module: ops"));
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_grouping_table() {
    let dir = sample_dir();
    let out = run(&[
        "inspect",
        dir.path().to_str().unwrap(),
        "--grouping",
        "types:endpoint",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Grouping: endpoint"));
    assert!(stdout.contains("Address and port"));
    assert!(stdout.contains("uint16"));
}

#[test]
fn inspect_rpc_json() {
    let dir = sample_dir();
    let out = run(&[
        "inspect",
        dir.path().to_str().unwrap(),
        "--rpc",
        "ops:reset",
        "--format",
        "json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["qname"]["local_name"], "reset");
    assert_eq!(
        value["input"]["children"][0]["qname"]["local_name"],
        "delay"
    );
}

#[test]
fn inspect_unknown_target_fails() {
    let dir = sample_dir();
    let out = run(&[
        "inspect",
        dir.path().to_str().unwrap(),
        "--rpc",
        "ops:missing",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&out.stderr).contains("rpc 'missing' not found in module 'ops'")
    );
}
