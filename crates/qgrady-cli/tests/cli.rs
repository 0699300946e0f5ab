//! End-to-end tests for the `qgrady` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const PR_BOX: &str = include_str!("../../../demos/pr_box.qgrady");

const SIGNALLING_BOX: &str = "\
input  = [x, y];
output = [a, b];
range  = 2 -> 2;
[0.5, 0,   0,   0.5];
[0.4, 0,   0,   0.6];
[0.5, 0,   0,   0.5];
[0,   0.5, 0.5, 0  ];
";

fn qgrady(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qgrady"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to execute qgrady")
}

fn write_box(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn compiles_to_default_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.qgrady", PR_BOX);

    let output = qgrady(&["--file", path_arg(&input)]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "qgrady failed: {stderr}");

    let model = std::fs::read_to_string(dir.path().join("pr_box.prism")).unwrap();
    assert!(model.starts_with("// @qgrady-provenance model_sha256="));
    assert!(model.contains("\ndtmc\n"));
    assert!(model.contains("module OUTPUT"));
    assert!(stderr.contains("non-signalling check passed"));
}

#[test]
fn explicit_output_without_provenance() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.qgrady", PR_BOX);
    let target = dir.path().join("model.prism");

    let output = qgrady(&[
        "-f",
        path_arg(&input),
        "-o",
        path_arg(&target),
        "--no-provenance",
    ]);
    assert!(output.status.success());
    let model = std::fs::read_to_string(&target).unwrap();
    assert!(model.starts_with("dtmc\n"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.qgrady", PR_BOX);
    let first = dir.path().join("first.prism");
    let second = dir.path().join("second.prism");

    assert!(qgrady(&["-f", path_arg(&input), "-o", path_arg(&first)]).status.success());
    assert!(qgrady(&["-f", path_arg(&input), "-o", path_arg(&second)]).status.success());
    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn signalling_box_is_rejected_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "broken.qgrady", SIGNALLING_BOX);

    let output = qgrady(&["--file", path_arg(&input)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Signalling found"), "stderr: {stderr}");
    assert!(!dir.path().join("broken.prism").exists());
}

#[test]
fn check_only_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.qgrady", PR_BOX);

    let output = qgrady(&["--file", path_arg(&input), "--check"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("box is valid"));
    assert!(!dir.path().join("pr_box.prism").exists());
}

#[test]
fn json_record_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(
        dir.path(),
        "coin.json",
        r#"{
            "inputs": ["x"],
            "outputs": ["a"],
            "input_range": 2,
            "output_range": 2,
            "probabilities": [[0.5, 0.5], [0.25, 0.75]]
        }"#,
    );

    let output = qgrady(&["--file", path_arg(&input)]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let model = std::fs::read_to_string(dir.path().join("coin.prism")).unwrap();
    assert!(model.contains("0.25 : (a' = 0) & (ready' = true) + 0.75 : (a' = 1) & (ready' = true)"));
}

#[test]
fn wrong_input_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.txt", PR_BOX);

    let output = qgrady(&["--file", path_arg(&input)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(".qgrady"));
}

#[test]
fn non_prism_output_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.qgrady", PR_BOX);
    let target = dir.path().join("model.txt");

    let output = qgrady(&["-f", path_arg(&input), "-o", path_arg(&target)]);
    assert!(!output.status.success());
    assert!(!target.exists());
}

#[test]
fn directory_output_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "pr_box.qgrady", PR_BOX);
    let target = dir.path().join("out.prism");
    std::fs::create_dir(&target).unwrap();

    let output = qgrady(&["-f", path_arg(&input), "-o", path_arg(&target)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is a directory"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.qgrady");
    let output = qgrady(&["--file", path_arg(&input)]);
    assert!(!output.status.success());
}

#[test]
fn syntax_error_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "bad.qgrady", "input = [x] output = [a];");

    let output = qgrady(&["--file", path_arg(&input)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Syntax error"));
}

#[test]
fn version_flag_prints_version() {
    let output = qgrady(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unusable_tolerance_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_box(dir.path(), "broken.qgrady", SIGNALLING_BOX);

    for tolerance in ["--tolerance=NaN", "--tolerance=-0.5"] {
        let output = qgrady(&["--file", path_arg(&input), "--check", tolerance]);
        assert!(!output.status.success(), "{tolerance} was accepted");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid tolerance"), "stderr: {stderr}");
    }
}
