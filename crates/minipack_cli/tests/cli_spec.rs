use std::process::Command;

const ENTRY: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../minipack_core/tests/fixtures/example/entry.js"
);

#[test]
fn test_bundle_to_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_minipack"))
        .arg(ENTRY)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("(function (modules) {"));
    assert!(stdout.contains("require(0);"));
    assert!(stdout.contains(r#"{"./message.js":1}"#));
}

#[test]
fn test_failure_exits_nonzero_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("entry.js");
    std::fs::write(&entry, "import 'lodash';").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_minipack"))
        .arg(&entry)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lodash"));
}

#[test]
fn test_missing_argument() {
    let output = Command::new(env!("CARGO_BIN_EXE_minipack")).output().unwrap();
    assert!(!output.status.success());
}
