use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_stdin_to_stdout() {
    let mut cmd = Command::cargo_bin("xmlmap").expect("binary builds");
    cmd.write_stdin(r#"<root a="1"><b>x</b></root>"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""@a":"1""#))
        .stdout(predicate::str::contains(r#""Text":"x""#));
}

#[test]
fn test_file_input_and_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.xml");
    let output = dir.path().join("out.json");
    std::fs::write(&input, "<note><to>Tove</to></note>").expect("write input");

    let mut cmd = Command::cargo_bin("xmlmap").expect("binary builds");
    cmd.arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).expect("read output");
    assert!(written.contains(r#""note""#));
    assert!(written.contains(r#""Text":"Tove""#));
}

#[test]
fn test_unsafe_attributes_flag() {
    let mut cmd = Command::cargo_bin("xmlmap").expect("binary builds");
    cmd.arg("--unsafe-attributes")
        .write_stdin(r#"<root a="1"/>"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""a":"1""#))
        .stdout(predicate::str::contains("@a").not());
}

#[test]
fn test_pretty_output() {
    let mut cmd = Command::cargo_bin("xmlmap").expect("binary builds");
    cmd.arg("--pretty")
        .write_stdin("<root><b>x</b></root>")
        .assert()
        .success()
        .stdout(predicate::str::contains("  \"root\": {"));
}

#[test]
fn test_malformed_input_fails() {
    let mut cmd = Command::cargo_bin("xmlmap").expect("binary builds");
    cmd.write_stdin("<root><unclosed></root>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mismatched closing tag"));
}

#[test]
fn test_empty_stdin_fails() {
    let mut cmd = Command::cargo_bin("xmlmap").expect("binary builds");
    cmd.write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input provided"));
}
