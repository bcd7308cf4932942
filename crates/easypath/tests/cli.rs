//! Drive the built `easypath` binary.

use assert_cmd::Command;
use std::io::Write;

fn easypath() -> Command {
    Command::cargo_bin("easypath").unwrap()
}

fn stdout(args: &[&str]) -> String {
    let output = easypath().args(args).output().expect("failed to execute easypath");
    assert!(output.status.success(), "{args:?} exited with {}", output.status);
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_no_arguments_prints_usage() {
    assert_eq!(
        stdout(&[]),
        "Usage:\n\teasypath var1 var2 \"var1 + var2\"\n\n\
         \tLast argument is the expression, all other arguments are interpreted as variables.\n\n"
    );
}

#[test]
fn test_converts_expression() {
    assert_eq!(stdout(&["a", "b", "a^b"]), "%a.power(%b)\n");
    assert_eq!(stdout(&["a", "b", "LOG(a, b)"]), "(%b).log(%a)\n");
    assert_eq!(stdout(&["'Test'"]), "'Test'\n");
}

#[test]
fn test_expression_may_start_with_hyphen() {
    assert_eq!(stdout(&["a", "-a^-3.3"]), "-%a.power(-3.3)\n");
    assert_eq!(stdout(&["-a^2"]), "null\n");
    assert_eq!(stdout(&["-v", "a", "-a"]), "-%a\n");
}

#[test]
fn test_rejected_expression_prints_null() {
    assert_eq!(stdout(&["a", "b", "a+b+z"]), "null\n");
    assert_eq!(stdout(&["a", "a$b"]), "null\n");
}

#[test]
fn test_explain_reports_cause() {
    easypath()
        .args(["--explain", "a", "b", "a+b+z"])
        .assert()
        .failure()
        .code(1)
        .stdout("null\n")
        .stderr("error: unknown token `z` at offset 4\n");
}

#[test]
fn test_explain_on_success_exits_zero() {
    easypath()
        .args(["--explain", "a", "NOT(a)"])
        .assert()
        .success()
        .stdout("(%a).not()\n");
}

#[test]
fn test_json_output() {
    let out = stdout(&["--json", "a", "b", "a^b"]);
    insta::assert_snapshot!(
        out.trim_end(),
        @r#"{"expression":"a^b","output":"%a.power(%b)","error":null,"kind":null}"#
    );
}

#[test]
fn test_json_output_on_failure() {
    let out = stdout(&["--json", "a", "a++b"]);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["expression"], "a++b");
    assert!(report["output"].is_null());
    assert_eq!(report["error"], "unknown operator `++` at offset 1");
    assert_eq!(report["kind"], "unknown-operator");
}

#[test]
fn test_config_file_overrides_marker() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "marker = \"$\"").unwrap();
    let path = file.path().to_str().unwrap();
    assert_eq!(stdout(&["--config", path, "x", "ABS(x)"]), "($x).abs()\n");
}

#[test]
fn test_config_file_restricts_functions() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[functions]\nzero_arg = [\"ABS\"]").unwrap();
    let path = file.path().to_str().unwrap();
    assert_eq!(stdout(&["--config", path, "x", "LN(x)"]), "null\n");
    assert_eq!(stdout(&["--config", path, "x", "ABS(x)"]), "(%x).abs()\n");
}

#[test]
fn test_missing_config_fails() {
    let output = easypath()
        .args(["--config", "/nonexistent/catalog.toml", "a", "a"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read catalog"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let output = easypath().args(["-vv", "a", "a^2"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "%a.power(2)\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("converted expression"));
}
