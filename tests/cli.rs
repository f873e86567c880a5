//! Command-line behavior of the `wiremark` binary

use std::process::Command;

fn wiremark(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wiremark"))
        .args(args)
        .output()
        .expect("Failed to run wiremark")
}

#[test]
fn test_formats_lists_every_format() {
    let output = wiremark(&["formats"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout.lines().collect();
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "token-simple");
    assert!(names.contains(&"ast-json"));
}

#[test]
fn test_check_fails_on_errors() {
    let output = wiremark(&["check", "samples/problems.wm"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("samples/problems.wm:"), "{}", stdout);
    assert!(stdout.contains("5 problem(s), worst: error"), "{}", stdout);
}

#[test]
fn test_check_passes_clean_documents() {
    let output = wiremark(&["check", "samples/login.wm"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "no problems");
}

#[test]
fn test_compile_with_format_flag() {
    let output = wiremark(&["compile", "samples/login.wm", "--format", "ast-treeviz"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("⧉ 3 declaration(s)"));
}

#[test]
fn test_unknown_format_is_an_error() {
    let output = wiremark(&["compile", "samples/login.wm", "-f", "ast-xml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ast-xml"));
}
