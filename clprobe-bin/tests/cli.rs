use std::process::{Command, Output};

const MISSING_LIBRARY: &str = "/nonexistent/libOpenCL-clprobe-cli-test.so";

fn clprobe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_clprobe"))
        .args(args)
        .env_remove("CLPROBE_LIBRARY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_probe_failure_exits_zero_by_default() {
    let output = clprobe(&["--library", MISSING_LIBRARY]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Exception Can't init OpenCL driver!\n"
    );
}

#[test]
fn test_strict_probe_failure_exits_non_zero() {
    let output = clprobe(&["--strict", "--library", MISSING_LIBRARY, "report"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Exception Can't init OpenCL driver!\n"
    );
}

#[test]
fn test_strict_json_failure_exits_non_zero() {
    let output = clprobe(&["report", "--format", "json", "--strict", "--library", MISSING_LIBRARY]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Exception "));
}

#[test]
fn test_version_command() {
    let output = clprobe(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("clprobe v"));
}
