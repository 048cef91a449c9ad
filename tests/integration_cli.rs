use assert_cmd::Command;

// Without a tty on stdin the binary refuses to start instead of garbling the terminal.
#[test]
fn refuses_to_run_without_tty() {
    let mut cmd = Command::cargo_bin("quotype").unwrap();
    let assert = cmd.arg("--offline").write_stdin("").assert();
    assert.failure();
}

#[test]
fn prints_help() {
    let mut cmd = Command::cargo_bin("quotype").unwrap();
    let output = cmd.arg("--help").output().unwrap();
    assert!(output.status.success());

    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("--offline"));
    assert!(help.contains("--prompt"));
    assert!(help.contains("--endpoint"));
}
