//! The `binresolve` executable end to end.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn load_prints_resolved_binary() {
    let env = TestEnv::new();
    let tool = env.bins.add("faketool", "faketool 3.2.1");

    env.cmd()
        .args(["load", "faketool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("faketool 3.2.1"))
        .stdout(predicate::str::contains(tool.display().to_string()));
}

#[test]
fn load_json_output() {
    let env = TestEnv::new();
    env.bins.add("faketool", "faketool 3.2.1");

    let output = env.cmd().args(["load", "faketool", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["name"], "faketool");
    assert_eq!(records[0]["provider"], "env");
    assert_eq!(records[0]["version"], "3.2.1");
    assert_eq!(records[0]["is_valid"], true);
}

#[test]
fn load_missing_binary_fails_with_trail() {
    let env = TestEnv::new();

    env.cmd()
        .args(["load", "missingtool-xyz"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("env (load): not found"))
        .stderr(predicate::str::contains("None of the providers (env) could find or install 'missingtool-xyz'"));
}

#[test]
fn exec_forwards_output_and_exit_code() {
    let env = TestEnv::new();
    env.bins.add_script(
        "echoer",
        "if [ \"$1\" = \"--version\" ]; then echo 'echoer 1.0.0'; exit 0; fi\necho \"args:$*\"\nexit 4\n",
    );

    env.cmd()
        .args(["exec", "echoer", "--", "-x", "value"])
        .assert()
        .code(4)
        .stdout(predicate::str::diff("args:-x value\n"));
}

#[test]
fn exec_passes_stdin_and_bytes_through() {
    let env = TestEnv::new();
    env.bins.add_script(
        "rawcat",
        "if [ \"$1\" = \"--version\" ]; then echo 'rawcat 1.0.0'; exit 0; fi\ncat\nprintf '\\377'\n",
    );

    let output = env.cmd().args(["exec", "rawcat"]).write_stdin("piped input\n").output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"piped input\n\xff");
}

#[test]
fn list_uses_declared_binaries() {
    let env = TestEnv::new();
    env.bins.add("faketool", "faketool 0.9.0");
    env.write_config(
        r#"
[binaries.faketool]
description = "a fake tool"

[binaries.othertool]
"#,
    );

    let output = env.cmd().args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().map(Vec::len), Some(2));
    assert_eq!(records[0]["name"], "faketool");
    assert_eq!(records[0]["description"], "a fake tool");
    assert_eq!(records[0]["is_valid"], true);
    assert_eq!(records[1]["name"], "othertool");
    assert_eq!(records[1]["is_valid"], false);

    env.cmd()
        .args(["list", "nosuchtool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not declared"));
}

#[test]
fn explicit_config_path_is_used() {
    let env = TestEnv::new();
    let path = env.home().join("tools.toml");
    std::fs::write(&path, "[binaries.faketool]\ndescription = \"from explicit config\"\n").unwrap();

    env.cmd()
        .args(["--config", path.to_str().unwrap(), "list", "--no-load"])
        .assert()
        .success()
        .stdout(predicate::str::contains("faketool"));

    env.cmd()
        .args(["--config", env.home().join("absent.toml").to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn unknown_provider_suggests_builtin() {
    let env = TestEnv::new();

    env.cmd()
        .args(["load", "faketool", "--provider", "bre"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider 'bre'"))
        .stderr(predicate::str::contains("brew"));
}

#[test]
fn providers_lists_configured_order() {
    let env = TestEnv::new();

    let output = env.cmd().args(["providers", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["name"], "env");
    assert_eq!(records[0]["installer"], serde_json::Value::Null);
}
