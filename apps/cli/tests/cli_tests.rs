//! CLI 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const LOG: &str = "\
can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27
can0 577 [8] 00 00 00 00 71 00 00 00 00 00 10 27
can0 580 [8] 9A 00 00 00 72 00 00 00 00 00 10 27
can0 1399 [8] 9A 00 00 00 71 00 00 00 00 00 10 27
can0 580 [8] 9A 00 00 00 71 00 00 00 00 00 05 00
";

fn cli() -> Command {
    Command::cargo_bin("motor-power-cli").unwrap()
}

#[test]
fn test_decode_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("bus.log");
    fs::write(&log, LOG).unwrap();
    let config = dir.path().join("config.toml");

    cli()
        .args(["--config"])
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    cli()
        .arg("decode")
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(
            "{\"topic\":\"/motor_power\",\"motor_id\":321,\"motor_power_watts\":1000.0}\n\
             {\"topic\":\"/motor_power\",\"motor_id\":324,\"motor_power_watts\":0.5}\n",
        );
}

#[test]
fn test_decode_stdin_with_marker_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "topic = \"/bench\"\n").unwrap();

    // 空标记：所有行都交给解码器
    cli()
        .args(["decode", "-", "--marker", "", "--config"])
        .arg(&config)
        .write_stdin(LOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"topic\":\"/bench\"").count(3));
}

#[test]
fn test_decode_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "").unwrap();

    cli()
        .arg("decode")
        .arg(dir.path().join("absent.log"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    cli().arg("--config").arg(&config).args(["config", "init"]).assert().success();
    cli().arg("--config").arg(&config).args(["config", "init"]).assert().failure();
    cli()
        .arg("--config")
        .arg(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marker = \"9A\""));
}

#[cfg(unix)]
#[test]
fn test_monitor_runs_capture_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "throttle_ms = 0\n").unwrap();

    cli()
        .args([
            "monitor",
            "--command",
            r"printf 'can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27\n'",
            "--config",
        ])
        .arg(&config)
        .assert()
        .success()
        .stdout("{\"topic\":\"/motor_power\",\"motor_id\":321,\"motor_power_watts\":1000.0}\n");
}
