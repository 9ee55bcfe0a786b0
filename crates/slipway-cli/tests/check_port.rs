//! Integration tests for `slipway check`: the strict-port startup contract.

use std::net::TcpListener;
use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "slipway-cli", "--bin", "slipway", "--"]);
    cmd
}

/// Grab a port that is free right now.
fn free_port() -> u16 {
    TcpListener::bind(("127.0.0.1", 0))
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[test]
fn test_check_binds_exact_port_when_free() {
    let dir = tempfile::tempdir().unwrap();
    let port = free_port();

    let output = cargo_bin()
        .args([
            "--cwd",
            dir.path().to_str().unwrap(),
            "--json",
            "check",
            "--port",
            &port.to_string(),
        ])
        .output()
        .expect("Failed to run check command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["ok"].as_bool(), Some(true));
    assert_eq!(json["port"].as_u64(), Some(u64::from(port)));
    assert_eq!(json["bound_port"].as_u64(), Some(u64::from(port)));
    assert_eq!(json["strict_port"].as_bool(), Some(true));
}

#[test]
fn test_check_strict_port_fails_when_taken() {
    let dir = tempfile::tempdir().unwrap();

    // Hold the port for the duration of the subprocess
    let holder = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = holder.local_addr().unwrap().port();

    let output = cargo_bin()
        .args([
            "--cwd",
            dir.path().to_str().unwrap(),
            "--json",
            "check",
            "--port",
            &port.to_string(),
            "--strict-port",
        ])
        .output()
        .expect("Failed to run check command");

    assert!(
        !output.status.success(),
        "strict port + occupied port must fail startup"
    );
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["ok"].as_bool(), Some(false));
    assert!(json.get("bound_port").is_none(), "no fallback under strict");
    let error = json["error"].as_str().unwrap();
    assert!(error.contains(&port.to_string()), "error names the port");
}

#[test]
fn test_check_non_strict_falls_forward() {
    let dir = tempfile::tempdir().unwrap();

    let holder = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = holder.local_addr().unwrap().port();

    let output = cargo_bin()
        .args([
            "--cwd",
            dir.path().to_str().unwrap(),
            "--json",
            "check",
            "--port",
            &port.to_string(),
            "--no-strict-port",
        ])
        .output()
        .expect("Failed to run check command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["ok"].as_bool(), Some(true));
    let bound = json["bound_port"].as_u64().unwrap();
    assert_ne!(bound, u64::from(port));
}
