//! Integration tests for `slipway config --json` output.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "slipway-cli", "--bin", "slipway", "--"]);
    cmd
}

#[test]
fn test_config_json_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .args(["--cwd", dir.path().to_str().unwrap(), "--json", "config"])
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    assert_eq!(json["config_schema_version"].as_u64(), Some(1));
    assert!(json.get("config_file").is_none(), "no config file expected");

    let server = &json["server"];
    assert_eq!(server["port"].as_u64(), Some(1420));
    assert_eq!(server["strictPort"].as_bool(), Some(true));
    assert_eq!(server["host"].as_str(), Some("localhost"));
    assert_eq!(server["open"].as_bool(), Some(false));

    let ignored = server["watch"]["ignored"]
        .as_array()
        .expect("watch.ignored should be array");
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].as_str(), Some("**/src-tauri/**"));

    // No log contamination of stderr in --json mode (cargo's own build
    // output is tolerated)
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stderr.lines() {
        assert!(
            !line.trim().starts_with('{'),
            "stderr should not contain JSON: {line}"
        );
    }
}

#[test]
fn test_config_json_reads_vite_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("vite.config.js"),
        r#"
        import { defineConfig } from 'vite'

        export default defineConfig({
          server: {
            port: 4040,
            strictPort: false,
            watch: {
              ignored: ['**/src-tauri/**', '**/dist/**']
            }
          }
        })
        "#,
    )
    .unwrap();

    let output = cargo_bin()
        .args(["--cwd", dir.path().to_str().unwrap(), "--json", "config"])
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["config_file"].as_str(), Some("vite.config.js"));
    assert_eq!(json["server"]["port"].as_u64(), Some(4040));
    assert_eq!(json["server"]["strictPort"].as_bool(), Some(false));
    assert_eq!(
        json["server"]["watch"]["ignored"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_config_cli_flags_override_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("vite.config.js"),
        "export default { server: { port: 4040, strictPort: false } };",
    )
    .unwrap();

    let output = cargo_bin()
        .args([
            "--cwd",
            dir.path().to_str().unwrap(),
            "--json",
            "config",
            "--port",
            "5050",
            "--strict-port",
        ])
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["server"]["port"].as_u64(), Some(5050));
    assert_eq!(json["server"]["strictPort"].as_bool(), Some(true));
}

#[test]
fn test_config_human_output_not_json() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .args(["--cwd", dir.path().to_str().unwrap(), "config"])
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        serde_json::from_str::<serde_json::Value>(&stdout).is_err(),
        "Human output should not be valid JSON"
    );
    assert!(stdout.contains("Server"), "Missing Server section");
    assert!(
        stdout.contains("Watch exclusions"),
        "Missing Watch exclusions section"
    );
    assert!(stdout.contains("1420"), "Missing default port");
}

#[test]
fn test_config_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .args([
            "--cwd",
            dir.path().to_str().unwrap(),
            "config",
            "--config",
            "missing.config.js",
        ])
        .output()
        .expect("Failed to run config command");

    assert!(!output.status.success());
}
