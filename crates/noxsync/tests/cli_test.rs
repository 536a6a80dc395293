//! Integration tests for the `noxsync` binary.
//!
//! Argument parsing, help, completions, the offline `parse` and `config`
//! commands, and one dry-run `sync` against mocked NetBox and Oxidized.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG: &str = "\
config system interface
    edit \"port1\"
        set vdom \"root\"
        set type physical
        set speed 1000full
        set status up
    next
    edit \"lan-vl30\"
        set vdom \"root\"
        set alias \"guests\"
        set interface \"port1\"
        set vlanid 30
    next
end
";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `noxsync` binary with env isolation.
///
/// Clears `NOXSYNC_*` variables and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn noxsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("noxsync");
    cmd.env("HOME", "/tmp/noxsync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/noxsync-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("NOXSYNC_CONFIG")
        .env_remove("NOXSYNC_NETBOX__URL")
        .env_remove("NOXSYNC_NETBOX__TOKEN")
        .env_remove("NOXSYNC_OXIDIZED__URL")
        .env_remove("NOXSYNC_OXIDIZED__USERNAME")
        .env_remove("NOXSYNC_OXIDIZED__PASSWORD")
        .env_remove("NOXSYNC_SYNC__WORKERS");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = noxsync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    noxsync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("sync")
            .and(predicate::str::contains("parse"))
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    noxsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("noxsync"));
}

#[test]
fn test_unknown_output_format_is_usage_error() {
    noxsync_cmd()
        .args(["-o", "xml", "config", "path"])
        .assert()
        .code(2);
}

#[test]
fn test_completions_bash() {
    noxsync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── parse ───────────────────────────────────────────────────────────

#[test]
fn test_parse_plain_lists_interface_names() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "fw01.conf", CONFIG);

    noxsync_cmd()
        .args(["parse", "-o", "plain"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::eq("port1\nguests\n"));
}

#[test]
fn test_parse_json_carries_vlan_details() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "fw01.conf", CONFIG);

    let output = noxsync_cmd()
        .args(["parse", "-o", "json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let vlan = &parsed[1];
    assert_eq!(vlan["name"], "guests");
    assert_eq!(vlan["kind"], "vlan");
    assert_eq!(vlan["vlan_id"], 30);
    assert_eq!(vlan["parent"], "port1");
}

#[test]
fn test_parse_reads_stdin() {
    noxsync_cmd()
        .args(["parse", "-o", "plain", "-"])
        .write_stdin(CONFIG)
        .assert()
        .success()
        .stdout(predicate::str::contains("port1"));
}

#[test]
fn test_parse_missing_file_fails() {
    noxsync_cmd()
        .args(["parse", "/tmp/noxsync-cli-test-nonexistent/absent.conf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot read"));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    noxsync_cmd()
        .args(["-c", "/etc/noxsync/custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/noxsync/custom.toml"));
}

#[test]
fn test_config_show_redacts_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "config.toml",
        "[netbox]\nurl = \"https://netbox.example.com\"\ntoken = \"super-secret\"\n",
    );

    noxsync_cmd()
        .arg("-c")
        .arg(&file)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://netbox.example.com")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("super-secret").not()),
        );
}

// ── sync ────────────────────────────────────────────────────────────

#[test]
fn test_sync_without_config_exits_with_config_code() {
    let output = noxsync_cmd()
        .args(["-c", "/tmp/noxsync-cli-test-nonexistent/config.toml", "sync"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    let text = combined_output(&output);
    assert!(text.contains("netbox.url"), "unexpected output:\n{text}");
}

#[test]
fn test_sync_rejects_zero_workers() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "config.toml",
        "[netbox]\nurl = \"https://netbox.example.com\"\ntoken = \"t\"\n\
         [oxidized]\nurl = \"http://oxidized.example.com\"\nusername = \"u\"\npassword = \"p\"\n",
    );

    noxsync_cmd()
        .arg("-c")
        .arg(&file)
        .args(["sync", "--workers", "0"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("sync.workers"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_dry_run_reports_without_writing() {
    let netbox = MockServer::start().await;
    let oxidized = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "fw01", "full_name": "firewalls/fw01", "model": "FortiOS" },
            { "name": "sw01", "full_name": "sw01", "model": "IOS" }
        ])))
        .mount(&oxidized)
        .await;
    Mock::given(method("GET"))
        .and(path("/node/fetch/firewalls/fw01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONFIG))
        .mount(&oxidized)
        .await;

    let page = |results: serde_json::Value| {
        json!({ "count": results.as_array().map_or(0, Vec::len), "next": null,
                "previous": null, "results": results })
    };
    Mock::given(method("GET"))
        .and(path("/api/dcim/devices/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 1, "name": "fw01", "site": { "id": 10 }, "tenant": null },
            { "id": 2, "name": "sw01", "site": { "id": 10 }, "tenant": null }
        ]))))
        .mount(&netbox)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dcim/interfaces/"))
        .and(query_param("device_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]))))
        .mount(&netbox)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/vlans/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]))))
        .mount(&netbox)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&netbox)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&netbox)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "config.toml",
        &format!(
            "[netbox]\nurl = \"{}\"\ntoken = \"nb-token\"\n\
             [oxidized]\nurl = \"{}\"\nusername = \"oxidized\"\npassword = \"secret\"\n",
            netbox.uri(),
            oxidized.uri()
        ),
    );

    let output = tokio::task::spawn_blocking(move || {
        noxsync_cmd()
            .arg("-c")
            .arg(&file)
            .args(["sync", "--dry-run", "-o", "json"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();
    assert!(
        output.status.success(),
        "sync failed:\n{}",
        combined_output(&output)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let devices = report.as_array().unwrap();
    assert_eq!(devices.len(), 2);

    // Sorted by node name.
    assert_eq!(devices[0]["node"], "fw01");
    let fw01 = &devices[0]["outcome"];
    assert_eq!(fw01["status"], "synced");
    assert_eq!(fw01["parsed"], 2);
    assert_eq!(fw01["vlans_created"], 1);
    assert_eq!(fw01["applied"]["created"], 2);

    assert_eq!(devices[1]["outcome"]["status"], "unsupported_model");
    assert_eq!(devices[1]["outcome"]["model"], "IOS");
}
