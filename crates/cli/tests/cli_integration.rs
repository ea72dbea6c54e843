//! CLI integration tests for `artshop`.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes and output.
//! No test needs a live node: each either fails before any network access
//! or points at an address where nothing listens.
//!
//! Every command runs in a fresh temporary directory with the `ARTSHOP_*`
//! variables cleared, so no ambient `artshop.toml` or environment leaks in.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ADDRESS: &str = "0x5b1869d9a4c187f2eaa108f3062412ecf0526b24";

/// Helper: create a Command for the `artshop` binary, rooted at `dir`.
fn artshop(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("artshop");
    cmd.current_dir(dir.path())
        .env_remove("ARTSHOP_RPC_URL")
        .env_remove("ARTSHOP_CONTRACT_ADDRESS")
        .env_remove("ARTSHOP_ACCOUNT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("artshop.toml");
    fs::write(&path, content).unwrap();
    path
}

/// A config pointing at a port where no JSON-RPC node listens.
fn unreachable_config(dir: &TempDir) -> std::path::PathBuf {
    write_config(
        dir,
        &format!(
            "[network]\nrpc_url = \"http://127.0.0.1:9\"\ncontract_address = \"{}\"\n",
            ADDRESS
        ),
    )
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Artwork provenance lifecycle client",
        ));
}

#[test]
fn version_exits_0() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("artshop"));
}

#[test]
fn help_lists_every_operation() {
    let dir = TempDir::new().unwrap();
    let assert = artshop(&dir).arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for command in [
        "create", "frame", "offer", "adopt", "pack", "pick-up", "ship", "deliver", "fetch",
        "request", "events", "account",
    ] {
        assert!(stdout.contains(command), "help is missing '{}'", command);
    }
}

// ──────────────────────────────────────────────
// 2. Argument validation
// ──────────────────────────────────────────────

#[test]
fn unknown_request_code_exits_1() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["request", "9", "--id", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown request code 9"));
}

#[test]
fn request_code_without_id_exits_1() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["request", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires --id"));
}

#[test]
fn offer_with_malformed_price_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["offer", "1", "--price", "two"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn json_errors_are_structured() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["--output", "json", "request", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""kind":"cli""#))
        .stderr(predicate::str::contains("unknown request code 12"));
}

#[test]
fn quiet_suppresses_text_errors() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["--quiet", "request", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. Configuration
// ──────────────────────────────────────────────

#[test]
fn missing_contract_address_exits_1() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["frame", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no contract address configured"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .args(["--config", "nowhere.toml", "fetch", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn malformed_config_exits_1() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[network\nrpc_url = ");
    artshop(&dir)
        .args(["fetch", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse"));
}

#[test]
fn invalid_contract_address_from_env_exits_1() {
    let dir = TempDir::new().unwrap();
    artshop(&dir)
        .env("ARTSHOP_CONTRACT_ADDRESS", "not-an-address")
        .args(["fetch", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid contract address"));
}

// ──────────────────────────────────────────────
// 4. Unreachable node
// ──────────────────────────────────────────────

#[test]
fn account_without_node_reports_provider_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = unreachable_config(&dir);
    artshop(&dir)
        .arg("--config")
        .arg(&config)
        .arg("account")
        .assert()
        .failure()
        .stderr(predicate::str::contains("account provider unavailable"));
}

#[test]
fn account_without_node_reports_json_kind() {
    let dir = TempDir::new().unwrap();
    unreachable_config(&dir);
    artshop(&dir)
        .args(["--output", "json", "account"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider_unavailable"));
}

#[test]
fn pinned_account_is_reported_without_a_node() {
    let dir = TempDir::new().unwrap();
    unreachable_config(&dir);
    artshop(&dir)
        .env("ARTSHOP_ACCOUNT", ADDRESS)
        .arg("account")
        .assert()
        .success()
        .stdout(predicate::str::contains(ADDRESS));
}

#[test]
fn invalid_pinned_account_exits_1() {
    let dir = TempDir::new().unwrap();
    unreachable_config(&dir);
    artshop(&dir)
        .env("ARTSHOP_ACCOUNT", "0x12")
        .arg("account")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid account"));
}
