// crates/guest-gate-cli/tests/check_command.rs
// ============================================================================
// Module: CLI Check Command Tests
// Description: Integration tests for `guest-gate check`.
// Purpose: Pin JSON output and exit codes for member and guest claims.
// Dependencies: guest-gate-cli binary
// ============================================================================

//! ## Overview
//! Runs the CLI binary against claim files and verifies the printed decision
//! plus the allow/deny/error exit codes.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const CONFIG: &str = r#"
[audit]
sink = "none"

[[policies]]
name = "tenant_members"
deny_guests = true
"#;

const MEMBER_CLAIMS: &str = r#"[
  { "type": "iss", "value": "https://sts.windows.net/T/" },
  { "type": "idp", "value": "https://sts.windows.net/T/" }
]"#;

const GUEST_PAYLOAD: &str = r#"{
  "iss": "https://login.microsoftonline.com/T/v2.0",
  "idp": "https://sts.windows.net/OTHER/"
}"#;

fn guest_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_guest-gate"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(guest_gate_bin())
        .args(args)
        .env_remove("GUEST_GATE_CONFIG")
        .output()
        .expect("run guest-gate")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn bare_check_reports_member_basis() {
    let dir = tempfile::tempdir().unwrap();
    let claims = write(dir.path(), "claims.json", MEMBER_CLAIMS);
    let output = run(&["check", "--claims", claims.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "succeed");
    assert_eq!(json["basis"], "issuer_matches_identity_provider");
}

#[test]
fn bare_check_on_guest_payload_exits_denied() {
    let dir = tempfile::tempdir().unwrap();
    let payload = write(dir.path(), "payload.json", GUEST_PAYLOAD);
    let output = run(&["check", "--claims", payload.to_str().unwrap(), "--token-payload"]);
    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "no_decision");
    assert_eq!(json["basis"], "federated_identity_provider");
}

#[test]
fn policy_check_prints_decision() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "guest-gate.toml", CONFIG);
    let payload = write(dir.path(), "payload.json", GUEST_PAYLOAD);
    let output = run(&[
        "check",
        "--claims",
        payload.to_str().unwrap(),
        "--token-payload",
        "--policy",
        "tenant_members",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["allowed"], false);
    assert_eq!(json["unmet_requirements"][0], "deny_guests");
}

#[test]
fn unknown_policy_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "guest-gate.toml", CONFIG);
    let claims = write(dir.path(), "claims.json", MEMBER_CLAIMS);
    let output = run(&[
        "check",
        "--claims",
        claims.to_str().unwrap(),
        "--policy",
        "missing",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown policy"), "unexpected stderr: {stderr}");
}

#[test]
fn malformed_claims_are_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let claims = write(dir.path(), "claims.json", "{ not json");
    let output = run(&["check", "--claims", claims.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
