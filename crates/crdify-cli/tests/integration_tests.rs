//! Integration tests for the crdify binary

use std::process::Command;

/// Helper to run the crdify command
fn crdify(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_crdify"))
        .args(args)
        .output()
        .expect("Failed to execute crdify")
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

fn fixture_ref(name: &str) -> String {
    format!("file://{}/{}", fixtures_path(), name)
}

#[test]
fn test_breaking_change_exits_nonzero() {
    let output = crdify(&[
        &fixture_ref("widgets-old.yaml"),
        &fixture_ref("widgets-new-breaking.yaml"),
    ]);

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("existingFieldRemoval"));
    assert!(stdout.contains("field/^.spec.mode"));
    assert!(stdout.contains("type changed from \"integer\" to \"string\""));
}

#[test]
fn test_compatible_change_exits_zero() {
    let output = crdify(&[
        &fixture_ref("widgets-old.yaml"),
        &fixture_ref("widgets-new-compatible.yaml"),
    ]);

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    // The added description is surfaced, but only as a warning.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("WARNING"));
    assert!(stdout.contains("description"));
}

#[test]
fn test_identical_revisions_produce_empty_report() {
    let output = crdify(&[
        &fixture_ref("widgets-old.yaml"),
        &fixture_ref("widgets-old.yaml"),
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_json_output_is_parseable() {
    let output = crdify(&[
        &fixture_ref("widgets-old.yaml"),
        &fixture_ref("widgets-new-breaking.yaml"),
        "--output",
        "json",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert!(json.get("crdValidation").is_some());
    assert!(json.get("sameVersionValidation").is_some());
}

#[test]
fn test_relaxed_config_downgrades_to_warnings() {
    let output = crdify(&[
        &fixture_ref("widgets-old.yaml"),
        &fixture_ref("widgets-new-breaking.yaml"),
        "--config",
        &format!("{}/config-relaxed.yaml", fixtures_path()),
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("WARNING"));
    assert!(!stdout.contains("ERROR"));
}

#[test]
fn test_unsupported_scheme_fails() {
    let output = crdify(&[
        "http://example.com/crd.yaml",
        &fixture_ref("widgets-old.yaml"),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file") && stderr.contains("git"));
}

#[test]
fn test_missing_file_fails() {
    let output = crdify(&[
        &fixture_ref("does-not-exist.yaml"),
        &fixture_ref("widgets-old.yaml"),
    ]);

    assert!(!output.status.success());
}
