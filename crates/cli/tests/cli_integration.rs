//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `signscript` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to conformance fixtures resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `signscript` binary, rooted at workspace.
fn signscript() -> Command {
    let mut cmd = cargo_bin_cmd!("signscript");
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

const POSE: &str = "{R_P2, [0.10, 0.20, 0.30], [0.00, 0.00, 0.00], [0.00, 0.00, 0.00]} - {L_P2, [0.10, 0.20, 0.30], [0.00, 0.00, 0.00], [0.00, 0.00, 0.00]}";

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    signscript()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Sign-language animation script toolchain",
        ));
}

#[test]
fn version_exits_0() {
    signscript()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("signscript"));
}

// ──────────────────────────────────────────────
// 2. Compile subcommand
// ──────────────────────────────────────────────

#[test]
fn compile_matches_expected_output() {
    let expected =
        fs::read_to_string(workspace_root().join("conformance/positive/wave.expected.json"))
            .unwrap();
    let out = signscript()
        .args(["compile", "conformance/positive/wave.sls"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.trim_end(), expected.trim_end());
}

#[test]
fn compile_writes_output_file() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("wave.json");
    signscript()
        .args(["compile", "conformance/positive/wave.sls", "-o"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(json[0]["WAVE"]["name"], "WAVE");
}

#[test]
fn compile_with_lexical_noise_warns_and_succeeds() {
    signscript()
        .args(["compile", "conformance/positive/lexical_noise.sls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"RUIDO\""))
        .stderr(predicate::str::contains("illegal character '#'"));
}

#[test]
fn compile_syntax_error_exits_1() {
    signscript()
        .args(["compile", "conformance/negative/missing_dot.sls"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("syntax error"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn compile_syntax_error_json_output() {
    let out = signscript()
        .args([
            "--output",
            "json",
            "compile",
            "conformance/negative/missing_dot.sls",
        ])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let err: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(err["kind"], "syntax");
    assert!(err["line"].is_number());
}

#[test]
fn compile_missing_file_exits_1() {
    signscript()
        .args(["compile", "conformance/positive/nope.sls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn compile_honors_config_vector_style() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("signscript.toml");
    fs::write(&cfg, "[output]\nvector_style = \"quoted\"\n").unwrap();
    signscript()
        .arg("--config")
        .arg(&cfg)
        .args(["compile", "conformance/positive/wave.sls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"R1\": \"[0.0, 0.0, 0.0]\""));
}

#[test]
fn bad_config_exits_1() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("signscript.toml");
    fs::write(&cfg, "[output]\nvector_style = \"sideways\"\n").unwrap();
    signscript()
        .arg("--config")
        .arg(&cfg)
        .args(["compile", "conformance/positive/wave.sls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error loading config"));
}

#[test]
fn bad_config_json_error_is_valid_json() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("signscript.toml");
    fs::write(&cfg, "[output]\nvector_style = \"side\\ways\n").unwrap();
    let out = signscript()
        .arg("--config")
        .arg(&cfg)
        .args(["--output", "json", "compile", "conformance/positive/wave.sls"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let err: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let msg = err["error"].as_str().unwrap();
    assert!(msg.starts_with("error loading config"));
    assert!(msg.contains('\n'));
}

#[test]
fn compile_rejects_runaway_repeat() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("huge.sls");
    fs::write(&src, format!("(BIG)REPEAT(4294967295,REPEAT(4294967295,{POSE})).")).unwrap();
    signscript()
        .arg("compile")
        .arg(&src)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("expansion error"))
        .stderr(predicate::str::contains("exceeds the limit of 100000 poses"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn config_pose_limit_applies_to_check() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("signscript.toml");
    fs::write(&cfg, "[compile]\nmax_poses = 1\n").unwrap();
    let out = signscript()
        .arg("--config")
        .arg(&cfg)
        .args(["--output", "json", "check", "conformance/positive/nested_macros.sls"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let err: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(err["kind"], "expansion");
    assert!(err["line"].is_number());
}

#[test]
fn rust_log_overrides_default_level() {
    signscript()
        .env("RUST_LOG", "debug")
        .args(["check", "conformance/positive/wave.sls"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn default_level_hides_debug() {
    signscript()
        .args(["check", "conformance/positive/wave.sls"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not());
}

// ──────────────────────────────────────────────
// 3. Format subcommand
// ──────────────────────────────────────────────

#[test]
fn format_prints_canonical_layout() {
    let tmp = TempDir::new().unwrap();
    let raw = tmp.path().join("raw.sls");
    fs::write(&raw, format!("(A) REPEAT(2, {POSE}), {POSE}.")).unwrap();
    signscript()
        .arg("format")
        .arg(&raw)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("(A)\n\nREPEAT(2,\n    {R_P2,"));
}

#[test]
fn format_reports_skipped_characters() {
    let tmp = TempDir::new().unwrap();
    let raw = tmp.path().join("raw.sls");
    fs::write(&raw, format!("(A) @{POSE}.")).unwrap();
    signscript()
        .arg("format")
        .arg(&raw)
        .assert()
        .success()
        .stderr(predicate::str::contains("unrecognized character '@'"));
}

// ──────────────────────────────────────────────
// 4. Validate subcommand
// ──────────────────────────────────────────────

#[test]
fn validate_expected_output_exits_0() {
    signscript()
        .args(["validate", "conformance/positive/nested_macros.expected.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_rejects_zero_speed() {
    let tmp = TempDir::new().unwrap();
    let text = fs::read_to_string(workspace_root().join("conformance/positive/wave.expected.json"))
        .unwrap()
        .replace("\"speed\": 1", "\"speed\": 0");
    let doc = tmp.path().join("bad.json");
    fs::write(&doc, text).unwrap();
    signscript()
        .arg("validate")
        .arg(&doc)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn validate_rejects_key_name_mismatch() {
    let tmp = TempDir::new().unwrap();
    let text = fs::read_to_string(workspace_root().join("conformance/positive/wave.expected.json"))
        .unwrap()
        .replace("\"name\": \"WAVE\"", "\"name\": \"OTHER\"");
    let doc = tmp.path().join("bad.json");
    fs::write(&doc, text).unwrap();
    signscript()
        .arg("validate")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WAVE"));
}

// ──────────────────────────────────────────────
// 5. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_prints_summary() {
    signscript()
        .args(["check", "conformance/positive/nested_macros.sls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Animations: 2"))
        .stdout(predicate::str::contains("HOLA (6 poses)"));
}

#[test]
fn check_json_reports_collisions() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("dup.sls");
    fs::write(&src, format!("(A){POSE}.(B){POSE}.(A){POSE},{POSE}.")).unwrap();
    let out = signscript()
        .args(["--output", "json", "check"])
        .arg(&src)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(summary["animations"], 3);
    assert_eq!(summary["poses"], 4);
    assert_eq!(summary["collisions"][0]["name"], "A");
    assert_eq!(summary["collisions"][0]["indices"], serde_json::json!([0, 2]));
}

// ──────────────────────────────────────────────
// 6. Build subcommand
// ──────────────────────────────────────────────

#[test]
fn build_writes_all_artifacts() {
    let tmp = TempDir::new().unwrap();
    let rows = tmp.path().join("rows.json");
    let table = serde_json::json!([
        ["Words", "Face", "Script"],
        ["Gracias", "F_SMILE", format!("SPEED(2, {POSE}, {POSE})")],
        ["sí", "F_NOD", "short"],
    ]);
    fs::write(&rows, table.to_string()).unwrap();
    let out_dir = tmp.path().join("out");

    signscript()
        .arg("build")
        .arg(&rows)
        .arg("--out")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("built 1 of 2 records"));

    for name in [
        "dictionary.json",
        "animations.json",
        "database.txt",
        "database.json",
    ] {
        assert!(out_dir.join(name).exists(), "missing {}", name);
    }
    let db = fs::read_to_string(out_dir.join("database.txt")).unwrap();
    assert!(db.starts_with("(IDLE)"));
    assert!(db.contains("(GRACIAS)\n\nSPEED(2,"));

    signscript()
        .arg("validate")
        .arg(out_dir.join("database.json"))
        .assert()
        .success();
}

#[test]
fn build_missing_column_exits_1() {
    let tmp = TempDir::new().unwrap();
    let rows = tmp.path().join("rows.json");
    fs::write(&rows, r#"[["Words", "Script"], ["Hola", "x"]]"#).unwrap();
    signscript()
        .arg("build")
        .arg(&rows)
        .arg("--out")
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing column 'Face'"));
}
