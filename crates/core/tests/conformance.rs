//! Conformance suite: every `conformance/positive/*.sls` compiles to its
//! `.expected.json` byte for byte, every `conformance/negative/*.sls`
//! fails with a syntax error.

use signscript_core::{compile, compile_to_json, CompileError, CompileOptions, SerializeOptions};
use std::path::{Path, PathBuf};

fn fixtures(kind: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../conformance")
        .join(kind);
    let mut paths: Vec<_> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", dir.display(), e))
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "sls"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn positive_fixtures_match_expected_json() {
    let paths = fixtures("positive");
    assert!(!paths.is_empty());
    let mut failures = Vec::new();
    for path in &paths {
        let src = std::fs::read_to_string(path).unwrap();
        let expected_path = path.with_extension("expected.json");
        let expected = std::fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("missing {}: {}", expected_path.display(), e));
        match compile_to_json(&src, &CompileOptions::default(), &SerializeOptions::default()) {
            Ok((json, _)) if json.trim_end() == expected.trim_end() => {}
            Ok((json, _)) => failures.push(format!(
                "{}: output differs\n--- got ---\n{}\n--- expected ---\n{}",
                path.display(),
                json,
                expected
            )),
            Err(e) => failures.push(format!("{}: {}", path.display(), e)),
        }
    }
    assert!(
        failures.is_empty(),
        "{} of {} fixtures failed:\n{}",
        failures.len(),
        paths.len(),
        failures.join("\n")
    );
}

#[test]
fn negative_fixtures_fail_with_syntax_error() {
    let paths = fixtures("negative");
    assert!(!paths.is_empty());
    for path in &paths {
        let src = std::fs::read_to_string(path).unwrap();
        match compile(&src) {
            Err(CompileError::Syntax { .. }) => {}
            other => panic!("{}: expected a syntax error, got {:?}", path.display(), other),
        }
    }
}

#[test]
fn noise_fixture_reports_exactly_one_lexical_error() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../conformance/positive/lexical_noise.sls");
    let out = compile(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(out.lex_errors.len(), 1);
    assert_eq!(out.lex_errors[0].ch, '#');
    assert_eq!(out.lex_errors[0].pos.line, 1);
}
