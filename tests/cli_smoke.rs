use std::path::{Path, PathBuf};

const FIXTURE: &str = include_str!("data/index.html");

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_pagewright")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "pagewright.exe"
            } else {
                "pagewright"
            });
            p
        })
}

fn fresh_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn arg(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

#[test]
fn cli_apply_patches_in_place_with_sibling_asset() {
    let dir = fresh_dir("apply");
    let doc = dir.join("index.html");
    std::fs::write(&doc, FIXTURE).unwrap();
    std::fs::write(dir.join("button-explanation-base64.txt"), "SUQzBAAA\nAAAA\n").unwrap();

    let status = std::process::Command::new(exe())
        .args(["apply", "--doc", arg(&doc).as_str()])
        .status()
        .unwrap();
    assert!(status.success());

    let html = std::fs::read_to_string(&doc).unwrap();
    assert!(html.contains("// === BUTTON EXPLANATION AUDIO SYSTEM ==="));
    assert!(html.contains("BUTTON_EXPLANATION_AUDIO_PREFIX + 'SUQzBAAAAAAA';"));
    assert!(!html.contains("btn-practice-form"));
}

#[test]
fn cli_missing_explicit_asset_disables_audio() {
    let dir = fresh_dir("missing_asset");
    let doc = dir.join("index.html");
    std::fs::write(&doc, FIXTURE).unwrap();

    let status = std::process::Command::new(exe())
        .args([
            "apply",
            "--doc",
            arg(&doc).as_str(),
            "--asset",
            arg(&dir.join("narration.txt")).as_str(),
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let html = std::fs::read_to_string(&doc).unwrap();
    assert!(html.contains("BUTTON_EXPLANATION_AUDIO_PREFIX + '';"));
}

#[test]
fn cli_dry_run_writes_nothing() {
    let dir = fresh_dir("dry_run");
    let doc = dir.join("index.html");
    std::fs::write(&doc, FIXTURE).unwrap();

    let status = std::process::Command::new(exe())
        .args(["apply", "--dry-run", "--doc", arg(&doc).as_str()])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(std::fs::read_to_string(&doc).unwrap(), FIXTURE);
}

#[test]
fn cli_strict_fails_on_missing_anchor() {
    let dir = fresh_dir("strict");
    let doc = dir.join("index.html");
    std::fs::write(&doc, "<html><body></body></html>").unwrap();

    let status = std::process::Command::new(exe())
        .args(["apply", "--strict", "--doc", arg(&doc).as_str()])
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(
        std::fs::read_to_string(&doc).unwrap(),
        "<html><body></body></html>"
    );
}

#[test]
fn cli_check_reports_each_rule() {
    let dir = fresh_dir("check");
    let doc = dir.join("index.html");
    std::fs::write(&doc, FIXTURE).unwrap();

    let out = std::process::Command::new(exe())
        .args(["check", "--doc", arg(&doc).as_str()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let rules = report.as_array().unwrap();
    assert_eq!(rules[0]["name"], "control-panel-css");
    assert_eq!(rules[0]["status"], "applied");
    assert_eq!(rules[0]["matches"], 1);
    assert_eq!(std::fs::read_to_string(&doc).unwrap(), FIXTURE);

    std::fs::write(&doc, "<html></html>").unwrap();
    let status = std::process::Command::new(exe())
        .args(["check", "--doc", arg(&doc).as_str()])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_missing_document_fails() {
    let dir = fresh_dir("missing");
    let status = std::process::Command::new(exe())
        .args(["apply", "--doc", arg(&dir.join("nope.html")).as_str()])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_rules_prints_json() {
    let out = std::process::Command::new(exe())
        .args(["rules", "--link-match", "containment"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let s = String::from_utf8(out.stdout).unwrap();
    let rules = pagewright::rules_from_json(&s).unwrap();
    assert_eq!(rules.len(), 11);
    assert!(s.contains("const LINK_MATCH = \\\"containment\\\";"));
}
