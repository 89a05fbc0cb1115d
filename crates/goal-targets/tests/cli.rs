#![cfg(feature = "cli")]

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

fn target_png(dir: &std::path::Path) -> std::path::PathBuf {
    let mut img = RgbImage::from_pixel(320, 240, Rgb([0, 0, 0]));
    for y in 60..118 {
        for x in 100..224 {
            let border = !(108..216).contains(&x) || !(68..110).contains(&y);
            if border {
                img.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
    }
    let path = dir.join("frame.png");
    img.save(&path).unwrap();
    path
}

#[test]
fn analyze_prints_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let image = target_png(dir.path());
    let out = dir.path().join("report.json");

    Command::cargo_bin("goal-targets")
        .unwrap()
        .args(["--log-level", "off", "analyze"])
        .arg(&image)
        .arg("--json")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("is a high goal"))
        .stdout(predicate::str::contains("best: high goal"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["best"]["class"], "high_goal");
    assert_eq!(report["width"], 320);
}

#[test]
fn config_overrides_min_area() {
    let dir = tempfile::tempdir().unwrap();
    let image = target_png(dir.path());
    let cfg = dir.path().join("cfg.json");
    std::fs::write(&cfg, r#"{"scoring": {"min_area": 100000}}"#).unwrap();

    Command::cargo_bin("goal-targets")
        .unwrap()
        .args(["--log-level", "off", "analyze"])
        .arg(&image)
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 regions, 1 too small"))
        .stdout(predicate::str::contains("best: none"));
}

#[test]
fn missing_image_fails() {
    Command::cargo_bin("goal-targets")
        .unwrap()
        .args(["analyze", "/no/such/frame.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame.png"));
}

#[test]
fn default_config_is_valid_json() {
    let output = Command::cargo_bin("goal-targets")
        .unwrap()
        .arg("default-config")
        .output()
        .unwrap();
    assert!(output.status.success());
    let cfg: goal_targets::GoalTargetsConfig = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg, goal_targets::GoalTargetsConfig::default());
}
