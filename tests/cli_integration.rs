//! Binary-level tests: argument handling, output formats and history storage.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use indoc::indoc;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command isolated from any config on the host.
fn cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("visionscreen");
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("VISIONSCREEN_CONFIG")
        .env_remove("VISIONSCREEN_HISTORY")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout is not valid JSON")
}

#[test]
fn astigmatism_json_output() {
    let temp = TempDir::new().unwrap();
    let output = cmd(temp.path())
        .args(["astigmatism", "--right", "oblique", "--left", "none", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = json_stdout(&output.stdout);
    assert_eq!(json["test"], "astigmatism");
    assert_eq!(json["result"]["severity"], "MEDIUM");
    assert_eq!(json["result"]["affected_eyes"], 1);
}

#[test]
fn terminal_output_is_default() {
    let temp = TempDir::new().unwrap();
    cmd(temp.path())
        .args(["duochrome", "--right", "red", "--left", "green"])
        .assert()
        .success()
        .stdout(contains("DUOCHROME RESULT"))
        .stdout(contains("HIGH"));
}

#[test]
fn invalid_selection_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    cmd(temp.path())
        .args(["duochrome", "--right", "purple", "--left", "red"])
        .assert()
        .failure()
        .stderr(contains("purple"));
}

#[test]
fn amsler_cells_map_to_regions() {
    let temp = TempDir::new().unwrap();
    let output = cmd(temp.path())
        .args([
            "amsler", "--cell", "0:0", "--cell", "1:1", "--areas", "top-right", "--symptoms",
            "wavy", "-f", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = json_stdout(&output.stdout);
    // both cells fall in the top-left third of a 20x20 grid
    assert_eq!(json["result"]["area_score"], 2);
    assert_eq!(json["result"]["severity"], "MEDIUM");
}

#[test]
fn amsler_cell_outside_grid_fails() {
    let temp = TempDir::new().unwrap();
    cmd(temp.path())
        .args(["amsler", "--cell", "25:3"])
        .assert()
        .failure()
        .stderr(contains("outside"));
}

#[test]
fn color_vision_one_shot_answers() {
    let temp = TempDir::new().unwrap();
    let output = cmd(temp.path())
        .args([
            "color-vision",
            "--answers",
            "12,8,29,5,3,15,74,6,45,7,16,nothing",
            "-f",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = json_stdout(&output.stdout);
    assert_eq!(json["result"]["accuracy"], 100);
    assert_eq!(json["result"]["type"], "normal");
}

#[test]
fn acuity_quit_immediately_is_not_taken() {
    let temp = TempDir::new().unwrap();
    let output = cmd(temp.path())
        .args(["acuity", "--seed", "4", "-f", "json"])
        .write_stdin("q\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = json_stdout(&output.stdout);
    assert_eq!(json["test"], "acuity");
    assert_eq!(json["result"]["outcome"]["kind"], "not_taken");
    assert_eq!(json["result"]["score"], "< 20/200");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Cover one eye"));
}

#[test]
fn color_vision_interactive_prompts_stay_off_stdout() {
    let temp = TempDir::new().unwrap();
    let output = cmd(temp.path())
        .args(["color-vision", "--seed", "1", "-f", "json"])
        .write_stdin("12\n8\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = json_stdout(&output.stdout);
    assert_eq!(json["test"], "color_vision");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Plate 1"));
}

#[test]
fn results_are_appended_to_history() {
    let temp = TempDir::new().unwrap();
    let history = temp.path().join("data/history.jsonl");
    let history_arg = history.to_str().unwrap();

    for (right, left) in [("red", "equal"), ("equal", "equal")] {
        cmd(temp.path())
            .args(["--history", history_arg, "duochrome", "--right", right, "--left", left])
            .assert()
            .success();
    }
    assert_eq!(fs::read_to_string(&history).unwrap().lines().count(), 2);

    let output = cmd(temp.path())
        .args(["history", history_arg, "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = json_stdout(&output.stdout);
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["result"]["severity"], "LOW");
    assert_eq!(records[1]["result"]["severity"], "NONE");
}

#[test]
fn history_without_path_fails() {
    let temp = TempDir::new().unwrap();
    cmd(temp.path())
        .arg("history")
        .assert()
        .failure()
        .stderr(contains("No history file"));
}

#[test]
fn init_writes_config_once() {
    let temp = TempDir::new().unwrap();
    cmd(temp.path()).arg("init").assert().success();
    assert!(temp.path().join(".visionscreen.toml").exists());

    cmd(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("--force"));
    cmd(temp.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn discovered_config_changes_thresholds_and_format() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".visionscreen.toml"),
        indoc! {r#"
            [output]
            default_format = "json"

            [color_vision]
            none_min = 100
            low_min = 75
            medium_min = 50
        "#},
    )
    .unwrap();

    let output = cmd(temp.path())
        .args(["color-vision", "--answers", "12,8,29,5,3,15,74,6,45,7,16,wrong"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // 11/12 = 92%, below the raised NONE breakpoint
    let json = json_stdout(&output.stdout);
    assert_eq!(json["result"]["severity"], "LOW");
}

#[test]
fn explicit_invalid_config_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "[amsler]\nsymptom_weight = -1.0\n").unwrap();

    cmd(temp.path())
        .args([
            "--config",
            config.to_str().unwrap(),
            "astigmatism",
            "--right",
            "none",
            "--left",
            "none",
        ])
        .assert()
        .failure()
        .stderr(contains("symptom_weight"));
}
