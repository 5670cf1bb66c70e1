//! End-to-end tests for the `descent` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn descent() -> Command {
    let mut cmd = Command::cargo_bin("descent").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// =============================================================================
// FUNCTIONS / PRESETS
// =============================================================================

#[test]
fn test_functions_lists_builtins() {
    descent()
        .args(["functions", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rosenbrock"))
        .stdout(predicate::str::contains("three_hump_camel"))
        .stdout(predicate::str::contains("saddle"));
}

#[test]
fn test_functions_table() {
    descent()
        .arg("functions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Learning Rate"))
        .stdout(predicate::str::contains("none"));
}

#[test]
fn test_functions_lists_expression_intrinsics() {
    descent()
        .args(["functions", "--intrinsics", "-f", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("atan2\n"))
        .stdout(predicate::str::contains("hypot\n"))
        .stdout(predicate::str::contains("rosenbrock").not());

    let names = stdout_json(descent().args(["functions", "--intrinsics", "-f", "json"]));
    let names = names.as_array().unwrap();
    assert!(names.iter().any(|n| n == "sqrt"));
    assert_eq!(names.len(), 25);
}

#[test]
fn test_presets_listing_and_detail() {
    descent()
        .args(["presets", "-f", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rosenbrock-momentum"))
        .stdout(predicate::str::contains("unstable-bowl"));

    let preset = stdout_json(descent().args(["presets", "beale"]));
    assert_eq!(preset["function"], "beale");
    assert_eq!(preset["optimizer"]["momentum"], 0.5);
}

#[test]
fn test_unknown_preset_fails() {
    descent()
        .args(["presets", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// =============================================================================
// EVAL
// =============================================================================

#[test]
fn test_eval_builtin_at_minimum() {
    descent()
        .args(["eval", "--function", "booth", "-x", "1", "-y", "3", "-f", "minimal"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_eval_expression_json() {
    let result = stdout_json(descent().args([
        "eval", "--expr", "x^2 + y^2", "-x", "3", "-y", "-4", "-f", "json",
    ]));

    assert_eq!(result["function"], "expression");
    assert_eq!(result["value"], 25.0);
    let gx = result["gradientX"].as_f64().unwrap();
    let norm = result["gradientMagnitude"].as_f64().unwrap();
    assert!((gx - 6.0).abs() < 1e-4);
    assert!((norm - 10.0).abs() < 1e-4);
}

#[test]
fn test_eval_errors() {
    descent()
        .args(["eval", "--function", "ackley", "-x", "0", "-y", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown function 'ackley'"));

    descent()
        .args(["eval", "--expr", "sin(x", "-x", "0", "-y", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid expression"));

    descent()
        .args(["eval", "-x", "0", "-y", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--function or --expr"));
}

// =============================================================================
// RUN
// =============================================================================

#[test]
fn test_run_preset_converges() {
    let report = stdout_json(descent().args(["run", "--preset", "bowl", "-f", "json"]));

    assert_eq!(report["name"], "bowl");
    assert_eq!(report["phase"], "converged");
    assert_eq!(report["statistics"]["converged"], true);
    assert!(report["statistics"]["finalValue"].as_f64().unwrap() < 1e-10);
    assert_eq!(report["trail"][0]["iteration"], 0);
}

#[test]
fn test_run_unstable_preset_warns() {
    descent()
        .args(["run", "--preset", "unstable-bowl", "-f", "minimal"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ceiling"));
}

#[test]
fn test_run_table_output() {
    descent()
        .args(["run", "--function", "booth", "-x", "-5", "-y", "5", "--chunk", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trail"))
        .stdout(predicate::str::contains("Statistics"))
        .stdout(predicate::str::contains("converged"))
        .stdout(predicate::str::contains("steps"));
}

#[test]
fn test_run_csv_trail_every() {
    let output = descent()
        .args([
            "run", "--preset", "bowl", "--every", "5", "--format", "csv",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("iteration,x,y,value,gradientMagnitude,learningRate")
    );
    let iterations: Vec<u32> = lines
        .map(|line| line.split(',').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(iterations[0], 0);
    assert_eq!(iterations[1], 5);
}

#[test]
fn test_run_export_bundle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.json");

    descent()
        .args(["run", "--function", "himmelblau", "-x", "0", "-y", "0", "--momentum", "0.5"])
        .arg("--export")
        .arg(&path)
        .args(["-f", "minimal"])
        .assert()
        .success();

    let bundle: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(bundle["functionInfo"]["name"], "himmelblau");
    assert_eq!(bundle["config"]["momentum"], 0.5);
    assert_eq!(bundle["config"]["learningRate"], 0.01);

    let history = bundle["history"].as_array().unwrap();
    let iterations = bundle["statistics"]["iterations"].as_u64().unwrap();
    assert_eq!(history.len() as u64, iterations + 1);
    assert!(bundle["statistics"]["executionTime"].is_number());
}

#[test]
fn test_run_from_toml_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("valley.toml");
    fs::write(
        &path,
        r#"
            name = "short-valley"
            function = "rosenbrock"

            [start]
            x = -1.2
            y = 1.0

            [optimizer]
            learningRate = 0.001
            maxIterations = 50
        "#,
    )
    .unwrap();

    let report = stdout_json(
        descent()
            .arg("run")
            .arg("--config")
            .arg(&path)
            .args(["--every", "1", "-f", "json"]),
    );

    assert_eq!(report["name"], "short-valley");
    assert_eq!(report["phase"], "exhausted");
    assert_eq!(report["trail"].as_array().unwrap().len(), 51);
}

#[test]
fn test_run_rejects_bad_settings() {
    descent()
        .args(["run", "--preset", "bowl", "--momentum", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("optimizer.momentum"));

    descent()
        .args(["run", "--preset", "bowl", "--chunk", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid chunk"));

    descent()
        .args(["run", "--function", "booth"])
        .assert()
        .failure();
}
