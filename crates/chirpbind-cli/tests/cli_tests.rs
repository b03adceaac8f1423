//! Process-level tests for the chirpbind binary: exit status and the exact
//! progress-line contract.

use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_chirpbind"))
        .args(args)
        .output()
        .expect("failed to run chirpbind")
}

#[test]
fn default_run_prints_passed_lines_in_order_and_exits_zero() {
    let out = run(&[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "checking module load ...",
            "PASSED module load",
            "checking object parent tracking ...",
            "PASSED object parent tracking",
            "PASSED all tests",
        ]
    );
}

#[test]
fn zero_iterations_still_passes() {
    let out = run(&["--iterations", "0"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("PASSED")).count(), 3);
}

#[test]
fn large_iteration_count_passes() {
    let out = run(&["--iterations", "500"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.ends_with("PASSED all tests\n"));
}

#[test]
fn json_output_reports_passing_checks_and_clean_registry() {
    let out = run(&["--output", "json"]);
    assert!(out.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("invalid JSON output");
    assert_eq!(value["passed"], true);
    assert_eq!(value["checks"]["module_load"]["passed"], true);
    assert_eq!(value["checks"]["parent_tracking"]["passed"], true);
    assert_eq!(value["registry"]["live"], 0);
}

#[test]
fn unknown_output_format_fails() {
    let out = run(&["--output", "yaml"]);
    assert!(!out.status.success());
}
