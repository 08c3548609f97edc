#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::run_solver;
use regex::Regex;

fn positions(solution: &str) -> Vec<(i32, i32)> {
    let position = Regex::new(r"\((-?\d+),(-?\d+)\)").unwrap();
    position
        .captures_iter(solution)
        .map(|captures| (captures[1].parse().unwrap(), captures[2].parse().unwrap()))
        .collect()
}

#[test]
fn first_solution_is_printed() {
    let output = run_solver(["--width", "4", "--height", "2", "2x2", "2x2"]);

    assert!(output.status.success());
    assert_eq!(vec!["(0,0) (2,0)"], output.solutions());
    assert!(output.stdout.contains("----------"));
    assert!(!output.stdout.contains("=========="));
}

#[test]
fn all_solutions_end_with_the_exhaustion_marker() {
    let output = run_solver([
        "--width", "4", "--height", "4", "--solutions", "0", "2x2", "2x2", "2x2", "2x2",
    ]);

    assert!(output.status.success());
    assert_eq!(24, output.solutions().len());
    assert_eq!(Some("=========="), output.stdout.lines().last());

    for solution in output.solutions() {
        let mut positions = positions(solution);
        positions.sort();
        assert_eq!(vec![(0, 0), (0, 2), (2, 0), (2, 2)], positions);
    }
}

#[test]
fn both_propagation_modes_find_the_same_solutions() {
    let args = ["--width", "5", "--height", "3", "--solutions", "0", "3x2", "2x3", "2x1", "1x1"];
    let bounds = run_solver(args);
    let instantiation_only = run_solver(args.into_iter().chain(["--instantiation-only"]));

    assert!(!bounds.solutions().is_empty());
    assert_eq!(bounds.solutions(), instantiation_only.solutions());
}

#[test]
fn infeasible_instance_is_reported() {
    let output = run_solver(["--width", "3", "--height", "2", "2x2", "2x2"]);

    assert!(output.status.success());
    assert!(output.solutions().is_empty());
    assert_eq!(Some("=====UNSATISFIABLE====="), output.stdout.lines().last());
}

#[test]
fn idempotency_modes_agree() {
    for mode in ["disabled", "error", "force"] {
        let output = run_solver([
            "--width", "4", "--height", "4", "--idempotency", mode, "--solutions", "0", "2x2",
            "2x2", "2x2", "2x2",
        ]);

        assert!(output.status.success(), "mode {mode} failed");
        assert_eq!(24, output.solutions().len(), "mode {mode}");
    }
}

#[test]
fn statistics_are_logged_on_request() {
    let output = run_solver(["--width", "4", "--height", "2", "--log-statistics", "2x2", "2x2"]);

    let statistic = Regex::new(r"(?m)^%%%mzn-stat: numPropagatorCalls=\d+$").unwrap();
    assert!(statistic.is_match(&output.stdout), "{}", output.stdout);
    assert!(output.stdout.contains("%%%mzn-stat-end"));
}

#[test]
fn oversized_rectangles_are_rejected() {
    let output = run_solver(["--width", "2", "--height", "2", "3x1"]);

    assert!(!output.status.success());
}

#[test]
fn malformed_rectangles_are_rejected() {
    let output = run_solver(["--width", "2", "--height", "2", "3by1"]);

    assert!(!output.status.success());
}
