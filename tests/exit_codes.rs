//! Tests for exit code policies (--fail-on flag)

use std::path::PathBuf;

use storage_prices::{evaluate_exit_code, FailOn, ScrapeReport};

fn report(attempted: usize, failed: usize) -> ScrapeReport {
    ScrapeReport {
        run_id: "test_run".to_string(),
        total_inputs: attempted + 2,
        skipped: 2,
        attempted,
        succeeded: attempted - failed,
        failed,
        interrupted: false,
        elapsed_seconds: 1.0,
        db_path: PathBuf::from("./test.db"),
    }
}

#[test]
fn test_fail_on_never_always_returns_zero() {
    assert_eq!(evaluate_exit_code(FailOn::Never, 10, &report(10, 5)), 0);
    assert_eq!(evaluate_exit_code(FailOn::Never, 10, &report(0, 0)), 0);
}

#[test]
fn test_fail_on_any_failure() {
    assert_eq!(
        evaluate_exit_code(FailOn::AnyFailure, 10, &report(10, 1)),
        2,
        "a single failure should violate the policy"
    );
    assert_eq!(evaluate_exit_code(FailOn::AnyFailure, 10, &report(10, 0)), 0);
}

#[test]
fn test_fail_on_pct_greater_than_threshold() {
    // 2 of 10 failed: 20%
    assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 10, &report(10, 2)), 2);
    assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 30, &report(10, 2)), 0);
}

#[test]
fn test_fail_on_pct_equal_to_threshold_passes() {
    assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 20, &report(10, 2)), 0);
}

#[test]
fn test_fail_on_pct_with_nothing_attempted() {
    // Skipped zip codes don't count as attempts
    assert_eq!(evaluate_exit_code(FailOn::PctGreaterThan, 10, &report(0, 0)), 3);
}
