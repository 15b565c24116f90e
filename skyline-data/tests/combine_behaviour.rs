//! Behavioural coverage for combining per-region manifests.

use std::cell::RefCell;
use std::fs;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use skyline_core::CombinedManifest;
use skyline_data::{CombineError, combine_manifests};
use tempfile::TempDir;

/// Temporary directory for each scenario.
#[fixture]
pub fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("create temporary directory: {err}"),
    }
}

/// Captures the outcome of combination for assertions.
#[fixture]
pub fn combine_result() -> RefCell<Option<Result<CombinedManifest, CombineError>>> {
    RefCell::new(None)
}

#[given("a directory of per-region manifests")]
fn manifests_on_disk(temp_dir: &TempDir) {
    // Written in reverse order so enumeration order cannot mask the sort.
    fs::write(temp_dir.path().join("b.json"), r#"{"region": "b"}"#)
        .unwrap_or_else(|err| panic!("write b.json: {err}"));
    fs::write(temp_dir.path().join("a.json"), r#"{"region": "a"}"#)
        .unwrap_or_else(|err| panic!("write a.json: {err}"));
}

#[given("an empty manifest directory")]
fn empty_directory(temp_dir: &TempDir) {
    let _ = temp_dir;
}

#[when("I combine the matching manifests")]
fn combine(
    temp_dir: &TempDir,
    #[from(combine_result)] result_cell: &RefCell<
        Option<Result<CombinedManifest, CombineError>>,
    >,
) {
    let pattern = format!("{}/*.json", temp_dir.path().display());
    let outcome = combine_manifests(&pattern, Some("2026-08-06T00:00:00Z"));
    *result_cell.borrow_mut() = Some(outcome);
}

#[then("the regions are ordered by path")]
fn regions_ordered(
    #[from(combine_result)] result_cell: &RefCell<
        Option<Result<CombinedManifest, CombineError>>,
    >,
) {
    let borrow = result_cell.borrow();
    let outcome = borrow
        .as_ref()
        .unwrap_or_else(|| panic!("combine result must be present"));
    let combined = match outcome {
        Ok(combined) => combined,
        Err(err) => panic!("expected success: {err}"),
    };
    assert_eq!(combined.updated_at, "2026-08-06T00:00:00Z");
    assert_eq!(combined.regions.len(), 2);
    assert_eq!(combined.regions[0]["region"], "a");
    assert_eq!(combined.regions[1]["region"], "b");
}

#[then("a no-matches failure is reported")]
fn no_matches_reported(
    #[from(combine_result)] result_cell: &RefCell<
        Option<Result<CombinedManifest, CombineError>>,
    >,
) {
    let borrow = result_cell.borrow();
    let outcome = borrow
        .as_ref()
        .unwrap_or_else(|| panic!("combine result must be present"));
    match outcome {
        Ok(_) => panic!("expected an error for an empty match"),
        Err(CombineError::NoMatches { pattern }) => {
            assert!(pattern.ends_with("*.json"));
        }
        Err(other) => panic!("unexpected error type: {other}"),
    }
}

#[scenario(path = "tests/features/combine_manifests.feature", index = 0)]
fn combine_ordered_manifests(
    temp_dir: TempDir,
    combine_result: RefCell<Option<Result<CombinedManifest, CombineError>>>,
) {
    let _ = (temp_dir, combine_result);
}

#[scenario(path = "tests/features/combine_manifests.feature", index = 1)]
fn combining_nothing_fails(
    temp_dir: TempDir,
    combine_result: RefCell<Option<Result<CombinedManifest, CombineError>>>,
) {
    let _ = (temp_dir, combine_result);
}
