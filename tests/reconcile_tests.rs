//! Tests for merging remote patch responses back into the grid.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::cell::RefCell;

use common::{commit_text, echo, people, state_of, ScriptedTransport};
use patchgrid::{submit_patches, CellPatch, CellState, ColumnSort, Grid, GridError, Submission};
use serde_json::json;

// ============================================================================
// Success
// ============================================================================

#[test]
fn confirmed_value_is_written_and_marked_success() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    grid.complete_submission(&s, Ok(echo(0, 0, json!("X"))));

    assert_eq!(grid.cell(0, 0), Some(&json!("X")));
    let rec = grid.edits().get(0, 0);
    assert_eq!(rec.state, CellState::EditSuccess);
    assert_eq!(rec.value, Some(json!("X")));
    assert!(rec.error_title.is_none());
    assert!(grid.cell_view(0, 0).class_name.contains("cell-edit-success"));
}

#[test]
fn owner_may_confirm_other_cells_too() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 1, "6");
    let response = json!([
        {"row_index": 0, "column_index": 1, "value": 6},
        {"row_index": 2, "column_index": 0, "value": "CY"},
    ]);
    grid.complete_submission(&s, Ok(response));

    assert_eq!(grid.cell(0, 1), Some(&json!(6)));
    assert_eq!(grid.cell(2, 0), Some(&json!("CY")));
    assert_eq!(state_of(&grid, 2, 0), CellState::EditSuccess);
}

#[test]
fn empty_confirmation_returns_cell_to_ready() {
    let mut grid = people();
    let s = commit_text(&mut grid, 1, 0, "bobby");
    grid.complete_submission(&s, Ok(json!([])));

    let rec = grid.edits().get(1, 0);
    assert_eq!(rec.state, CellState::Ready);
    assert_eq!(rec.value, Some(json!("bobby")));
    // nothing was confirmed, so the matrix is untouched
    assert_eq!(grid.cell(1, 0), Some(&json!("bob")));
}

#[test]
fn out_of_bounds_confirmation_is_skipped() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    let response = json!([
        {"row_index": 0, "column_index": 0, "value": "x"},
        {"row_index": 40, "column_index": 0, "value": "far"},
    ]);
    grid.complete_submission(&s, Ok(response));

    assert_eq!(grid.nrow(), 3);
    assert_eq!(grid.cell(0, 0), Some(&json!("x")));
    assert_eq!(state_of(&grid, 0, 0), CellState::EditSuccess);
}

#[test]
fn sorted_view_follows_confirmed_values() {
    let mut grid = people();
    grid.set_sort(vec![ColumnSort { col: 1, desc: false }]);
    assert_eq!(grid.row_model().rows(), &[1, 0, 2]);

    let s = commit_text(&mut grid, 2, 1, "1");
    grid.complete_submission(&s, Ok(echo(2, 1, json!(1))));
    assert_eq!(grid.row_model().rows(), &[2, 1, 0]);
}

// ============================================================================
// Failure
// ============================================================================

#[test]
fn transport_failure_shows_error_title() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    grid.complete_submission(&s, Err(GridError::Transport("server is down".into())));

    let rec = grid.edits().get(0, 0);
    assert_eq!(rec.state, CellState::EditFailure);
    assert_eq!(rec.value, Some(json!("x")));
    assert_eq!(rec.error_title.as_deref(), Some("server is down"));
    assert_eq!(grid.cell(0, 0), Some(&json!("ann")));

    let view = grid.cell_view(0, 0);
    assert!(view.class_name.contains("cell-edit-failure"));
    assert_eq!(view.title.as_deref(), Some("server is down"));
}

#[test]
fn empty_error_gets_a_generic_title() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    grid.complete_failure(&s, &GridError::Transport(String::new()));
    assert_eq!(
        grid.edits().get(0, 0).error_title.as_deref(),
        Some("Unknown error")
    );
}

#[test]
fn response_that_is_not_a_list_fails() {
    let mut grid = people();
    let s = commit_text(&mut grid, 1, 1, "7");
    grid.complete_submission(&s, Ok(json!({"ok": true})));

    let rec = grid.edits().get(1, 1);
    assert_eq!(rec.state, CellState::EditFailure);
    assert!(rec.error_title.as_deref().unwrap().contains("list of patches"));
}

#[test]
fn patch_missing_a_key_fails() {
    let mut grid = people();
    let s = commit_text(&mut grid, 1, 1, "7");
    grid.complete_submission(&s, Ok(json!([{"row_index": 1, "value": 7}])));

    let rec = grid.edits().get(1, 1);
    assert_eq!(rec.state, CellState::EditFailure);
    assert!(rec.error_title.as_deref().unwrap().contains("column_index"));
    assert_eq!(grid.cell(1, 1), Some(&json!(3)));
}

// ============================================================================
// Races
// ============================================================================

#[test]
fn late_answer_does_not_unlock_a_newer_save() {
    let mut grid = people();
    let first = commit_text(&mut grid, 0, 0, "a");
    grid.complete_failure(&first, &GridError::Transport("timeout".into()));
    let second = commit_text(&mut grid, 0, 0, "b");

    // the first request's answer arrives after all
    grid.complete_submission(&first, Ok(echo(0, 0, json!("a"))));
    let rec = grid.edits().get(0, 0);
    assert_eq!(rec.state, CellState::EditSaving);
    assert_eq!(rec.value, Some(json!("a")));
    assert_eq!(grid.cell(0, 0), Some(&json!("a")));

    grid.complete_submission(&second, Ok(echo(0, 0, json!("b"))));
    let rec = grid.edits().get(0, 0);
    assert_eq!(rec.state, CellState::EditSuccess);
    assert_eq!(rec.value, Some(json!("b")));
    assert_eq!(grid.cell(0, 0), Some(&json!("b")));
}

/// Commit "a", let the owner push a value that unlocks the cell, then commit
/// "b" while the first request is still out.
fn overlapping_saves(grid: &mut Grid) -> (Submission, Submission) {
    let first = commit_text(grid, 1, 0, "a");
    grid.add_patches(&[CellPatch::new(1, 0, "pushed")]);
    assert_eq!(state_of(grid, 1, 0), CellState::EditSuccess);
    let second = commit_text(grid, 1, 0, "b");
    assert_eq!(state_of(grid, 1, 0), CellState::EditSaving);
    (first, second)
}

#[test]
fn old_failure_is_shown_over_a_newer_save() {
    let mut grid = people();
    let (first, _second) = overlapping_saves(&mut grid);

    grid.complete_submission(&first, Err(GridError::Transport("nope".into())));
    let rec = grid.edits().get(1, 0);
    assert_eq!(rec.state, CellState::EditFailure);
    assert_eq!(rec.error_title.as_deref(), Some("nope"));
    assert_eq!(rec.value, Some(json!("a")));
}

#[test]
fn old_success_keeps_a_newer_save_locked() {
    let mut grid = people();
    let (first, second) = overlapping_saves(&mut grid);

    grid.complete_submission(&first, Ok(echo(1, 0, json!("A"))));
    let rec = grid.edits().get(1, 0);
    assert_eq!(rec.state, CellState::EditSaving);
    assert_eq!(rec.value, Some(json!("A")));
    assert_eq!(grid.cell(1, 0), Some(&json!("A")));
    assert_eq!(grid.cell_view(1, 0).text, "b");

    grid.complete_submission(&second, Ok(echo(1, 0, json!("B"))));
    assert_eq!(state_of(&grid, 1, 0), CellState::EditSuccess);
    assert_eq!(grid.cell(1, 0), Some(&json!("B")));
}

#[test]
fn answer_for_replaced_dataset_is_dropped() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    grid.dispatch_host_event(
        "updateData",
        json!({
            "data": [["new", 1]],
            "columns": ["name", "score"],
            "typeHints": [{"type": "string"}, {"type": "numeric"}],
        }),
    )
    .unwrap();

    grid.complete_submission(&s, Ok(echo(0, 0, json!("x"))));
    assert_eq!(grid.cell(0, 0), Some(&json!("new")));
    assert!(grid.edits().is_empty());
}

#[test]
fn pushed_patches_update_cells() {
    let mut grid = people();
    grid.add_patches(&[CellPatch::new(1, 1, 30), CellPatch::new(9, 9, 0)]);

    assert_eq!(grid.cell(1, 1), Some(&json!(30)));
    assert_eq!(state_of(&grid, 1, 1), CellState::EditSuccess);
    assert_eq!(grid.edits().len(), 1);
}

// ============================================================================
// Transport round trip
// ============================================================================

#[test]
fn submit_calls_the_patch_method_once() {
    let mut grid = people();
    let s = commit_text(&mut grid, 2, 0, "cyd");
    let grid = RefCell::new(grid);
    let transport = ScriptedTransport::new().answer(echo(2, 0, json!("Cyd")));

    tokio_test::block_on(submit_patches(&grid, &transport, s));

    assert_eq!(transport.call_count(), 1);
    let calls = transport.calls.borrow();
    let (method, args) = &calls[0];
    assert_eq!(method, "patch_cells");
    assert_eq!(
        args,
        &vec![json!([{"row_index": 2, "column_index": 0, "value": "cyd"}])]
    );
    let grid = grid.borrow();
    assert_eq!(grid.cell(2, 0), Some(&json!("Cyd")));
    assert_eq!(state_of(&grid, 2, 0), CellState::EditSuccess);
}

#[test]
fn submit_records_transport_errors() {
    let mut grid = people();
    let s = commit_text(&mut grid, 1, 0, "b");
    let grid = RefCell::new(grid);
    let transport = ScriptedTransport::new().fail("permission denied");

    tokio_test::block_on(submit_patches(&grid, &transport, s));

    let grid = grid.borrow();
    let rec = grid.edits().get(1, 0);
    assert_eq!(rec.state, CellState::EditFailure);
    assert_eq!(rec.error_title.as_deref(), Some("permission denied"));
}
