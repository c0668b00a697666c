//! Tests for the cell edit state machine: opening, discarding, committing and
//! moving the editor.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{commit_text, people, state_of, type_into, GridBuilder};
use patchgrid::{CellKey, CellState, ColumnSort, CommitOutcome, Grid, GridError, KeyAction};
use serde_json::json;

/// `a` (string), `h` (html), `b` (string), two rows.
fn with_markup() -> Grid {
    let html = json!({"isShinyHtml": true, "obj": {"html": "<i>x</i>"}});
    GridBuilder::new()
        .column("a", "string")
        .column("h", "html")
        .column("b", "string")
        .row(vec![json!("a0"), html.clone(), json!("b0")])
        .row(vec![json!("a1"), html, json!("b1")])
        .build()
}

// ============================================================================
// Opening
// ============================================================================

#[test]
fn double_click_seeds_editor_with_cell_text() {
    let mut grid = people();
    let t = grid.begin_edit(0, 1);
    assert_eq!(t.editing, Some(CellKey::new(0, 1)));
    assert!(t.submission.is_none());

    let rec = grid.edits().get(0, 1);
    assert!(rec.is_editing);
    assert_eq!(rec.edit_value.as_deref(), Some("5"));
    assert_eq!(rec.visual_state(), CellState::Editing);
}

#[test]
fn read_only_grid_never_opens_an_editor() {
    let mut grid = GridBuilder::new()
        .column("a", "string")
        .row(vec![json!("x")])
        .read_only()
        .build();
    assert!(grid.begin_edit(0, 0).editing.is_none());
    assert!(!grid.edits().is_editing_any());
}

#[test]
fn markup_cells_are_not_editable() {
    let mut grid = with_markup();
    assert!(grid.begin_edit(0, 1).editing.is_none());

    let view = grid.cell_view(0, 1);
    assert!(view.is_html);
    assert!(!view.editable);
    assert!(view.class_name.contains("cell-html"));
}

#[test]
fn opening_a_second_cell_commits_the_first() {
    let mut grid = people();
    type_into(&mut grid, 0, 0, "anne");
    let t = grid.begin_edit(1, 0);

    let submission = t.submission.expect("first editor should commit");
    assert_eq!(submission.patches()[0].value, json!("anne"));
    assert_eq!(t.editing, Some(CellKey::new(1, 0)));
    assert_eq!(state_of(&grid, 0, 0), CellState::EditSaving);
    assert_eq!(grid.edits().editing_cell(), Some(CellKey::new(1, 0)));
}

#[test]
fn saving_cell_is_locked() {
    let mut grid = people();
    commit_text(&mut grid, 2, 0, "cyd");

    assert!(!grid.can_edit(2, 0));
    assert!(grid.begin_edit(2, 0).editing.is_none());
    let view = grid.cell_view(2, 0);
    assert!(view.class_name.contains("cell-edit-saving"));
    assert!(!view.editable);
}

// ============================================================================
// Discarding and committing
// ============================================================================

#[test]
fn unchanged_text_closes_without_submission() {
    let mut grid = people();
    type_into(&mut grid, 0, 1, "5");

    match grid.commit_edit() {
        CommitOutcome::Unchanged(key) => assert_eq!(key, CellKey::new(0, 1)),
        other => panic!("expected no-op commit, got {other:?}"),
    }
    let rec = grid.edits().get(0, 1);
    assert_eq!(rec.state, CellState::Ready);
    assert!(!rec.is_editing);
    assert!(rec.edit_value.is_none());
}

#[test]
fn escape_discards_text_and_keeps_value() {
    let mut grid = people();
    type_into(&mut grid, 1, 0, "zzz");

    assert_eq!(grid.escape_edit(), Some(1));
    let rec = grid.edits().get(1, 0);
    assert!(!rec.is_editing);
    assert!(rec.edit_value.is_none());
    assert!(rec.value.is_none());
    assert_eq!(rec.state, CellState::Ready);
    assert_eq!(grid.cell(1, 0), Some(&json!("bob")));
}

#[test]
fn escape_after_failure_keeps_the_failure() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    grid.complete_failure(&s, &GridError::Transport("boom".into()));

    type_into(&mut grid, 0, 0, "y");
    grid.escape_edit();
    let rec = grid.edits().get(0, 0);
    assert_eq!(rec.state, CellState::EditFailure);
    assert_eq!(rec.error_title.as_deref(), Some("boom"));
}

#[test]
fn changed_text_yields_one_patch() {
    let mut grid = people();
    let s = commit_text(&mut grid, 1, 1, "4");

    assert_eq!(s.patches().len(), 1);
    assert_eq!(s.patches()[0].row_index, 1);
    assert_eq!(s.patches()[0].column_index, 1);
    assert_eq!(s.patches()[0].value, json!("4"));
    // the matrix only changes once the owner confirms
    assert_eq!(grid.cell(1, 1), Some(&json!(3)));
}

#[test]
fn saving_cell_shows_the_committed_text() {
    let mut grid = people();
    commit_text(&mut grid, 0, 0, "pending");

    let view = grid.cell_view(0, 0);
    assert_eq!(view.text, "pending");
    assert!(!view.is_editing);
    assert!(view.class_name.contains("cell-edit-saving"));

    let s = grid.prepare_submission(Vec::new());
    grid.complete_success(&s, &[]);
    // an unrelated completion does not change what is shown
    assert_eq!(grid.cell_view(0, 0).text, "pending");
}

#[test]
fn retrying_a_failed_value_resubmits() {
    let mut grid = people();
    let s = commit_text(&mut grid, 0, 0, "x");
    grid.complete_failure(&s, &GridError::Transport("boom".into()));

    // the editor reopens on the attempted text
    grid.begin_edit(0, 0);
    assert_eq!(grid.edits().get(0, 0).edit_value.as_deref(), Some("x"));
    match grid.commit_edit() {
        CommitOutcome::Submit(s) => assert_eq!(s.patches()[0].value, json!("x")),
        other => panic!("failed value should be sent again, got {other:?}"),
    }
}

#[test]
fn blur_commits_the_editor() {
    let mut grid = people();
    type_into(&mut grid, 2, 1, "10");
    let s = grid.blur_away().expect("blur should commit");
    assert_eq!(s.patches()[0].value, json!("10"));
    assert!(grid.blur_away().is_none());
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn enter_follows_sorted_view() {
    let mut grid = people();
    // scores 5, 3, 9 -> view order 1, 0, 2
    grid.set_sort(vec![ColumnSort { col: 1, desc: false }]);
    assert_eq!(grid.row_model().rows(), &[1, 0, 2]);

    type_into(&mut grid, 1, 0, "bobby");
    let t = grid.edit_enter(false);
    assert!(t.submission.is_some());
    assert_eq!(t.editing, Some(CellKey::new(0, 0)));

    let t = grid.edit_enter(false);
    assert!(t.submission.is_none(), "unchanged text submits nothing");
    assert_eq!(t.editing, Some(CellKey::new(2, 0)));

    let t = grid.edit_enter(true);
    assert_eq!(t.editing, Some(CellKey::new(0, 0)));
}

#[test]
fn enter_at_last_row_stays_open() {
    let mut grid = people();
    type_into(&mut grid, 2, 0, "cyd");
    let t = grid.edit_enter(false);

    assert!(t.submission.is_none());
    assert_eq!(t.editing, Some(CellKey::new(2, 0)));
    let rec = grid.edits().get(2, 0);
    assert!(rec.is_editing);
    assert_eq!(rec.edit_value.as_deref(), Some("cyd"));
}

#[test]
fn tab_skips_markup_columns() {
    let mut grid = with_markup();
    type_into(&mut grid, 0, 0, "a0");

    let t = grid.edit_tab(false);
    assert_eq!(t.editing, Some(CellKey::new(0, 2)));

    // no editable column to the right
    let t = grid.edit_tab(false);
    assert_eq!(t.editing, Some(CellKey::new(0, 2)));

    let t = grid.edit_tab(true);
    assert_eq!(t.editing, Some(CellKey::new(0, 0)));
}

#[test]
fn navigating_onto_a_saving_cell_opens_nothing() {
    let mut grid = people();
    commit_text(&mut grid, 1, 0, "bo");
    type_into(&mut grid, 0, 0, "an");

    let t = grid.edit_enter(false);
    assert!(t.submission.is_some());
    assert!(t.editing.is_none());
    assert!(!grid.edits().is_editing_any());
}

#[test]
fn enter_on_focused_row_opens_first_editable_cell() {
    let mut grid = with_markup();
    let outcome = grid.row_key_down(1, "Enter");
    assert!(outcome.handled);
    assert_eq!(outcome.action, Some(KeyAction::EnterEdit(1)));
    assert_eq!(grid.edits().editing_cell(), Some(CellKey::new(1, 0)));

    // row keys are ignored while editing
    let outcome = grid.row_key_down(1, " ");
    assert!(!outcome.handled);
}

#[test]
fn enter_on_focused_row_skips_saving_cells() {
    let mut grid = people();
    commit_text(&mut grid, 1, 0, "bo");

    let outcome = grid.row_key_down(1, "Enter");
    assert_eq!(outcome.action, Some(KeyAction::EnterEdit(1)));
    assert_eq!(grid.edits().editing_cell(), Some(CellKey::new(1, 1)));
    assert_eq!(state_of(&grid, 1, 0), CellState::EditSaving);
}
