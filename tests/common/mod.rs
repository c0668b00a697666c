//! Common test utilities and fixtures.
//!
//! `GridBuilder` assembles the host render payload the way a host page would
//! send it, and a few helpers drive the edit gestures that most tests share.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::VecDeque;

use patchgrid::{
    CellState, CommitOutcome, Grid, GridError, GridInfo, PatchTransport, Result, Submission,
};
use serde_json::{json, Value};

// ============================================================================
// Grid fixture
// ============================================================================

pub struct GridBuilder {
    columns: Vec<String>,
    type_hints: Vec<&'static str>,
    data: Vec<Vec<Value>>,
    options: Value,
    selection_modes: Option<Value>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            type_hints: Vec::new(),
            data: Vec::new(),
            options: json!({"editable": true}),
            selection_modes: None,
        }
    }

    /// Add a column with a type hint (`"string"`, `"numeric"`, `"html"`, ...).
    pub fn column(mut self, name: &str, kind: &'static str) -> Self {
        self.columns.push(name.to_string());
        self.type_hints.push(kind);
        self
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.data.push(values);
        self
    }

    /// `n` rows whose first column is the row index.
    pub fn numbered_rows(mut self, n: usize) -> Self {
        if self.columns.is_empty() {
            self = self.column("id", "numeric");
        }
        let ncol = self.columns.len();
        for r in 0..n {
            let mut row = vec![json!(r)];
            row.extend((1..ncol).map(|c| json!(format!("r{r}c{c}"))));
            self.data.push(row);
        }
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.options["editable"] = json!(false);
        self
    }

    pub fn selection(mut self, row: &str) -> Self {
        self.selection_modes = Some(json!({"row": row, "col": "none", "rect": "none"}));
        self
    }

    pub fn info(&self) -> GridInfo {
        let hints: Vec<Value> = self.type_hints.iter().map(|k| json!({"type": k})).collect();
        let mut info = json!({
            "payload": {
                "columns": self.columns,
                "typeHints": hints,
                "data": self.data,
                "options": self.options,
            },
            "patchInfo": {"key": "patch_cells"},
        });
        if let Some(modes) = &self.selection_modes {
            info["selectionModes"] = modes.clone();
        }
        serde_json::from_value(info).expect("fixture must be a valid grid info")
    }

    pub fn build(&self) -> Grid {
        Grid::from_info(self.info()).expect("fixture must build")
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Three rows of `name` (string) and `score` (numeric).
pub fn people() -> Grid {
    GridBuilder::new()
        .column("name", "string")
        .column("score", "numeric")
        .row(vec![json!("ann"), json!(5)])
        .row(vec![json!("bob"), json!(3)])
        .row(vec![json!("cy"), json!(9)])
        .build()
}

// ============================================================================
// Gesture helpers
// ============================================================================

/// Double-click a cell and type `text`.
pub fn type_into(grid: &mut Grid, row: usize, col: usize, text: &str) {
    let t = grid.begin_edit(row, col);
    assert_eq!(
        t.editing.map(|k| (k.row, k.col)),
        Some((row, col)),
        "cell ({row}, {col}) should open an editor"
    );
    assert!(grid.set_edit_value(text));
}

/// Type into a cell and commit, expecting a submission.
pub fn commit_text(grid: &mut Grid, row: usize, col: usize, text: &str) -> Submission {
    type_into(grid, row, col, text);
    match grid.commit_edit() {
        CommitOutcome::Submit(s) => s,
        other => panic!("expected a submission, got {other:?}"),
    }
}

pub fn state_of(grid: &Grid, row: usize, col: usize) -> CellState {
    grid.edits().get(row, col).state
}

/// Wire response echoing one patch.
pub fn echo(row: usize, col: usize, value: Value) -> Value {
    json!([{"row_index": row, "column_index": col, "value": value}])
}

// ============================================================================
// Transports
// ============================================================================

/// Transport answering from a queue of canned results and recording calls.
#[derive(Default)]
pub struct ScriptedTransport {
    pub calls: RefCell<Vec<(String, Vec<Value>)>>,
    answers: RefCell<VecDeque<Result<Value>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, response: Value) -> Self {
        self.answers.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.answers
            .borrow_mut()
            .push_back(Err(GridError::Transport(message.to_string())));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PatchTransport for ScriptedTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        self.calls.borrow_mut().push((method.to_string(), args));
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(GridError::Transport("no scripted answer".into())))
    }
}
