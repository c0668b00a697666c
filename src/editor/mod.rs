//! Cell interaction state machine.
//!
//! Each cell is in display mode (`Ready`, `EditSuccess`, `EditFailure`),
//! locked while saving (`EditSaving`), or has an editor mounted
//! (`is_editing`, shown as `Editing`). At most one editor is mounted at a
//! time. Gestures:
//! - double-click opens the editor on a legal cell,
//! - `Escape` discards the edit,
//! - `Enter` / `Tab` (Shift reverses) commit and move the editor,
//! - a pointer-down outside the editor commits.
//!
//! A commit that changes the text hands a [`Submission`] back to the caller,
//! who dispatches it through [`crate::reconcile`].

#[cfg(target_arch = "wasm32")]
pub(crate) mod input;
pub(crate) mod mutation;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::grid::Grid;
use crate::reconcile::Submission;
use crate::types::{cell_text, is_html_value, CellKey, CellPatch, CellState};

/// Result of committing the mounted editor.
#[derive(Debug)]
pub enum CommitOutcome {
    /// No editor was mounted
    NotEditing,
    /// The text did not change; the editor was closed without a request
    Unchanged(CellKey),
    /// The cell is now `EditSaving`; the caller must dispatch the submission
    Submit(Submission),
}

impl CommitOutcome {
    pub fn into_submission(self) -> Option<Submission> {
        match self {
            Self::Submit(s) => Some(s),
            Self::NotEditing | Self::Unchanged(_) => None,
        }
    }
}

/// Result of a gesture that may both commit and move the editor.
#[derive(Debug, Default)]
pub struct EditTransition {
    /// Request to dispatch, if the previous editor committed a change
    pub submission: Option<Submission>,
    /// The cell that has the editor mounted afterwards
    pub editing: Option<CellKey>,
}

/// What the renderer needs to draw one body cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    /// Space separated CSS classes
    pub class_name: String,
    /// Hover title (the failure message)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display text of the current value
    pub text: String,
    /// The value is markup and must be rendered as html
    pub is_html: bool,
    pub is_editing: bool,
    /// Text of the mounted editor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_value: Option<String>,
    /// A double-click would open an editor
    pub editable: bool,
}

impl Grid {
    fn original_value(&self, row: usize, col: usize) -> Value {
        self.cell(row, col).cloned().unwrap_or(Value::Null)
    }

    /// Whether a double-click on the cell may open an editor.
    pub fn can_edit(&self, row: usize, col: usize) -> bool {
        row < self.nrow()
            && self.is_editable_column(col)
            && self.edits.get(row, col).state.accepts_edit()
    }

    /// Mount the editor on a cell, seeding its text from the current value.
    ///
    /// Refuses cells outside the matrix, markup columns and cells that are
    /// saving.
    pub(crate) fn open_editor(&mut self, row: usize, col: usize) -> bool {
        if !self.can_edit(row, col) {
            return false;
        }
        let original = self.original_value(row, col);
        self.edits.update(row, col, |rec| {
            rec.edit_value = Some(cell_text(rec.current_value(&original)));
            rec.is_editing = true;
        });
        debug!(row, col, "editor opened");
        true
    }

    /// Double-click on a cell. Any other mounted editor is committed first.
    pub fn begin_edit(&mut self, row: usize, col: usize) -> EditTransition {
        let current = self.edits.editing_cell();
        if current == Some(CellKey::new(row, col)) || !self.can_edit(row, col) {
            return EditTransition {
                submission: None,
                editing: current,
            };
        }
        let submission = self.commit_edit().into_submission();
        let opened = self.open_editor(row, col);
        EditTransition {
            submission,
            editing: opened.then(|| CellKey::new(row, col)),
        }
    }

    /// Live text of the mounted editor.
    pub fn set_edit_value(&mut self, text: &str) -> bool {
        let Some(key) = self.edits.editing_cell() else {
            return false;
        };
        self.edits
            .update(key.row, key.col, |rec| rec.edit_value = Some(text.to_string()));
        true
    }

    /// Discard the edit. Returns the row that should regain focus.
    pub fn escape_edit(&mut self) -> Option<usize> {
        let key = self.edits.editing_cell()?;
        self.edits.update(key.row, key.col, |rec| {
            rec.is_editing = false;
            rec.edit_value = None;
        });
        debug!(row = key.row, col = key.col, "edit discarded");
        Some(key.row)
    }

    /// Commit the mounted editor.
    ///
    /// Unchanged text closes the editor and keeps the prior state. Changed
    /// text locks the cell in `EditSaving` and yields one patch for it.
    pub fn commit_edit(&mut self) -> CommitOutcome {
        let Some(key) = self.edits.editing_cell() else {
            return CommitOutcome::NotEditing;
        };
        let original = self.original_value(key.row, key.col);
        let record = self.edits.get(key.row, key.col);
        let attempted = record.edit_text(&original);
        // a failed attempt is not authoritative; compare against the matrix
        let baseline = if record.state == CellState::EditFailure {
            cell_text(&original)
        } else {
            cell_text(record.current_value(&original))
        };

        if attempted == baseline {
            self.edits.update(key.row, key.col, |rec| {
                rec.error_title = None;
                rec.is_editing = false;
                rec.edit_value = None;
            });
            return CommitOutcome::Unchanged(key);
        }

        self.edits.update(key.row, key.col, |rec| {
            rec.error_title = None;
            rec.is_editing = false;
            rec.state = CellState::EditSaving;
            rec.save_generation = rec.save_generation.wrapping_add(1);
        });
        debug!(row = key.row, col = key.col, "edit committed");
        let patch = CellPatch::new(key.row, key.col, attempted);
        CommitOutcome::Submit(self.prepare_submission(vec![patch]))
    }

    /// Pointer-down outside the editor.
    pub fn blur_away(&mut self) -> Option<Submission> {
        self.commit_edit().into_submission()
    }

    /// `Enter` in the editor: commit and move to the row below (above when
    /// `reverse`) in view order, same column.
    ///
    /// At the first/last row nothing is committed and the editor stays.
    pub fn edit_enter(&mut self, reverse: bool) -> EditTransition {
        let Some(key) = self.edits.editing_cell() else {
            return EditTransition::default();
        };
        let delta = if reverse { -1 } else { 1 };
        let Some(target) = self.rows.offset(key.row, delta) else {
            return EditTransition {
                submission: None,
                editing: Some(key),
            };
        };
        self.move_editor(CellKey::new(target, key.col))
    }

    /// `Tab` in the editor: commit and move to the next (previous when
    /// `reverse`) editable column of the same row. Markup columns are
    /// skipped; with no such column the editor stays.
    pub fn edit_tab(&mut self, reverse: bool) -> EditTransition {
        let Some(key) = self.edits.editing_cell() else {
            return EditTransition::default();
        };
        let target = if reverse {
            (0..key.col).rev().find(|&c| self.is_editable_column(c))
        } else {
            (key.col + 1..self.ncol()).find(|&c| self.is_editable_column(c))
        };
        let Some(col) = target else {
            return EditTransition {
                submission: None,
                editing: Some(key),
            };
        };
        self.move_editor(CellKey::new(key.row, col))
    }

    fn move_editor(&mut self, target: CellKey) -> EditTransition {
        let submission = self.commit_edit().into_submission();
        let opened = self.open_editor(target.row, target.col);
        if !opened {
            debug!(row = target.row, col = target.col, "navigation target is locked");
        }
        EditTransition {
            submission,
            editing: opened.then_some(target),
        }
    }

    /// Render model of one body cell.
    pub fn cell_view(&self, row: usize, col: usize) -> CellView {
        let original = self.original_value(row, col);
        let record = self.edits.get(row, col);
        let value = record.current_value(&original);
        let is_html = self.is_html_column(col) || is_html_value(value);
        let editable = self.can_edit(row, col);

        let mut classes: Vec<&str> = Vec::new();
        if let Some(class) = record.visual_state().class_name() {
            classes.push(class);
        }
        if editable {
            classes.push("cell-editable");
        }
        if is_html {
            classes.push("cell-html");
        }
        let style_class = self.styles.body(row, col).and_then(|s| s.class.as_deref());
        if let Some(class) = style_class {
            classes.push(class);
        }

        // the optimistic text stays visible until the owner answers
        let text = if record.state == CellState::EditSaving {
            record.edit_text(&original)
        } else {
            cell_text(value)
        };

        CellView {
            class_name: classes.join(" "),
            title: match record.state {
                CellState::EditFailure => record.error_title.clone(),
                _ => None,
            },
            text,
            is_html,
            is_editing: record.is_editing,
            edit_value: record
                .is_editing
                .then(|| record.edit_text(&original)),
            editable,
        }
    }
}
