use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single value of the data matrix, exactly as delivered by the host.
///
/// Besides plain JSON scalars a cell may carry markup:
/// `{"isShinyHtml": true, "obj": {"html": "..."}}`.
pub type CellValue = Value;

/// True if the value is a markup cell (`isShinyHtml: true`).
pub fn is_html_value(value: &Value) -> bool {
    value
        .get("isShinyHtml")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Text form of a cell value, used both for the editor seed and for the
/// "did anything change" comparison on commit.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other if is_html_value(other) => other
            .get("obj")
            .and_then(|obj| obj.get("html"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        other => other.to_string(),
    }
}

/// Visual/interaction state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Display mode (also the state of a never-touched cell)
    #[default]
    Ready,
    /// An editor is mounted (derived from `is_editing`, never stored)
    Editing,
    /// A patch request is outstanding; the cell is locked
    EditSaving,
    /// The remote owner confirmed the value
    EditSuccess,
    /// The last submission failed
    EditFailure,
}

impl CellState {
    /// CSS class used by the renderer for this state.
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Self::Ready => None,
            Self::Editing => Some("cell-edit-editing"),
            Self::EditSaving => Some("cell-edit-saving"),
            Self::EditSuccess => Some("cell-edit-success"),
            Self::EditFailure => Some("cell-edit-failure"),
        }
    }

    /// Whether a double-click may open an editor from this state.
    pub fn accepts_edit(self) -> bool {
        matches!(self, Self::Ready | Self::EditSuccess | Self::EditFailure)
    }
}

/// Composite `(row, column)` address of a cell in the data matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Per-cell edit information.
///
/// Cells without a record are in the default display state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEditRecord {
    /// Last known value; `None` means "use the data matrix"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    pub state: CellState,
    /// Tooltip shown while in `EditFailure`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_title: Option<String>,
    /// An editor is mounted for the cell
    pub is_editing: bool,
    /// Unsaved editor text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_value: Option<String>,
    /// Bumped each time the cell enters `EditSaving`
    #[serde(skip)]
    pub(crate) save_generation: u64,
}

impl CellEditRecord {
    /// State as the renderer sees it: `Editing` while an editor is mounted.
    pub fn visual_state(&self) -> CellState {
        if self.is_editing {
            CellState::Editing
        } else {
            self.state
        }
    }

    /// The value to display, falling back to the data matrix.
    pub fn current_value<'a>(&'a self, original: &'a CellValue) -> &'a CellValue {
        self.value.as_ref().unwrap_or(original)
    }

    /// The editor text, falling back to the text of the current value.
    pub fn edit_text(&self, original: &CellValue) -> String {
        match &self.edit_value {
            Some(text) => text.clone(),
            None => cell_text(self.current_value(original)),
        }
    }

    pub fn save_generation(&self) -> u64 {
        self.save_generation
    }
}
