use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Row selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSelectionMode {
    None,
    Single,
    #[default]
    Multiple,
}

/// Column selection mode (declared, not exercised)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColSelectionMode {
    #[default]
    None,
    Single,
    Multiple,
}

/// Rectangle selection mode (declared, not exercised)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectSelectionMode {
    #[default]
    None,
    Cell,
    Region,
}

/// Selection modes exactly as the host sends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionModesProp {
    pub row: String,
    pub col: String,
    pub rect: String,
}

/// Validated selection modes for a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionModes {
    pub row: RowSelectionMode,
    pub col: ColSelectionMode,
    pub rect: RectSelectionMode,
}

impl SelectionModes {
    /// Build from the host option; a missing option means multiple-row mode.
    pub fn from_prop(prop: Option<&SelectionModesProp>) -> Result<Self> {
        let Some(prop) = prop else {
            return Ok(Self::default());
        };
        let row = match prop.row.as_str() {
            "none" => RowSelectionMode::None,
            "single" => RowSelectionMode::Single,
            "multiple" => RowSelectionMode::Multiple,
            other => return Err(invalid("row", other)),
        };
        let col = match prop.col.as_str() {
            "none" => ColSelectionMode::None,
            "single" => ColSelectionMode::Single,
            "multiple" => ColSelectionMode::Multiple,
            other => return Err(invalid("col", other)),
        };
        let rect = match prop.rect.as_str() {
            "none" => RectSelectionMode::None,
            "cell" => RectSelectionMode::Cell,
            "region" => RectSelectionMode::Region,
            other => return Err(invalid("rect", other)),
        };
        Ok(Self { row, col, rect })
    }

    /// True if no kind of selection is enabled.
    pub fn is_none(&self) -> bool {
        self.row == RowSelectionMode::None
            && self.col == ColSelectionMode::None
            && self.rect == RectSelectionMode::None
    }
}

fn invalid(axis: &'static str, value: &str) -> GridError {
    GridError::InvalidSelectionMode {
        axis,
        value: value.to_string(),
    }
}

/// Cell selection exchanged with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellSelection {
    None,
    Row { rows: Vec<usize> },
    Col { cols: Vec<usize> },
    Rect { rows: [usize; 2], cols: [usize; 2] },
}
