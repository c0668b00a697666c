use serde::{Deserialize, Serialize};

use super::{CellValue, SelectionModesProp, StyleInfo};

/// Kind of data held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Numeric,
    String,
    Html,
    Boolean,
    Date,
    Datetime,
    Duration,
    Categorical,
    Object,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Per-column type hint sent alongside the data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeHint {
    #[serde(rename = "type")]
    pub kind: TypeKind,
}

impl TypeHint {
    pub fn new(kind: TypeKind) -> Self {
        Self { kind }
    }

    /// Markup columns are neither editable nor sortable.
    pub fn is_html(&self) -> bool {
        self.kind == TypeKind::Html
    }
}

/// Table look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    #[default]
    Grid,
    Table,
}

/// The row summary line: on/off, or a custom template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryOption {
    Enabled(bool),
    Template(String),
}

impl Default for SummaryOption {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Rendering and behavior options of a grid instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Cells may be edited in place
    pub editable: bool,
    /// Show per-column filter inputs
    pub filters: bool,
    pub style: TableStyle,
    pub summary: SummaryOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub fill: bool,
    /// Initial style infos
    pub styles: Vec<StyleInfo>,
}

impl GridOptions {
    /// Class list of the grid container.
    pub fn container_class(&self) -> String {
        let mut class = String::from(match self.style {
            TableStyle::Grid => "shiny-data-grid shiny-data-grid-grid",
            TableStyle::Table => "shiny-data-grid shiny-data-grid-table",
        });
        if self.fill {
            class.push_str(" html-fill-item");
        }
        class
    }

    /// Class list of the `<table>` element.
    pub fn table_class(&self) -> String {
        let mut class = String::new();
        if self.style == TableStyle::Table {
            class.push_str("table table-sm");
        }
        if self.filters {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str("filtering");
        }
        class
    }

    /// Whether the table stretches to the container width.
    pub fn full_width_table(&self) -> bool {
        !matches!(self.width.as_deref(), None | Some("auto"))
    }
}

/// The dataset: column names, type hints and the row-major data matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPayload {
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hints: Option<Vec<TypeHint>>,
    pub data: Vec<Vec<CellValue>>,
    #[serde(default)]
    pub options: GridOptions,
}

/// Where to send patches: the opaque method key of the remote handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchInfo {
    pub key: String,
}

/// Everything the host hands a grid instance on render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInfo {
    pub payload: GridPayload,
    pub patch_info: PatchInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_modes: Option<SelectionModesProp>,
}
