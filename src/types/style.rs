use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Part of the table a style applies to. Only the body is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLocation {
    #[default]
    Body,
}

/// A style (and/or class) applied to a block of cells.
///
/// Missing `rows` or `cols` means "all of them".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleInfo {
    #[serde(default)]
    pub location: StyleLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<Vec<usize>>,
    /// CSS properties, e.g. `{"background-color": "red"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// Resolved style of one cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CellStyle {
    pub style: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}
