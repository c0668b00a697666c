use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CellValue;
use crate::error::{GridError, Result};

/// A proposed or confirmed change to one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPatch {
    pub row_index: usize,
    pub column_index: usize,
    pub value: CellValue,
}

impl CellPatch {
    pub fn new(row_index: usize, column_index: usize, value: impl Into<CellValue>) -> Self {
        Self {
            row_index,
            column_index,
            value: value.into(),
        }
    }
}

/// Wire form of a patch (snake_case, as the remote owner speaks it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellPatchWire {
    pub row_index: usize,
    pub column_index: usize,
    pub value: CellValue,
}

impl From<&CellPatch> for CellPatchWire {
    fn from(p: &CellPatch) -> Self {
        Self {
            row_index: p.row_index,
            column_index: p.column_index,
            value: p.value.clone(),
        }
    }
}

impl From<CellPatchWire> for CellPatch {
    fn from(p: CellPatchWire) -> Self {
        Self {
            row_index: p.row_index,
            column_index: p.column_index,
            value: p.value,
        }
    }
}

/// Encode patches as the JSON list sent to the remote owner.
pub fn patches_to_wire(patches: &[CellPatch]) -> Result<Value> {
    let wire: Vec<CellPatchWire> = patches.iter().map(CellPatchWire::from).collect();
    Ok(serde_json::to_value(wire)?)
}

/// Decode and validate a remote response.
///
/// The response must be a list whose items all carry `row_index`,
/// `column_index` and `value`.
pub fn patches_from_wire(response: Value) -> Result<Vec<CellPatch>> {
    let Value::Array(items) = response else {
        return Err(GridError::MalformedResponse(
            "expected a response of a list of patches".into(),
        ));
    };

    let mut patches = Vec::with_capacity(items.len());
    for item in items {
        let complete = item.as_object().is_some_and(|obj| {
            obj.contains_key("row_index")
                && obj.contains_key("column_index")
                && obj.contains_key("value")
        });
        if !complete {
            return Err(GridError::MalformedResponse(
                "expected list of patches containing `row_index`, `column_index`, and `value`"
                    .into(),
            ));
        }
        let wire: CellPatchWire = serde_json::from_value(item)
            .map_err(|e| GridError::MalformedResponse(e.to_string()))?;
        patches.push(wire.into());
    }
    Ok(patches)
}
