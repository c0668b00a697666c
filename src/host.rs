//! Host-element events and the values published back to the host.
//!
//! The host drives a grid with custom events dispatched on its element and
//! reads the grid's state from named input values `<id>_<name>`.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::types::{
    patches_from_wire, CellPatch, CellSelection, CellValue, ColumnFilter, ColumnSort,
    RowSelectionMode, StyleInfo, TypeHint,
};

/// Names of the custom events a grid listens for.
pub const HOST_EVENT_NAMES: [&str; 6] = [
    "addPatches",
    "updateData",
    "updateCellSelection",
    "updateColumnSort",
    "updateColumnFilter",
    "updateStyles",
];

/// A decoded host event.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    AddPatches(Vec<CellPatch>),
    UpdateData {
        data: Vec<Vec<CellValue>>,
        columns: Vec<String>,
        type_hints: Option<Vec<TypeHint>>,
    },
    UpdateCellSelection(CellSelection),
    UpdateColumnSort(Vec<ColumnSort>),
    UpdateColumnFilter(Vec<ColumnFilter>),
    UpdateStyles(Vec<StyleInfo>),
}

#[derive(Deserialize)]
struct AddPatchesDetail {
    patches: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDataDetail {
    data: Vec<Vec<CellValue>>,
    columns: Vec<String>,
    #[serde(default)]
    type_hints: Option<Vec<TypeHint>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellSelectionDetail {
    cell_selection: CellSelection,
}

#[derive(Deserialize)]
struct SortDetail {
    sort: Vec<ColumnSort>,
}

#[derive(Deserialize)]
struct FilterDetail {
    filter: Vec<ColumnFilter>,
}

#[derive(Deserialize)]
struct StylesDetail {
    styles: Vec<StyleInfo>,
}

impl HostEvent {
    /// Decode an event from its name and `detail` payload.
    pub fn decode(name: &str, detail: Value) -> Result<Self> {
        let event = match name {
            "addPatches" => {
                let d: AddPatchesDetail = serde_json::from_value(detail)?;
                Self::AddPatches(patches_from_wire(d.patches)?)
            }
            "updateData" => {
                let d: UpdateDataDetail = serde_json::from_value(detail)?;
                Self::UpdateData {
                    data: d.data,
                    columns: d.columns,
                    type_hints: d.type_hints,
                }
            }
            "updateCellSelection" => {
                let d: CellSelectionDetail = serde_json::from_value(detail)?;
                Self::UpdateCellSelection(d.cell_selection)
            }
            "updateColumnSort" => {
                let d: SortDetail = serde_json::from_value(detail)?;
                Self::UpdateColumnSort(d.sort)
            }
            "updateColumnFilter" => {
                let d: FilterDetail = serde_json::from_value(detail)?;
                Self::UpdateColumnFilter(d.filter)
            }
            "updateStyles" => {
                let d: StylesDetail = serde_json::from_value(detail)?;
                Self::UpdateStyles(d.styles)
            }
            other => return Err(GridError::UnknownEvent(other.to_string())),
        };
        Ok(event)
    }
}

impl Grid {
    pub fn apply_host_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::AddPatches(patches) => self.add_patches(&patches),
            HostEvent::UpdateData {
                data,
                columns,
                type_hints,
            } => self.update_data(data, columns, type_hints),
            HostEvent::UpdateCellSelection(selection) => self.set_cell_selection(selection)?,
            HostEvent::UpdateColumnSort(sort) => self.set_sort(sort),
            HostEvent::UpdateColumnFilter(filters) => self.set_filters(filters),
            HostEvent::UpdateStyles(styles) => self.set_styles(&styles),
        }
        Ok(())
    }

    /// Decode and apply an event in one step.
    pub fn dispatch_host_event(&mut self, name: &str, detail: Value) -> Result<()> {
        let event = HostEvent::decode(name, detail)?;
        debug!(name, "host event");
        self.apply_host_event(event)
    }
}

/// State published back to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostOutputs {
    /// `None` when every selection mode is none
    pub cell_selection: Option<CellSelection>,
    /// `None` when row selection is off
    pub selected_rows: Option<Vec<usize>>,
    pub sort: Vec<ColumnSort>,
    pub filter: Vec<ColumnFilter>,
    /// Row indices of the sorted/filtered view
    pub data_view_rows: Vec<usize>,
}

impl HostOutputs {
    pub fn from_grid(grid: &Grid) -> Self {
        let modes = grid.modes();
        let rows_in_view = || -> Vec<usize> {
            let mut rows: Vec<usize> = grid
                .selection()
                .keys()
                .iter()
                .copied()
                .filter(|&r| grid.row_model().contains(r))
                .collect();
            rows.sort_unstable();
            rows
        };

        let cell_selection = if modes.is_none() || modes.row == RowSelectionMode::None {
            None
        } else {
            Some(CellSelection::Row {
                rows: rows_in_view(),
            })
        };
        let selected_rows = (modes.row != RowSelectionMode::None).then(rows_in_view);

        Self {
            cell_selection,
            selected_rows,
            sort: grid.sort().to_vec(),
            filter: grid.filters().to_vec(),
            data_view_rows: grid.row_model().rows().to_vec(),
        }
    }

    /// Every output as `(<id>_<name>, value)`, aliases included.
    pub fn named_values(&self, id: &str) -> Result<Vec<(String, Value)>> {
        let cell_selection = serde_json::to_value(&self.cell_selection)?;
        let selected_rows = serde_json::to_value(&self.selected_rows)?;
        let sort = serde_json::to_value(&self.sort)?;
        let filter = serde_json::to_value(&self.filter)?;
        let view = serde_json::to_value(&self.data_view_rows)?;

        Ok(vec![
            (format!("{id}_cell_selection"), cell_selection),
            (format!("{id}_selected_rows"), selected_rows),
            (format!("{id}_sort"), sort.clone()),
            (format!("{id}_column_sort"), sort),
            (format!("{id}_filter"), filter.clone()),
            (format!("{id}_column_filter"), filter),
            (format!("{id}_data_view_rows"), view.clone()),
            (format!("{id}_data_view_indices"), view),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_event_is_an_error() {
        let err = HostEvent::decode("resize", json!({})).unwrap_err();
        assert!(matches!(err, GridError::UnknownEvent(name) if name == "resize"));
    }

    #[test]
    fn add_patches_use_the_wire_shape() {
        let event = HostEvent::decode(
            "addPatches",
            json!({"patches": [{"row_index": 1, "column_index": 0, "value": "v"}]}),
        )
        .unwrap();
        assert_eq!(event, HostEvent::AddPatches(vec![CellPatch::new(1, 0, "v")]));
    }

    #[test]
    fn malformed_patches_are_rejected() {
        let err = HostEvent::decode("addPatches", json!({"patches": [{"row_index": 1}]}))
            .unwrap_err();
        assert!(matches!(err, GridError::MalformedResponse(_)));
    }

    #[test]
    fn sort_and_filter_details() {
        let sort = HostEvent::decode("updateColumnSort", json!({"sort": [{"col": 1, "desc": true}]}))
            .unwrap();
        assert_eq!(
            sort,
            HostEvent::UpdateColumnSort(vec![ColumnSort { col: 1, desc: true }])
        );
        let filter = HostEvent::decode(
            "updateColumnFilter",
            json!({"filter": [{"col": 0, "value": [1, 2]}]}),
        )
        .unwrap();
        assert!(matches!(filter, HostEvent::UpdateColumnFilter(f) if f.len() == 1));
    }

    #[test]
    fn cell_selection_detail() {
        let event = HostEvent::decode(
            "updateCellSelection",
            json!({"cellSelection": {"type": "none"}}),
        )
        .unwrap();
        assert_eq!(event, HostEvent::UpdateCellSelection(CellSelection::None));
    }
}
