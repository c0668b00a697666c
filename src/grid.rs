//! The grid core: dataset, stores and view state of one grid instance.
//!
//! `Grid` is plain data driven by the single-threaded event loop. The cell
//! state machine lives in [`crate::editor`] and the reconciliation protocol in
//! [`crate::reconcile`]; both are implemented as further `impl Grid` blocks.

use tracing::{debug, warn};

use crate::edit_map::CellEditMap;
use crate::error::{GridError, Result};
use crate::row_model::RowModel;
use crate::selection::{KeyAction, KeyOutcome, Modifiers, Platform, RowKey, SelectionState};
use crate::style_info::StyleInfoMap;
use crate::types::{
    CellSelection, CellValue, ColumnFilter, ColumnSort, FilterValue, GridInfo, GridOptions,
    SelectionModes, StyleInfo, TypeHint, TypeKind,
};

pub struct Grid {
    pub(crate) columns: Vec<String>,
    /// One hint per column; `None` when the host sent none
    pub(crate) type_hints: Option<Vec<TypeHint>>,
    pub(crate) data: Vec<Vec<CellValue>>,
    pub(crate) options: GridOptions,
    pub(crate) modes: SelectionModes,
    pub(crate) patch_key: String,
    pub(crate) edits: CellEditMap,
    pub(crate) selection: SelectionState<usize>,
    pub(crate) sort: Vec<ColumnSort>,
    pub(crate) filters: Vec<ColumnFilter>,
    pub(crate) styles: StyleInfoMap,
    pub(crate) rows: RowModel,
    /// Bumped on every dataset replacement
    pub(crate) epoch: u64,
    revision: u64,
}

impl Grid {
    /// Create a grid from the host's render payload.
    pub fn from_info(info: GridInfo) -> Result<Self> {
        let modes = SelectionModes::from_prop(info.selection_modes.as_ref())?;
        let payload = info.payload;
        let nrow = payload.data.len();
        let ncol = payload.columns.len();
        let styles = StyleInfoMap::from_infos(&payload.options.styles, nrow, ncol);

        let grid = Self {
            rows: RowModel::identity(nrow),
            columns: payload.columns,
            type_hints: payload.type_hints,
            data: payload.data,
            options: payload.options,
            modes,
            patch_key: info.patch_info.key,
            edits: CellEditMap::new(),
            selection: SelectionState::new(),
            sort: Vec::new(),
            filters: Vec::new(),
            styles,
            epoch: 0,
            revision: 0,
        };
        debug!(nrow, ncol, "grid created");
        Ok(grid)
    }

    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Change counter covering every store of the grid.
    pub fn version(&self) -> u64 {
        self.revision
            .wrapping_add(self.edits.version())
            .wrapping_add(self.selection.version())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &[Vec<CellValue>] {
        &self.data
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    pub fn nrow(&self) -> usize {
        self.data.len()
    }

    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn modes(&self) -> &SelectionModes {
        &self.modes
    }

    /// Method key the patch transport is called with.
    pub fn patch_key(&self) -> &str {
        &self.patch_key
    }

    pub fn edits(&self) -> &CellEditMap {
        &self.edits
    }

    pub fn selection(&self) -> &SelectionState<usize> {
        &self.selection
    }

    pub fn row_model(&self) -> &RowModel {
        &self.rows
    }

    pub fn sort(&self) -> &[ColumnSort] {
        &self.sort
    }

    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    pub fn styles(&self) -> &StyleInfoMap {
        &self.styles
    }

    pub fn type_kind(&self, col: usize) -> TypeKind {
        self.type_hints
            .as_ref()
            .and_then(|hints| hints.get(col))
            .map_or(TypeKind::Unknown, |h| h.kind)
    }

    pub fn is_html_column(&self, col: usize) -> bool {
        self.type_hints
            .as_ref()
            .and_then(|hints| hints.get(col))
            .is_some_and(TypeHint::is_html)
    }

    /// Editing is on and the column holds plain values.
    pub fn is_editable_column(&self, col: usize) -> bool {
        self.options.editable && col < self.ncol() && !self.is_html_column(col)
    }

    pub fn first_editable_column(&self) -> Option<usize> {
        (0..self.ncol()).find(|&c| self.is_editable_column(c))
    }

    fn rebuild_rows(&mut self) {
        let filters: &[ColumnFilter] = if self.options.filters {
            &self.filters
        } else {
            &[]
        };
        self.rows = RowModel::build(&self.data, &self.sort, filters);
        self.touch();
    }

    /// Replace the sort state. Sorts on markup or unknown columns are dropped.
    pub fn set_sort(&mut self, sort: Vec<ColumnSort>) {
        self.sort = sort
            .into_iter()
            .filter(|s| s.col < self.ncol() && !self.is_html_column(s.col))
            .collect();
        self.rebuild_rows();
    }

    /// Replace the filter state. Filters on unknown columns are dropped.
    pub fn set_filters(&mut self, filters: Vec<ColumnFilter>) {
        let ncol = self.ncol();
        self.filters = filters.into_iter().filter(|f| f.col < ncol).collect();
        self.rebuild_rows();
    }

    /// Replace the dataset.
    ///
    /// Sort and filter entries follow their column by name; filters survive
    /// only when their kind still fits the column (range on numeric, text
    /// otherwise). Both stores are reset and in-flight submissions become
    /// stale.
    pub fn update_data(
        &mut self,
        data: Vec<Vec<CellValue>>,
        columns: Vec<String>,
        type_hints: Option<Vec<TypeHint>>,
    ) {
        let remap = |old_col: usize| -> Option<(usize, TypeKind)> {
            let name = self.columns.get(old_col)?;
            let new_col = columns.iter().position(|c| c == name)?;
            let hint = type_hints.as_ref()?.get(new_col)?;
            Some((new_col, hint.kind))
        };

        let sort: Vec<ColumnSort> = self
            .sort
            .iter()
            .filter_map(|s| {
                remap(s.col).map(|(col, _)| ColumnSort { col, desc: s.desc })
            })
            .collect();
        let filters: Vec<ColumnFilter> = self
            .filters
            .iter()
            .filter_map(|f| {
                let (col, kind) = remap(f.col)?;
                let fits = match (&f.value, kind) {
                    (FilterValue::Range(lo, hi), TypeKind::Numeric) => lo.is_some() && hi.is_some(),
                    (FilterValue::Text(_), TypeKind::Numeric) | (FilterValue::Range(..), _) => false,
                    (FilterValue::Text(_), _) => true,
                };
                fits.then(|| ColumnFilter {
                    col,
                    value: f.value.clone(),
                })
            })
            .collect();

        debug!(
            nrow = data.len(),
            ncol = columns.len(),
            kept_sort = sort.len(),
            kept_filters = filters.len(),
            "dataset replaced"
        );

        self.data = data;
        self.columns = columns;
        self.type_hints = type_hints;
        self.sort = sort;
        self.filters = filters;
        self.edits.reset();
        self.selection.reset();
        self.epoch = self.epoch.wrapping_add(1);
        self.rebuild_rows();
    }

    /// Apply a cell selection pushed by the host.
    pub fn set_cell_selection(&mut self, selection: CellSelection) -> Result<()> {
        match selection {
            CellSelection::None => self.selection.clear(),
            CellSelection::Row { rows } => self.selection.set_multiple(rows),
            other => {
                return Err(GridError::Other(format!(
                    "unsupported cell selection: {other:?}"
                )))
            }
        }
        Ok(())
    }

    /// Replace every style info.
    pub fn set_styles(&mut self, styles: &[StyleInfo]) {
        self.styles.set_all(styles, self.nrow(), self.ncol());
        self.touch();
    }

    /// Pointer-down on a row. Returns true when the caller should focus the
    /// row and prevent the default action.
    pub fn row_pointer_down(&mut self, row: usize, mods: Modifiers, platform: Platform) -> bool {
        let row_is_editing = self.edits.editing_cell().is_some_and(|k| k.row == row);
        self.selection
            .pointer_down(&self.modes, &row, mods, platform, row_is_editing, &self.rows)
    }

    /// Key press on a focused row.
    ///
    /// `Enter` with editing permitted opens the editor on the row's first
    /// cell that accepts an edit, skipping cells that are saving.
    pub fn row_key_down(&mut self, row: usize, key: &str) -> KeyOutcome<usize> {
        let outcome = self.selection.key_down(
            &self.modes,
            &row,
            RowKey::from_key(key),
            self.edits.is_editing_any(),
            self.first_editable_column().is_some(),
            &self.rows,
        );
        if let Some(KeyAction::EnterEdit(row)) = outcome.action {
            match (0..self.ncol()).find(|&c| self.can_edit(row, c)) {
                Some(col) => {
                    self.open_editor(row, col);
                }
                None => warn!(row, "row enter found no editable cell"),
            }
        }
        outcome
    }
}
