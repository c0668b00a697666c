//! Key-addressed edit store.
//!
//! The single source of truth for every cell's visual state. Records are
//! created on first mutation and live until the dataset is replaced.

use std::collections::HashMap;

use crate::types::{CellEditRecord, CellKey, CellState};

static EMPTY_RECORD: CellEditRecord = CellEditRecord {
    value: None,
    state: CellState::Ready,
    error_title: None,
    is_editing: false,
    edit_value: None,
    save_generation: 0,
};

#[derive(Debug, Default)]
pub struct CellEditMap {
    records: HashMap<CellKey, CellEditRecord>,
    /// Bumped on every mutation so renderers can detect change
    version: u64,
}

impl CellEditMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a cell; an empty record if the cell was never touched.
    pub fn get(&self, row: usize, col: usize) -> &CellEditRecord {
        self.records
            .get(&CellKey::new(row, col))
            .unwrap_or(&EMPTY_RECORD)
    }

    /// Apply `mutator` to the cell's current record, creating it if needed.
    pub fn update<F>(&mut self, row: usize, col: usize, mutator: F)
    where
        F: FnOnce(&mut CellEditRecord),
    {
        let record = self.records.entry(CellKey::new(row, col)).or_default();
        mutator(record);
        self.version = self.version.wrapping_add(1);
    }

    /// Drop every record.
    pub fn reset(&mut self) {
        self.records = HashMap::new();
        self.version = self.version.wrapping_add(1);
    }

    /// The cell that currently has an editor mounted, if any.
    pub fn editing_cell(&self) -> Option<CellKey> {
        self.records
            .iter()
            .find(|(_, rec)| rec.is_editing)
            .map(|(key, _)| *key)
    }

    pub fn is_editing_any(&self) -> bool {
        self.records.values().any(|rec| rec.is_editing)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &CellEditRecord)> {
        self.records.iter()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
