//! Per-cell styles built from host style infos.

use std::collections::HashMap;

use crate::types::{CellStyle, StyleInfo, StyleLocation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleInfoMap {
    cells: HashMap<(StyleLocation, usize, usize), CellStyle>,
}

impl StyleInfoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `infos`, applied in order, for an `nrow` x `ncol`
    /// matrix.
    pub fn from_infos(infos: &[StyleInfo], nrow: usize, ncol: usize) -> Self {
        let mut map = Self::new();
        for info in infos {
            map.apply(info, nrow, ncol);
        }
        map
    }

    /// Merge one style info into every cell it addresses.
    ///
    /// Style properties overwrite earlier ones; classes accumulate.
    pub fn apply(&mut self, info: &StyleInfo, nrow: usize, ncol: usize) {
        let rows: Vec<usize> = info.rows.clone().unwrap_or_else(|| (0..nrow).collect());
        let cols: Vec<usize> = info.cols.clone().unwrap_or_else(|| (0..ncol).collect());

        for &row in &rows {
            for &col in &cols {
                let cell = self.cells.entry((info.location, row, col)).or_default();
                if let Some(style) = &info.style {
                    for (prop, value) in style {
                        cell.style.insert(prop.clone(), value.clone());
                    }
                }
                if let Some(class) = &info.class {
                    cell.class = Some(match cell.class.take() {
                        Some(prev) => format!("{prev} {class}"),
                        None => class.clone(),
                    });
                }
            }
        }
    }

    /// Replace the whole map.
    pub fn set_all(&mut self, infos: &[StyleInfo], nrow: usize, ncol: usize) {
        *self = Self::from_infos(infos, nrow, ncol);
    }

    pub fn get(&self, location: StyleLocation, row: usize, col: usize) -> Option<&CellStyle> {
        self.cells.get(&(location, row, col))
    }

    pub fn body(&self, row: usize, col: usize) -> Option<&CellStyle> {
        self.get(StyleLocation::Body, row, col)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
