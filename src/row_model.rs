//! Sorted and filtered view over the data matrix.
//!
//! Rows are addressed by their index in the data matrix. The view is the
//! filtered rows in sort order; it is the ordering used by keyboard
//! navigation and by range selection.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::types::{cell_text, CellValue, ColumnFilter, ColumnSort, FilterValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowModel {
    rows: Vec<usize>,
    positions: HashMap<usize, usize>,
}

impl RowModel {
    /// All rows of a matrix in their original order.
    pub fn identity(nrow: usize) -> Self {
        Self::from_rows((0..nrow).collect())
    }

    /// Filter `data` by `filters`, then order it by `sort` (first entry wins).
    pub fn build(data: &[Vec<CellValue>], sort: &[ColumnSort], filters: &[ColumnFilter]) -> Self {
        let mut rows: Vec<usize> = (0..data.len())
            .filter(|&r| {
                filters
                    .iter()
                    .all(|f| filter_matches(cell_at(data, r, f.col), &f.value))
            })
            .collect();

        if !sort.is_empty() {
            rows.sort_by(|&a, &b| {
                for s in sort {
                    let ord = compare_values(cell_at(data, a, s.col), cell_at(data, b, s.col));
                    let ord = if s.desc { ord.reverse() } else { ord };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<usize>) -> Self {
        let positions = rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
        Self { rows, positions }
    }

    /// Row indices in view order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.positions.contains_key(&row)
    }

    /// Position of a row in view order.
    pub fn position(&self, row: usize) -> Option<usize> {
        self.positions.get(&row).copied()
    }

    /// The row `delta` places away from `row` in view order.
    pub fn offset(&self, row: usize, delta: isize) -> Option<usize> {
        let pos = self.position(row)?;
        let target = pos.checked_add_signed(delta)?;
        self.rows.get(target).copied()
    }

    /// Rows from `from` to `to` inclusive, in view order. Empty if either end
    /// is not in the view.
    pub fn between(&self, from: usize, to: usize) -> Vec<usize> {
        let (Some(a), Some(b)) = (self.position(from), self.position(to)) else {
            return Vec::new();
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.rows.get(lo..=hi).map(<[usize]>::to_vec).unwrap_or_default()
    }
}

fn cell_at(data: &[Vec<CellValue>], row: usize, col: usize) -> &CellValue {
    static NULL: Value = Value::Null;
    data.get(row).and_then(|r| r.get(col)).unwrap_or(&NULL)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn filter_matches(value: &Value, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Text(needle) => {
            needle.is_empty()
                || cell_text(value)
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
        }
        FilterValue::Range(None, None) => true,
        FilterValue::Range(min, max) => {
            let Some(v) = as_number(value) else {
                return false;
            };
            let mut lo = min.unwrap_or(f64::NEG_INFINITY);
            let mut hi = max.unwrap_or(f64::INFINITY);
            if lo > hi {
                std::mem::swap(&mut lo, &mut hi);
            }
            lo <= v && v <= hi
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => cell_text(a).cmp(&cell_text(b)),
    }
}
