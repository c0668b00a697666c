use serde::{Deserialize, Serialize};

/// One entry of the sort state, as exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    /// Column index into the current columns
    pub col: usize,
    pub desc: bool,
}

/// Filter criteria for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Case-insensitive substring match on the cell text
    Text(String),
    /// Inclusive numeric range; `None` leaves that end open
    Range(Option<f64>, Option<f64>),
}

impl FilterValue {
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(..))
    }
}

/// One entry of the filter state, as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub col: usize,
    pub value: FilterValue,
}
