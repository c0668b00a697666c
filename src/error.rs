//! Structured error types for patchgrid.
//!
//! Errors never escape to a global channel: the reconciliation protocol turns
//! them into a cell's failure tooltip, everything else is logged and dropped.

/// All errors that can occur while driving the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// JSON (de)serialization error from serde_json.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote owner answered with something that is not a list of patches.
    #[error("Malformed patch response: {0}")]
    MalformedResponse(String),

    /// The transport's failure continuation fired.
    #[error("{0}")]
    Transport(String),

    /// A selection mode string the grid does not understand.
    #[error("Invalid {axis} selection mode: {value}")]
    InvalidSelectionMode { axis: &'static str, value: String },

    /// A patch addressed a cell outside the data matrix.
    #[error("Cell ({row}, {col}) is outside the data matrix")]
    OutOfBounds { row: usize, col: usize },

    /// A host event name the grid does not listen for.
    #[error("Unknown host event: {0}")]
    UnknownEvent(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
