//! patchgrid - editable data grid core for the web
//!
//! Keeps a browser data grid's interaction state in sync with a remote data
//! owner:
//! - per-cell edit state machine (display, editing, saving, success, failure)
//! - optimistic patch reconciliation with race guards
//! - anchor-based row multi-selection
//! - sort/filter view, style infos and the row summary line
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DataGrid } from 'patchgrid';
//! await init();
//! const grid = new DataGrid(element, info, (method, args) => sendRequest(method, args));
//! grid.setOutputCallback((name, value) => setInputValue(name, value));
//! grid.setRenderCallback(() => rerender(grid));
//! ```
//!
//! Outside the browser the same core is driven through [`Grid`].

pub mod edit_map;
pub mod editor;
pub mod error;
pub mod grid;
pub mod host;
pub mod immutable_set;
pub mod reconcile;
pub mod row_model;
pub mod selection;
pub mod style_info;
pub mod summary;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use dom::DataGrid;
pub use edit_map::CellEditMap;
pub use editor::{CellView, CommitOutcome, EditTransition};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use host::{HostEvent, HostOutputs, HOST_EVENT_NAMES};
pub use immutable_set::ImmutableSet;
pub use reconcile::{submit_patches, PatchTransport, Submission};
pub use row_model::RowModel;
pub use selection::{KeyAction, KeyOutcome, Modifiers, Platform, RowKey, RowOrder, SelectionState};

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
