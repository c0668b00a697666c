//! Data types shared by the grid core and its host bindings.

mod cell;
mod filter;
mod patch;
mod selection;
mod style;
mod table;

pub use cell::*;
pub use filter::*;
pub use patch::*;
pub use selection::*;
pub use style::*;
pub use table::*;
