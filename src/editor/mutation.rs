//! Data-matrix mutations.
//!
//! Writes confirmed patch values into the row-major data matrix.

use tracing::warn;

use crate::error::{GridError, Result};
use crate::types::{CellPatch, CellValue};

/// Write one patch into the matrix.
///
/// The matrix is never grown: a patch outside it is an error.
pub(crate) fn apply_patch(data: &mut [Vec<CellValue>], patch: &CellPatch) -> Result<()> {
    let cell = data
        .get_mut(patch.row_index)
        .and_then(|row| row.get_mut(patch.column_index))
        .ok_or(GridError::OutOfBounds {
            row: patch.row_index,
            col: patch.column_index,
        })?;
    *cell = patch.value.clone();
    Ok(())
}

/// Write every patch into the matrix in one pass.
///
/// Out-of-bounds patches are skipped with a warning. Returns the patches
/// that were written.
pub(crate) fn apply_patches<'a>(
    data: &mut [Vec<CellValue>],
    patches: &'a [CellPatch],
) -> Vec<&'a CellPatch> {
    let mut applied = Vec::with_capacity(patches.len());
    for patch in patches {
        match apply_patch(data, patch) {
            Ok(()) => applied.push(patch),
            Err(e) => warn!(error = %e, "skipping patch"),
        }
    }
    applied
}
