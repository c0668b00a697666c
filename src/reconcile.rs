//! Patch reconciliation with the remote data owner.
//!
//! A commit puts its cell in `EditSaving` and produces a [`Submission`]. The
//! submission is sent as exactly one remote call; its outcome is merged back
//! with [`Grid::complete_submission`]:
//!
//! - success: every submitted cell still saving *for this submission* goes
//!   back to `Ready`, the confirmed patches are written into the data matrix
//!   and their cells become `EditSuccess`;
//! - failure: every submitted cell becomes `EditFailure` with the error as
//!   its title, whatever its current state.
//!
//! "For this submission" is decided by the save generation captured when the
//! submission was built. A cell re-committed while the first request was in
//! flight has a newer generation and stays `EditSaving` until its own
//! response arrives.

use std::cell::RefCell;

use serde_json::Value;
use tracing::{debug, warn};

use crate::editor::mutation;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::types::{cell_text, patches_from_wire, patches_to_wire, CellKey, CellPatch, CellState};

/// Async remote call keyed by a method name.
#[allow(async_fn_in_trait)]
pub trait PatchTransport {
    /// Call `method` with `args`, resolving to the raw JSON response.
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value>;
}

/// One outstanding patch request.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    epoch: u64,
    patches: Vec<CellPatch>,
    /// Save generation of each patched cell at submission time
    generations: Vec<u64>,
}

impl Submission {
    pub fn patches(&self) -> &[CellPatch] {
        &self.patches
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Remote call arguments: a single list of snake_case patches.
    pub fn wire_args(&self) -> Result<Vec<Value>> {
        Ok(vec![patches_to_wire(&self.patches)?])
    }

    fn owns(&self, key: CellKey, generation: u64) -> bool {
        self.patches
            .iter()
            .zip(&self.generations)
            .any(|(p, &g)| p.row_index == key.row && p.column_index == key.col && g == generation)
    }
}

impl Grid {
    /// Capture `patches` as a submission against the current dataset.
    pub fn prepare_submission(&self, patches: Vec<CellPatch>) -> Submission {
        let generations = patches
            .iter()
            .map(|p| self.edits.get(p.row_index, p.column_index).save_generation())
            .collect();
        Submission {
            epoch: self.epoch,
            patches,
            generations,
        }
    }

    /// Merge the outcome of a remote call.
    ///
    /// A response that is not a list of complete patches is treated as a
    /// failure.
    pub fn complete_submission(&mut self, submission: &Submission, response: Result<Value>) {
        match response.and_then(patches_from_wire) {
            Ok(confirmed) => self.complete_success(submission, &confirmed),
            Err(e) => {
                warn!(error = %e, patches = submission.patches.len(), "patch submission failed");
                self.complete_failure(submission, &e);
            }
        }
    }

    fn is_stale(&self, submission: &Submission) -> bool {
        if submission.epoch == self.epoch {
            return false;
        }
        debug!(
            submitted = submission.epoch,
            current = self.epoch,
            "dropping completion for a replaced dataset"
        );
        true
    }

    /// Success branch with the owner's authoritative patches.
    pub fn complete_success(&mut self, submission: &Submission, confirmed: &[CellPatch]) {
        if self.is_stale(submission) {
            return;
        }

        for (patch, &generation) in submission.patches.iter().zip(&submission.generations) {
            let (row, col) = (patch.row_index, patch.column_index);
            let rec = self.edits.get(row, col);
            if rec.state != CellState::EditSaving || rec.save_generation() != generation {
                debug!(row, col, "cell changed since submission");
                continue;
            }
            self.edits.update(row, col, |rec| {
                rec.state = CellState::Ready;
                rec.value = Some(patch.value.clone());
                rec.error_title = None;
                rec.edit_value = None;
            });
        }

        let applied = mutation::apply_patches(&mut self.data, confirmed);
        for patch in applied {
            let key = CellKey::new(patch.row_index, patch.column_index);
            let rec = self.edits.get(key.row, key.col);
            let still_saving =
                rec.state == CellState::EditSaving && !submission.owns(key, rec.save_generation());
            self.edits.update(key.row, key.col, |rec| {
                rec.value = Some(patch.value.clone());
                if !still_saving {
                    rec.state = CellState::EditSuccess;
                    rec.error_title = None;
                }
            });
        }
        self.rebuild_after_write();
    }

    /// Failure branch: every submitted cell shows the error.
    pub fn complete_failure(&mut self, submission: &Submission, error: &GridError) {
        if self.is_stale(submission) {
            return;
        }
        let mut title = error.to_string();
        if title.is_empty() {
            title = "Unknown error".to_string();
        }
        for patch in &submission.patches {
            let attempted = Value::String(cell_text(&patch.value));
            self.edits.update(patch.row_index, patch.column_index, |rec| {
                rec.value = Some(attempted);
                rec.state = CellState::EditFailure;
                rec.error_title = Some(title.clone());
            });
        }
    }

    /// Patches pushed by the owner without a request of ours.
    pub fn add_patches(&mut self, patches: &[CellPatch]) {
        let applied = mutation::apply_patches(&mut self.data, patches);
        for patch in applied {
            self.edits.update(patch.row_index, patch.column_index, |rec| {
                rec.value = Some(patch.value.clone());
                rec.state = CellState::EditSuccess;
                rec.error_title = None;
            });
        }
        self.rebuild_after_write();
    }

    fn rebuild_after_write(&mut self) {
        let sort = std::mem::take(&mut self.sort);
        // keeps a sorted/filtered view consistent with the new values
        self.set_sort(sort);
    }
}

/// Send a submission and merge the answer.
///
/// The grid is only borrowed before and after the remote call, never across
/// the `.await`.
pub async fn submit_patches<T>(grid: &RefCell<Grid>, transport: &T, submission: Submission)
where
    T: PatchTransport,
{
    let method = grid.borrow().patch_key().to_string();
    debug!(%method, patches = submission.patches.len(), "sending patches");
    let response = match submission.wire_args() {
        Ok(args) => transport.call(&method, args).await,
        Err(e) => Err(e),
    };
    grid.borrow_mut().complete_submission(&submission, response);
}
