//! Event handlers shared by the `DataGrid` listeners and exported methods.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, Event, HtmlElement, KeyboardEvent, MouseEvent, Node};

use super::transport::{from_js, to_js};
use super::{DataGrid, SharedState};
use crate::grid::Grid;
use crate::host::HostOutputs;
use crate::reconcile::{submit_patches, Submission};
use crate::selection::{KeyAction, KeyOutcome};

impl DataGrid {
    pub(crate) fn internal_host_event(
        grid: &Rc<RefCell<Grid>>,
        state: &Rc<RefCell<SharedState>>,
        name: &str,
        event: &Event,
    ) {
        let detail = event
            .dyn_ref::<CustomEvent>()
            .map_or(JsValue::NULL, CustomEvent::detail);
        let result = from_js(detail).and_then(|d| grid.borrow_mut().dispatch_host_event(name, d));
        if let Err(e) = result {
            warn!(event = name, error = %e, "ignoring host event");
            return;
        }
        Self::after_change(grid, state);
    }

    /// Pointer-down anywhere on the page commits an open editor, unless it
    /// lands in the editor itself.
    pub(crate) fn internal_body_pointer_down(
        grid: &Rc<RefCell<Grid>>,
        state: &Rc<RefCell<SharedState>>,
        event: &MouseEvent,
    ) {
        if !grid.borrow().edits().is_editing_any() {
            return;
        }
        let in_editor = event
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .is_some_and(|node| state.borrow().overlay.contains(&node));
        if in_editor {
            return;
        }
        let submission = grid.borrow_mut().blur_away();
        Self::finish_transition(grid, state, submission);
    }

    pub(crate) fn internal_editor_key_down(
        grid: &Rc<RefCell<Grid>>,
        state: &Rc<RefCell<SharedState>>,
        event: &KeyboardEvent,
    ) {
        let reverse = event.shift_key();
        match event.key().as_str() {
            "Escape" => {
                event.prevent_default();
                let row = grid.borrow_mut().escape_edit();
                Self::after_change(grid, state);
                if let Some(row) = row {
                    Self::focus_row(state, row);
                }
            }
            "Enter" => {
                event.prevent_default();
                let transition = grid.borrow_mut().edit_enter(reverse);
                Self::finish_transition(grid, state, transition.submission);
            }
            "Tab" => {
                event.prevent_default();
                let transition = grid.borrow_mut().edit_tab(reverse);
                Self::finish_transition(grid, state, transition.submission);
            }
            _ => {}
        }
    }

    pub(crate) fn internal_editor_input(grid: &Rc<RefCell<Grid>>, state: &Rc<RefCell<SharedState>>) {
        let text = state
            .borrow()
            .overlay
            .element()
            .map(web_sys::HtmlTextAreaElement::value);
        if let Some(text) = text {
            grid.borrow_mut().set_edit_value(&text);
        }
    }

    pub(crate) fn internal_row_key_action(
        grid: &Rc<RefCell<Grid>>,
        state: &Rc<RefCell<SharedState>>,
        outcome: &KeyOutcome<usize>,
    ) {
        match &outcome.action {
            Some(KeyAction::EscapeFocus) => {
                let element = state.borrow().element.clone();
                Self::escape_focus(&element);
            }
            Some(KeyAction::FocusRow(row)) => Self::focus_row(state, *row),
            Some(KeyAction::EnterEdit(_)) | None => {}
        }
        if outcome.handled {
            Self::after_change(grid, state);
        }
    }

    /// Dispatch a pending submission, then republish.
    pub(crate) fn finish_transition(
        grid: &Rc<RefCell<Grid>>,
        state: &Rc<RefCell<SharedState>>,
        submission: Option<Submission>,
    ) {
        if let Some(submission) = submission {
            Self::dispatch_submission(grid, state, submission);
        }
        Self::after_change(grid, state);
    }

    pub(crate) fn dispatch_submission(
        grid: &Rc<RefCell<Grid>>,
        state: &Rc<RefCell<SharedState>>,
        submission: Submission,
    ) {
        let grid = Rc::clone(grid);
        let state = Rc::clone(state);
        let transport = state.borrow().transport.clone();
        wasm_bindgen_futures::spawn_local(async move {
            submit_patches(&grid, &transport, submission).await;
            Self::after_change(&grid, &state);
        });
    }

    /// Publish outputs, re-render and keep the editor mounted where the grid
    /// says it is.
    pub(crate) fn after_change(grid: &Rc<RefCell<Grid>>, state: &Rc<RefCell<SharedState>>) {
        let (id, output, render) = {
            let s = state.borrow();
            (
                s.id.clone(),
                s.output_callback.clone(),
                s.render_callback.clone(),
            )
        };

        if let Some(output) = output {
            let outputs = HostOutputs::from_grid(&grid.borrow());
            match outputs.named_values(&id) {
                Ok(values) => {
                    for (name, value) in values {
                        match to_js(&value) {
                            Ok(value) => {
                                let _ = output.call2(&JsValue::NULL, &JsValue::from_str(&name), &value);
                            }
                            Err(e) => warn!(%name, error = %e, "output not publishable"),
                        }
                    }
                }
                Err(e) => warn!(error = %e, "outputs not serializable"),
            }
        }

        Self::invoke_render_callback(render);
        Self::sync_editor(grid, state);
    }

    pub(crate) fn invoke_render_callback(callback: Option<Function>) {
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }

    fn sync_editor(grid: &Rc<RefCell<Grid>>, state: &Rc<RefCell<SharedState>>) {
        let editing = {
            let g = grid.borrow();
            g.edits().editing_cell().map(|key| {
                let original = g.cell(key.row, key.col).cloned().unwrap_or_default();
                (key, g.edits().get(key.row, key.col).edit_text(&original))
            })
        };
        let s = state.borrow();
        let Some((key, text)) = editing else {
            s.overlay.hide();
            return;
        };
        let selector = format!("[data-row=\"{}\"][data-col=\"{}\"]", key.row, key.col);
        let cell = s
            .element
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        match cell {
            Some(cell) => s.overlay.show(&cell, &text),
            None => warn!(row = key.row, col = key.col, "editing cell is not rendered"),
        }
    }

    pub(crate) fn focus_row(state: &Rc<RefCell<SharedState>>, row: usize) {
        let selector = format!("tr[data-key=\"{row}\"]");
        let el = state
            .borrow()
            .element
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(el) = el {
            let _ = el.focus();
        }
    }

    /// Leave the row grid: blur whatever has focus, then park focus on the
    /// grid container.
    pub(crate) fn escape_focus(container: &HtmlElement) {
        let active = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(el) = active {
            let _ = el.blur();
        }
        let _ = container.focus();
    }
}
