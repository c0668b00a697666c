//! `DataGrid` - the browser entry point.
//!
//! Binds a [`Grid`] to its host element:
//! - listens for the host's custom events on the element,
//! - commits an open editor on any pointer-down outside it,
//! - sends patches through the host's transport function,
//! - publishes outputs through the host's output function after every change.
//!
//! The host renders rows and cells itself (from `cellView`) and forwards row
//! and cell gestures to the exported methods. Rows carry `data-key`, cells
//! `data-row` and `data-col`.

mod events;
mod transport;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use serde_json::{Map, Value};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, KeyboardEvent, MouseEvent};

use crate::editor::input::TextareaOverlay;
use crate::grid::Grid;
use crate::host::{HostOutputs, HOST_EVENT_NAMES};
use crate::selection::{Modifiers, Platform};
use crate::summary::{summary_message, Viewport, VirtualRow};
use crate::types::{GridInfo, GridOptions};
use transport::{to_js, JsTransport};

/// State the listeners share besides the grid itself.
pub(crate) struct SharedState {
    pub(crate) id: String,
    pub(crate) element: HtmlElement,
    pub(crate) platform: Platform,
    pub(crate) transport: JsTransport,
    /// `(name, value)` sink for outputs
    pub(crate) output_callback: Option<Function>,
    pub(crate) render_callback: Option<Function>,
    pub(crate) overlay: TextareaOverlay,
}

#[wasm_bindgen]
pub struct DataGrid {
    grid: Rc<RefCell<Grid>>,
    state: Rc<RefCell<SharedState>>,
    host_closures: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
    body_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    editor_key_closure: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    #[allow(dead_code)]
    editor_input_closure: Option<Closure<dyn FnMut(Event)>>,
}

fn detect_platform() -> Platform {
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return Platform::default();
    };
    let hinted = Reflect::get(&navigator, &JsValue::from_str("userAgentData"))
        .ok()
        .filter(JsValue::is_object)
        .and_then(|data| Reflect::get(&data, &JsValue::from_str("platform")).ok())
        .and_then(|p| p.as_string());
    let name = hinted
        .or_else(|| navigator.platform().ok())
        .unwrap_or_default();
    Platform::from_platform_name(&name)
}

#[wasm_bindgen]
impl DataGrid {
    /// Create a grid on `element`.
    ///
    /// `info` is the host's render payload; `transport` is called as
    /// `transport(method, args)` and must return a promise of the JSON
    /// response.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement, info: JsValue, transport: Function) -> Result<DataGrid, JsValue> {
        console_error_panic_hook::set_once();

        let info: GridInfo = serde_wasm_bindgen::from_value(info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let grid = Rc::new(RefCell::new(Grid::from_info(info)?));

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        Self::apply_layout(&element, grid.borrow().options());

        let state = Rc::new(RefCell::new(SharedState {
            id: element.id(),
            element: element.clone(),
            platform: detect_platform(),
            transport: JsTransport::new(transport),
            output_callback: None,
            render_callback: None,
            overlay: TextareaOverlay::new(&document),
        }));

        // Host events
        let mut host_closures = Vec::with_capacity(HOST_EVENT_NAMES.len());
        for name in HOST_EVENT_NAMES {
            let grid = Rc::clone(&grid);
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |event: Event| {
                Self::internal_host_event(&grid, &state, name, &event);
            }) as Box<dyn FnMut(Event)>);
            element
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .ok();
            host_closures.push((name, closure));
        }

        // Pointer-down outside the editor
        let body_closure = document.body().map(|body| {
            let grid = Rc::clone(&grid);
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                Self::internal_body_pointer_down(&grid, &state, &event);
            }) as Box<dyn FnMut(MouseEvent)>);
            body.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
                .ok();
            closure
        });

        // Editor keys and text
        let textarea = state.borrow().overlay.element().cloned();
        let (editor_key_closure, editor_input_closure) = match textarea {
            Some(textarea) => {
                let key_closure = {
                    let grid = Rc::clone(&grid);
                    let state = Rc::clone(&state);
                    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                        Self::internal_editor_key_down(&grid, &state, &event);
                    }) as Box<dyn FnMut(KeyboardEvent)>);
                    textarea
                        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                        .ok();
                    closure
                };
                let input_closure = {
                    let grid = Rc::clone(&grid);
                    let state = Rc::clone(&state);
                    let closure = Closure::wrap(Box::new(move |_event: Event| {
                        Self::internal_editor_input(&grid, &state);
                    }) as Box<dyn FnMut(Event)>);
                    textarea
                        .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
                        .ok();
                    closure
                };
                (Some(key_closure), Some(input_closure))
            }
            None => (None, None),
        };

        Ok(DataGrid {
            grid,
            state,
            host_closures,
            body_closure,
            editor_key_closure,
            editor_input_closure,
        })
    }

    /// Register the `(name, value)` output sink and publish current outputs.
    #[wasm_bindgen(js_name = "setOutputCallback")]
    pub fn set_output_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().output_callback = callback;
        Self::after_change(&self.grid, &self.state);
    }

    /// Register a callback invoked after every change.
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Pointer-down on the row with key `row`.
    #[wasm_bindgen(js_name = "rowPointerDown")]
    pub fn row_pointer_down(&self, row: usize, event: &MouseEvent) -> bool {
        let mods = Modifiers {
            ctrl: event.ctrl_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
            alt: event.alt_key(),
        };
        let platform = self.state.borrow().platform;
        let changed = self.grid.borrow_mut().row_pointer_down(row, mods, platform);
        if changed {
            event.prevent_default();
            Self::focus_row(&self.state, row);
            Self::after_change(&self.grid, &self.state);
        }
        changed
    }

    /// Key press on the focused row with key `row`.
    #[wasm_bindgen(js_name = "rowKeyDown")]
    pub fn row_key_down(&self, row: usize, event: &KeyboardEvent) {
        let outcome = self.grid.borrow_mut().row_key_down(row, &event.key());
        if outcome.handled {
            event.prevent_default();
        }
        Self::internal_row_key_action(&self.grid, &self.state, &outcome);
    }

    /// Double-click on a body cell.
    #[wasm_bindgen(js_name = "cellDoubleClick")]
    pub fn cell_double_click(&self, row: usize, col: usize) {
        let transition = self.grid.borrow_mut().begin_edit(row, col);
        Self::finish_transition(&self.grid, &self.state, transition.submission);
    }

    /// Render model of a body cell.
    #[wasm_bindgen(js_name = "cellView")]
    pub fn cell_view(&self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        let view = self.grid.borrow().cell_view(row, col);
        Ok(to_js(&view)?)
    }

    /// Resolved style of a body cell, or `null`.
    #[wasm_bindgen(js_name = "cellStyle")]
    pub fn cell_style(&self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        let grid = self.grid.borrow();
        Ok(to_js(&grid.styles().body(row, col))?)
    }

    /// Row indices in view order.
    #[wasm_bindgen(js_name = "viewRows")]
    pub fn view_rows(&self) -> Result<JsValue, JsValue> {
        let grid = self.grid.borrow();
        Ok(to_js(grid.row_model().rows())?)
    }

    /// Current outputs keyed by their published names.
    pub fn outputs(&self) -> Result<JsValue, JsValue> {
        let id = self.state.borrow().id.clone();
        let values = HostOutputs::from_grid(&self.grid.borrow()).named_values(&id)?;
        let map: Map<String, Value> = values.into_iter().collect();
        Ok(to_js(&map)?)
    }

    /// Summary line for the rows in view; `rows` is the virtualizer's
    /// `{index, start, size}` list.
    pub fn summary(
        &self,
        scroll_top: f64,
        client_height: f64,
        header_height: f64,
        rows: JsValue,
    ) -> Result<Option<String>, JsValue> {
        let rows: Vec<VirtualRow> = serde_wasm_bindgen::from_value(rows)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let viewport = Viewport {
            scroll_top,
            client_height,
            header_height,
        };
        let grid = self.grid.borrow();
        let nrows = grid.row_model().len();
        Ok(summary_message(&grid.options().summary, viewport, &rows, nrows))
    }

    /// Decoded render options, for the host's table markup.
    pub fn options(&self) -> Result<JsValue, JsValue> {
        Ok(to_js(self.grid.borrow().options())?)
    }

    /// Class list for the `<table>` element.
    #[wasm_bindgen(js_name = "tableClass")]
    pub fn table_class(&self) -> String {
        self.grid.borrow().options().table_class()
    }

    /// Change counter for render scheduling.
    pub fn version(&self) -> f64 {
        self.grid.borrow().version() as f64
    }
}

impl DataGrid {
    /// Container classes and size from the payload options.
    fn apply_layout(element: &HtmlElement, options: &GridOptions) {
        let classes = element.class_list();
        for class in options.container_class().split_whitespace() {
            let _ = classes.add_1(class);
        }
        let style = element.style();
        if let Some(width) = &options.width {
            let _ = style.set_property("width", width);
        }
        if let Some(height) = &options.height {
            let _ = style.set_property("height", height);
        }
        let _ = style.set_property("overflow", "auto");
    }
}

impl Drop for DataGrid {
    fn drop(&mut self) {
        let element = self.state.borrow().element.clone();
        for (name, closure) in &self.host_closures {
            element
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .ok();
        }
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());
        if let (Some(body), Some(closure)) = (body, &self.body_closure) {
            body.remove_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
                .ok();
        }
    }
}
