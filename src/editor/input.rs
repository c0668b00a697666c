//! DOM textarea overlay for cell editing.
//!
//! One `<textarea>` per grid, moved into the cell being edited and detached
//! again when editing ends. Keyboard handling is wired by the DOM binding.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlTextAreaElement, Node};

pub(crate) struct TextareaOverlay {
    textarea: Option<HtmlTextAreaElement>,
}

impl TextareaOverlay {
    pub(crate) fn new(document: &Document) -> Self {
        let textarea = document
            .create_element("textarea")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok());
        if let Some(textarea) = &textarea {
            textarea.set_class_name("cell-edit-editor");
            let style = textarea.style();
            let _ = style.set_property("box-sizing", "border-box");
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("resize", "none");
            let _ = style.set_property("font", "inherit");
            let _ = style.set_property("padding", "inherit");
        }
        TextareaOverlay { textarea }
    }

    pub(crate) fn element(&self) -> Option<&HtmlTextAreaElement> {
        self.textarea.as_ref()
    }

    /// Mount the editor inside `cell` with `text`, focused and selected.
    /// Does nothing if it is already mounted there.
    pub(crate) fn show(&self, cell: &HtmlElement, text: &str) {
        let Some(textarea) = &self.textarea else {
            return;
        };
        let cell_node: &Node = cell.as_ref();
        if textarea.parent_node().as_ref() == Some(cell_node) {
            return;
        }
        let _ = cell.append_child(textarea);
        textarea.set_value(text);
        let _ = textarea.focus();
        textarea.select();
    }

    /// Detach the editor from its cell.
    pub(crate) fn hide(&self) {
        if let Some(textarea) = &self.textarea {
            if let Some(parent) = textarea.parent_node() {
                let _ = parent.remove_child(textarea);
            }
        }
    }

    /// Whether `node` is the editor or inside it.
    pub(crate) fn contains(&self, node: &Node) -> bool {
        self.textarea
            .as_ref()
            .is_some_and(|t| t.contains(Some(node)))
    }
}

impl Drop for TextareaOverlay {
    fn drop(&mut self) {
        self.hide();
    }
}
