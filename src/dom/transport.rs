//! JS side of the patch transport and JSON conversion helpers.

use js_sys::{Function, Promise};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::{GridError, Result};
use crate::reconcile::PatchTransport;

/// Host function `(method, args) => Promise<json>`.
#[derive(Clone)]
pub(crate) struct JsTransport {
    function: Function,
}

impl JsTransport {
    pub(crate) fn new(function: Function) -> Self {
        Self { function }
    }
}

impl PatchTransport for JsTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let args = to_js(&args)?;
        let returned = self
            .function
            .call2(&JsValue::NULL, &JsValue::from_str(method), &args)
            .map_err(|e| GridError::Transport(js_error_text(&e)))?;
        let promise = returned
            .dyn_into::<Promise>()
            .map_err(|_| GridError::Transport("transport did not return a promise".into()))?;
        let response = JsFuture::from(promise)
            .await
            .map_err(|e| GridError::Transport(js_error_text(&e)))?;
        from_js(response)
    }
}

/// Convert to a plain JS value (objects, not `Map`s).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| GridError::Other(e.to_string()))
}

pub(crate) fn from_js(value: JsValue) -> Result<Value> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| GridError::Other(e.to_string()))
}

/// Text of a thrown value, as `String(err)` would render it.
pub(crate) fn js_error_text(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.to_string());
    }
    format!("{value:?}")
}
