//! WebAssembly FFI bindings for the Crux Core
//!
//! The browser dashboard drives the core through these three functions and
//! performs the effects (HTTP, Socket.IO, timers) itself.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsError;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Set up logging when the module loads
#[wasm_bindgen(start)]
pub fn init_wasm() {
    // a second init (hot reload) only fails because a logger is already set
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        log::warn!("logger already initialized: {e}");
    }
}

/// Process a serialized Event and return the serialized effect requests
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.update(event_bytes, &mut effects)
        .map_err(|e| JsError::new(&format!("failed to process event: {e}")))?;
    Ok(effects)
}

/// Get the current serialized ViewModel
#[wasm_bindgen]
pub fn view() -> Result<Vec<u8>, JsError> {
    let mut view = Vec::new();
    CORE.view(&mut view)
        .map_err(|e| JsError::new(&format!("failed to get view model: {e}")))?;
    Ok(view)
}

/// Resolve the effect `id` with its serialized output
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.resolve(
        crux_core::bridge::EffectId(id),
        response_bytes,
        &mut effects,
    )
    .map_err(|e| JsError::new(&format!("failed to handle response: {e}")))?;
    Ok(effects)
}
