//! WASM bindings for connectome-scene.
//!
//! Exposes `compileNetwork` and `parseInputQuery` to JavaScript via
//! wasm-bindgen.

use wasm_bindgen::prelude::*;

/// Compile a network from catalogue, state snapshot and connection JSON.
#[wasm_bindgen(js_name = "compileNetwork")]
pub fn compile_network(
    catalogue_json: &str,
    state_json: &str,
    connections_json: &str,
) -> Result<String, JsError> {
    crate::compile_scene_json(catalogue_json, state_json, connections_json, false)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Split a search-box query into upper-cased ids.
#[wasm_bindgen(js_name = "parseInputQuery")]
pub fn parse_input_query(text: &str) -> Vec<String> {
    crate::model::parse_input_query(text)
}
