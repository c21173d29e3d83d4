#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Animated multi-color gradient studio: an observable settings store,
//! preset table, share-token codec and export generators (all
//! target-independent), plus the WebGL2/DOM front end compiled for wasm32.

pub mod color;
pub mod export;
pub mod presets;
pub mod settings;
pub mod share;

// Only compile browser-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod app;
    mod controls;
    mod exporter;
    mod notify;
    mod recorder;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        app::start()
    }
}
