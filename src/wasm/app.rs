//! Application bootstrap: build the store, consume a share token from the
//! page URL, wire the controls and start the render loop.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, HtmlCanvasElement, UrlSearchParams, Window};

use crate::presets::PresetManager;
use crate::settings::SettingsStore;
use crate::share;

use super::{controls, notify, render};

pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas = document
        .get_element_by_id("gradient-canvas")
        .ok_or("canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;

    let store = Rc::new(SettingsStore::new());
    let presets = Rc::new(PresetManager::new(Rc::clone(&store)));

    // A `?g=` token wins over the default preset; a malformed one is
    // reported and ignored, keeping startup on the defaults.
    match share_token(&window) {
        Some(token) => {
            if let Err(err) = share::restore_from_token(&store, &token) {
                console::warn_1(&format!("ignoring share token: {err}").into());
                notify::show(&document, "Shared link was invalid; using defaults.");
                presets.apply("default");
            }
        }
        None => {
            presets.apply("default");
        }
    }

    controls::bind(&document, Rc::clone(&store), Rc::clone(&presets), canvas.clone())?;

    match render::Renderer::new(canvas.clone()) {
        Ok(renderer) => render::run(renderer, Rc::clone(&store))?,
        Err(err) => {
            // Fatal for this session; the canvas stays blank and marked.
            console::error_1(&err);
            canvas.set_attribute("data-render", "unavailable")?;
            notify::show(&document, "Rendering unavailable. Reload the page to retry.");
        }
    }

    Ok(())
}

fn share_token(window: &Window) -> Option<String> {
    let search = window.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    params.get("g").filter(|token| !token.is_empty())
}
