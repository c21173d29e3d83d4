#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use gradient_studio::settings::{AnimationUpdate, SettingsStore};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn canvas_can_be_created_and_sized() {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_width(320);
    canvas.set_height(180);
    document.body().unwrap().append_child(&canvas).unwrap();

    assert_eq!(canvas.width(), 320);
    assert_eq!(canvas.height(), 180);
}

#[wasm_bindgen_test]
fn store_notifies_inside_the_browser_runtime() {
    let store = Rc::new(SettingsStore::new());
    let calls = Rc::new(Cell::new(0u32));
    {
        let calls = Rc::clone(&calls);
        store.subscribe(move |_| calls.set(calls.get() + 1));
    }
    store.update_animation(AnimationUpdate { speed: Some(1.4), ..Default::default() });
    assert_eq!(calls.get(), 1);
    assert_eq!(store.settings().animation.speed, 1.4);
}
