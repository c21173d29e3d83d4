//! Control-panel wiring: inputs and buttons mutate the store, and a store
//! subscription pushes every committed snapshot back into the panel.

use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, KeyboardEvent,
};

use crate::export;
use crate::presets::PresetManager;
use crate::settings::{AnimationUpdate, ColorUpdate, Settings, SettingsStore};

use super::exporter;
use super::recorder::Recorder;

pub fn bind(
    document: &Document,
    store: Rc<SettingsStore>,
    presets: Rc<PresetManager>,
    canvas: HtmlCanvasElement,
) -> Result<(), JsValue> {
    bind_color_inputs(document, &store)?;
    bind_sliders(document, &store)?;
    build_preset_buttons(document, &presets)?;
    bind_buttons(document, &store, &canvas)?;
    bind_embed_modal(document, &store)?;
    bind_import(document, &store)?;
    bind_keyboard(document, &store, &canvas)?;

    sync_ui(document, &store.settings());
    let ui_document = document.clone();
    store.subscribe(move |settings| sync_ui(&ui_document, settings));
    Ok(())
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

fn input(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    element(document, id)?.dyn_into::<HtmlInputElement>().map_err(JsValue::from)
}

/// Attach a page-lifetime listener; the closure is intentionally leaked.
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn bind_color_inputs(document: &Document, store: &Rc<SettingsStore>) -> Result<(), JsValue> {
    for slot in ["color1", "color2", "color3", "color4"] {
        let field = input(document, slot)?;
        let store = Rc::clone(store);
        let source = field.clone();
        listen(&field, "input", move |_| {
            let Ok(color) = source.value().parse() else { return };
            let update = match slot {
                "color1" => ColorUpdate { color1: Some(color), ..Default::default() },
                "color2" => ColorUpdate { color2: Some(color), ..Default::default() },
                "color3" => ColorUpdate { color3: Some(color), ..Default::default() },
                _ => ColorUpdate { color4: Some(color), ..Default::default() },
            };
            store.update_colors(update);
        })?;
    }
    Ok(())
}

fn bind_sliders(document: &Document, store: &Rc<SettingsStore>) -> Result<(), JsValue> {
    let speed = input(document, "speed-slider")?;
    {
        let store = Rc::clone(store);
        let source = speed.clone();
        listen(&speed, "input", move |_| {
            if let Ok(value) = source.value().parse::<f32>() {
                store.update_animation(AnimationUpdate { speed: Some(value), ..Default::default() });
            }
        })?;
    }

    let complexity = input(document, "complexity-slider")?;
    {
        let store = Rc::clone(store);
        let source = complexity.clone();
        listen(&complexity, "input", move |_| {
            if let Ok(value) = source.value().parse::<u32>() {
                store.update_animation(AnimationUpdate {
                    complexity: Some(value),
                    ..Default::default()
                });
            }
        })?;
    }

    let scale = input(document, "scale-slider")?;
    {
        let store = Rc::clone(store);
        let source = scale.clone();
        listen(&scale, "input", move |_| {
            if let Ok(value) = source.value().parse::<f32>() {
                store.update_animation(AnimationUpdate { scale: Some(value), ..Default::default() });
            }
        })?;
    }
    Ok(())
}

/// The preset grid is populated from the table, not hardcoded in markup.
fn build_preset_buttons(document: &Document, presets: &Rc<PresetManager>) -> Result<(), JsValue> {
    let grid = element(document, "preset-grid")?;
    for (id, _) in presets.all() {
        let button = document.create_element("button")?;
        button.set_class_name("preset-btn");
        button.set_attribute("data-preset", &id)?;
        button.set_text_content(Some(&id));
        grid.append_child(&button)?;

        let presets = Rc::clone(presets);
        listen(&button, "click", move |_| {
            presets.apply(&id);
        })?;
    }
    Ok(())
}

fn bind_buttons(
    document: &Document,
    store: &Rc<SettingsStore>,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let randomize = element(document, "randomize-btn")?;
    {
        let store = Rc::clone(store);
        listen(&randomize, "click", move |_| store.randomize())?;
    }

    let share = element(document, "share-btn")?;
    {
        let store = Rc::clone(store);
        let document = document.clone();
        listen(&share, "click", move |_| exporter::share_gradient(document.clone(), &store))?;
    }

    let record: HtmlElement =
        element(document, "record-btn")?.dyn_into().map_err(JsValue::from)?;
    {
        let recorder = Recorder::new();
        let document = document.clone();
        let canvas = canvas.clone();
        let button = record.clone();
        listen(&record, "click", move |_| recorder.toggle(&document, &canvas, &button))?;
    }

    let png = element(document, "export-png")?;
    {
        let document = document.clone();
        let canvas = canvas.clone();
        listen(&png, "click", move |_| exporter::export_png(&document, &canvas))?;
    }

    let svg = element(document, "export-svg")?;
    {
        let document = document.clone();
        let store = Rc::clone(store);
        listen(&svg, "click", move |_| exporter::export_svg(&document, &store))?;
    }

    let css = element(document, "export-css")?;
    {
        let document = document.clone();
        let store = Rc::clone(store);
        listen(&css, "click", move |_| exporter::export_css(&document, &store))?;
    }

    let copy_css = element(document, "copy-css")?;
    {
        let document = document.clone();
        let store = Rc::clone(store);
        listen(&copy_css, "click", move |_| exporter::copy_inline_css(&document, &store))?;
    }

    let settings = element(document, "export-settings")?;
    {
        let document = document.clone();
        let store = Rc::clone(store);
        listen(&settings, "click", move |_| exporter::export_settings(&document, &store))?;
    }
    Ok(())
}

fn bind_embed_modal(document: &Document, store: &Rc<SettingsStore>) -> Result<(), JsValue> {
    let modal = element(document, "embed-modal")?;

    let open = element(document, "embed-btn")?;
    {
        let store = Rc::clone(store);
        let document = document.clone();
        let modal = modal.clone();
        listen(&open, "click", move |_| {
            let snippet = export::embed_snippet(&store.settings(), exporter::now_ms());
            if let Some(area) = embed_code_area(&document) {
                area.set_value(&snippet);
            }
            modal.set_class_name("modal");
        })?;
    }

    let close = element(document, "close-btn")?;
    {
        let modal = modal.clone();
        listen(&close, "click", move |_| modal.set_class_name("modal hidden"))?;
    }

    // Clicking the backdrop (not the dialog content) also dismisses.
    {
        let backdrop = modal.clone();
        listen(&modal, "click", move |event| {
            let Some(target) = event.target() else { return };
            if JsValue::from(target) == JsValue::from(backdrop.clone()) {
                backdrop.set_class_name("modal hidden");
            }
        })?;
    }

    let copy = element(document, "copy-embed")?;
    {
        let document = document.clone();
        listen(&copy, "click", move |_| {
            if let Some(area) = embed_code_area(&document) {
                exporter::copy_text(document.clone(), area.value(), "Embed code copied!");
            }
        })?;
    }
    Ok(())
}

fn embed_code_area(document: &Document) -> Option<HtmlTextAreaElement> {
    document
        .get_element_by_id("embed-code")
        .and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
}

fn bind_import(document: &Document, store: &Rc<SettingsStore>) -> Result<(), JsValue> {
    let field = input(document, "import-settings")?;
    let store = Rc::clone(store);
    let document = document.clone();
    let source = field.clone();
    listen(&field, "change", move |_| {
        let Some(file) = source.files().and_then(|list| list.get(0)) else { return };
        exporter::import_settings(document.clone(), Rc::clone(&store), file);
        // Reset so picking the same file again re-triggers `change`.
        source.set_value("");
    })?;
    Ok(())
}

fn bind_keyboard(
    document: &Document,
    store: &Rc<SettingsStore>,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let store = Rc::clone(store);
    let doc = document.clone();
    let canvas = canvas.clone();
    listen(document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>().cloned() else { return };
        if let Some(active) = doc.active_element() {
            let tag = active.tag_name();
            if tag == "INPUT" || tag == "TEXTAREA" {
                return;
            }
        }
        match event.key().to_lowercase().as_str() {
            "r" => store.randomize(),
            "e" if event.ctrl_key() || event.meta_key() => {
                event.prevent_default();
                exporter::export_png(&doc, &canvas);
            }
            " " => {
                event.prevent_default();
                store.randomize();
            }
            _ => {}
        }
    })
}

fn sync_ui(document: &Document, settings: &Settings) {
    for (id, color) in [
        ("color1", settings.colors.color1),
        ("color2", settings.colors.color2),
        ("color3", settings.colors.color3),
        ("color4", settings.colors.color4),
    ] {
        set_input_value(document, id, &color.to_string());
    }

    set_input_value(document, "speed-slider", &settings.animation.speed.to_string());
    set_text(document, "speed-value", &format!("{:.1}", settings.animation.speed));
    set_input_value(document, "complexity-slider", &settings.animation.complexity.to_string());
    set_text(document, "complexity-value", &settings.animation.complexity.to_string());
    set_input_value(document, "scale-slider", &settings.animation.scale.to_string());
    set_text(document, "scale-value", &format!("{:.1}", settings.animation.scale));

    if let Some(grid) = document.get_element_by_id("preset-grid") {
        let current = settings.current_preset.as_deref();
        let children = grid.children();
        for i in 0..children.length() {
            let Some(child) = children.item(i) else { continue };
            let active =
                current.is_some() && child.get_attribute("data-preset").as_deref() == current;
            child.set_class_name(if active { "preset-btn active" } else { "preset-btn" });
        }
    }
}

fn set_input_value(document: &Document, id: &str, value: &str) {
    if let Some(field) = document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        field.set_value(value);
    }
}

fn set_text(document: &Document, id: &str, value: &str) {
    if let Some(node) = document.get_element_by_id(id) {
        node.set_text_content(Some(value));
    }
}
