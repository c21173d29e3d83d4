//! Transient on-screen notices for export/share/record outcomes.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Document;

const DISMISS_AFTER_MS: i32 = 2500;

/// Best-effort toast; failures only hit the console.
pub fn show(document: &Document, message: &str) {
    if let Err(err) = try_show(document, message) {
        web_sys::console::warn_1(&err);
    }
}

fn try_show(document: &Document, message: &str) -> Result<(), JsValue> {
    let toast = document.create_element("div")?;
    toast.set_class_name("toast");
    toast.set_text_content(Some(message));
    document.body().ok_or("no body")?.append_child(&toast)?;

    let dismiss = Closure::once_into_js(move || toast.remove());
    web_sys::window()
        .ok_or("no window")?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.unchecked_ref(),
            DISMISS_AFTER_MS,
        )?;
    Ok(())
}
