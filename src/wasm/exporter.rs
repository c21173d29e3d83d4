//! Download, clipboard and share plumbing around the pure generators.
//!
//! Every flow here ends in a user-visible outcome: a saved file, a copied
//! string, an opened share page, or a notice explaining what went wrong.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    console, CanvasRenderingContext2d, Document, File, HtmlAnchorElement, HtmlCanvasElement,
    HtmlDocument, HtmlTextAreaElement, WebGl2RenderingContext as GL,
};

use crate::export;
use crate::settings::SettingsStore;
use crate::share;

use super::notify;

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn iso_now() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

pub fn export_png(document: &Document, canvas: &HtmlCanvasElement) {
    let filename = format!("gradient-export-{}.png", now_ms());
    let direct = canvas
        .to_data_url_with_type("image/png")
        .and_then(|data_url| trigger_download(document, &data_url, &filename));
    let result = direct.or_else(|_| export_png_readback(document, canvas, &filename));
    match result {
        Ok(()) => notify::show(document, "PNG exported successfully!"),
        Err(err) => {
            console::error_1(&err);
            notify::show(document, "PNG export failed in this browser.");
        }
    }
}

/// Fallback when `toDataURL` is unavailable: read the backbuffer and undo
/// the GL bottom-left origin before re-encoding through a 2D canvas.
fn export_png_readback(
    document: &Document,
    canvas: &HtmlCanvasElement,
    filename: &str,
) -> Result<(), JsValue> {
    let width = canvas.width();
    let height = canvas.height();
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("webgl2 context unavailable")?
        .dyn_into()?;

    let mut pixels = vec![0u8; (width * height * 4) as usize];
    gl.read_pixels_with_opt_u8_array(
        0,
        0,
        width as i32,
        height as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&mut pixels),
    )?;

    let row = (width * 4) as usize;
    let flipped: Vec<u8> = pixels.chunks(row).rev().flatten().copied().collect();

    let staging: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    staging.set_width(width);
    staging.set_height(height);
    let ctx: CanvasRenderingContext2d = staging
        .get_context("2d")?
        .ok_or("2d context unavailable")?
        .dyn_into()?;
    let image = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        wasm_bindgen::Clamped(&flipped),
        width,
        height,
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)?;

    let data_url = staging.to_data_url_with_type("image/png")?;
    trigger_download(document, &data_url, filename)
}

pub fn export_svg(document: &Document, store: &SettingsStore) {
    let svg = export::svg_document(&store.settings(), 1920, 1080);
    finish_text_export(
        document,
        download_text(document, "gradient-export.svg", "image/svg+xml", &svg),
        "SVG exported successfully!",
    );
}

pub fn export_css(document: &Document, store: &SettingsStore) {
    let css = export::stylesheet(&store.settings());
    finish_text_export(
        document,
        download_text(document, "gradient-styles.css", "text/css", &css),
        "CSS exported successfully!",
    );
}

pub fn export_settings(document: &Document, store: &SettingsStore) {
    let json = export::settings_file(&store.settings(), &iso_now());
    finish_text_export(
        document,
        download_text(document, "gradient-settings.json", "application/json", &json),
        "Settings exported successfully!",
    );
}

fn finish_text_export(document: &Document, result: Result<(), JsValue>, success: &str) {
    match result {
        Ok(()) => notify::show(document, success),
        Err(err) => {
            console::error_1(&err);
            notify::show(document, "Export failed. Please try again.");
        }
    }
}

pub fn import_settings(document: Document, store: Rc<SettingsStore>, file: File) {
    spawn_local(async move {
        let text = match JsFuture::from(file.text()).await {
            Ok(value) => value.as_string().unwrap_or_default(),
            Err(_) => {
                notify::show(&document, "Could not read the settings file.");
                return;
            }
        };
        match export::parse_settings_file(&text) {
            Ok(import) => {
                store.update_colors(import.colors);
                store.update_animation(import.animation);
                notify::show(&document, "Settings imported.");
            }
            Err(err) => {
                console::warn_1(&format!("settings import rejected: {err}").into());
                notify::show(&document, "Invalid settings file.");
            }
        }
    });
}

/// Copy the inline CSS snippet, preferring the async clipboard.
pub fn copy_inline_css(document: &Document, store: &SettingsStore) {
    let css = export::inline_css(&store.settings());
    copy_text(document.clone(), css, "CSS copied to clipboard!");
}

pub fn copy_text(document: Document, text: String, success: &'static str) {
    let Some(window) = web_sys::window() else { return };
    let navigator = window.navigator();
    if js_sys::Reflect::has(&navigator, &"clipboard".into()).unwrap_or(false) {
        let promise = navigator.clipboard().write_text(&text);
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => notify::show(&document, success),
                Err(_) => fallback_copy(&document, &text, success),
            }
        });
    } else {
        fallback_copy(&document, &text, success);
    }
}

/// Legacy path: select a detached textarea and `execCommand("copy")`.
fn fallback_copy(document: &Document, text: &str, success: &str) {
    let copied = (|| -> Result<bool, JsValue> {
        let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
        textarea.set_value(text);
        textarea.set_class_name("offscreen");
        document.body().ok_or("no body")?.append_child(&textarea)?;
        textarea.select();
        let copied = document
            .dyn_ref::<HtmlDocument>()
            .map(|d| d.exec_command("copy").unwrap_or(false))
            .unwrap_or(false);
        textarea.remove();
        Ok(copied)
    })()
    .unwrap_or(false);

    if copied {
        notify::show(document, success);
    } else {
        notify::show(document, "Copy failed. Please copy manually.");
    }
}

/// Share the current gradient as a link. The chain degrades from the
/// native share sheet through a share-intent tab and the clipboard down
/// to a plain notice carrying the URL.
pub fn share_gradient(document: Document, store: &SettingsStore) {
    let built = (|| -> Result<(String, String), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let location = window.location();
        let token = share::encode_token(&store.settings());
        let url = format!("{}{}?g={token}", location.origin()?, location.pathname()?);
        let text = match store.settings().current_preset {
            Some(name) => format!("Check out my {name} animated gradient!"),
            None => "Check out my custom animated gradient!".to_owned(),
        };
        Ok((url, text))
    })();
    match built {
        Ok((url, text)) => spawn_local(share_chain(document, url, text)),
        Err(err) => console::error_1(&err),
    }
}

async fn share_chain(document: Document, url: String, text: String) {
    let Some(window) = web_sys::window() else { return };
    let navigator = window.navigator();

    let is_mobile = navigator
        .user_agent()
        .map(|ua| ua.contains("Mobi") || ua.contains("Android"))
        .unwrap_or(false);
    if is_mobile && js_sys::Reflect::has(&navigator, &"share".into()).unwrap_or(false) {
        let data = web_sys::ShareData::new();
        data.set_title("Animated gradient");
        data.set_text(&text);
        data.set_url(&url);
        if JsFuture::from(navigator.share_with_data(&data)).await.is_ok() {
            return;
        }
        // Cancelled or unsupported; keep walking the chain.
    }

    let intent = format!(
        "https://twitter.com/intent/tweet?text={}&url={}",
        js_sys::encode_uri_component(&text),
        js_sys::encode_uri_component(&url)
    );
    if let Ok(Some(_)) = window.open_with_url_and_target(&intent, "_blank") {
        notify::show(&document, "Share page opened in a new tab.");
        return;
    }

    // Popup blocked: clipboard, then a bare notice with the link.
    let full = format!("{text} {url}");
    if js_sys::Reflect::has(&navigator, &"clipboard".into()).unwrap_or(false)
        && JsFuture::from(navigator.clipboard().write_text(&full)).await.is_ok()
    {
        notify::show(&document, "Share text copied to clipboard!");
        return;
    }
    notify::show(&document, &format!("Share URL: {url}"));
}

fn download_text(
    document: &Document,
    filename: &str,
    mime: &str,
    content: &str,
) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(parts.as_ref(), &options)?;
    let object_url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let result = trigger_download(document, &object_url, filename);
    web_sys::Url::revoke_object_url(&object_url)?;
    result
}

pub(super) fn trigger_download(document: &Document, href: &str, filename: &str) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(href);
    anchor.set_download(filename);
    document.body().ok_or("no body")?.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Ok(())
}
