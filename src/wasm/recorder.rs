//! Time-bounded canvas recording with a countdown readout.
//!
//! The recording is capped at ten seconds by a pending timeout; a manual
//! stop clears that timeout and the ticker, so nothing fires after
//! cancellation.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    console, BlobEvent, Document, HtmlCanvasElement, HtmlElement, MediaRecorder,
    MediaRecorderOptions,
};

use super::{exporter, notify};

const RECORD_LIMIT_MS: f64 = 10_000.0;
const TICK_MS: i32 = 100;

struct Active {
    recorder: MediaRecorder,
    stop_handle: i32,
    tick_handle: i32,
}

pub struct Recorder {
    active: RefCell<Option<Active>>,
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self { active: RefCell::new(None) })
    }

    pub fn toggle(
        self: &Rc<Self>,
        document: &Document,
        canvas: &HtmlCanvasElement,
        button: &HtmlElement,
    ) {
        if self.active.borrow().is_some() {
            self.stop(button);
        } else if let Err(err) = self.start(document, canvas, button) {
            console::error_1(&err);
            notify::show(document, "Recording is not supported in this browser.");
        }
    }

    fn start(
        self: &Rc<Self>,
        document: &Document,
        canvas: &HtmlCanvasElement,
        button: &HtmlElement,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let stream = canvas.capture_stream_with_frame_request_rate(30.0)?;

        let mime = ["video/webm; codecs=vp9", "video/webm; codecs=vp8", "video/webm"]
            .into_iter()
            .find(|m| MediaRecorder::is_type_supported(m))
            .unwrap_or("video/webm");

        let options = MediaRecorderOptions::new();
        options.set_mime_type(mime);
        let recorder =
            MediaRecorder::new_with_media_stream_and_media_recorder_options(&stream, &options)?;

        let chunks = Rc::new(RefCell::new(js_sys::Array::new()));
        let on_data = {
            let chunks = Rc::clone(&chunks);
            Closure::wrap(Box::new(move |event: BlobEvent| {
                if let Some(blob) = event.data() {
                    chunks.borrow().push(&blob);
                }
            }) as Box<dyn FnMut(BlobEvent)>)
        };
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        on_data.forget();

        let on_stop = {
            let chunks = Rc::clone(&chunks);
            let document = document.clone();
            let mime = mime.to_owned();
            Closure::wrap(Box::new(move || {
                let result = (|| -> Result<(), JsValue> {
                    let options = web_sys::BlobPropertyBag::new();
                    options.set_type(&mime);
                    let blob = web_sys::Blob::new_with_blob_sequence_and_options(
                        chunks.borrow().as_ref(),
                        &options,
                    )?;
                    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
                    let filename = format!("gradient-animation-{}.webm", exporter::now_ms());
                    let saved = exporter::trigger_download(&document, &url, &filename);
                    web_sys::Url::revoke_object_url(&url)?;
                    saved
                })();
                match result {
                    Ok(()) => notify::show(&document, "Recording saved successfully!"),
                    Err(err) => {
                        console::error_1(&err);
                        notify::show(&document, "Saving the recording failed.");
                    }
                }
            }) as Box<dyn FnMut()>)
        };
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        on_stop.forget();

        recorder.start()?;
        let started = js_sys::Date::now();
        button.set_text_content(Some("Stop (10s)"));

        let tick = {
            let button = button.clone();
            Closure::wrap(Box::new(move || {
                let remaining =
                    ((RECORD_LIMIT_MS - (js_sys::Date::now() - started)) / 1000.0).ceil().max(0.0);
                button.set_text_content(Some(&format!("Stop ({remaining}s)")));
            }) as Box<dyn FnMut()>)
        };
        let tick_handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                TICK_MS,
            )?;
        tick.forget();

        let auto_stop = {
            let recorder = Rc::clone(self);
            let button = button.clone();
            Closure::once_into_js(move || recorder.stop(&button))
        };
        let stop_handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            auto_stop.unchecked_ref(),
            RECORD_LIMIT_MS as i32,
        )?;

        self.active
            .replace(Some(Active { recorder, stop_handle, tick_handle }));
        Ok(())
    }

    /// Stops a running recording; a no-op when idle (the auto-stop timer
    /// lands here after a manual stop already drained the state).
    pub fn stop(&self, button: &HtmlElement) {
        let Some(active) = self.active.borrow_mut().take() else { return };
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(active.stop_handle);
            window.clear_interval_with_handle(active.tick_handle);
        }
        if let Err(err) = active.recorder.stop() {
            console::warn_1(&err);
        }
        button.set_text_content(Some("Record"));
    }
}
