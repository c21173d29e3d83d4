//! Render bridge: turns the latest settings snapshot into one full-screen
//! draw per animation frame.
//!
//! The bridge has exactly two states. Construction compiles and links the
//! embedded shaders; a failure there is final for the session (the caller
//! reports "rendering unavailable" and nothing retries). Once built, every
//! frame resizes the backing store if the displayed size changed, uploads
//! the uniforms and issues a single TRIANGLE_STRIP draw.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::settings::{Settings, SettingsStore};

const VERTEX_SHADER: &str = include_str!("shaders/vertex.glsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/fragment.glsl");

struct Uniforms {
    time: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
    colors: [Option<WebGlUniformLocation>; 4],
    speed: Option<WebGlUniformLocation>,
    complexity: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
}

pub struct Renderer {
    canvas: HtmlCanvasElement,
    gl: GL,
    uniforms: Uniforms,
    start_ms: f64,
}

impl Renderer {
    /// Acquire a WebGL2 context and build the gradient program. Any
    /// compile/link failure surfaces the driver's info log as the error.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        // preserveDrawingBuffer keeps the backbuffer readable for PNG export.
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"preserveDrawingBuffer".into(), &JsValue::TRUE)?;
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;

        let vertex = compile_shader(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;
        gl.use_program(Some(&program));

        // Full-viewport quad as a 4-vertex strip.
        let vertices: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
        let buffer = gl.create_buffer().ok_or("failed to create vertex buffer")?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        // The view must not outlive the next allocation; upload immediately.
        unsafe {
            let view = js_sys::Float32Array::view(&vertices);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }
        let position = gl.get_attrib_location(&program, "a_position");
        gl.enable_vertex_attrib_array(position as u32);
        gl.vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);

        let uniforms = Uniforms {
            time: gl.get_uniform_location(&program, "u_time"),
            resolution: gl.get_uniform_location(&program, "u_resolution"),
            colors: [
                gl.get_uniform_location(&program, "u_color1"),
                gl.get_uniform_location(&program, "u_color2"),
                gl.get_uniform_location(&program, "u_color3"),
                gl.get_uniform_location(&program, "u_color4"),
            ],
            speed: gl.get_uniform_location(&program, "u_speed"),
            complexity: gl.get_uniform_location(&program, "u_complexity"),
            scale: gl.get_uniform_location(&program, "u_scale"),
        };

        Ok(Self { canvas, gl, uniforms, start_ms: js_sys::Date::now() })
    }

    /// Match the backing store to the displayed size, device-pixel-ratio
    /// aware. Cheap when nothing changed.
    fn resize(&self) {
        let dpr = window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (self.canvas.client_width() as f64 * dpr) as u32;
        let height = (self.canvas.client_height() as f64 * dpr) as u32;
        if width > 0 && (self.canvas.width() != width || self.canvas.height() != height) {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn render(&self, settings: &Settings) {
        self.resize();

        let gl = &self.gl;
        let elapsed = ((js_sys::Date::now() - self.start_ms) / 1000.0) as f32;
        gl.uniform1f(self.uniforms.time.as_ref(), elapsed);
        gl.uniform2f(
            self.uniforms.resolution.as_ref(),
            self.canvas.width() as f32,
            self.canvas.height() as f32,
        );
        for (location, color) in self.uniforms.colors.iter().zip(settings.colors.as_array()) {
            gl.uniform4fv_with_f32_array(location.as_ref(), &color.to_uniform());
        }
        gl.uniform1f(self.uniforms.speed.as_ref(), settings.animation.speed);
        gl.uniform1f(self.uniforms.complexity.as_ref(), settings.animation.complexity as f32);
        gl.uniform1f(self.uniforms.scale.as_ref(), settings.animation.scale);

        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }
}

/// Drive the renderer from the animation-frame loop, reading the latest
/// committed settings each tick.
///
/// `f` holds the animation-frame closure so that we can keep calling
/// `request_animation_frame` recursively; storing it inside an `Option`
/// lets the closure obtain a reference to itself.
pub fn run(renderer: Renderer, store: Rc<SettingsStore>) -> Result<(), JsValue> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        renderer.render(&store.settings());

        // schedule next
        if let Some(w) = window() {
            let _ = w.request_animation_frame(
                f.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));

    window()
        .ok_or("no window")?
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;
    Ok(())
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("failed to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".into());
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&log))
    }
}

fn link_program(
    gl: &GL,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, JsValue> {
    let program = gl.create_program().ok_or("failed to create program")?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".into());
        gl.delete_program(Some(&program));
        Err(JsValue::from_str(&log))
    }
}
