#![cfg(target_arch = "wasm32")]
#![deny(unsafe_code)]
//! Browser bindings: the pointstep demos wired to a WebGL2 canvas.
//!
//! Two entry points, each taking a canvas element id. [`start_feedback`]
//! runs the transform-feedback drift demo on a [`GlDevice`]-backed frame
//! loop; [`start_render_to_texture`] runs the rotating triangle through
//! an offscreen target composited with a checker overlay.
//!
//! Failures surface as a blocking `window.alert` naming the failed step;
//! a failed frame simply does not schedule the next one, so the last
//! rendered frame stays on screen.

mod composite;

use std::cell::RefCell;
use std::rc::Rc;

use pointstep_core::render::{GlContext, GlDevice};
use pointstep_core::{PipelineError, TranslationStrategy};
use pointstep_feedback::{FrameLoop, TRIANGLE_POSITIONS};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Starts the transform-feedback drift demo on the canvas with the given
/// element id.
///
/// Each animation frame runs one capture step and one draw on the GPU.
/// The translation strategy is the default random jitter, seeded from the
/// wall clock so every page load drifts differently.
#[wasm_bindgen]
pub fn start_feedback(canvas_id: &str) -> Result<(), JsValue> {
    announce_failure(feedback_loop(canvas_id))
}

/// Starts the render-to-texture demo on the canvas with the given
/// element id.
///
/// Pass 1 depth-tests the rotating triangle into an offscreen target;
/// pass 2 blits the target's texture to the canvas mixed with a tiled
/// checker pattern.
#[wasm_bindgen]
pub fn start_render_to_texture(canvas_id: &str) -> Result<(), JsValue> {
    announce_failure(composite_loop(canvas_id))
}

fn feedback_loop(canvas_id: &str) -> Result<(), PipelineError> {
    let canvas = acquire_canvas(canvas_id)?;
    let device = GlDevice::new(acquire_context(&canvas)?)?;
    set_viewport(device.gl(), canvas.width() as i32, canvas.height() as i32);

    let seed = js_sys::Date::now() as u64;
    let mut frame_loop = FrameLoop::new(
        device,
        &TRIANGLE_POSITIONS,
        TranslationStrategy::default(),
        seed,
    )?;

    spawn_frame_loop(move || frame_loop.advance())
}

fn composite_loop(canvas_id: &str) -> Result<(), PipelineError> {
    let canvas = acquire_canvas(canvas_id)?;
    let ctx = acquire_context(&canvas)?;
    let mut scene =
        composite::CompositeScene::new(ctx.into_gl(), canvas.width(), canvas.height())?;

    spawn_frame_loop(move || scene.advance())
}

/// Alerts a setup error and converts it for the JS caller.
fn announce_failure(result: Result<(), PipelineError>) -> Result<(), JsValue> {
    result.map_err(|error| {
        let message = error.to_string();
        alert(&message);
        JsValue::from_str(&message)
    })
}

fn window() -> Result<web_sys::Window, PipelineError> {
    web_sys::window().ok_or_else(|| PipelineError::ContextUnavailable("no window".into()))
}

fn acquire_canvas(canvas_id: &str) -> Result<web_sys::HtmlCanvasElement, PipelineError> {
    let document = window()?
        .document()
        .ok_or_else(|| PipelineError::ContextUnavailable("no document".into()))?;
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| {
            PipelineError::ContextUnavailable(format!("no element with id {canvas_id:?}"))
        })?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| {
            PipelineError::ContextUnavailable(format!("element {canvas_id:?} is not a canvas"))
        })
}

fn acquire_context(canvas: &web_sys::HtmlCanvasElement) -> Result<GlContext, PipelineError> {
    let raw = canvas
        .get_context("webgl2")
        .map_err(|_| PipelineError::ContextUnavailable("webgl2 context request failed".into()))?
        .ok_or_else(|| PipelineError::ContextUnavailable("webgl2 not supported".into()))?
        .dyn_into::<web_sys::WebGl2RenderingContext>()
        .map_err(|_| {
            PipelineError::ContextUnavailable("webgl2 context has unexpected type".into())
        })?;
    GlContext::new(glow::Context::from_webgl2_context(raw))
}

/// Sizes the GL viewport to the canvas backing store.
#[allow(unsafe_code)]
fn set_viewport(gl: &glow::Context, width: i32, height: i32) {
    use glow::HasContext;

    // SAFETY: setting the viewport rectangle has no preconditions.
    unsafe { gl.viewport(0, 0, width, height) };
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<(), PipelineError> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map(|_| ())
        .map_err(|_| PipelineError::ContextUnavailable("requestAnimationFrame failed".into()))
}

/// Drives `frame` from a self-rescheduling animation-frame closure.
///
/// The closure owns itself through the usual `Rc<RefCell<Option<..>>>`
/// cycle, which keeps it alive for the page's lifetime. A failed frame
/// alerts the error and does not reschedule; the last rendered frame
/// stays on screen.
fn spawn_frame_loop<F>(mut frame: F) -> Result<(), PipelineError>
where
    F: FnMut() -> Result<(), PipelineError> + 'static,
{
    let holder: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let reschedule = holder.clone();

    *holder.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        match frame() {
            Ok(()) => {
                if let Some(callback) = reschedule.borrow().as_ref() {
                    if let Err(error) = request_frame(callback) {
                        alert(&error.to_string());
                    }
                }
            }
            Err(error) => alert(&error.to_string()),
        }
    }) as Box<dyn FnMut()>));

    let first = holder.borrow();
    let callback = first
        .as_ref()
        .ok_or_else(|| PipelineError::ContextUnavailable("frame closure missing".into()))?;
    request_frame(callback)
}
