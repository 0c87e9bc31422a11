use roost_engine::FrameRequester;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Per-frame callback handed to the browser; the argument is the
/// `requestAnimationFrame` timestamp (unused by the timeout fallback).
pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// Frames via `window.requestAnimationFrame`.
pub struct AnimationFrames {
    window: Window,
    callback: FrameCallback,
}

impl AnimationFrames {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameRequester for AnimationFrames {
    fn request_frame(&mut self) {
        if let Err(err) = self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            log::error!("requestAnimationFrame failed: {:?}", err);
        }
    }
}

/// Fixed-interval frames via `setTimeout`, for hosts without
/// `requestAnimationFrame`.
pub struct TimeoutFrames {
    window: Window,
    callback: FrameCallback,
    interval_ms: i32,
}

impl TimeoutFrames {
    pub fn new(window: Window, callback: FrameCallback, interval_ms: f64) -> Self {
        Self {
            window,
            callback,
            interval_ms: interval_ms.round().max(0.0) as i32,
        }
    }
}

impl FrameRequester for TimeoutFrames {
    fn request_frame(&mut self) {
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                self.interval_ms,
            )
        {
            log::error!("setTimeout failed: {:?}", err);
        }
    }
}

/// `requestAnimationFrame` when the window has it, otherwise `setTimeout`
/// every `interval_ms`.
pub fn for_window(window: Window, callback: FrameCallback, interval_ms: f64) -> Box<dyn FrameRequester> {
    let has_raf = js_sys::Reflect::has(&window, &JsValue::from_str("requestAnimationFrame")).unwrap_or(false);
    if has_raf {
        Box::new(AnimationFrames::new(window, callback))
    } else {
        log::info!("requestAnimationFrame unavailable, falling back to setTimeout");
        Box::new(TimeoutFrames::new(window, callback, interval_ms))
    }
}
