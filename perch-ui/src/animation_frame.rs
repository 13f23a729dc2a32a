//! `requestAnimationFrame` scheduler for deferred portal appends

use perch_common::frame::FrameCallback;
use perch_common::FrameScheduler;
use tracing::warn;
use wasm_bindgen_x::closure::Closure;
use wasm_bindgen_x::JsCast;

#[derive(Clone, Debug)]
pub struct AnimationFrameScheduler {
    window: web_sys_x::Window,
}

impl AnimationFrameScheduler {
    pub fn new(window: web_sys_x::Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        // One-shot closure; the JS side frees it after the call.
        let frame = Closure::once_into_js(move |_timestamp: f64| callback());
        if let Err(e) = self.window.request_animation_frame(frame.unchecked_ref()) {
            warn!("requestAnimationFrame failed: {e:?}");
        }
    }
}
