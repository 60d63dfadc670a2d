//! Browser clock backed by `window`
//!
//! Straight pass-through to `requestAnimationFrame`, `cancelAnimationFrame`,
//! `setTimeout` and `clearTimeout`. Callbacks become one-shot JS functions
//! via `Closure::once_into_js`, which wasm-bindgen frees after the call. A
//! cancelled callback is never called, so its wrapper is left to the JS GC.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::clock::{Clock, FrameCallback, TimerCallback};
use crate::error::{Result, TimingError};
use crate::handle::{FrameHandle, TimerHandle};

pub struct BrowserClock {
    window: web_sys::Window,
}

impl BrowserClock {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(TimingError::NoWindow)?;
        Ok(Self { window })
    }
}

impl Clock for BrowserClock {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle> {
        let function = Closure::once_into_js(move |time: f64| callback(time));
        let id = self
            .window
            .request_animation_frame(function.unchecked_ref())?;
        Ok(FrameHandle::from_raw(id))
    }

    fn cancel_frame(&self, handle: FrameHandle) -> Result<()> {
        self.window.cancel_animation_frame(handle.raw())?;
        Ok(())
    }

    fn set_timeout(&self, callback: TimerCallback, ms: i32) -> Result<TimerHandle> {
        let function = Closure::once_into_js(move || callback());
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(function.unchecked_ref(), ms)?;
        Ok(TimerHandle::from_raw(id))
    }

    fn clear_timeout(&self, handle: TimerHandle) -> Result<()> {
        self.window.clear_timeout_with_handle(handle.raw());
        Ok(())
    }
}
