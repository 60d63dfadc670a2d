//! JS-facing exports
//!
//! Same names and shapes a host update loop calls from JS: callbacks are
//! plain functions and handles are raw integers. Errors are thrown as JS
//! errors carrying the platform's message.

use wasm_bindgen::prelude::*;

use crate::binding::Timing;
use crate::config::TimingConfig;
use crate::error::TimingError;
use crate::handle::{FrameHandle, TimerHandle};
use crate::platform::BrowserClock;

thread_local! {
    static CONFIG: TimingConfig = TimingConfig::load();
}

impl From<TimingError> for JsValue {
    fn from(err: TimingError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn timing() -> Result<Timing<BrowserClock>, TimingError> {
    let config = CONFIG.with(|c| c.clone());
    Ok(Timing::with_config(BrowserClock::new()?, config))
}

/// Invoke a host callback; a throwing callback is logged, not re-thrown
fn call_host(f: &js_sys::Function, arg: JsValue) {
    if let Err(e) = f.call1(&JsValue::NULL, &arg) {
        log::error!("Host callback threw: {:?}", e);
    }
}

#[wasm_bindgen]
pub fn request_animation_frame(f: js_sys::Function) -> Result<i32, JsValue> {
    let handle = timing()?.request_animation_frame(move |time| call_host(&f, time.into()))?;
    Ok(handle.raw())
}

#[wasm_bindgen]
pub fn cancel_animation_frame(id: i32) -> Result<(), JsValue> {
    timing()?.cancel_animation_frame(FrameHandle::from_raw(id))?;
    Ok(())
}

/// Schedule `f` after `ms`, then pass the timeout id to `dispatch_timeout_id`
/// on a separate timeout.
#[wasm_bindgen]
pub fn after(
    f: js_sys::Function,
    ms: i32,
    dispatch_timeout_id: js_sys::Function,
) -> Result<(), JsValue> {
    timing()?.after(
        move || call_host(&f, JsValue::UNDEFINED),
        ms,
        move |handle| call_host(&dispatch_timeout_id, handle.raw().into()),
    )?;
    Ok(())
}

#[wasm_bindgen]
pub fn cancel(timeout_id: i32) -> Result<(), JsValue> {
    timing()?.cancel(TimerHandle::from_raw(timeout_id))?;
    Ok(())
}
