//! The host timing capability
//!
//! Everything the binding needs from the platform, as a trait so it can run
//! against the browser or against [`ManualClock`](crate::platform::ManualClock).
//! Single-threaded: callbacks are not `Send` and every method takes `&self`.

use std::rc::Rc;

use crate::error::Result;
use crate::handle::{FrameHandle, TimerHandle};

/// Frame callback, receives the frame timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Timeout callback
pub type TimerCallback = Box<dyn FnOnce()>;

pub trait Clock {
    /// Run `callback` before the next repaint.
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle>;

    /// Drop a frame request. Stale handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle) -> Result<()>;

    /// Run `callback` once `ms` milliseconds have passed.
    fn set_timeout(&self, callback: TimerCallback, ms: i32) -> Result<TimerHandle>;

    /// Drop a timeout. Stale handles are ignored.
    fn clear_timeout(&self, handle: TimerHandle) -> Result<()>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle> {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> Result<()> {
        (**self).cancel_frame(handle)
    }

    fn set_timeout(&self, callback: TimerCallback, ms: i32) -> Result<TimerHandle> {
        (**self).set_timeout(callback, ms)
    }

    fn clear_timeout(&self, handle: TimerHandle) -> Result<()> {
        (**self).clear_timeout(handle)
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle> {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> Result<()> {
        (**self).cancel_frame(handle)
    }

    fn set_timeout(&self, callback: TimerCallback, ms: i32) -> Result<TimerHandle> {
        (**self).set_timeout(callback, ms)
    }

    fn clear_timeout(&self, handle: TimerHandle) -> Result<()> {
        (**self).clear_timeout(handle)
    }
}
