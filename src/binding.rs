//! The four timing operations exposed to a host update loop
//!
//! Each call forwards straight to the wrapped [`Clock`]. The only shaping
//! done here is in [`Timing::after`], which hands the timer handle to a
//! receiver on a later turn instead of returning it.

use crate::clock::Clock;
use crate::config::TimingConfig;
use crate::error::Result;
use crate::handle::{FrameHandle, TimerHandle};

/// Timing binding over a clock
pub struct Timing<C: Clock> {
    clock: C,
    config: TimingConfig,
}

impl<C: Clock> Timing<C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, TimingConfig::default())
    }

    pub fn with_config(clock: C, config: TimingConfig) -> Self {
        Self { clock, config }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run `f` before the next repaint. `f` gets the frame timestamp in ms.
    pub fn request_animation_frame(&self, f: impl FnOnce(f64) + 'static) -> Result<FrameHandle> {
        let handle = self.clock.request_frame(Box::new(f))?;
        if self.config.log_calls {
            log::debug!("requestAnimationFrame -> {:?}", handle);
        }
        Ok(handle)
    }

    /// No-op if the frame already ran or was cancelled.
    pub fn cancel_animation_frame(&self, handle: FrameHandle) -> Result<()> {
        if self.config.log_calls {
            log::debug!("cancelAnimationFrame({:?})", handle);
        }
        self.clock.cancel_frame(handle)
    }

    /// Run `f` after `ms` milliseconds, then deliver its handle to `dispatch`
    /// from a separate timeout.
    ///
    /// `dispatch` runs exactly once, never before this call returns. With a
    /// zero delay `f` runs before the handle is delivered, since it was
    /// queued first.
    pub fn after(
        &self,
        f: impl FnOnce() + 'static,
        ms: i32,
        dispatch: impl FnOnce(TimerHandle) + 'static,
    ) -> Result<()> {
        let handle = self.clock.set_timeout(Box::new(f), ms)?;
        if self.config.log_calls {
            log::debug!("setTimeout({}ms) -> {:?}", ms, handle);
        }
        self.clock
            .set_timeout(Box::new(move || dispatch(handle)), 0)?;
        Ok(())
    }

    /// No-op if the timer already fired or was cancelled.
    pub fn cancel(&self, handle: TimerHandle) -> Result<()> {
        if self.config.log_calls {
            log::debug!("clearTimeout({:?})", handle);
        }
        self.clock.clear_timeout(handle)
    }
}

#[cfg(target_arch = "wasm32")]
impl Timing<crate::platform::BrowserClock> {
    /// Binding over the global `window`, configured from LocalStorage
    pub fn browser() -> Result<Self> {
        let clock = crate::platform::BrowserClock::new()?;
        Ok(Self::with_config(clock, TimingConfig::load()))
    }
}
