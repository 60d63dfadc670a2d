//! Frame Timers - browser timing primitives for a host update loop
//!
//! Core modules:
//! - `binding`: the four operations (frame request/cancel, timeout/cancel)
//! - `clock`: the platform capability the binding forwards to
//! - `platform`: browser clock, JS exports, deterministic manual clock
//! - `config`: persisted tunables
//! - `handle`, `error`: opaque handles and the error type

pub mod binding;
pub mod clock;
pub mod config;
pub mod error;
pub mod handle;
pub mod platform;

pub use binding::Timing;
pub use clock::{Clock, FrameCallback, TimerCallback};
pub use config::TimingConfig;
pub use error::{Result, TimingError};
pub use handle::{FrameHandle, TimerHandle};
pub use platform::ManualClock;
#[cfg(target_arch = "wasm32")]
pub use platform::BrowserClock;
