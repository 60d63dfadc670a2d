//! Platform clocks
//!
//! - `browser`: forwards to `window` (wasm32 only)
//! - `exports`: JS-callable wrappers over the browser clock (wasm32 only)
//! - `manual`: deterministic virtual clock for native runs and tests

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod exports;
pub mod manual;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserClock;
pub use manual::ManualClock;
