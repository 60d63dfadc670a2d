//! Errors surfaced by a clock
//!
//! Nothing is translated: a failing platform call is wrapped with its own
//! message and handed back to the caller.

/// Timing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimingError {
    /// No global `window` to schedule on.
    #[error("No global window available")]
    NoWindow,

    /// The platform call threw.
    #[error("Platform timing call failed: {0}")]
    Platform(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for TimingError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Platform(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, TimingError>;
