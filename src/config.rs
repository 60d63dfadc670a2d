//! Binding configuration
//!
//! Read from LocalStorage on the web, defaults everywhere else.

use serde::{Deserialize, Serialize};

/// Tunables for [`Timing`](crate::Timing)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Log every forwarded call at debug level
    pub log_calls: bool,
}

impl TimingConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "frame_timers_config";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded timing config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring malformed timing config: {}", e),
                }
            }
        }

        log::debug!("Using default timing config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
