//! Game settings and preferences
//!
//! Persisted separately from session state in LocalStorage. Session state
//! itself is memory-only by design; these are the only bytes that outlive a
//! page load.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "chihuahua-rush-settings";

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Day or night scene lighting (cosmetic, consumed by the renderer)
    pub day_time: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize flashes and cut-in pops)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            day_time: true,
            show_fps: false,
            master_volume: 0.8,
            mute_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Load from LocalStorage; any failure falls back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
        match stored {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("settings corrupt, using defaults: {err}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Persist to LocalStorage; best-effort
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        else {
            return;
        };
        if let Ok(json) = serde_json::to_string(self) {
            if storage.set_item(STORAGE_KEY, &json).is_err() {
                log::warn!("failed to persist settings");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
