//! Player preferences
//!
//! Persisted separately from the session (which is never saved) in
//! LocalStorage.

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Background music on/off
    pub music_enabled: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no bounces or squash in the renderer)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            music_enabled: true,
            mute_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective sound effect gain, clamped to [0, 1]
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective music gain; zero when music is off
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether character bounces/squashes should be drawn
    pub fn animate_characters(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse stored JSON, falling back to defaults when it is unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "boba_shop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings are not persisted on native ({})", Self::STORAGE_KEY);
    }
}
