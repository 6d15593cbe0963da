//! Player preferences
//!
//! Kept apart from [`crate::tuning::Tuning`]: settings never change how the
//! simulation plays out, only how it sounds and what debug output is drawn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Preferences applied by the host loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Silence everything
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Debug ===
    /// Draw actor footprints over the scene
    pub debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 1.0,
            music_volume: 1.0,
            sfx_volume: 1.0,
            debug_overlay: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "debug_overlay": true, "sfx_volume": 3.0 }"#).unwrap();
        assert!(settings.debug_overlay);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.music_volume, 1.0);
        assert!(!settings.muted);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert!(!settings.debug_overlay);
    }
}
