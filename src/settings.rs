//! Engine settings and user preferences
//!
//! Preferences (theme, compare-all, mode) persist in LocalStorage on the web.
//! Native builds read an optional JSON file named by
//! `TRAJECTORY_PLAYBACK_CONFIG`. Simulation results are never persisted.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DT, PALETTE, VELOCITY_SLIDER_MAX};
use crate::model::Mode;
use crate::render::SceneGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the simulation service
    pub endpoint: String,
    /// Timestep requested from the service (s)
    pub dt: f64,
    /// Upper bound of the velocity slider
    pub velocity_slider_max: f64,
    /// Trajectory colors, indexed modulo length
    pub palette: Vec<String>,
    /// Throw scene layout
    pub scene: SceneGeometry,

    // === Preferences ===
    pub dark_theme: bool,
    /// Show every angle in compare mode, not just the first
    pub compare_all: bool,
    pub mode: Mode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            dt: DEFAULT_DT,
            velocity_slider_max: VELOCITY_SLIDER_MAX,
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
            scene: SceneGeometry::default(),

            dark_theme: false,
            compare_all: false,
            mode: Mode::Compare,
        }
    }
}

impl Settings {
    /// Slider position mirroring a typed velocity
    pub fn slider_position(&self, velocity: Option<f64>) -> f64 {
        match velocity {
            Some(v) if v.is_finite() => v.clamp(0.0, self.velocity_slider_max),
            _ => 0.0,
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "trajectory_playback_settings";

    /// Environment variable naming a JSON settings file (native only)
    pub const CONFIG_ENV: &'static str = "TRAJECTORY_PLAYBACK_CONFIG";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
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

    /// Load settings from the file named by `TRAJECTORY_PLAYBACK_CONFIG`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::CONFIG_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed settings in {}: {}", path, err);
                Self::default()
            }),
            Err(err) => {
                log::warn!("Cannot read settings {}: {}", path, err);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // Preferences only persist in the browser
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(
            r#"{"endpoint": "https://sim.example", "dark_theme": true, "scene": {"ball_radius": 6.0}}"#,
        )
        .unwrap();
        assert_eq!(settings.endpoint, "https://sim.example");
        assert!(settings.dark_theme);
        assert_eq!(settings.scene.ball_radius, 6.0);
        assert_eq!(settings.scene.margin_x, 140.0);
        assert_eq!(settings.dt, DEFAULT_DT);
        assert_eq!(settings.palette.len(), 6);
    }

    #[test]
    fn test_slider_position_clamps() {
        let settings = Settings::default();
        assert_eq!(settings.slider_position(Some(42.0)), 42.0);
        assert_eq!(settings.slider_position(Some(250.0)), 100.0);
        assert_eq!(settings.slider_position(Some(-3.0)), 0.0);
        assert_eq!(settings.slider_position(None), 0.0);
    }
}
