//! Session configuration (timings, camera path, streaming). Loaded from starlight.ron at startup.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Scene settings. Loaded from `starlight.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File the click flag, total and star list are stored in.
    #[serde(default = "default_save_path")]
    pub save_path: String,
    /// Stars exposed to the render buffer per frame.
    #[serde(default = "default_batch_size")]
    pub stream_batch_size: usize,
    /// Delay before the camera starts flying in.
    #[serde(default = "default_flight_delay_ms")]
    pub flight_delay_ms: u64,
    /// Length of the camera flight.
    #[serde(default = "default_flight_duration_ms")]
    pub flight_duration_ms: u64,
    /// Delay between the flight finishing and the interaction being shown.
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    /// Camera position when the flight starts.
    #[serde(default = "default_camera_start")]
    pub camera_start: [f32; 3],
    /// Camera position when the flight ends.
    #[serde(default = "default_camera_end")]
    pub camera_end: [f32; 3],
    /// Planet spin in radians per second.
    #[serde(default = "default_planet_rotation_rate")]
    pub planet_rotation_rate: f32,
}

fn default_save_path() -> String {
    "starlight_save.ron".to_string()
}
fn default_batch_size() -> usize {
    renderer::DEFAULT_BATCH_SIZE
}
fn default_flight_delay_ms() -> u64 {
    1000
}
fn default_flight_duration_ms() -> u64 {
    6000
}
fn default_reveal_delay_ms() -> u64 {
    100
}
fn default_camera_start() -> [f32; 3] {
    [0.0, 300.0, 2200.0]
}
fn default_camera_end() -> [f32; 3] {
    [0.0, 0.0, 12.0]
}
fn default_planet_rotation_rate() -> f32 {
    0.05
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            stream_batch_size: default_batch_size(),
            flight_delay_ms: default_flight_delay_ms(),
            flight_duration_ms: default_flight_duration_ms(),
            reveal_delay_ms: default_reveal_delay_ms(),
            camera_start: default_camera_start(),
            camera_end: default_camera_end(),
            planet_rotation_rate: default_planet_rotation_rate(),
        }
    }
}

impl SessionConfig {
    /// Load config from `starlight.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn flight_delay(&self) -> Duration {
        Duration::from_millis(self.flight_delay_ms)
    }

    pub fn flight_duration(&self) -> Duration {
        Duration::from_millis(self.flight_duration_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn camera_start(&self) -> Vec3 {
        Vec3::from_array(self.camera_start)
    }

    pub fn camera_end(&self) -> Vec3 {
        Vec3::from_array(self.camera_end)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("starlight.ron")
}
