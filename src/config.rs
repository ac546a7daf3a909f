use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "ViewerConfig::default_fov_degrees")]
    pub fov_y_degrees: f32,
    #[serde(default = "ViewerConfig::default_fov_min_degrees")]
    pub fov_min_degrees: f32,
    #[serde(default = "ViewerConfig::default_fov_max_degrees")]
    pub fov_max_degrees: f32,
    #[serde(default = "ViewerConfig::default_look_sensitivity")]
    pub look_sensitivity: f32,
    #[serde(default = "ViewerConfig::default_loading_fallback_secs")]
    pub loading_fallback_secs: f32,
    #[serde(default = "ViewerConfig::default_marker_emphasis_scale")]
    pub marker_emphasis_scale: f32,
    #[serde(default = "ViewerConfig::default_marker_pulse_hz")]
    pub marker_pulse_hz: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: Self::default_fov_degrees(),
            fov_min_degrees: Self::default_fov_min_degrees(),
            fov_max_degrees: Self::default_fov_max_degrees(),
            look_sensitivity: Self::default_look_sensitivity(),
            loading_fallback_secs: Self::default_loading_fallback_secs(),
            marker_emphasis_scale: Self::default_marker_emphasis_scale(),
            marker_pulse_hz: Self::default_marker_pulse_hz(),
        }
    }
}

impl ViewerConfig {
    const fn default_fov_degrees() -> f32 {
        75.0
    }

    const fn default_fov_min_degrees() -> f32 {
        30.0
    }

    const fn default_fov_max_degrees() -> f32 {
        110.0
    }

    // Radians of yaw per pixel of pointer travel.
    const fn default_look_sensitivity() -> f32 {
        0.003
    }

    /// Escape hatch, not a correctness guarantee: forces the loading
    /// indicator to clear when no completion event ever arrives.
    const fn default_loading_fallback_secs() -> f32 {
        10.0
    }

    const fn default_marker_emphasis_scale() -> f32 {
        1.35
    }

    const fn default_marker_pulse_hz() -> f32 {
        1.6
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_path(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("[config] Failed to load {}: {err:#}. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Clamps fields into usable ranges, warning when a value was out of
    /// bounds.
    pub fn sanitized(mut self) -> Self {
        if self.fov_min_degrees >= self.fov_max_degrees {
            eprintln!(
                "[config] fov bounds reversed ({} >= {}), using defaults.",
                self.fov_min_degrees, self.fov_max_degrees
            );
            self.fov_min_degrees = Self::default_fov_min_degrees();
            self.fov_max_degrees = Self::default_fov_max_degrees();
        }
        self.fov_y_degrees = self.fov_y_degrees.clamp(self.fov_min_degrees, self.fov_max_degrees);
        if self.loading_fallback_secs <= 0.0 {
            self.loading_fallback_secs = Self::default_loading_fallback_secs();
        }
        self.look_sensitivity = self.look_sensitivity.clamp(0.0001, 0.1);
        self
    }

    pub fn fov_y_radians(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }

    pub fn fov_min_radians(&self) -> f32 {
        self.fov_min_degrees.to_radians()
    }

    pub fn fov_max_radians(&self) -> f32 {
        self.fov_max_degrees.to_radians()
    }
}
