//! Engine tuning knobs.
//!
//! Every field has a default matching the shipped map, so an empty JSON
//! object is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use crate::camera::CameraState;
use crate::error::ConfigError;
use crate::style::MarkerStyle;

/// Smallest culling margin; anything tighter makes markers pop in at the edges
pub const MIN_CULL_PADDING: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reset destination, `[lat, lng]`
    pub default_center: [f64; 2],
    pub default_zoom: f64,
    /// Zoom used for explicit targets that carry no zoom of their own
    pub station_focus_zoom: f64,
    pub train_focus_zoom: f64,
    pub fly_duration_secs: f64,

    /// Culling margin as a fraction of the container size on every side
    pub cull_padding: f64,
    pub pick_base_threshold_px: f64,
    pub pick_reference_zoom: f64,

    pub route_segments: usize,
    /// Fraction of the route span added around its bounding box
    pub route_bounds_padding: f64,

    pub station_marker: MarkerStyle,
    pub highlight_marker: MarkerStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_center: [54.5, -2.5],
            default_zoom: 6.0,
            station_focus_zoom: 14.0,
            train_focus_zoom: 15.0,
            fly_duration_secs: 1.5,
            cull_padding: 0.5,
            pick_base_threshold_px: 10.0,
            pick_reference_zoom: 10.0,
            route_segments: 12,
            route_bounds_padding: 0.1,
            station_marker: MarkerStyle::station(),
            highlight_marker: MarkerStyle::highlighted(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [lat, lng] = self.default_center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ConfigError::Invalid(format!(
                "default_center [{lat}, {lng}] is not a coordinate"
            )));
        }
        if self.cull_padding < MIN_CULL_PADDING {
            return Err(ConfigError::Invalid(format!(
                "cull_padding must be at least {MIN_CULL_PADDING}, got {}",
                self.cull_padding
            )));
        }
        if self.route_segments == 0 {
            return Err(ConfigError::Invalid("route_segments must be positive".into()));
        }
        if self.pick_base_threshold_px <= 0.0 || !self.fly_duration_secs.is_finite() {
            return Err(ConfigError::Invalid(
                "pick threshold and fly duration must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Where a reset sends the camera
    pub fn default_camera(&self) -> CameraState {
        let [lat, lng] = self.default_center;
        CameraState::new(lat, lng, self.default_zoom)
    }

    /// Hit radius in pixels at `zoom`: `base * 2^(reference - zoom)`
    pub fn pick_threshold_px(&self, zoom: f64) -> f64 {
        self.pick_base_threshold_px * 2f64.powf(self.pick_reference_zoom - zoom)
    }
}
