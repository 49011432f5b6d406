//! Camera values exchanged between the controller and the map surface.

use geo::Point;
use serde::{Deserialize, Serialize};

/// What the map is showing: a center (x = lng, y = lat) and a zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub center: Point,
    pub zoom: f64,
}

impl CameraState {
    pub fn new(lat: f64, lng: f64, zoom: f64) -> Self {
        Self {
            center: Point::new(lng, lat),
            zoom,
        }
    }

    pub fn lat(&self) -> f64 {
        self.center.y()
    }

    pub fn lng(&self) -> f64 {
        self.center.x()
    }
}

/// A requested camera destination. A missing zoom falls back to the station
/// focus level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTarget {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub zoom: Option<f64>,
}

impl ViewTarget {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            zoom: None,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
            && self.zoom.is_none_or(f64::is_finite)
    }
}

/// One command sent to the map surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    /// Animated transition
    FlyTo {
        camera: CameraState,
        duration_secs: f64,
    },
    /// Immediate jump
    SetView { camera: CameraState },
}

impl CameraCommand {
    pub fn camera(&self) -> CameraState {
        match self {
            CameraCommand::FlyTo { camera, .. } | CameraCommand::SetView { camera } => *camera,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_target_validation() {
        assert!(ViewTarget::new(51.5, -0.1).is_valid());
        assert!(ViewTarget::new(51.5, -0.1).with_zoom(12.0).is_valid());
        assert!(!ViewTarget::new(f64::NAN, -0.1).is_valid());
        assert!(!ViewTarget::new(91.0, -0.1).is_valid());
        assert!(!ViewTarget::new(51.5, -0.1).with_zoom(f64::INFINITY).is_valid());
    }

    #[test]
    fn view_target_deserializes_without_zoom() {
        let target: ViewTarget = serde_json::from_str(r#"{ "lat": 53.5, "lng": -2.2 }"#).unwrap();
        assert_eq!(target, ViewTarget::new(53.5, -2.2));
    }

    #[test]
    fn command_exposes_camera() {
        let camera = CameraState::new(54.5, -2.5, 6.0);
        let command = CameraCommand::FlyTo {
            camera,
            duration_secs: 1.5,
        };
        assert_eq!(command.camera(), camera);
        assert_eq!(camera.lat(), 54.5);
        assert_eq!(camera.lng(), -2.5);
    }
}
