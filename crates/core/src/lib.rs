//! # railmap-core
//!
//! Geospatial engine for the national rail map: camera arbitration, station
//! marker rendering and hit testing, and approximate journey routes, all
//! driven against a host-provided [`MapSurface`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use geo::Point;
//! use glam::DVec2;
//! use railmap_core::prelude::*;
//!
//! let euston = Station {
//!     code: StationIdentifier::new("EUSTON"),
//!     name: "London Euston".into(),
//!     location: Some(Point::new(-0.1337, 51.5282)),
//!     details: StationDetails::default(),
//! };
//! let stations = Arc::new(StationIndex::from_stations(vec![euston]));
//!
//! let surface = HeadlessSurface::new(CameraState::new(0.0, 0.0, 2.0), DVec2::new(800.0, 600.0));
//! let mut engine = MapEngine::new(surface.clone(), stations, EngineConfig::default());
//! assert_eq!(surface.markers().len(), 1);
//!
//! engine.request_explicit_target(ViewTarget::new(51.5282, -0.1337));
//! engine.pump();
//! assert_eq!(surface.camera().zoom, 14.0);
//! ```

pub mod basemap;
pub mod camera;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod headless;
pub mod layer;
pub mod route;
pub mod style;
pub mod surface;
pub mod ticket;
pub mod viewport;

// Re-export the data crates
pub use railmap_api as api;
pub use railmap_transit as transit;

pub use engine::{LookupOutcome, MapEngine};
pub use surface::MapSurface;

pub mod prelude {
    pub use crate::basemap::Basemap;
    pub use crate::camera::{CameraCommand, CameraState, ViewTarget};
    pub use crate::config::EngineConfig;
    pub use crate::controller::{Channel, ControllerState, ViewportController};
    pub use crate::engine::{LookupOutcome, MapEngine};
    pub use crate::error::{ConfigError, UserNotice};
    pub use crate::headless::{DrawnMarker, HeadlessSurface};
    pub use crate::layer::{LayerMode, RenderStats, StationPointLayer};
    pub use crate::route::{RouteBuilder, RoutePath, Stop, StopRole};
    pub use crate::style::MarkerStyle;
    pub use crate::surface::{Canvas, CanvasGuard, MapSurface, SubscriptionId, SurfaceEvent};
    pub use crate::ticket::{Ticket, Tickets};
    pub use crate::viewport::{Viewport, fit_bounds};
    pub use railmap_api::{Journey, StationLocation, TrainApi};
    pub use railmap_transit::prelude::*;
}
