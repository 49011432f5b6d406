//! Settled view of the map and its Web Mercator projection.
//!
//! Screen coordinates are pixels from the top-left corner of the map
//! container, matching the conventions of 256px raster tile maps.

use std::f64::consts::PI;

use geo::{Point, Rect, coord};
use glam::DVec2;

use crate::camera::CameraState;

pub const TILE_SIZE: f64 = 256.0;
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Camera plus container size. Read-only input for culling and hit tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub camera: CameraState,
    /// Container size in pixels
    pub size: DVec2,
}

impl Viewport {
    pub fn new(camera: CameraState, size: DVec2) -> Self {
        Self { camera, size }
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    /// Geographic point to screen pixel
    pub fn project(&self, location: Point) -> DVec2 {
        let zoom = self.camera.zoom;
        world_pixel(location, zoom) - world_pixel(self.camera.center, zoom) + self.size / 2.0
    }

    /// Screen pixel to geographic point
    pub fn unproject(&self, screen: DVec2) -> Point {
        let zoom = self.camera.zoom;
        from_world_pixel(screen - self.size / 2.0 + world_pixel(self.camera.center, zoom), zoom)
    }

    /// Visible region (x = lng, y = lat)
    pub fn bounds(&self) -> Rect {
        self.padded_bounds(0.0)
    }

    /// Visible region grown by `ratio` of the container size on every side
    pub fn padded_bounds(&self, ratio: f64) -> Rect {
        let pad = self.size * ratio;
        let north_west = self.unproject(-pad);
        let south_east = self.unproject(self.size + pad);
        Rect::new(
            coord! { x: north_west.x(), y: north_west.y() },
            coord! { x: south_east.x(), y: south_east.y() },
        )
    }

    pub fn contains_screen(&self, screen: DVec2) -> bool {
        screen.cmpge(DVec2::ZERO).all() && screen.cmple(self.size).all()
    }
}

/// Camera that shows all of `bounds` inside a container of `size` pixels,
/// capped at `max_zoom`.
pub fn fit_bounds(bounds: Rect, size: DVec2, max_zoom: f64) -> CameraState {
    let min = Point::new(bounds.min().x, bounds.max().y);
    let max = Point::new(bounds.max().x, bounds.min().y);
    let (top_left, bottom_right) = (world_pixel(min, 0.0), world_pixel(max, 0.0));
    let span = (bottom_right - top_left).abs();

    let fit = |available: f64, needed: f64| {
        if needed <= f64::EPSILON {
            max_zoom
        } else {
            (available / needed).log2()
        }
    };
    let zoom = fit(size.x, span.x).min(fit(size.y, span.y)).min(max_zoom).max(0.0);

    // midpoint in projected space, not in degrees
    CameraState {
        center: from_world_pixel((top_left + bottom_right) / 2.0, 0.0),
        zoom,
    }
}

fn world_pixel(location: Point, zoom: f64) -> DVec2 {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lat = location.y().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (location.x() + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    DVec2::new(x, y) * scale
}

fn from_world_pixel(pixel: DVec2, zoom: f64) -> Point {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let normalized = pixel / scale;
    let lng = normalized.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * normalized.y)).sinh().atan().to_degrees();
    Point::new(lng, lat)
}
