//! Interface to the host map (camera animation, tiles, projection).
//!
//! The engine never draws tiles or animates the camera itself. It issues
//! commands to a [`MapSurface`] and draws markers onto a [`Canvas`] obtained
//! from it.

use glam::DVec2;

use crate::basemap::Basemap;
use crate::camera::{CameraCommand, CameraState};
use crate::style::MarkerStyle;
use crate::viewport::Viewport;

/// Camera notifications. Only the settled variants describe a viewport that
/// is safe to render against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    MoveStart,
    ZoomStart,
    MoveEnd,
    ZoomEnd,
    Resize,
}

impl SurfaceEvent {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SurfaceEvent::MoveEnd | SurfaceEvent::ZoomEnd | SurfaceEvent::Resize
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// A retained drawing layer on top of the basemap.
pub trait Canvas {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: DVec2, style: &MarkerStyle);
    /// Detach the layer from the map. Called exactly once.
    fn cleanup(self: Box<Self>);
}

pub trait MapSurface {
    /// Animated transition. Interrupts any transition already in flight.
    fn fly_to(&mut self, camera: CameraState, duration_secs: f64);
    fn set_view(&mut self, camera: CameraState);

    /// The current camera and container size
    fn viewport(&self) -> Viewport;
    /// Whether an animated transition is still in flight. While it is,
    /// [`MapSurface::viewport`] does not describe where the camera will rest.
    fn is_transitioning(&self) -> bool;

    fn create_canvas(&mut self) -> Box<dyn Canvas>;
    fn set_basemap(&mut self, basemap: Basemap);

    fn subscribe(&mut self) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
    /// Events delivered to `id` since the previous call, oldest first
    fn drain_events(&mut self, id: SubscriptionId) -> Vec<SurfaceEvent>;

    fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::FlyTo {
                camera,
                duration_secs,
            } => self.fly_to(camera, duration_secs),
            CameraCommand::SetView { camera } => self.set_view(camera),
        }
    }
}

/// Owns a canvas and guarantees it is cleaned up, whichever way the owner
/// lets go of it.
pub struct CanvasGuard {
    canvas: Option<Box<dyn Canvas>>,
}

impl CanvasGuard {
    pub fn acquire<S: MapSurface + ?Sized>(surface: &mut S) -> Self {
        Self {
            canvas: Some(surface.create_canvas()),
        }
    }

    pub fn canvas(&mut self) -> Option<&mut (dyn Canvas + 'static)> {
        self.canvas.as_deref_mut()
    }

    pub fn release(mut self) {
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            canvas.cleanup();
        }
    }
}

impl Drop for CanvasGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for CanvasGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasGuard")
            .field("live", &self.canvas.is_some())
            .finish()
    }
}
