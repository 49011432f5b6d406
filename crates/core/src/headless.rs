//! In-memory [`MapSurface`] for tests and offline tooling.
//!
//! Transitions settle immediately unless the surface is built with
//! [`HeadlessSurface::animated`], in which case they stay in flight until
//! [`HeadlessSurface::finish_transition`] is called. Canvases record the
//! markers drawn on them so callers can inspect what a frame contained.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::DVec2;

use crate::basemap::Basemap;
use crate::camera::{CameraCommand, CameraState};
use crate::style::MarkerStyle;
use crate::surface::{Canvas, MapSurface, SubscriptionId, SurfaceEvent};
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnMarker {
    pub canvas: u64,
    pub center: DVec2,
    pub style: MarkerStyle,
}

struct Shared {
    camera: CameraState,
    size: DVec2,
    animate: bool,
    in_flight: Option<CameraState>,
    commands: Vec<CameraCommand>,
    basemap: Basemap,

    subscribers: BTreeMap<SubscriptionId, Vec<SurfaceEvent>>,
    next_subscription: u64,

    canvases: BTreeMap<u64, Vec<DrawnMarker>>,
    canvases_created: u64,
}

impl Shared {
    fn emit(&mut self, events: &[SurfaceEvent]) {
        for queue in self.subscribers.values_mut() {
            queue.extend_from_slice(events);
        }
    }

    fn begin(&mut self, camera: CameraState) {
        if camera.zoom != self.camera.zoom {
            self.emit(&[SurfaceEvent::MoveStart, SurfaceEvent::ZoomStart]);
        } else {
            self.emit(&[SurfaceEvent::MoveStart]);
        }
    }

    fn settle(&mut self, camera: CameraState) {
        let zoomed = camera.zoom != self.camera.zoom;
        self.camera = camera;
        self.in_flight = None;
        if zoomed {
            self.emit(&[SurfaceEvent::ZoomEnd, SurfaceEvent::MoveEnd]);
        } else {
            self.emit(&[SurfaceEvent::MoveEnd]);
        }
    }
}

/// Cheap to clone; clones share the same map.
#[derive(Clone)]
pub struct HeadlessSurface {
    shared: Rc<RefCell<Shared>>,
}

impl HeadlessSurface {
    pub fn new(camera: CameraState, size: DVec2) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                camera,
                size,
                animate: false,
                in_flight: None,
                commands: Vec::new(),
                basemap: Basemap::default(),
                subscribers: BTreeMap::new(),
                next_subscription: 0,
                canvases: BTreeMap::new(),
                canvases_created: 0,
            })),
        }
    }

    /// Keep fly-to transitions in flight until explicitly finished
    pub fn animated(self) -> Self {
        self.shared.borrow_mut().animate = true;
        self
    }

    pub fn camera(&self) -> CameraState {
        self.shared.borrow().camera
    }

    /// Complete the in-flight transition, if any
    pub fn finish_transition(&self) -> bool {
        let mut shared = self.shared.borrow_mut();
        match shared.in_flight.take() {
            Some(camera) => {
                shared.settle(camera);
                true
            }
            None => false,
        }
    }

    /// Simulate a user drag or scroll that ends at `camera`
    pub fn pan_to(&self, camera: CameraState) {
        let mut shared = self.shared.borrow_mut();
        shared.begin(camera);
        shared.settle(camera);
    }

    pub fn resize(&self, size: DVec2) {
        let mut shared = self.shared.borrow_mut();
        shared.size = size;
        shared.emit(&[SurfaceEvent::Resize]);
    }

    /// Camera commands received so far, oldest first
    pub fn commands(&self) -> Vec<CameraCommand> {
        self.shared.borrow().commands.clone()
    }

    pub fn basemap(&self) -> Basemap {
        self.shared.borrow().basemap
    }

    /// Canvases created and not yet cleaned up
    pub fn active_canvases(&self) -> usize {
        self.shared.borrow().canvases.len()
    }

    pub fn canvases_created(&self) -> u64 {
        self.shared.borrow().canvases_created
    }

    /// Every marker currently drawn on any live canvas
    pub fn markers(&self) -> Vec<DrawnMarker> {
        self.shared
            .borrow()
            .canvases
            .values()
            .flatten()
            .copied()
            .collect()
    }
}

impl MapSurface for HeadlessSurface {
    fn fly_to(&mut self, camera: CameraState, duration_secs: f64) {
        let mut shared = self.shared.borrow_mut();
        shared.commands.push(CameraCommand::FlyTo {
            camera,
            duration_secs,
        });
        shared.begin(camera);
        if shared.animate {
            // replaces whatever was in flight
            shared.in_flight = Some(camera);
        } else {
            shared.settle(camera);
        }
    }

    fn set_view(&mut self, camera: CameraState) {
        let mut shared = self.shared.borrow_mut();
        shared.commands.push(CameraCommand::SetView { camera });
        shared.begin(camera);
        shared.settle(camera);
    }

    fn viewport(&self) -> Viewport {
        let shared = self.shared.borrow();
        Viewport::new(shared.camera, shared.size)
    }

    fn is_transitioning(&self) -> bool {
        self.shared.borrow().in_flight.is_some()
    }

    fn create_canvas(&mut self) -> Box<dyn Canvas> {
        let mut shared = self.shared.borrow_mut();
        let id = shared.canvases_created;
        shared.canvases_created += 1;
        shared.canvases.insert(id, Vec::new());
        Box::new(HeadlessCanvas {
            id,
            shared: Rc::clone(&self.shared),
        })
    }

    fn set_basemap(&mut self, basemap: Basemap) {
        self.shared.borrow_mut().basemap = basemap;
    }

    fn subscribe(&mut self) -> SubscriptionId {
        let mut shared = self.shared.borrow_mut();
        let id = SubscriptionId(shared.next_subscription);
        shared.next_subscription += 1;
        shared.subscribers.insert(id, Vec::new());
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.shared.borrow_mut().subscribers.remove(&id);
    }

    fn drain_events(&mut self, id: SubscriptionId) -> Vec<SurfaceEvent> {
        self.shared
            .borrow_mut()
            .subscribers
            .get_mut(&id)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

struct HeadlessCanvas {
    id: u64,
    shared: Rc<RefCell<Shared>>,
}

impl Canvas for HeadlessCanvas {
    fn clear(&mut self) {
        if let Some(markers) = self.shared.borrow_mut().canvases.get_mut(&self.id) {
            markers.clear();
        }
    }

    fn fill_circle(&mut self, center: DVec2, style: &MarkerStyle) {
        let id = self.id;
        if let Some(markers) = self.shared.borrow_mut().canvases.get_mut(&id) {
            markers.push(DrawnMarker {
                canvas: id,
                center,
                style: *style,
            });
        }
    }

    fn cleanup(self: Box<Self>) {
        self.shared.borrow_mut().canvases.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CanvasGuard;

    fn surface() -> HeadlessSurface {
        HeadlessSurface::new(CameraState::new(54.5, -2.5, 6.0), DVec2::new(800.0, 600.0))
    }

    #[test]
    fn fly_to_settles_immediately_by_default() {
        let mut surface = surface();
        let id = surface.subscribe();
        let target = CameraState::new(51.5, -0.1, 14.0);

        surface.fly_to(target, 1.5);

        assert_eq!(surface.camera(), target);
        assert_eq!(
            surface.drain_events(id),
            vec![
                SurfaceEvent::MoveStart,
                SurfaceEvent::ZoomStart,
                SurfaceEvent::ZoomEnd,
                SurfaceEvent::MoveEnd
            ]
        );
        assert!(surface.drain_events(id).is_empty());
    }

    #[test]
    fn animated_fly_to_is_interrupted_by_the_next_one() {
        let mut surface = surface().animated();
        let id = surface.subscribe();
        let first = CameraState::new(51.5, -0.1, 14.0);
        let second = CameraState::new(53.5, -2.2, 12.0);

        surface.fly_to(first, 1.5);
        surface.fly_to(second, 1.5);
        assert!(surface.is_transitioning());
        assert!(surface.drain_events(id).iter().all(|e| !e.is_settled()));

        assert!(surface.finish_transition());
        assert_eq!(surface.camera(), second);
        assert!(surface.drain_events(id).contains(&SurfaceEvent::MoveEnd));
        assert!(!surface.finish_transition());
    }

    #[test]
    fn unsubscribed_ids_receive_nothing() {
        let mut surface = surface();
        let id = surface.subscribe();
        surface.unsubscribe(id);
        surface.pan_to(CameraState::new(52.0, -1.0, 6.0));
        assert!(surface.drain_events(id).is_empty());
    }

    #[test]
    fn guard_cleans_up_on_drop() {
        let mut surface = surface();
        {
            let mut guard = CanvasGuard::acquire(&mut surface);
            let canvas = guard.canvas().unwrap();
            canvas.fill_circle(DVec2::new(1.0, 2.0), &MarkerStyle::station());
            assert_eq!(surface.markers().len(), 1);
            assert_eq!(surface.active_canvases(), 1);
        }
        assert_eq!(surface.active_canvases(), 0);
        assert!(surface.markers().is_empty());

        let guard = CanvasGuard::acquire(&mut surface);
        guard.release();
        assert_eq!(surface.active_canvases(), 0);
        assert_eq!(surface.canvases_created(), 2);
    }
}
