//! Station markers drawn onto a single retained canvas, plus hit testing.
//!
//! The layer never iterates the full station set while drawing: candidates
//! come from an envelope query over the padded viewport, so a redraw costs
//! in proportion to what is near the screen. It redraws only on settled
//! surface events, never while a camera transition is in flight.

use std::sync::Arc;

use geo::{Intersects, Rect};
use glam::DVec2;
use railmap_transit::{Station, StationIdentifier, StationLookup};

use crate::config::EngineConfig;
use crate::surface::{CanvasGuard, MapSurface, SubscriptionId};
use crate::viewport::Viewport;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LayerMode {
    #[default]
    AllStations,
    /// Only this station, in the highlight style
    Highlighted(StationIdentifier),
    Hidden,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Stations inside the padded viewport
    pub candidates: usize,
    pub drawn: usize,
    /// Nothing was drawn because the camera was still moving; the frame
    /// follows on the next settled event
    pub deferred: bool,
}

pub struct StationPointLayer {
    stations: Arc<dyn StationLookup>,
    config: Arc<EngineConfig>,
    mode: LayerMode,

    canvas: Option<CanvasGuard>,
    subscription: Option<SubscriptionId>,
}

impl StationPointLayer {
    pub fn new(stations: Arc<dyn StationLookup>, config: Arc<EngineConfig>) -> Self {
        Self {
            stations,
            config,
            mode: LayerMode::default(),
            canvas: None,
            subscription: None,
        }
    }

    pub fn mode(&self) -> &LayerMode {
        &self.mode
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to the surface and draw the first frame.
    pub fn attach<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> RenderStats {
        if self.subscription.is_none() {
            self.subscription = Some(surface.subscribe());
        }
        self.acquire(surface);
        self.draw_when_settled(surface)
    }

    /// Unsubscribe and dispose of the canvas.
    pub fn detach<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(id) = self.subscription.take() {
            surface.unsubscribe(id);
        }
        self.release();
    }

    /// Switch mode. The previous canvas is disposed of before the new one is
    /// created, so the two modes are never on screen together.
    pub fn set_mode<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        mode: LayerMode,
    ) -> RenderStats {
        if mode == self.mode {
            return RenderStats::default();
        }
        tracing::debug!(?mode, "station layer mode");
        self.mode = mode;
        self.release();

        if !self.is_attached() {
            return RenderStats::default();
        }
        self.acquire(surface);
        self.draw_when_settled(surface)
    }

    /// Redraw if the surface settled since the last call.
    pub fn pump<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> Option<RenderStats> {
        let id = self.subscription?;
        let settled = surface
            .drain_events(id)
            .iter()
            .any(|event| event.is_settled());
        settled.then(|| self.draw_when_settled(surface))
    }

    fn draw_when_settled<S: MapSurface + ?Sized>(&mut self, surface: &S) -> RenderStats {
        if surface.is_transitioning() {
            tracing::debug!("camera in flight, station layer redraw deferred");
            return RenderStats {
                deferred: true,
                ..RenderStats::default()
            };
        }
        self.render(&surface.viewport())
    }

    /// Clear the canvas and draw the stations visible in `viewport`.
    pub fn render(&mut self, viewport: &Viewport) -> RenderStats {
        let Some(canvas) = self.canvas.as_mut().and_then(|guard| guard.canvas()) else {
            return RenderStats::default();
        };

        let bounds = viewport.padded_bounds(self.config.cull_padding);
        let (candidates, style) = match &self.mode {
            LayerMode::AllStations => (
                self.stations.stations_in_bounds(bounds),
                &self.config.station_marker,
            ),
            LayerMode::Highlighted(code) => (
                self.stations
                    .mappable(code)
                    .filter(|(_, location)| bounds.intersects(location))
                    .map(|(station, _)| station)
                    .into_iter()
                    .collect(),
                &self.config.highlight_marker,
            ),
            LayerMode::Hidden => (Vec::new(), &self.config.station_marker),
        };

        canvas.clear();
        let mut drawn = 0;
        for location in candidates.iter().filter_map(|station| station.location) {
            canvas.fill_circle(viewport.project(location), style);
            drawn += 1;
        }

        let stats = RenderStats {
            candidates: candidates.len(),
            drawn,
            deferred: false,
        };
        tracing::debug!(
            zoom = viewport.zoom(),
            candidates = stats.candidates,
            drawn = stats.drawn,
            "station layer redrawn"
        );
        stats
    }

    /// The drawn station nearest to `screen`, if it is within the hit radius
    /// for the current zoom. Ties go to the lower station code.
    pub fn pick(&self, viewport: &Viewport, screen: DVec2) -> Option<Arc<Station>> {
        let threshold = self.config.pick_threshold_px(viewport.zoom());

        let candidates = match &self.mode {
            LayerMode::Hidden => return None,
            LayerMode::Highlighted(code) => self
                .stations
                .mappable(code)
                .map(|(station, _)| station)
                .into_iter()
                .collect(),
            LayerMode::AllStations => {
                let corner_a = viewport.unproject(screen - DVec2::splat(threshold));
                let corner_b = viewport.unproject(screen + DVec2::splat(threshold));
                self.stations.stations_in_bounds(Rect::new(corner_a.0, corner_b.0))
            }
        };

        candidates
            .into_iter()
            .filter_map(|station| {
                let distance = viewport.project(station.location?).distance(screen);
                (distance < threshold).then_some((distance, station))
            })
            .min_by(|(a, sa), (b, sb)| a.total_cmp(b).then_with(|| sa.code.cmp(&sb.code)))
            .map(|(_, station)| station)
    }

    fn acquire<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.canvas.is_none() && self.mode != LayerMode::Hidden {
            self.canvas = Some(CanvasGuard::acquire(surface));
        }
    }

    fn release(&mut self) {
        if let Some(guard) = self.canvas.take() {
            guard.release();
        }
    }
}
