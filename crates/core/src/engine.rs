//! The map engine: one surface, one station set, and the components that
//! read and drive them.
//!
//! Everything runs on the host's event loop. Requests from the UI only fill
//! controller slots or swap the route; [`MapEngine::pump`] is the per-tick
//! entry point that issues camera commands and redraws after the surface
//! settles. Remote lookups are split into `begin_*`/`complete_*` pairs so a
//! late response for a superseded request is dropped instead of applied.

use std::sync::Arc;

use glam::DVec2;
use railmap_api::{ApiError, Journey, StationLocation, TrainApi};
use railmap_transit::{Station, StationLookup, mappable_location};

use crate::basemap::Basemap;
use crate::camera::{CameraState, ViewTarget};
use crate::config::EngineConfig;
use crate::controller::{ControllerState, ViewportController};
use crate::error::UserNotice;
use crate::layer::{LayerMode, RenderStats, StationPointLayer};
use crate::route::{RouteBuilder, RoutePath};
use crate::surface::MapSurface;
use crate::ticket::{Ticket, Tickets};
use crate::viewport::fit_bounds;

type RouteListener = Box<dyn FnMut(&RoutePath)>;
type PickListener = Box<dyn FnMut(Option<&Station>)>;

/// Result of completing a remote lookup
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome<T> {
    Applied(T),
    /// The result is valid but the map already shows it; nothing was queued
    Unchanged(T),
    /// A newer lookup was started; this result was dropped
    Stale,
    Failed(UserNotice),
}

impl<T> LookupOutcome<T> {
    pub fn notice(&self) -> Option<&UserNotice> {
        match self {
            LookupOutcome::Failed(notice) => Some(notice),
            _ => None,
        }
    }
}

pub struct MapEngine<S: MapSurface> {
    surface: S,
    stations: Arc<dyn StationLookup>,
    config: Arc<EngineConfig>,

    controller: ViewportController,
    layer: StationPointLayer,
    routes: RouteBuilder,
    route: RoutePath,

    route_tickets: Tickets,
    station_tickets: Tickets,
    schedule_tickets: Tickets,
    full_schedule_tickets: Tickets,

    route_listeners: Vec<RouteListener>,
    pick_listeners: Vec<PickListener>,
}

impl<S: MapSurface> MapEngine<S> {
    /// Put the surface at the default view and draw the first frame.
    pub fn new(mut surface: S, stations: Arc<dyn StationLookup>, config: EngineConfig) -> Self {
        let config = Arc::new(config);
        surface.set_view(config.default_camera());

        let controller = ViewportController::new(config.clone(), stations.clone());
        let routes = RouteBuilder::new(stations.clone(), &config);
        let mut layer = StationPointLayer::new(stations.clone(), config.clone());
        let stats = layer.attach(&mut surface);
        tracing::info!(
            stations = stations.len(),
            mappable = stations.mappable_len(),
            drawn = stats.drawn,
            "map engine ready"
        );

        Self {
            surface,
            stations,
            config,
            controller,
            layer,
            routes,
            route: RoutePath::empty(),
            route_tickets: Tickets::new(),
            station_tickets: Tickets::new(),
            schedule_tickets: Tickets::new(),
            full_schedule_tickets: Tickets::new(),
            route_listeners: Vec::new(),
            pick_listeners: Vec::new(),
        }
    }

    // ---- Accessors ----

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn stations(&self) -> &Arc<dyn StationLookup> {
        &self.stations
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> CameraState {
        self.controller.camera()
    }

    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn route(&self) -> &RoutePath {
        &self.route
    }

    pub fn layer_mode(&self) -> &LayerMode {
        self.layer.mode()
    }

    // ---- Listeners ----

    pub fn on_route_computed(&mut self, listener: impl FnMut(&RoutePath) + 'static) {
        self.route_listeners.push(Box::new(listener));
    }

    pub fn on_station_picked(&mut self, listener: impl FnMut(Option<&Station>) + 'static) {
        self.pick_listeners.push(Box::new(listener));
    }

    // ---- Camera requests ----

    pub fn request_explicit_target(&mut self, target: ViewTarget) -> bool {
        self.controller.request_explicit_target(target)
    }

    pub fn request_train_focus(&mut self, journey: Option<&Journey>) -> bool {
        self.controller.request_train_focus(journey)
    }

    pub fn request_reset(&mut self) -> u64 {
        self.controller.request_reset()
    }

    /// Fly to the current route's padded bounds. Returns false when there is
    /// no route.
    pub fn fit_route(&mut self) -> bool {
        let Some(bounds) = self.route.bounds else {
            return false;
        };
        let camera = fit_bounds(bounds, self.surface.viewport().size, self.config.station_focus_zoom);
        self.controller.request_explicit_target(
            ViewTarget::new(camera.lat(), camera.lng()).with_zoom(camera.zoom),
        )
    }

    // ---- Journey selection ----

    /// Select a journey (or clear the selection): focus its origin and
    /// replace the route.
    pub fn select_journey(&mut self, journey: Option<&Journey>) {
        self.controller.request_train_focus(journey);
        let ticket = self.begin_route();
        let path = journey
            .map(|journey| self.routes.build_route(journey))
            .unwrap_or_default();
        self.commit_route(ticket, path);
    }

    /// Start a route computation, superseding any in flight
    pub fn begin_route(&mut self) -> Ticket {
        self.route_tickets.issue()
    }

    pub fn route_builder(&self) -> &RouteBuilder {
        &self.routes
    }

    /// Replace the route if `ticket` is still the latest. Returns whether it
    /// was applied.
    pub fn commit_route(&mut self, ticket: Ticket, path: RoutePath) -> bool {
        if !self.route_tickets.is_current(ticket) {
            tracing::debug!(generation = ticket.generation(), "discarding stale route");
            return false;
        }
        self.route = path;
        for listener in &mut self.route_listeners {
            listener(&self.route);
        }
        true
    }

    // ---- Layer ----

    pub fn set_layer_mode(&mut self, mode: LayerMode) -> RenderStats {
        self.layer.set_mode(&mut self.surface, mode)
    }

    pub fn set_basemap(&mut self, basemap: Basemap) {
        tracing::debug!(%basemap, "basemap");
        self.surface.set_basemap(basemap);
    }

    /// Hit test at `screen` and notify pick listeners, including on a miss.
    /// Points outside the map container never pick anything.
    pub fn click(&mut self, screen: DVec2) -> Option<Arc<Station>> {
        let viewport = self.surface.viewport();
        let picked = if viewport.contains_screen(screen) {
            self.layer.pick(&viewport, screen)
        } else {
            None
        };
        for listener in &mut self.pick_listeners {
            listener(picked.as_deref());
        }
        picked
    }

    // ---- Event loop ----

    /// Issue pending camera commands, then redraw if the surface settled.
    pub fn pump(&mut self) -> Option<RenderStats> {
        for (channel, command) in self.controller.tick() {
            tracing::debug!(?channel, "camera command");
            self.surface.apply(command);
        }

        // The layer only redraws on settled events, so a redraw doubles as
        // the settle signal for the controller.
        let stats = self.layer.pump(&mut self.surface)?;
        self.controller.on_settled(&self.surface.viewport());
        Some(stats)
    }

    // ---- Remote lookups ----

    pub fn begin_station_lookup(&mut self) -> Ticket {
        self.station_tickets.issue()
    }

    /// Apply a station lookup: target the returned coordinates at station
    /// zoom. Failures leave the camera and route untouched.
    pub fn complete_station_lookup(
        &mut self,
        ticket: Ticket,
        code: &str,
        result: railmap_api::Result<StationLocation>,
    ) -> LookupOutcome<ViewTarget> {
        if !self.station_tickets.is_current(ticket) {
            return LookupOutcome::Stale;
        }
        let location = match result {
            Ok(location) => location,
            Err(error) => return self.failed(code, &error),
        };
        let Some(point) = mappable_location(Some(location.latitude), Some(location.longitude))
        else {
            return LookupOutcome::Failed(UserNotice::unmappable(code));
        };

        let target = ViewTarget::new(point.y(), point.x());
        if self.controller.request_explicit_target(target) {
            LookupOutcome::Applied(target)
        } else {
            LookupOutcome::Unchanged(target)
        }
    }

    pub fn begin_schedule_lookup(&mut self) -> Ticket {
        self.schedule_tickets.issue()
    }

    pub fn complete_schedule_lookup(
        &mut self,
        ticket: Ticket,
        code: &str,
        result: railmap_api::Result<Vec<Journey>>,
    ) -> LookupOutcome<Vec<Journey>> {
        if !self.schedule_tickets.is_current(ticket) {
            return LookupOutcome::Stale;
        }
        match result {
            Ok(journeys) => LookupOutcome::Applied(journeys),
            Err(error) => self.failed(code, &error),
        }
    }

    pub fn begin_full_schedule_lookup(&mut self) -> Ticket {
        self.full_schedule_tickets.issue()
    }

    /// The full calling pattern is passed through as returned; the map
    /// itself is not touched.
    pub fn complete_full_schedule_lookup(
        &mut self,
        ticket: Ticket,
        train_id: &str,
        result: railmap_api::Result<serde_json::Value>,
    ) -> LookupOutcome<serde_json::Value> {
        if !self.full_schedule_tickets.is_current(ticket) {
            return LookupOutcome::Stale;
        }
        match result {
            Ok(schedule) => LookupOutcome::Applied(schedule),
            Err(error) => self.failed(train_id, &error),
        }
    }

    /// Look up `code` and target it, for hosts that can hold the engine
    /// across the await.
    pub async fn search_station(
        &mut self,
        api: &dyn TrainApi,
        code: &str,
    ) -> LookupOutcome<ViewTarget> {
        let ticket = self.begin_station_lookup();
        let result = api.lookup_station(code).await;
        self.complete_station_lookup(ticket, code, result)
    }

    pub async fn load_schedule(
        &mut self,
        api: &dyn TrainApi,
        code: &str,
    ) -> LookupOutcome<Vec<Journey>> {
        let ticket = self.begin_schedule_lookup();
        let result = api.lookup_schedule(code).await;
        self.complete_schedule_lookup(ticket, code, result)
    }

    pub async fn load_full_schedule(
        &mut self,
        api: &dyn TrainApi,
        train_id: &str,
    ) -> LookupOutcome<serde_json::Value> {
        let ticket = self.begin_full_schedule_lookup();
        let result = api.lookup_full_schedule(train_id).await;
        self.complete_full_schedule_lookup(ticket, train_id, result)
    }

    fn failed<T>(&self, code: &str, error: &ApiError) -> LookupOutcome<T> {
        tracing::warn!(code, %error, transient = error.is_transient(), "lookup failed");
        LookupOutcome::Failed(UserNotice::lookup_failed(code, error))
    }
}

impl<S: MapSurface> Drop for MapEngine<S> {
    fn drop(&mut self) {
        self.layer.detach(&mut self.surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use geo::Point;
    use railmap_api::ApiFuture;
    use railmap_transit::{StationDetails, StationIdentifier, StationIndex};

    use crate::camera::CameraCommand;
    use crate::headless::HeadlessSurface;
    use crate::route::StopRole;

    fn station(code: &str, name: &str, location: Option<Point>) -> Station {
        Station {
            code: StationIdentifier::new(code),
            name: name.into(),
            location,
            details: StationDetails::default(),
        }
    }

    fn index() -> Arc<StationIndex> {
        Arc::new(StationIndex::from_stations(vec![
            station("EUSTON", "London Euston", Some(Point::new(-0.1337, 51.5282))),
            station("MNCRPIC", "Manchester Piccadilly", Some(Point::new(-2.2309, 53.4774))),
            station("EDINBUR", "Edinburgh", Some(Point::new(-3.1883, 55.9521))),
            station("NOCOORD", "No Coordinates", None),
        ]))
    }

    fn engine() -> (MapEngine<HeadlessSurface>, HeadlessSurface) {
        let surface = HeadlessSurface::new(CameraState::new(0.0, 0.0, 2.0), DVec2::new(800.0, 600.0));
        let engine = MapEngine::new(surface.clone(), index(), EngineConfig::default());
        (engine, surface)
    }

    fn last_fly_to(surface: &HeadlessSurface) -> Option<CameraState> {
        surface.commands().iter().rev().find_map(|command| match command {
            CameraCommand::FlyTo { camera, .. } => Some(*camera),
            CameraCommand::SetView { .. } => None,
        })
    }

    /// In-memory lookup API keyed by code
    #[derive(Default)]
    struct FakeApi {
        locations: HashMap<String, (f64, f64)>,
        schedules: HashMap<String, Vec<Journey>>,
        timelines: HashMap<String, serde_json::Value>,
    }

    impl FakeApi {
        fn station(&self, code: &str) -> railmap_api::Result<StationLocation> {
            let (latitude, longitude) = *self
                .locations
                .get(code)
                .ok_or_else(|| ApiError::NotFound(code.to_owned()))?;
            Ok(StationLocation {
                id: 1,
                tiploc: code.to_owned(),
                latitude,
                longitude,
                stanox: None,
            })
        }

        fn schedule(&self, code: &str) -> railmap_api::Result<Vec<Journey>> {
            self.schedules.get(code).cloned().ok_or(ApiError::Status {
                context: "Schedule fetch failed",
                status: 500,
            })
        }
    }

    impl FakeApi {
        fn timeline(&self, train_id: &str) -> railmap_api::Result<serde_json::Value> {
            self.timelines
                .get(train_id)
                .cloned()
                .ok_or(ApiError::Status {
                    context: "Full schedule fetch failed",
                    status: 404,
                })
        }
    }

    impl TrainApi for FakeApi {
        fn lookup_station<'a>(&'a self, code: &'a str) -> ApiFuture<'a, StationLocation> {
            let result = self.station(code);
            Box::pin(async move { result })
        }

        fn lookup_schedule<'a>(&'a self, code: &'a str) -> ApiFuture<'a, Vec<Journey>> {
            let result = self.schedule(code);
            Box::pin(async move { result })
        }

        fn lookup_full_schedule<'a>(
            &'a self,
            train_id: &'a str,
        ) -> ApiFuture<'a, serde_json::Value> {
            let result = self.timeline(train_id);
            Box::pin(async move { result })
        }
    }

    #[test]
    fn starts_at_default_view_with_stations_drawn() {
        let (engine, surface) = engine();
        assert_eq!(surface.camera(), EngineConfig::default().default_camera());
        assert_eq!(engine.camera(), surface.camera());
        assert_eq!(surface.markers().len(), 3);
        assert_eq!(surface.active_canvases(), 1);
    }

    #[test]
    fn pump_flies_and_redraws() {
        let (mut engine, surface) = engine();
        engine.request_explicit_target(ViewTarget::new(51.5282, -0.1337));
        let stats = engine.pump().unwrap();

        assert_eq!(surface.camera(), CameraState::new(51.5282, -0.1337, 14.0));
        assert_eq!(stats.drawn, 1);
        assert_eq!(engine.controller_state(), ControllerState::Idle);
    }

    #[test]
    fn three_resets_settle_at_default() {
        let surface = HeadlessSurface::new(CameraState::new(54.5, -2.5, 6.0), DVec2::new(800.0, 600.0))
            .animated();
        let mut engine = MapEngine::new(surface.clone(), index(), EngineConfig::default());

        engine.request_explicit_target(ViewTarget::new(51.5, -0.1));
        engine.pump();
        for _ in 0..3 {
            engine.request_reset();
            engine.pump();
        }
        assert!(surface.finish_transition());
        engine.pump();

        assert_eq!(surface.camera(), EngineConfig::default().default_camera());
        assert_eq!(engine.camera(), surface.camera());
    }

    #[test]
    fn reset_issued_after_other_channels_in_same_tick() {
        let (mut engine, surface) = engine();
        engine.request_reset();
        engine.select_journey(Some(&Journey::between("t1", "MNCRPIC", "EUSTON")));
        engine.request_explicit_target(ViewTarget::new(55.0, -3.0));
        engine.pump();

        let flights: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                CameraCommand::FlyTo { camera, .. } => Some(camera.zoom),
                CameraCommand::SetView { .. } => None,
            })
            .collect();
        assert_eq!(flights, vec![14.0, 15.0, 6.0]);
        assert_eq!(surface.camera(), EngineConfig::default().default_camera());
    }

    #[test]
    fn selecting_a_journey_focuses_origin_and_publishes_route() {
        let (mut engine, surface) = engine();
        let routes = Rc::new(RefCell::new(Vec::new()));
        let sink = routes.clone();
        engine.on_route_computed(move |route| sink.borrow_mut().push(route.len()));

        engine.select_journey(Some(&Journey::between("t1", "MNCRPIC", "EUSTON")));
        engine.pump();

        assert_eq!(last_fly_to(&surface), Some(CameraState::new(53.4774, -2.2309, 15.0)));
        assert_eq!(engine.route().len(), 13);
        assert_eq!(engine.route().stops[0].role, StopRole::Origin);

        engine.select_journey(None);
        assert!(engine.route().is_empty());
        assert_eq!(*routes.borrow(), vec![13, 0]);
    }

    #[test]
    fn unknown_origin_gives_empty_route_and_no_flight() {
        let (mut engine, surface) = engine();
        let before = surface.commands().len();

        engine.select_journey(Some(&Journey::between("t1", "ZZZZZZ", "EUSTON")));
        engine.pump();

        assert!(engine.route().is_empty());
        assert_eq!(surface.commands().len(), before);
    }

    #[test]
    fn stale_route_is_discarded() {
        let (mut engine, _) = engine();
        let journey = Journey::between("t1", "MNCRPIC", "EUSTON");

        let first = engine.begin_route();
        let slow = engine.route_builder().build_route(&journey);
        engine.select_journey(Some(&Journey::between("t2", "EDINBUR", "EUSTON")));

        assert!(!engine.commit_route(first, slow));
        assert_eq!(engine.route().stops[0].label, "Edinburgh");
    }

    #[test]
    fn fit_route_targets_route_bounds() {
        let (mut engine, surface) = engine();
        assert!(!engine.fit_route());

        engine.select_journey(Some(&Journey::between("t1", "MNCRPIC", "EUSTON")));
        engine.pump();
        assert!(engine.fit_route());
        engine.pump();

        let viewport = surface.viewport();
        let bounds = viewport.bounds();
        for point in &engine.route().coordinates {
            assert!(bounds.min().x <= point.x() && point.x() <= bounds.max().x);
            assert!(bounds.min().y <= point.y() && point.y() <= bounds.max().y);
        }
    }

    #[test]
    fn fit_route_again_after_panning_away() {
        let (mut engine, surface) = engine();
        engine.select_journey(Some(&Journey::between("t1", "MNCRPIC", "EUSTON")));
        engine.pump();
        assert!(engine.fit_route());
        engine.pump();
        let fitted = surface.camera();
        assert!(!engine.fit_route());

        surface.pan_to(CameraState::new(55.9521, -3.1883, 12.0));
        engine.pump();
        assert!(engine.fit_route());
        engine.pump();
        assert_eq!(surface.camera(), fitted);
    }

    #[test]
    fn click_outside_container_picks_nothing() {
        let (mut engine, surface) = engine();
        let picks = Rc::new(RefCell::new(Vec::new()));
        let sink = picks.clone();
        engine.on_station_picked(move |station| sink.borrow_mut().push(station.is_some()));

        // Euston projected far off to the left of the container
        engine.request_explicit_target(ViewTarget::new(51.5282, 0.5).with_zoom(14.0));
        engine.pump();
        let euston = surface.viewport().project(Point::new(-0.1337, 51.5282));
        assert!(euston.x < 0.0);

        assert!(engine.click(euston).is_none());
        assert_eq!(*picks.borrow(), vec![false]);
    }

    #[test]
    fn click_notifies_pick_listeners() {
        let (mut engine, surface) = engine();
        let picks = Rc::new(RefCell::new(Vec::new()));
        let sink = picks.clone();
        engine.on_station_picked(move |station| {
            sink.borrow_mut().push(station.map(|s| s.code.to_string()))
        });

        let viewport = surface.viewport();
        let euston = viewport.project(Point::new(-0.1337, 51.5282));
        assert_eq!(engine.click(euston).unwrap().code.as_str(), "EUSTON");
        assert!(engine.click(DVec2::new(1.0, 1.0)).is_none());

        assert_eq!(*picks.borrow(), vec![Some("EUSTON".to_owned()), None]);
    }

    #[test]
    fn layer_mode_and_basemap_reach_the_surface() {
        let (mut engine, surface) = engine();
        let stats = engine.set_layer_mode(LayerMode::Highlighted(StationIdentifier::new("EUSTON")));
        assert_eq!(stats.drawn, 1);
        assert_eq!(surface.markers().len(), 1);

        engine.set_basemap(Basemap::Dark);
        assert_eq!(surface.basemap(), Basemap::Dark);
    }

    #[test]
    fn dropping_engine_releases_canvas() {
        let (engine, surface) = engine();
        assert_eq!(surface.active_canvases(), 1);
        drop(engine);
        assert_eq!(surface.active_canvases(), 0);
    }

    #[tokio::test]
    async fn station_search_flies_to_result() {
        let (mut engine, surface) = engine();
        let api = FakeApi {
            locations: HashMap::from([("KNGX".to_owned(), (51.5320, -0.1225))]),
            ..FakeApi::default()
        };

        let outcome = engine.search_station(&api, "KNGX").await;
        assert_eq!(outcome, LookupOutcome::Applied(ViewTarget::new(51.5320, -0.1225)));
        engine.pump();
        assert_eq!(surface.camera(), CameraState::new(51.5320, -0.1225, 14.0));
    }

    #[tokio::test]
    async fn failed_search_leaves_state_untouched() {
        let (mut engine, surface) = engine();
        engine.select_journey(Some(&Journey::between("t1", "MNCRPIC", "EUSTON")));
        engine.pump();
        let camera = surface.camera();
        let route = engine.route().clone();

        let api = FakeApi {
            locations: HashMap::from([("NULLISL".to_owned(), (0.0, 0.0))]),
            ..FakeApi::default()
        };

        let outcome = engine.search_station(&api, "ZZZZZZ").await;
        assert_eq!(outcome.notice().unwrap().title, "Station not found");

        let outcome = engine.search_station(&api, "NULLISL").await;
        assert_eq!(outcome, LookupOutcome::Failed(UserNotice::unmappable("NULLISL")));

        engine.pump();
        assert_eq!(surface.camera(), camera);
        assert_eq!(engine.route(), &route);
    }

    #[tokio::test]
    async fn same_search_after_reset_flies_again() {
        let (mut engine, surface) = engine();
        let api = FakeApi {
            locations: HashMap::from([("EUSTON".to_owned(), (51.5282, -0.1337))]),
            ..FakeApi::default()
        };
        let euston = CameraState::new(51.5282, -0.1337, 14.0);

        assert!(matches!(
            engine.search_station(&api, "EUSTON").await,
            LookupOutcome::Applied(_)
        ));
        engine.pump();
        assert_eq!(surface.camera(), euston);

        // already there
        assert!(matches!(
            engine.search_station(&api, "EUSTON").await,
            LookupOutcome::Unchanged(_)
        ));

        engine.request_reset();
        engine.pump();
        assert_eq!(surface.camera(), EngineConfig::default().default_camera());

        assert!(matches!(
            engine.search_station(&api, "EUSTON").await,
            LookupOutcome::Applied(_)
        ));
        engine.pump();
        assert_eq!(surface.camera(), euston);
    }

    #[tokio::test]
    async fn late_station_result_is_dropped() {
        let (mut engine, surface) = engine();
        let api = FakeApi {
            locations: HashMap::from([
                ("EUSTON".to_owned(), (51.5282, -0.1337)),
                ("EDINBUR".to_owned(), (55.9521, -3.1883)),
            ]),
            ..FakeApi::default()
        };

        let first = engine.begin_station_lookup();
        let second = engine.begin_station_lookup();
        let slow = api.lookup_station("EUSTON").await;
        let fast = api.lookup_station("EDINBUR").await;

        assert!(matches!(
            engine.complete_station_lookup(second, "EDINBUR", fast),
            LookupOutcome::Applied(_)
        ));
        assert_eq!(
            engine.complete_station_lookup(first, "EUSTON", slow),
            LookupOutcome::Stale
        );

        engine.pump();
        assert_eq!(surface.camera(), CameraState::new(55.9521, -3.1883, 14.0));
    }

    #[tokio::test]
    async fn schedule_lookup_outcomes() {
        let (mut engine, _) = engine();
        let api = FakeApi {
            schedules: HashMap::from([(
                "EUSTON".to_owned(),
                vec![Journey::between("t1", "EUSTON", "MNCRPIC")],
            )]),
            ..FakeApi::default()
        };

        match engine.load_schedule(&api, "EUSTON").await {
            LookupOutcome::Applied(journeys) => assert_eq!(journeys.len(), 1),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let outcome = engine.load_schedule(&api, "MNCRPIC").await;
        assert_eq!(outcome.notice().unwrap().title, "Lookup failed");
    }

    #[tokio::test]
    async fn full_schedule_lookup_outcomes() {
        let (mut engine, surface) = engine();
        let timeline = serde_json::json!({
            "trainId": "202410187654321",
            "movements": [{ "tiploc": "EUSTON" }, { "tiploc": "MNCRPIC" }],
        });
        let api = FakeApi {
            timelines: HashMap::from([("202410187654321".to_owned(), timeline.clone())]),
            ..FakeApi::default()
        };
        let commands = surface.commands().len();

        assert_eq!(
            engine.load_full_schedule(&api, "202410187654321").await,
            LookupOutcome::Applied(timeline.clone())
        );

        let outcome = engine.load_full_schedule(&api, "000").await;
        assert_eq!(outcome.notice().unwrap().title, "Lookup failed");

        let first = engine.begin_full_schedule_lookup();
        let second = engine.begin_full_schedule_lookup();
        let late = api.lookup_full_schedule("202410187654321").await;
        assert_eq!(
            engine.complete_full_schedule_lookup(first, "202410187654321", late),
            LookupOutcome::Stale
        );
        let fresh = api.lookup_full_schedule("202410187654321").await;
        assert!(matches!(
            engine.complete_full_schedule_lookup(second, "202410187654321", fresh),
            LookupOutcome::Applied(_)
        ));

        engine.pump();
        assert_eq!(surface.commands().len(), commands);
    }
}
