//! Camera arbitration.
//!
//! Three independent request channels drive one camera:
//!
//! | Channel          | Fires when                              | Destination                 |
//! |------------------|-----------------------------------------|-----------------------------|
//! | explicit target  | the target changes or the camera left it | the target as given         |
//! | train focus      | a different journey is selected         | the journey's origin        |
//! | reset            | the reset counter advances              | the configured default      |
//!
//! Requests only fill a per-channel slot (latest wins). [`ViewportController::tick`]
//! then turns the filled slots into fly-to commands in channel order, so when
//! several channels fire together the reset is issued last and is the one
//! the camera ends on. Transitions are fire-and-forget; the controller goes
//! back to idle when the surface reports a settled viewport.

use std::sync::Arc;

use railmap_api::Journey;
use railmap_transit::{StationIdentifier, StationLookup};

use crate::camera::{CameraCommand, CameraState, ViewTarget};
use crate::config::EngineConfig;
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Transitioning,
}

/// Request channels, in the order their commands are issued within a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    ExplicitTarget,
    TrainFocus,
    Reset,
}

/// What identifies a journey selection for change detection
#[derive(Clone, Debug, PartialEq, Eq)]
struct JourneyKey {
    train_id: String,
    origin: String,
}

impl JourneyKey {
    fn of(journey: &Journey) -> Self {
        Self {
            train_id: journey.train_id.clone(),
            origin: journey.origin_tiploc.clone(),
        }
    }
}

pub struct ViewportController {
    config: Arc<EngineConfig>,
    stations: Arc<dyn StationLookup>,

    state: ControllerState,
    camera: CameraState,

    // Last value seen per channel, for edge detection
    last_target: Option<ViewTarget>,
    last_journey: Option<JourneyKey>,
    reset_requested: u64,
    reset_issued: u64,

    // Filled slots waiting for the next tick
    pending_target: Option<ViewTarget>,
    pending_journey: Option<Journey>,
}

impl ViewportController {
    pub fn new(config: Arc<EngineConfig>, stations: Arc<dyn StationLookup>) -> Self {
        let camera = config.default_camera();
        Self {
            config,
            stations,
            state: ControllerState::Idle,
            camera,
            last_target: None,
            last_journey: None,
            reset_requested: 0,
            reset_issued: 0,
            pending_target: None,
            pending_journey: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The authoritative camera: the last commanded destination, or the last
    /// settled viewport reported by the surface.
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    /// Returns whether a flight was queued. Repeating the previous target
    /// only counts when the camera has since moved away from it.
    pub fn request_explicit_target(&mut self, target: ViewTarget) -> bool {
        if !target.is_valid() {
            tracing::warn!(?target, "ignoring invalid view target");
            return false;
        }
        if self.pending_target == Some(target)
            || (self.last_target == Some(target) && self.camera == self.target_camera(target))
        {
            return false;
        }
        self.last_target = Some(target);
        self.pending_target = Some(target);
        true
    }

    /// Select (or clear, with `None`) the journey whose origin the camera
    /// should show. Returns whether the selection changed.
    pub fn request_train_focus(&mut self, journey: Option<&Journey>) -> bool {
        let Some(journey) = journey else {
            self.last_journey = None;
            self.pending_journey = None;
            return false;
        };

        let key = JourneyKey::of(journey);
        if self.last_journey.as_ref() == Some(&key) {
            return false;
        }
        self.last_journey = Some(key);
        self.pending_journey = Some(journey.clone());
        true
    }

    /// Returns the reset counter after the increment.
    pub fn request_reset(&mut self) -> u64 {
        self.reset_requested += 1;
        self.reset_requested
    }

    pub fn has_pending(&self) -> bool {
        self.pending_target.is_some()
            || self.pending_journey.is_some()
            || self.reset_requested != self.reset_issued
    }

    /// Turn filled channels into camera commands, in channel order.
    pub fn tick(&mut self) -> Vec<(Channel, CameraCommand)> {
        let mut issued = Vec::new();

        if let Some(target) = self.pending_target.take() {
            let camera = self.target_camera(target);
            issued.push((Channel::ExplicitTarget, self.fly(camera)));
        }

        if let Some(journey) = self.pending_journey.take() {
            match self.resolve_origin(&journey) {
                Some(camera) => issued.push((Channel::TrainFocus, self.fly(camera))),
                None => tracing::warn!(
                    train = %journey.train_id,
                    origin = %journey.origin_tiploc,
                    "could not resolve location for train"
                ),
            }
        }

        if self.reset_requested != self.reset_issued {
            self.reset_issued = self.reset_requested;
            let camera = self.config.default_camera();
            issued.push((Channel::Reset, self.fly(camera)));
        }

        issued
    }

    /// The surface reported a settled viewport
    pub fn on_settled(&mut self, viewport: &Viewport) {
        self.state = ControllerState::Idle;
        self.camera = viewport.camera;
    }

    fn target_camera(&self, target: ViewTarget) -> CameraState {
        let zoom = target.zoom.unwrap_or(self.config.station_focus_zoom);
        CameraState::new(target.lat, target.lng, zoom)
    }

    fn resolve_origin(&self, journey: &Journey) -> Option<CameraState> {
        let code = StationIdentifier::new(journey.origin_tiploc.trim());
        let (_, location) = self.stations.mappable(&code)?;
        Some(CameraState {
            center: location,
            zoom: self.config.train_focus_zoom,
        })
    }

    fn fly(&mut self, camera: CameraState) -> CameraCommand {
        tracing::debug!(lat = camera.lat(), lng = camera.lng(), zoom = camera.zoom, "fly to");
        self.camera = camera;
        self.state = ControllerState::Transitioning;
        CameraCommand::FlyTo {
            camera,
            duration_secs: self.config.fly_duration_secs,
        }
    }
}
