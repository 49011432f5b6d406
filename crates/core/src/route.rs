//! Approximate travel path between two stations.
//!
//! There is no track geometry behind this: the path is a straight line in
//! coordinate space, sampled into evenly spaced stops. It exists so the map
//! can show direction and extent of a journey and a sidebar can list stops.

use std::sync::Arc;

use geo::{Line, Point, Rect, coord};
use railmap_api::Journey;
use railmap_transit::{Station, StationIdentifier, StationLookup};
use serde::Serialize;

use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopRole {
    Origin,
    Intermediate,
    Destination,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stop {
    pub label: String,
    pub role: StopRole,
}

/// Sampled path with one stop per coordinate. Either empty or at least two
/// points long.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutePath {
    pub coordinates: Vec<Point>,
    pub stops: Vec<Stop>,
    /// Padded box around the path, for fitting the viewport
    pub bounds: Option<Rect>,
}

impl RoutePath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Coordinates paired with their stop records
    pub fn iter(&self) -> impl Iterator<Item = (&Point, &Stop)> {
        self.coordinates.iter().zip(&self.stops)
    }
}

pub struct RouteBuilder {
    stations: Arc<dyn StationLookup>,
    segments: usize,
    bounds_padding: f64,
}

impl RouteBuilder {
    pub fn new(stations: Arc<dyn StationLookup>, config: &EngineConfig) -> Self {
        Self {
            stations,
            segments: config.route_segments.max(1),
            bounds_padding: config.route_bounds_padding,
        }
    }

    /// Build the path for `journey`. Empty when either end cannot be placed
    /// on the map.
    pub fn build_route(&self, journey: &Journey) -> RoutePath {
        let (Some((origin, from)), Some((destination, to))) = (
            self.resolve(&journey.origin_tiploc),
            self.resolve(&journey.destination_tiploc),
        ) else {
            tracing::debug!(
                origin = %journey.origin_tiploc,
                destination = %journey.destination_tiploc,
                "route endpoints unresolved"
            );
            return RoutePath::empty();
        };

        let line = Line::new(from, to);
        let mut coordinates: Vec<Point> = (0..=self.segments)
            .map(|i| {
                let t = i as f64 / self.segments as f64;
                Point::from(line.start + line.delta() * t)
            })
            .collect();
        // no rounding drift on the final sample
        if let Some(last) = coordinates.last_mut() {
            *last = to;
        }

        let stops = (0..=self.segments)
            .map(|i| match i {
                0 => Stop {
                    label: display_name(&journey.origin_location, &origin),
                    role: StopRole::Origin,
                },
                i if i == self.segments => Stop {
                    label: display_name(&journey.destination_location, &destination),
                    role: StopRole::Destination,
                },
                i => Stop {
                    label: format!("Stop {i}"),
                    role: StopRole::Intermediate,
                },
            })
            .collect();

        RoutePath {
            coordinates,
            stops,
            bounds: Some(padded(Rect::new(from.0, to.0), self.bounds_padding)),
        }
    }

    fn resolve(&self, code: &str) -> Option<(Arc<Station>, Point)> {
        self.stations.mappable(&StationIdentifier::new(code.trim()))
    }
}

fn display_name(from_journey: &str, station: &Station) -> String {
    let name = from_journey.trim();
    if name.is_empty() {
        station.name.to_string()
    } else {
        name.to_string()
    }
}

/// Grow `rect` by `ratio` of its span on every side
fn padded(rect: Rect, ratio: f64) -> Rect {
    let dx = rect.width() * ratio;
    let dy = rect.height() * ratio;
    Rect::new(
        coord! { x: rect.min().x - dx, y: rect.min().y - dy },
        coord! { x: rect.max().x + dx, y: rect.max().y + dy },
    )
}
