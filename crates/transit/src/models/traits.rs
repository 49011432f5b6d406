//! Read-only lookup interface over the station set.
//!
//! The engine only ever reads stations through this trait, so tests and
//! alternative backends can stand in for the in-memory index.

use std::sync::Arc;

use geo::{Point, Rect};

use crate::identifiers::*;
use crate::models::types::Station;

pub trait StationLookup: Send + Sync {
    // ---- Lookups ----
    fn get(&self, code: &StationIdentifier) -> Option<Arc<Station>>;
    fn get_by_crs(&self, crs: &CrsCode) -> Option<Arc<Station>>;

    // ---- Collections ----
    fn len(&self) -> usize;
    fn mappable_len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- Spatial queries (mappable stations only) ----

    /// Stations whose location falls inside `bounds` (x = lng, y = lat)
    fn stations_in_bounds(&self, bounds: Rect) -> Vec<Arc<Station>>;

    /// The `n` stations nearest to `point` in coordinate space
    fn nearest_stations(&self, point: Point, n: usize) -> Vec<Arc<Station>>;

    /// Resolve a code to a station that can be placed on the map.
    fn mappable(&self, code: &StationIdentifier) -> Option<(Arc<Station>, Point)> {
        let station = self.get(code)?;
        let location = station.location?;
        Some((station, location))
    }
}
