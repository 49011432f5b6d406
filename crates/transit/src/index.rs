//! In-memory station index.
//!
//! Built once at startup from the static dataset and shared read-only for the
//! lifetime of the view. Holds lookup maps by code and CRS plus an R-tree over
//! the mappable subset.

use std::collections::HashMap;
use std::sync::Arc;

use geo::{Point, Rect};
use rstar::{RTree, RTreeObject};

use crate::identifiers::*;
use crate::models::{traits::StationLookup, types::Station};
use crate::spatial::{index::StationNode, queries::rect_to_envelope};

/// Immutable station lookup table with spatial indexing
///
/// This type is cheap to share behind an `Arc`; nothing in it is mutated
/// after construction, so no locking is needed.
#[derive(Clone)]
pub struct StationIndex {
    // Core data, in dataset order
    stations: Vec<Arc<Station>>,

    // Lookup maps
    station_map: HashMap<StationIdentifier, Arc<Station>>,
    crs_map: HashMap<CrsCode, Arc<Station>>,

    // Spatial index (mappable stations only)
    station_tree: RTree<StationNode>,
}

impl StationIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
            station_map: HashMap::new(),
            crs_map: HashMap::new(),
            station_tree: RTree::new(),
        }
    }

    /// Build the index from station records.
    ///
    /// Codes are unique: when a code repeats, the first record is kept.
    pub fn from_stations(records: impl IntoIterator<Item = Station>) -> Self {
        let mut stations: Vec<Arc<Station>> = Vec::new();
        let mut station_map = HashMap::new();
        let mut crs_map = HashMap::new();

        for record in records {
            if station_map.contains_key(&record.code) {
                tracing::warn!(code = %record.code, "duplicate station code, keeping first record");
                continue;
            }

            let station = Arc::new(record);
            station_map.insert(station.code.clone(), station.clone());
            if let Some(crs) = &station.details.crs {
                crs_map.entry(crs.clone()).or_insert_with(|| station.clone());
            }
            stations.push(station);
        }

        // Build spatial index
        let station_tree = RTree::bulk_load(
            stations
                .iter()
                .filter_map(|s| s.location.map(|location| StationNode::new(location, s.clone())))
                .collect(),
        );

        tracing::info!(
            stations = stations.len(),
            mappable = station_tree.size(),
            "station index built"
        );

        Self {
            stations,
            station_map,
            crs_map,
            station_tree,
        }
    }

    /// All stations in dataset order, mappable or not
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Station>> {
        self.stations.iter()
    }

    /// Stations that can be placed on the map
    pub fn iter_mappable(&self) -> impl Iterator<Item = &Arc<Station>> {
        self.stations.iter().filter(|s| s.is_mappable())
    }

    /// Case-insensitive substring search over display names, CRS and TIPLOC codes.
    ///
    /// Exact code matches sort first, then name prefix matches, then the rest in
    /// dataset order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Arc<Station>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<(u8, usize, &Arc<Station>)> = self
            .stations
            .iter()
            .enumerate()
            .filter_map(|(position, station)| {
                let name = station.name.to_lowercase();
                let code = station.code.as_str().to_lowercase();
                let crs = station
                    .details
                    .crs
                    .as_ref()
                    .map(|c| c.as_str().to_lowercase());

                let rank = if code == needle || crs.as_deref() == Some(needle.as_str()) {
                    0
                } else if name.starts_with(&needle) {
                    1
                } else if name.contains(&needle) || code.contains(&needle) {
                    2
                } else {
                    return None;
                };
                Some((rank, position, station))
            })
            .collect();

        hits.sort_by_key(|(rank, position, _)| (*rank, *position));
        hits.into_iter()
            .take(limit)
            .map(|(_, _, station)| station.clone())
            .collect()
    }

    /// Bounding rectangle of every mappable station
    pub fn extent(&self) -> Option<Rect> {
        if self.station_tree.size() == 0 {
            return None;
        }
        let envelope = self.station_tree.root().envelope();
        let [min_x, min_y] = envelope.lower();
        let [max_x, max_y] = envelope.upper();
        Some(Rect::new(
            geo::coord! { x: min_x, y: min_y },
            geo::coord! { x: max_x, y: max_y },
        ))
    }
}

impl Default for StationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl StationLookup for StationIndex {
    fn get(&self, code: &StationIdentifier) -> Option<Arc<Station>> {
        self.station_map.get(code).cloned()
    }

    fn get_by_crs(&self, crs: &CrsCode) -> Option<Arc<Station>> {
        self.crs_map.get(crs).cloned()
    }

    fn len(&self) -> usize {
        self.stations.len()
    }

    fn mappable_len(&self) -> usize {
        self.station_tree.size()
    }

    fn stations_in_bounds(&self, bounds: Rect) -> Vec<Arc<Station>> {
        self.station_tree
            .locate_in_envelope(&rect_to_envelope(bounds))
            .map(|node| node.station.clone())
            .collect()
    }

    fn nearest_stations(&self, point: Point, n: usize) -> Vec<Arc<Station>> {
        self.station_tree
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .take(n)
            .map(|node| node.station.clone())
            .collect()
    }
}
