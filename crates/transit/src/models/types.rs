//! Core data types for station records.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Data Structures
// ============================================================================

/// Optional classification fields carried by a station record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StationDetails {
    pub crs: Option<CrsCode>,
    pub stanox: Option<u32>,
    pub station_type: Option<Arc<str>>,
    pub station_category: Option<Arc<str>>,
    pub nalco: Option<u32>,
    pub uic: Option<u32>,
    pub zone: Option<u32>,
    pub off_network: bool,
    pub compulsory_stop: bool,
}

/// A fixed, named point in the rail network.
///
/// `location` is `None` when the source record carried no usable coordinates.
/// Such stations can still be looked up by code, but never take part in
/// rendering, picking or route building.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub code: StationIdentifier,
    pub name: Arc<str>,
    /// x = longitude, y = latitude (degrees)
    pub location: Option<Point>,
    pub details: StationDetails,
}

impl Station {
    pub fn is_mappable(&self) -> bool {
        self.location.is_some()
    }

    /// Latitude/longitude pair, if mappable.
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        self.location.map(|p| (p.y(), p.x()))
    }

    /// Lines shown in the detail popup for this station.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![self.name.to_string(), format!("TIPLOC: {}", self.code)];
        if let Some(crs) = &self.details.crs {
            lines.push(format!("CRS: {crs}"));
        }
        lines
    }
}

/// Validate a raw latitude/longitude pair.
///
/// Missing, zero, non-finite or out-of-range values make a station unmappable.
pub fn mappable_location(latitude: Option<f64>, longitude: Option<f64>) -> Option<Point> {
    let (lat, lng) = (latitude?, longitude?);
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    // The export writes 0 for "unknown" on either axis
    if lat == 0.0 || lng == 0.0 {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(Point::new(lng, lat))
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Station not found: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Dataset could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransitError>;
