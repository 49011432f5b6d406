//! Loading the static TIPLOC export.
//!
//! The export is a single JSON document:
//!
//! ```json
//! { "ExportDate": "...", "ExportCount": 1, "Tiplocs": [ { "Name": "...", "Tiploc": "...",
//!   "Details": { "CRS": "..." }, "Latitude": 51.5, "Longitude": -0.1 } ] }
//! ```
//!
//! Only the fields the map needs are decoded; everything else is ignored.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::identifiers::*;
use crate::index::StationIndex;
use crate::models::types::{mappable_location, Result, Station, StationDetails, TransitError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TiplocExport {
    #[serde(default)]
    export_date: Option<String>,
    #[serde(default)]
    export_count: Option<usize>,
    tiplocs: Vec<TiplocRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TiplocRecord {
    name: String,
    tiploc: String,
    #[serde(default)]
    stanox: Option<u32>,
    #[serde(default)]
    details: TiplocDetails,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TiplocDetails {
    #[serde(rename = "CRS", default)]
    crs: Option<String>,
    #[serde(rename = "TPS_StationType", default)]
    station_type: Option<String>,
    #[serde(rename = "TPS_StationCategory", default)]
    station_category: Option<String>,
    #[serde(rename = "Nalco", default)]
    nalco: Option<u32>,
    #[serde(rename = "UIC", default)]
    uic: Option<u32>,
    #[serde(rename = "Zone", default)]
    zone: Option<u32>,
    #[serde(rename = "OffNetwork", default)]
    off_network: bool,
    #[serde(rename = "CompulsoryStop", default)]
    compulsory_stop: bool,
}

impl TiplocRecord {
    fn into_station(self) -> Option<Station> {
        let code = self.tiploc.trim();
        if code.is_empty() {
            return None;
        }

        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Some(Station {
            code: StationIdentifier::new(code),
            name: self.name.into(),
            location: mappable_location(self.latitude, self.longitude),
            details: StationDetails {
                crs: non_empty(self.details.crs).map(CrsCode::new),
                stanox: self.stanox,
                station_type: non_empty(self.details.station_type).map(Arc::from),
                station_category: non_empty(self.details.station_category).map(Arc::from),
                nalco: self.details.nalco,
                uic: self.details.uic,
                zone: self.details.zone,
                off_network: self.details.off_network,
                compulsory_stop: self.details.compulsory_stop,
            },
        })
    }
}

fn build(export: TiplocExport) -> Result<StationIndex> {
    if let Some(expected) = export.export_count {
        if expected != export.tiplocs.len() {
            tracing::warn!(
                expected,
                actual = export.tiplocs.len(),
                "export count does not match record count"
            );
        }
    }

    let total = export.tiplocs.len();
    let stations: Vec<Station> = export
        .tiplocs
        .into_iter()
        .filter_map(TiplocRecord::into_station)
        .collect();

    if stations.is_empty() && total > 0 {
        return Err(TransitError::InvalidData(
            "no record in the export carries a location code".into(),
        ));
    }

    tracing::info!(
        export_date = export.export_date.as_deref().unwrap_or("unknown"),
        records = total,
        "loaded station export"
    );

    Ok(StationIndex::from_stations(stations))
}

/// Parse an export held in memory
pub fn parse_export(json: &str) -> Result<StationIndex> {
    build(serde_json::from_str(json)?)
}

/// Parse an export from any reader
pub fn read_export(reader: impl Read) -> Result<StationIndex> {
    build(serde_json::from_reader(reader)?)
}

/// Load an export from a file on disk
pub fn load_export(path: impl AsRef<Path>) -> Result<StationIndex> {
    let file = std::fs::File::open(path)?;
    read_export(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::traits::StationLookup;

    const SAMPLE: &str = r#"{
        "ExportDate": "2025-12-01T09:46:55",
        "ExportCount": 3,
        "Tiplocs": [
            {
                "Name": "London Euston",
                "Tiploc": "EUSTON",
                "Stanox": 72410,
                "InBPlan": true,
                "InTPS": true,
                "IsTiploc": true,
                "Codes": ["EUSTON"],
                "Details": {
                    "BPlan_TimingPoint": "T",
                    "TPS_StationType": "N",
                    "TPS_StationCategory": "A",
                    "CRS": "EUS",
                    "Nalco": 1444,
                    "OffNetwork": false,
                    "ForceLPB": null,
                    "CompulsoryStop": false,
                    "UIC": 7014440,
                    "Zone": 1
                },
                "Latitude": 51.5282,
                "Longitude": -0.1337
            },
            {
                "Name": "Camden Junction",
                "Tiploc": "CMDNJN",
                "Stanox": null,
                "Details": { "CRS": null, "OffNetwork": false, "CompulsoryStop": false },
                "Latitude": 0,
                "Longitude": 0
            },
            {
                "Name": "Nameless",
                "Tiploc": "  ",
                "Details": {},
                "Latitude": 52.0,
                "Longitude": -1.0
            }
        ]
    }"#;

    #[test]
    fn test_parse_export() {
        let index = parse_export(SAMPLE).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.mappable_len(), 1);

        let euston = index.get(&StationIdentifier::new("EUSTON")).unwrap();
        assert_eq!(&*euston.name, "London Euston");
        assert_eq!(euston.details.crs, Some(CrsCode::new("EUS")));
        assert_eq!(euston.details.stanox, Some(72410));
        assert_eq!(euston.details.zone, Some(1));
        assert_eq!(euston.lat_lng(), Some((51.5282, -0.1337)));

        let camden = index.get(&StationIdentifier::new("CMDNJN")).unwrap();
        assert!(!camden.is_mappable());
        assert!(camden.details.crs.is_none());
    }

    #[test]
    fn test_parse_export_rejects_garbage() {
        assert!(matches!(parse_export("not json"), Err(TransitError::Parse(_))));
        assert!(matches!(
            parse_export(r#"{ "Tiplocs": [ { "Name": "x", "Tiploc": "" } ] }"#),
            Err(TransitError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_export("/definitely/not/here.json"),
            Err(TransitError::Io(_))
        ));
    }
}
