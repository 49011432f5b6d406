//! Wire types returned by the lookup API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A scheduled train service calling at a station.
///
/// Only the origin and destination codes matter to the map; the remaining
/// fields are carried through for the sidebar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub train_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub head_code: String,
    #[serde(rename = "toc_Name", default)]
    pub toc_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_tiploc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scheduled_departure: String,
    #[serde(default)]
    pub actual_departure: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub destination_tiploc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination_location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scheduled_arrival: String,
    #[serde(default)]
    pub actual_arrival: Option<String>,

    #[serde(default)]
    pub last_reported_location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_reported_delay: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_reported_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cancelled: bool,
}

impl Journey {
    /// Minimal journey between two location codes
    pub fn between(
        train_id: impl Into<String>,
        origin_tiploc: impl Into<String>,
        destination_tiploc: impl Into<String>,
    ) -> Self {
        Self {
            train_id: train_id.into(),
            head_code: String::new(),
            toc_name: None,
            origin_tiploc: origin_tiploc.into(),
            origin_location: String::new(),
            scheduled_departure: String::new(),
            actual_departure: None,
            destination_tiploc: destination_tiploc.into(),
            destination_location: String::new(),
            scheduled_arrival: String::new(),
            actual_arrival: None,
            last_reported_location: None,
            last_reported_delay: 0,
            last_reported_type: String::new(),
            cancelled: false,
        }
    }

    pub fn with_locations(
        mut self,
        origin_location: impl Into<String>,
        destination_location: impl Into<String>,
    ) -> Self {
        self.origin_location = origin_location.into();
        self.destination_location = destination_location.into();
        self
    }

    pub fn scheduled_departure_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.scheduled_departure)
    }

    pub fn scheduled_arrival_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.scheduled_arrival)
    }
}

/// Coordinates of a single location as reported by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationLocation {
    #[serde(default)]
    pub id: i64,
    pub tiploc: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub stanox: Option<String>,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
