use std::path::Path;

use anyhow::{Context, Result};
use geo::Point;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use railmap_core::route::RoutePath;
use railmap_transit::spatial::haversine_distance;
use railmap_transit::Station;

fn position(point: &Point) -> Vec<f64> {
    vec![point.x(), point.y()]
}

fn feature(value: Value, properties: serde_json::Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// The route line followed by one point feature per stop
pub fn route_to_geojson(route: &RoutePath) -> GeoJson {
    let mut features = Vec::with_capacity(route.len() + 1);

    if !route.is_empty() {
        let mut properties = serde_json::Map::new();
        properties.insert("feature_type".to_string(), serde_json::json!("route"));
        properties.insert("points".to_string(), serde_json::json!(route.len()));
        if let (Some(first), Some(last)) = (route.coordinates.first(), route.coordinates.last()) {
            let km = haversine_distance(*first, *last) / 1000.0;
            properties.insert("direct_distance_km".to_string(), serde_json::json!(km));
        }
        features.push(feature(
            Value::LineString(route.coordinates.iter().map(position).collect()),
            properties,
        ));
    }

    for (index, (point, stop)) in route.iter().enumerate() {
        let mut properties = serde_json::Map::new();
        properties.insert("feature_type".to_string(), serde_json::json!("stop"));
        properties.insert("index".to_string(), serde_json::json!(index));
        properties.insert("label".to_string(), serde_json::json!(stop.label));
        properties.insert("role".to_string(), serde_json::json!(stop.role));
        features.push(feature(Value::Point(position(point)), properties));
    }

    let bbox = route.bounds.map(|b| vec![b.min().x, b.min().y, b.max().x, b.max().y]);
    GeoJson::FeatureCollection(FeatureCollection {
        bbox,
        features,
        foreign_members: None,
    })
}

/// Mappable stations as point features
pub fn stations_to_geojson<'a>(stations: impl IntoIterator<Item = &'a Station>) -> GeoJson {
    let features = stations
        .into_iter()
        .filter_map(|station| {
            let location = station.location?;
            let mut properties = serde_json::Map::new();
            properties.insert("code".to_string(), serde_json::json!(station.code.as_str()));
            properties.insert("name".to_string(), serde_json::json!(&*station.name));
            if let Some(crs) = &station.details.crs {
                properties.insert("crs".to_string(), serde_json::json!(crs.as_str()));
            }
            Some(feature(Value::Point(position(&location)), properties))
        })
        .collect();

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Write to `path`, or stdout when no path is given
pub fn write_geojson(geojson: &GeoJson, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(geojson)?;
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote GeoJSON");
        }
        None => println!("{json}"),
    }
    Ok(())
}
