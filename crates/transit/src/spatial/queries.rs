//! Spatial query utilities.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point, Rect};
use rstar::AABB;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Convert a lng/lat rectangle into an R-tree envelope
pub fn rect_to_envelope(rect: Rect) -> AABB<[f64; 2]> {
    let min = rect.min();
    let max = rect.max();
    AABB::from_corners([min.x, min.y], [max.x, max.y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;
    use rstar::Envelope;

    #[test]
    fn test_haversine_distance() {
        // London Euston to Manchester Piccadilly is roughly 262 km as the crow flies
        let euston = Point::new(-0.1337, 51.5282);
        let piccadilly = Point::new(-2.2309, 53.4774);

        let dist = haversine_distance(euston, piccadilly);
        assert!((dist - 262_000.0).abs() < 10_000.0); // Within 10km
    }

    #[test]
    fn test_rect_to_envelope() {
        let rect = Rect::new(coord! { x: 1.0, y: 5.0 }, coord! { x: -1.0, y: 3.0 });
        let envelope = rect_to_envelope(rect);
        assert_eq!(envelope.lower(), [-1.0, 3.0]);
        assert_eq!(envelope.upper(), [1.0, 5.0]);
        assert!(envelope.contains_point(&[0.0, 4.0]));
    }
}
