//! # railmap-transit
//!
//! Immutable station index for the national rail map.
//!
//! ## Features
//!
//! - **Static dataset**: stations are loaded once from a TIPLOC export and never mutated
//! - **Mappability**: stations without usable coordinates are kept for lookups
//!   but excluded from every spatial query
//! - **Spatial queries**: R-tree backed envelope and nearest-neighbour lookups
//!
//! ## Example
//!
//! ```
//! use railmap_transit::prelude::*;
//! use geo::{Point, Rect, coord};
//!
//! let euston = Station {
//!     code: StationIdentifier::new("EUSTON"),
//!     name: "London Euston".into(),
//!     location: Some(Point::new(-0.1337, 51.5282)),
//!     details: StationDetails { crs: Some(CrsCode::new("EUS")), ..Default::default() },
//! };
//!
//! let index = StationIndex::from_stations(vec![euston]);
//!
//! let london = Rect::new(coord! { x: -0.5, y: 51.3 }, coord! { x: 0.3, y: 51.7 });
//! assert_eq!(index.stations_in_bounds(london).len(), 1);
//! assert!(index.get(&StationIdentifier::new("EUSTON")).is_some());
//! ```

pub mod dataset;
pub mod identifiers;
pub mod index;
pub mod models;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::dataset::{load_export, parse_export};
    pub use crate::identifiers::*;
    pub use crate::index::StationIndex;
    pub use crate::models::{traits::*, types::*};
}

pub use prelude::*;
