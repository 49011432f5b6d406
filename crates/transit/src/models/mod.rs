//! Station data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::StationLookup;
pub use types::{Result, Station, StationDetails, TransitError};
