//! Facility sources and facility/air-quality correlation
pub mod correlation;
pub mod lookup;
pub mod overpass;

pub use correlation::{correlate, Correlation, DEFAULT_CORRELATION_RADIUS_KM};
pub use lookup::FacilityLookup;
#[cfg(test)]
pub use lookup::MockFacilityLookup;
pub use overpass::OverpassClient;
