//! Facility aggregation into zoom-scaled zones

pub mod clusterer;
pub mod zone;

pub use clusterer::{cluster, clustering_distance_m, zoom_multiplier, ZoneClusterer};
pub use zone::{Zone, ZONE_PADDING_DEG};
