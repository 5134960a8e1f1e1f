use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Coordinate, Facility};

/// Source of facilities around a point
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacilityLookup: Send + Sync {
    /// Facilities within `radius_deg` degrees of `center`
    async fn lookup(&self, center: Coordinate, radius_deg: f64) -> Result<Vec<Facility>>;
}
