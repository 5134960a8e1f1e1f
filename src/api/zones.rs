use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use super::error::ApiError;
use crate::{
    app::AppState,
    domain::{BoundingBox, Coordinate},
    zones::Zone,
};

#[derive(Debug, Deserialize, Validate)]
pub struct ZonesQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub south: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub west: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub north: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub east: f64,
    #[validate(range(min = 0.0, max = 24.0))]
    pub zoom: f64,
}

impl ZonesQuery {
    fn bounds(&self) -> Result<BoundingBox, ApiError> {
        self.validate()?;
        let b = BoundingBox::new(
            Coordinate::new(self.south, self.west),
            Coordinate::new(self.north, self.east),
        );
        if !b.south_west.is_finite() || !b.north_east.is_finite() || !self.zoom.is_finite() {
            return Err(ApiError::BadRequest("bounds and zoom must be finite".into()));
        }
        if self.south > self.north || self.west > self.east {
            return Err(ApiError::BadRequest(
                "south/west must not exceed north/east".into(),
            ));
        }
        Ok(b)
    }
}

#[derive(Debug, Serialize)]
pub struct ZonesResponse {
    pub zoom: f64,
    pub zones: Vec<Zone>,
}

/// GET /api/zones?south=&west=&north=&east=&zoom=
pub async fn get_zones(
    State(st): State<AppState>,
    Query(q): Query<ZonesQuery>,
) -> Result<Json<ZonesResponse>, ApiError> {
    let bounds = q.bounds()?;
    let facilities = st
        .facilities
        .lookup(bounds.center(), bounds.half_span_deg())
        .await
        .map_err(ApiError::upstream)?;
    let zones = st.clusterer.cluster(&facilities, q.zoom);
    debug!(
        facilities = facilities.len(),
        zones = zones.len(),
        zoom = q.zoom,
        "zones computed"
    );
    Ok(Json(ZonesResponse { zoom: q.zoom, zones }))
}
