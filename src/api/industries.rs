//! Facility listing and facility/air correlation endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::ApiError;
use crate::{
    app::AppState,
    domain::{BoundingBox, Coordinate, Facility},
    facilities::{correlate, Correlation, DEFAULT_CORRELATION_RADIUS_KM},
};

/// Kilometres per degree of latitude, used to size correlation lookups
const KM_PER_DEGREE: f64 = 111.0;

/// Either a map viewport (`south/west/north/east`) or a point with an
/// optional radius in degrees
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AreaQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub south: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub west: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub north: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub east: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub radius: Option<f64>,
}

impl AreaQuery {
    /// Lookup centre and radius in degrees
    pub fn lookup_area(&self, default_radius_deg: f64) -> Result<(Coordinate, f64), ApiError> {
        self.validate()?;
        let area = match (self.south, self.west, self.north, self.east, self.lat, self.lon) {
            (Some(s), Some(w), Some(n), Some(e), _, _) => {
                if s > n || w > e {
                    return Err(ApiError::BadRequest(
                        "south/west must not exceed north/east".into(),
                    ));
                }
                let b = BoundingBox::new(Coordinate::new(s, w), Coordinate::new(n, e));
                (b.center(), b.half_span_deg())
            }
            (_, _, _, _, Some(lat), Some(lon)) => (
                Coordinate::new(lat, lon),
                self.radius.unwrap_or(default_radius_deg),
            ),
            _ => {
                return Err(ApiError::BadRequest(
                    "expected south, west, north and east, or lat and lon".into(),
                ))
            }
        };
        if !area.0.is_finite() || !area.1.is_finite() {
            return Err(ApiError::BadRequest("area must be finite".into()));
        }
        Ok(area)
    }
}

#[derive(Debug, Serialize)]
pub struct IndustriesResponse {
    pub industries: Vec<Facility>,
}

/// GET /api/industries
pub async fn list_industries(
    State(st): State<AppState>,
    Query(q): Query<AreaQuery>,
) -> Result<Json<IndustriesResponse>, ApiError> {
    let (center, radius_deg) = q.lookup_area(st.cfg.facilities.default_radius_deg)?;
    let industries = st
        .facilities
        .lookup(center, radius_deg)
        .await
        .map_err(ApiError::upstream)?;
    Ok(Json(IndustriesResponse { industries }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CorrelationQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
    /// Kilometres
    #[validate(range(min = 0.1, max = 200.0))]
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CorrelationResponse {
    pub correlations: Vec<Correlation>,
}

/// GET /api/industries/correlation?lat=&lon=&radius=
pub async fn get_correlation(
    State(st): State<AppState>,
    Query(q): Query<CorrelationQuery>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    q.validate()?;
    let at = Coordinate::new(q.lat, q.lon);
    let radius_km = q.radius.unwrap_or(DEFAULT_CORRELATION_RADIUS_KM);
    if !at.is_finite() || !radius_km.is_finite() {
        return Err(ApiError::BadRequest("lat, lon and radius must be finite".into()));
    }

    let facilities = st
        .facilities
        .lookup(at, radius_km / KM_PER_DEGREE)
        .await
        .map_err(ApiError::upstream)?;
    Ok(Json(CorrelationResponse {
        correlations: correlate(at, &facilities, radius_km),
    }))
}
