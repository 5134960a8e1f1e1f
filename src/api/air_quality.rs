//! Air-quality estimate endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::error::ApiError;
use crate::{
    app::AppState,
    domain::{eu_level_name, eu_to_us, us_level_name, Coordinate},
    sensors::AqiEstimate,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AirQualityQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

impl AirQualityQuery {
    pub fn coordinate(&self) -> Result<Coordinate, ApiError> {
        self.validate()?;
        let at = Coordinate::new(self.lat, self.lon);
        if !at.is_finite() {
            return Err(ApiError::BadRequest("lat and lon must be finite".into()));
        }
        Ok(at)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityResponse {
    #[serde(flatten)]
    pub estimate: AqiEstimate,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_aqi: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_level: Option<&'static str>,
}

impl From<AqiEstimate> for AirQualityResponse {
    fn from(estimate: AqiEstimate) -> Self {
        let level = estimate.aqi.map(eu_level_name);
        let us_aqi = estimate.aqi.and_then(eu_to_us);
        Self {
            timestamp: estimate.observed_at.unwrap_or_else(Utc::now),
            estimate,
            level,
            us_aqi,
            us_level: us_aqi.map(|v| us_level_name(f64::from(v))),
        }
    }
}

/// GET /api/air-quality?lat=&lon=
pub async fn get_air_quality(
    State(st): State<AppState>,
    Query(q): Query<AirQualityQuery>,
) -> Result<Json<AirQualityResponse>, ApiError> {
    let at = q.coordinate()?;
    let estimate = st.resolver.resolve(at).await;
    info!(
        lat = at.lat,
        lon = at.lon,
        source = ?estimate.source,
        aqi = ?estimate.aqi,
        "air quality resolved"
    );
    Ok(Json(estimate.into()))
}
