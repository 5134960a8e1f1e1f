//! OpenWeather air-pollution API client
//!
//! Implements [`SensorLookup`] over `GET {base}/air_pollution`. The response
//! echoes the grid coordinate it answered for, which is used as the station
//! location so probes snapped to the same grid point collapse into one sample.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client, StatusCode,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ProbeError, SensorLookup, SensorReading};
use crate::domain::{AirComponents, Coordinate};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("airmap-engine/0.1"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn url(&self) -> String {
        format!("{}/air_pollution", self.base_url.trim_end_matches('/'))
    }

    fn parse(&self, at: Coordinate, body: OwmResponse) -> Result<SensorReading, ProbeError> {
        let Some(entry) = body.list.into_iter().next() else {
            return Err(ProbeError::Empty);
        };
        let reading = SensorReading {
            aqi: entry.main.aqi,
            components: AirComponents {
                pm2_5: entry.components.pm2_5,
                pm10: entry.components.pm10,
                no2: entry.components.no2,
                so2: entry.components.so2,
                co: entry.components.co,
                o3: entry.components.o3,
            },
            observed_at: entry.dt.and_then(|dt| DateTime::<Utc>::from_timestamp(dt, 0)),
            station: body
                .coord
                .map(|c| Coordinate::new(c.lat, c.lon))
                .or(Some(at)),
        };
        if !reading.is_usable() {
            return Err(ProbeError::Empty);
        }
        Ok(reading.sanitized())
    }
}

#[async_trait]
impl SensorLookup for OpenWeatherClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn probe(&self, at: Coordinate) -> Result<SensorReading, ProbeError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(ProbeError::MissingCredential);
        };

        debug!(lat = at.lat, lon = at.lon, "probing OpenWeather air pollution");
        let resp = self
            .client
            .get(self.url())
            .query(&[
                ("lat", at.lat.to_string()),
                ("lon", at.lon.to_string()),
                ("appid", key.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(lat = at.lat, lon = at.lon, "OpenWeather rate limit hit");
            }
            return Err(ProbeError::Status(status.as_u16()));
        }

        let body: OwmResponse = resp
            .json()
            .await
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;
        self.parse(at, body)
    }
}

// OpenWeather API response structures
#[derive(Debug, Deserialize)]
struct OwmResponse {
    coord: Option<OwmCoord>,
    #[serde(default)]
    list: Vec<OwmEntry>,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwmEntry {
    main: OwmMain,
    #[serde(default)]
    components: OwmComponents,
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    aqi: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct OwmComponents {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    no2: Option<f64>,
    so2: Option<f64>,
    co: Option<f64>,
    o3: Option<f64>,
}
