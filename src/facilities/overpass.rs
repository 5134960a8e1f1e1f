//! Overpass API facility source
//!
//! Queries OpenStreetMap land-use, fuel and settlement features around a
//! point and maps their tags onto [`FacilityType`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use super::FacilityLookup;
use crate::domain::{Coordinate, Facility, FacilityType};

pub const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Metres per degree used to turn a degree radius into an `around` filter
const METRES_PER_DEGREE: f64 = 111_000.0;

const WAY_FILTERS: [(&str, &str); 7] = [
    ("landuse", "industrial"),
    ("landuse", "quarry"),
    ("landuse", "farmland"),
    ("landuse", "residential"),
    ("landuse", "commercial"),
    ("landuse", "retail"),
    ("amenity", "fuel"),
];

const NODE_FILTERS: [(&str, &str); 2] = [("place", "city"), ("place", "town")];

#[derive(Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
}

impl OverpassClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("airmap-engine/0.1"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

/// Overpass QL union of every tracked feature within `radius_deg` of `center`
pub fn build_query(center: Coordinate, radius_deg: f64) -> String {
    let around = format!(
        "(around:{},{},{})",
        radius_deg * METRES_PER_DEGREE,
        center.lat,
        center.lon
    );
    let mut q = String::from("[out:json][timeout:25];\n(\n");
    for (key, value) in WAY_FILTERS {
        q.push_str(&format!("  way[\"{key}\"=\"{value}\"]{around};\n"));
    }
    for (key, value) in NODE_FILTERS {
        q.push_str(&format!("  node[\"{key}\"=\"{value}\"]{around};\n"));
    }
    q.push_str(");\nout center meta;\n");
    q
}

pub fn classify(tags: &HashMap<String, String>) -> FacilityType {
    let landuse = tags.get("landuse").map(String::as_str);
    let place = tags.get("place").map(String::as_str);
    let amenity = tags.get("amenity").map(String::as_str);

    match (landuse, place, amenity) {
        (Some("quarry"), _, _) => FacilityType::Mining,
        (Some("farmland"), _, _) => FacilityType::Agriculture,
        (Some("residential" | "commercial" | "retail"), _, _) => FacilityType::Urban,
        (_, Some("city" | "town"), _) => FacilityType::Urban,
        (_, _, Some("fuel")) => FacilityType::Industrial,
        (Some("industrial"), _, _) => FacilityType::Industrial,
        _ => FacilityType::Mixed,
    }
}

fn fallback_name(tags: &HashMap<String, String>) -> &'static str {
    match (
        tags.get("landuse").map(String::as_str),
        tags.get("amenity").map(String::as_str),
        tags.get("place").map(String::as_str),
    ) {
        (Some("industrial"), _, _) => "Industrial Region",
        (Some("quarry"), _, _) => "Mining Region",
        (Some("farmland"), _, _) => "Agricultural Region",
        (Some("residential"), _, _) => "Residential Area",
        (Some("commercial"), _, _) => "Commercial District",
        (Some("retail"), _, _) => "Retail Zone",
        (_, Some("fuel"), _) => "Fuel Station",
        (_, _, Some("city" | "town")) => "Urban Center",
        _ => "Mixed Development",
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type", default)]
    element_type: String,
    id: Option<i64>,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<LatLon>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn coordinate(&self) -> Option<Coordinate> {
        let c = match (&self.center, self.lat, self.lon) {
            (Some(c), _, _) => Coordinate::new(c.lat, c.lon),
            (None, Some(lat), Some(lon)) => Coordinate::new(lat, lon),
            _ => return None,
        };
        c.is_finite().then_some(c)
    }

    fn into_facility(self, index: usize) -> Option<Facility> {
        let coordinate = self.coordinate()?;
        let kind = classify(&self.tags);
        let id = match self.id {
            Some(id) if self.element_type.is_empty() => id.to_string(),
            Some(id) => format!("{}/{}", self.element_type, id),
            None => index.to_string(),
        };
        let name = self
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| fallback_name(&self.tags).to_string());
        Some(Facility::new(id, coordinate, kind, name))
    }
}

#[async_trait]
impl FacilityLookup for OverpassClient {
    async fn lookup(&self, center: Coordinate, radius_deg: f64) -> Result<Vec<Facility>> {
        debug!(lat = center.lat, lon = center.lon, radius_deg, "querying overpass");
        let body: OverpassResponse = self
            .client
            .post(&self.base_url)
            .body(build_query(center, radius_deg))
            .send()
            .await
            .context("overpass request failed")?
            .error_for_status()
            .context("overpass returned an error status")?
            .json()
            .await
            .context("failed to decode overpass response")?;

        let total = body.elements.len();
        let facilities: Vec<Facility> = body
            .elements
            .into_iter()
            .enumerate()
            .filter_map(|(i, e)| e.into_facility(i))
            .collect();
        info!(
            elements = total,
            facilities = facilities.len(),
            "overpass lookup complete"
        );
        Ok(facilities)
    }
}
