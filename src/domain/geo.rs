use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by every great-circle computation in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ============================================================================
// Coordinates
// ============================================================================

/// WGS84 point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometres (Haversine)
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }

    /// Great-circle distance to `other` in metres
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        self.distance_km(other) * 1000.0
    }

    /// Point displaced by raw degree offsets (no projection)
    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self::new(self.lat + dlat, self.lon + dlon)
    }

    /// `"lat_lon"` key with four fixed decimals
    pub fn key(&self) -> String {
        format!("{:.4}_{:.4}", self.lat, self.lon)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance in kilometres between two lat/lon pairs
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

// ============================================================================
// Bounding boxes
// ============================================================================

/// Axis-aligned lat/lon box given by its south-west and north-east corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingBox {
    pub fn new(south_west: Coordinate, north_east: Coordinate) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest box enclosing every point; `None` for an empty iterator
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(*p, *p),
                Some(b) => Self::new(
                    Coordinate::new(b.south_west.lat.min(p.lat), b.south_west.lon.min(p.lon)),
                    Coordinate::new(b.north_east.lat.max(p.lat), b.north_east.lon.max(p.lon)),
                ),
            })
        })
    }

    /// Box grown by `degrees` on every side
    pub fn padded(&self, degrees: f64) -> Self {
        Self::new(
            self.south_west.offset(-degrees, -degrees),
            self.north_east.offset(degrees, degrees),
        )
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lon + self.north_east.lon) / 2.0,
        )
    }

    /// East-west extent measured along the southern edge, in km
    pub fn width_km(&self) -> f64 {
        haversine_km(
            self.south_west.lat,
            self.south_west.lon,
            self.south_west.lat,
            self.north_east.lon,
        )
    }

    /// North-south extent measured along the western edge, in km
    pub fn height_km(&self) -> f64 {
        haversine_km(
            self.south_west.lat,
            self.south_west.lon,
            self.north_east.lat,
            self.south_west.lon,
        )
    }

    pub fn area_km2(&self) -> f64 {
        self.width_km() * self.height_km()
    }

    /// Half of the larger side, in degrees
    pub fn half_span_deg(&self) -> f64 {
        let dlat = (self.north_east.lat - self.south_west.lat).abs();
        let dlon = (self.north_east.lon - self.south_west.lon).abs();
        dlat.max(dlon) / 2.0
    }
}
