use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Pollutants tracked by sensors and by the emission simulator
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter, EnumString,
)]
pub enum Pollutant {
    #[serde(rename = "pm2_5", alias = "pm25")]
    #[strum(to_string = "pm2_5", serialize = "pm25")]
    Pm25,
    #[serde(rename = "pm10")]
    #[strum(serialize = "pm10")]
    Pm10,
    #[serde(rename = "no2")]
    #[strum(serialize = "no2")]
    No2,
    #[serde(rename = "so2")]
    #[strum(serialize = "so2")]
    So2,
    #[serde(rename = "co")]
    #[strum(serialize = "co")]
    Co,
    #[serde(rename = "o3")]
    #[strum(serialize = "o3")]
    O3,
}

impl Pollutant {
    pub const COUNT: usize = 6;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Pollutant concentrations as reported by a sensor; any field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirComponents {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    pub o3: Option<f64>,
}

impl AirComponents {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        let slot = match pollutant {
            Pollutant::Pm25 => &mut self.pm2_5,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::No2 => &mut self.no2,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Co => &mut self.co,
            Pollutant::O3 => &mut self.o3,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        Pollutant::iter().all(|p| self.get(p).is_none())
    }

    /// Drops negative and non-finite concentrations
    pub fn sanitized(mut self) -> Self {
        for p in Pollutant::iter() {
            let v = self.get(p).filter(|v| v.is_finite() && *v >= 0.0);
            self.set(p, v);
        }
        self
    }
}

// ============================================================================
// EU air-quality index helpers
// ============================================================================

pub const EU_AQI_MIN: u8 = 1;
pub const EU_AQI_MAX: u8 = 5;

/// Accepts only values on the EU 1–5 ordinal scale
pub fn valid_eu_aqi(aqi: u8) -> Option<u8> {
    (EU_AQI_MIN..=EU_AQI_MAX).contains(&aqi).then_some(aqi)
}

/// Clamped rounding of a weighted index back onto the EU scale
pub fn round_eu_aqi(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    // weighting leaves noise like 3.4999999999999996 on exact halves
    let value = (value * 1e9).round() / 1e9;
    Some(value.round().clamp(EU_AQI_MIN as f64, EU_AQI_MAX as f64) as u8)
}

pub fn eu_level_name(aqi: u8) -> &'static str {
    match aqi {
        1 => "Very Good",
        2 => "Good",
        3 => "Fair",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

/// Representative US AQI for an EU level (band midpoints)
pub fn eu_to_us(aqi: u8) -> Option<u16> {
    match aqi {
        1 => Some(25),
        2 => Some(75),
        3 => Some(125),
        4 => Some(175),
        5 => Some(250),
        _ => None,
    }
}

pub fn us_level_name(aqi: f64) -> &'static str {
    match aqi {
        a if a <= 50.0 => "Good",
        a if a <= 100.0 => "Moderate",
        a if a <= 150.0 => "Unhealthy for Sensitive",
        a if a <= 200.0 => "Unhealthy",
        a if a <= 300.0 => "Very Unhealthy",
        _ => "Hazardous",
    }
}
