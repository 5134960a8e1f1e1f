use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinate;

/// Facility land-use category; unknown or missing values collapse to `Mixed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FacilityType {
    Industrial,
    Mining,
    Agriculture,
    Urban,
    #[default]
    Mixed,
}

impl FacilityType {
    pub const ALL: [FacilityType; 5] = [
        FacilityType::Industrial,
        FacilityType::Mining,
        FacilityType::Agriculture,
        FacilityType::Urban,
        FacilityType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::Industrial => "industrial",
            FacilityType::Mining => "mining",
            FacilityType::Agriculture => "agriculture",
            FacilityType::Urban => "urban",
            FacilityType::Mixed => "mixed",
        }
    }

    /// Human-readable summary of what this kind of site typically emits
    pub fn emissions_label(&self) -> &'static str {
        match self {
            FacilityType::Industrial => "Mixed Industrial Emissions",
            FacilityType::Mining => "Particulate Matter, Dust",
            FacilityType::Agriculture => "NH3, Pesticides",
            FacilityType::Urban => "Vehicle Emissions, NO2",
            FacilityType::Mixed => "Various Pollutants",
        }
    }
}

impl From<&str> for FacilityType {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "industrial" => FacilityType::Industrial,
            "mining" => FacilityType::Mining,
            "agriculture" => FacilityType::Agriculture,
            "urban" => FacilityType::Urban,
            _ => FacilityType::Mixed,
        }
    }
}

impl From<String> for FacilityType {
    fn from(s: String) -> Self {
        FacilityType::from(s.as_str())
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point facility returned by the facility-lookup collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(rename = "type", default)]
    pub kind: FacilityType,
    #[serde(default)]
    pub name: String,
}

impl Facility {
    pub fn new(
        id: impl Into<String>,
        coordinate: Coordinate,
        kind: FacilityType,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            coordinate,
            kind,
            name: name.into(),
        }
    }
}
