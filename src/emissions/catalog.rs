//! Placeable simulation items and their emission profiles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use super::PollutantLevels;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Industry,
    Natural,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    Mining,
    Agriculture,
    Manufacturing,
    Renewable,
    NonRenewable,
    Population,
    Forest,
    Valley,
    Mountain,
    River,
    Ocean,
    Lake,
}

impl ItemKind {
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::Mining
            | ItemKind::Agriculture
            | ItemKind::Manufacturing
            | ItemKind::Renewable
            | ItemKind::NonRenewable
            | ItemKind::Population => ItemCategory::Industry,
            _ => ItemCategory::Natural,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Mining => "Mining",
            ItemKind::Agriculture => "Agriculture",
            ItemKind::Manufacturing => "Manufacturing",
            ItemKind::Renewable => "Renewable Power",
            ItemKind::NonRenewable => "Non-Renewable Power",
            ItemKind::Population => "Population Centre",
            ItemKind::Forest => "Forest",
            ItemKind::Valley => "Valley",
            ItemKind::Mountain => "Mountain",
            ItemKind::River => "River",
            ItemKind::Ocean => "Ocean",
            ItemKind::Lake => "Lake",
        }
    }

    /// Index contribution at full influence; negative values clean the air
    pub fn base_pollution(&self) -> f64 {
        match self {
            ItemKind::Mining => 85.0,
            ItemKind::Agriculture => 25.0,
            ItemKind::Manufacturing => 75.0,
            ItemKind::Renewable => -10.0,
            ItemKind::NonRenewable => 90.0,
            ItemKind::Population => 40.0,
            ItemKind::Forest => -30.0,
            // valleys trap pollution
            ItemKind::Valley => 15.0,
            ItemKind::Mountain => -20.0,
            ItemKind::River => -15.0,
            ItemKind::Ocean => -25.0,
            ItemKind::Lake => -18.0,
        }
    }

    /// Per-pollutant contribution at full influence, ordered
    /// pm2_5, pm10, no2, so2, co, o3
    pub fn pollutant_deltas(&self) -> PollutantLevels {
        let v = match self {
            ItemKind::Mining => [40.0, 60.0, 30.0, 70.0, 25.0, 15.0],
            ItemKind::Agriculture => [15.0, 20.0, 10.0, 5.0, 15.0, 5.0],
            ItemKind::Manufacturing => [35.0, 45.0, 50.0, 40.0, 30.0, 20.0],
            ItemKind::Renewable => [-5.0, -5.0, -3.0, -2.0, -3.0, -2.0],
            ItemKind::NonRenewable => [45.0, 50.0, 60.0, 80.0, 40.0, 30.0],
            ItemKind::Population => [20.0, 25.0, 35.0, 15.0, 45.0, 25.0],
            ItemKind::Forest => [-15.0, -20.0, -10.0, -8.0, -12.0, -25.0],
            ItemKind::Valley => [10.0, 12.0, 8.0, 6.0, 8.0, 5.0],
            ItemKind::Mountain => [-10.0, -15.0, -8.0, -6.0, -8.0, -5.0],
            ItemKind::River => [-8.0, -10.0, -5.0, -4.0, -6.0, -3.0],
            ItemKind::Ocean => [-12.0, -15.0, -8.0, -6.0, -10.0, -8.0],
            ItemKind::Lake => [-9.0, -12.0, -6.0, -4.0, -7.0, -5.0],
        };
        PollutantLevels::from_array(v)
    }

    /// Properties a freshly placed item starts with
    pub fn default_properties(&self) -> BTreeMap<String, f64> {
        let pairs: &[(&str, f64)] = match self {
            ItemKind::Population => &[("population", 10000.0), ("area", 100.0), ("intensity", 1.0)],
            ItemKind::Mining => &[("workers", 500.0), ("area", 200.0), ("intensity", 2.0)],
            ItemKind::Manufacturing => &[("workers", 1000.0), ("area", 150.0), ("intensity", 1.5)],
            ItemKind::Agriculture => &[("area", 1000.0), ("workers", 50.0), ("intensity", 1.0)],
            ItemKind::Renewable => &[("capacity", 100.0), ("area", 80.0), ("intensity", 1.0)],
            ItemKind::NonRenewable => &[("capacity", 500.0), ("area", 120.0), ("intensity", 2.0)],
            ItemKind::Forest => &[("area", 500.0), ("density", 80.0), ("intensity", 1.5)],
            ItemKind::Valley => &[("area", 300.0), ("depth", 100.0), ("intensity", 1.0)],
            ItemKind::Mountain => &[("area", 400.0), ("height", 1000.0), ("intensity", 1.2)],
            ItemKind::River => &[("length", 200.0), ("flow", 100.0), ("intensity", 1.0)],
            ItemKind::Ocean => &[("area", 2000.0), ("depth", 1000.0), ("intensity", 2.0)],
            ItemKind::Lake => &[("area", 150.0), ("depth", 50.0), ("intensity", 1.0)],
        };
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// Catalog entry as exposed to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub kind: ItemKind,
    pub name: &'static str,
    pub category: ItemCategory,
    pub base_pollution: f64,
    pub pollutants: PollutantLevels,
    pub default_properties: BTreeMap<String, f64>,
}

pub fn catalog() -> Vec<CatalogEntry> {
    ItemKind::iter()
        .map(|kind| CatalogEntry {
            kind,
            name: kind.display_name(),
            category: kind.category(),
            base_pollution: kind.base_pollution(),
            pollutants: kind.pollutant_deltas(),
            default_properties: kind.default_properties(),
        })
        .collect()
}
