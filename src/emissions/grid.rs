use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;

use crate::domain::Pollutant;

/// Reference cell edge at which item radii are unscaled
pub const REFERENCE_CELL_KM: f64 = 1.0;

/// Upper bound on cells per grid axis
pub const MAX_GRID_SIDE: usize = 2000;

pub const MAX_AQI_LIKE: f64 = 500.0;

/// Dense per-pollutant values, serialized as a `{"pm2_5": .., ...}` map
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollutantLevels([f64; Pollutant::COUNT]);

impl PollutantLevels {
    pub const fn from_array(values: [f64; Pollutant::COUNT]) -> Self {
        Self(values)
    }

    /// Background concentrations of a cell nothing touches
    pub const fn ambient() -> Self {
        Self([10.0, 15.0, 20.0, 10.0, 15.0, 25.0])
    }

    pub fn add_scaled(&mut self, other: &PollutantLevels, scale: f64) {
        for (v, d) in self.0.iter_mut().zip(other.0.iter()) {
            *v += d * scale;
        }
    }

    pub fn clamp_non_negative(&mut self) {
        for v in self.0.iter_mut() {
            *v = v.max(0.0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::iter().map(move |p| (p, self[p]))
    }
}

impl Index<Pollutant> for PollutantLevels {
    type Output = f64;

    fn index(&self, p: Pollutant) -> &f64 {
        &self.0[p.index()]
    }
}

impl IndexMut<Pollutant> for PollutantLevels {
    fn index_mut(&mut self, p: Pollutant) -> &mut f64 {
        &mut self.0[p.index()]
    }
}

impl Serialize for PollutantLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Pollutant::COUNT))?;
        for (p, v) in self.iter() {
            map.serialize_entry(&p.to_string(), &v)?;
        }
        map.end()
    }
}

/// Planar area to simulate, in km. `y` grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBounds {
    #[serde(default)]
    pub min_x: f64,
    #[serde(default)]
    pub min_y: f64,
    pub width_km: f64,
    pub height_km: f64,
}

impl GridBounds {
    pub fn new(min_x: f64, min_y: f64, width_km: f64, height_km: f64) -> Self {
        Self {
            min_x,
            min_y,
            width_km,
            height_km,
        }
    }

    /// Cell counts along x and y, at least one each and at most
    /// [`MAX_GRID_SIDE`]
    pub fn dimensions(&self, cell_size_km: f64) -> (usize, usize) {
        (
            cells_along(self.width_km, cell_size_km),
            cells_along(self.height_km, cell_size_km),
        )
    }

    /// Whether [`MAX_GRID_SIDE`] cuts off part of the requested extent
    pub fn exceeds_grid_cap(&self, cell_size_km: f64) -> bool {
        [self.width_km, self.height_km]
            .iter()
            .any(|extent| (extent / cell_size_km).ceil() > MAX_GRID_SIDE as f64)
    }
}

fn cells_along(extent_km: f64, cell_size_km: f64) -> usize {
    let n = (extent_km / cell_size_km).ceil();
    if n.is_finite() && n >= 1.0 {
        (n as usize).min(MAX_GRID_SIDE)
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub x: usize,
    pub y: usize,
    pub aqi: f64,
    pub pollutants: PollutantLevels,
}

impl GridCell {
    pub fn ambient(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            aqi: 50.0,
            pollutants: PollutantLevels::ambient(),
        }
    }
}

/// Row-major cell grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionGrid {
    pub width: usize,
    pub height: usize,
    pub cell_size_km: f64,
    pub cells: Vec<GridCell>,
}

impl PollutionGrid {
    pub fn ambient(width: usize, height: usize, cell_size_km: f64) -> Self {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| GridCell::ambient(x, y)))
            .collect();
        Self {
            width,
            height,
            cell_size_km,
            cells,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&GridCell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut GridCell> {
        if x < self.width && y < self.height {
            self.cells.get_mut(y * self.width + x)
        } else {
            None
        }
    }

    pub fn average_aqi(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.cells.iter().map(|c| c.aqi).sum::<f64>() / self.cells.len() as f64
    }
}
