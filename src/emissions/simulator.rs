//! Deterministic what-if pollution grid.
//!
//! Every cell starts at the ambient baseline. Each placed item adds its
//! emission profile to the cells inside its footprint, scaled by a distance
//! falloff that wind may reshape. Totals are clamped once all items are
//! applied, so cleaners and emitters offset each other before clamping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::grid::{GridBounds, PollutionGrid, MAX_AQI_LIKE, REFERENCE_CELL_KM};
use super::{ItemKind, WindConfig};

/// Minimum footprint radius in reference cells
pub const MIN_BASE_RADIUS: f64 = 3.0;

/// Cells beyond this multiple of the radius are never visited
pub const REACH_MULTIPLIER: f64 = 3.0;

/// Influence exponent sharpening the falloff
pub const FALLOFF_EXPONENT: f64 = 1.2;

/// Contributions at or below this influence are ignored
pub const MIN_INFLUENCE: f64 = 0.01;

const DEFAULT_AREA: f64 = 1000.0;

/// Position on the simulation plane in km; `y` grows southward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

impl PlanePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationItem {
    pub id: String,
    pub kind: ItemKind,
    pub position: PlanePoint,
    /// Overrides of the kind's default properties
    #[serde(default)]
    pub properties: BTreeMap<String, f64>,
}

impl SimulationItem {
    pub fn new(id: impl Into<String>, kind: ItemKind, position: PlanePoint) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            properties: kind.default_properties(),
        }
    }

    /// Own value, else the kind's default
    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties
            .get(name)
            .copied()
            .or_else(|| self.kind.default_properties().get(name).copied())
    }

    fn positive_property(&self, name: &str) -> Option<f64> {
        self.property(name).filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn intensity(&self) -> f64 {
        self.positive_property("intensity").unwrap_or(1.0)
    }

    /// `sqrt(size / 1000)` where size is the area, else the population
    pub fn area_factor(&self) -> f64 {
        let size = self
            .positive_property("area")
            .or_else(|| self.positive_property("population"))
            .unwrap_or(DEFAULT_AREA);
        (size / DEFAULT_AREA).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    #[serde(flatten)]
    pub grid: PollutionGrid,
    pub average_aqi: f64,
}

/// Cell size used when the requested one is unusable
pub const DEFAULT_CELL_SIZE_KM: f64 = 1.0;

/// Pollution grid for `items` under `wind` over `bounds`.
///
/// Each axis holds at most [`MAX_GRID_SIDE`](super::grid::MAX_GRID_SIDE)
/// cells; larger extents are cut off at that many cells from the origin, and
/// `average_aqi` covers only the simulated part.
pub fn simulate(
    items: &[SimulationItem],
    wind: &WindConfig,
    bounds: &GridBounds,
    cell_size_km: f64,
) -> SimulationOutput {
    let cell_size_km = if cell_size_km.is_finite() && cell_size_km > 0.0 {
        cell_size_km
    } else {
        warn!(cell_size_km, "invalid cell size, using default");
        DEFAULT_CELL_SIZE_KM
    };
    let wind = wind.sanitized();
    let (width, height) = bounds.dimensions(cell_size_km);
    if bounds.exceeds_grid_cap(cell_size_km) {
        warn!(
            width_km = bounds.width_km,
            height_km = bounds.height_km,
            cell_size_km,
            width,
            height,
            "bounds exceed the grid cap, simulating a truncated extent"
        );
    }
    let mut grid = PollutionGrid::ambient(width, height, cell_size_km);

    for item in items {
        apply_item(&mut grid, item, &wind, bounds, cell_size_km);
    }

    for cell in grid.cells.iter_mut() {
        cell.aqi = cell.aqi.clamp(0.0, MAX_AQI_LIKE);
        cell.pollutants.clamp_non_negative();
    }

    let average_aqi = grid.average_aqi();
    debug!(
        items = items.len(),
        width,
        height,
        average_aqi,
        wind = wind.is_active(),
        "simulation complete"
    );
    SimulationOutput { grid, average_aqi }
}

fn apply_item(
    grid: &mut PollutionGrid,
    item: &SimulationItem,
    wind: &WindConfig,
    bounds: &GridBounds,
    cell_size_km: f64,
) {
    let gx = ((item.position.x - bounds.min_x) / cell_size_km).floor();
    let gy = ((item.position.y - bounds.min_y) / cell_size_km).floor();
    if !gx.is_finite() || !gy.is_finite() {
        warn!(id = %item.id, "item position is not finite, skipping");
        return;
    }

    let intensity = item.intensity();
    let area_factor = item.area_factor();
    let zoom_scale = cell_size_km / REFERENCE_CELL_KM;
    let radius = (intensity * area_factor * 5.0).max(MIN_BASE_RADIUS) / zoom_scale;
    let reach = radius * REACH_MULTIPLIER;

    let max_x = grid.width as f64 - 1.0;
    let max_y = grid.height as f64 - 1.0;
    let x_lo = (gx - reach).floor().max(0.0);
    let x_hi = (gx + reach).ceil().min(max_x);
    let y_lo = (gy - reach).floor().max(0.0);
    let y_hi = (gy + reach).ceil().min(max_y);
    if x_lo > x_hi || y_lo > y_hi {
        return;
    }

    let base = item.kind.base_pollution();
    let deltas = item.kind.pollutant_deltas();
    let active_wind = wind.is_active();

    for cy in (y_lo as usize)..=(y_hi as usize) {
        for cx in (x_lo as usize)..=(x_hi as usize) {
            let dx = cx as f64 - gx;
            let dy = cy as f64 - gy;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > reach {
                continue;
            }

            let influence = if active_wind {
                wind.shaped_influence(dx, dy, distance, radius)
            } else {
                (1.0 - distance / radius).max(0.0)
            };
            let influence = influence.powf(FALLOFF_EXPONENT);
            if influence <= MIN_INFLUENCE {
                continue;
            }

            let scale = influence * intensity * area_factor;
            if let Some(cell) = grid.get_mut(cx, cy) {
                cell.aqi += base * scale;
                cell.pollutants.add_scaled(&deltas, scale);
            }
        }
    }
}
