//! What-if emission simulation over a planar grid
pub mod catalog;
pub mod grid;
pub mod scenario;
pub mod simulator;
pub mod wind;

pub use catalog::{catalog, CatalogEntry, ItemCategory, ItemKind};
pub use grid::{GridBounds, GridCell, PollutantLevels, PollutionGrid, MAX_AQI_LIKE};
pub use scenario::{Scenario, ScenarioError};
pub use simulator::{simulate, PlanePoint, SimulationItem, SimulationOutput, DEFAULT_CELL_SIZE_KM};
pub use wind::WindConfig;
