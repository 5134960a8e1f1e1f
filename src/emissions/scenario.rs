//! Editable scenario session holding placed items and wind settings

use thiserror::Error;
use uuid::Uuid;

use super::grid::GridBounds;
use super::simulator::{simulate, PlanePoint, SimulationItem, SimulationOutput};
use super::{ItemKind, WindConfig};

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("no item with id {0}")]
    UnknownItem(String),

    #[error("property {name} must be a finite number, got {value}")]
    InvalidProperty { name: String, value: f64 },

    #[error("item id {0} is used more than once")]
    DuplicateItem(String),
}

#[derive(Debug, Clone, Default)]
pub struct Scenario {
    items: Vec<SimulationItem>,
    wind: WindConfig,
}

impl Scenario {
    pub fn new(wind: WindConfig) -> Self {
        Self {
            items: Vec::new(),
            wind,
        }
    }

    /// Scenario over items placed elsewhere, checked the way the editing
    /// operations check them
    pub fn with_items(items: Vec<SimulationItem>, wind: WindConfig) -> Result<Self, ScenarioError> {
        let mut scenario = Self::new(WindConfig::calm());
        scenario.set_wind(wind);
        for item in items {
            if scenario.items.iter().any(|i| i.id == item.id) {
                return Err(ScenarioError::DuplicateItem(item.id));
            }
            if let Some((name, value)) = item.properties.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ScenarioError::InvalidProperty {
                    name: name.clone(),
                    value: *value,
                });
            }
            scenario.items.push(item);
        }
        Ok(scenario)
    }

    pub fn items(&self) -> &[SimulationItem] {
        &self.items
    }

    pub fn wind(&self) -> &WindConfig {
        &self.wind
    }

    /// Places a new item with its kind's default properties and returns its id
    pub fn place(&mut self, kind: ItemKind, position: PlanePoint) -> String {
        let id = Uuid::new_v4().to_string();
        self.items.push(SimulationItem::new(id.clone(), kind, position));
        id
    }

    pub fn set_property(&mut self, id: &str, name: &str, value: f64) -> Result<(), ScenarioError> {
        if !value.is_finite() {
            return Err(ScenarioError::InvalidProperty {
                name: name.to_string(),
                value,
            });
        }
        self.item_mut(id)?.properties.insert(name.to_string(), value);
        Ok(())
    }

    pub fn move_item(&mut self, id: &str, position: PlanePoint) -> Result<(), ScenarioError> {
        self.item_mut(id)?.position = position;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<SimulationItem, ScenarioError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| ScenarioError::UnknownItem(id.to_string()))?;
        Ok(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn set_wind(&mut self, wind: WindConfig) {
        self.wind = wind.sanitized();
    }

    pub fn simulate(&self, bounds: &GridBounds, cell_size_km: f64) -> SimulationOutput {
        simulate(&self.items, &self.wind, bounds, cell_size_km)
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut SimulationItem, ScenarioError> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ScenarioError::UnknownItem(id.to_string()))
    }
}
