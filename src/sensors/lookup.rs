use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProbeError;
use crate::domain::{valid_eu_aqi, AirComponents, Coordinate};

/// One observation returned by the sensor-lookup collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub aqi: Option<u8>,
    pub components: AirComponents,
    pub observed_at: Option<DateTime<Utc>>,
    /// Location of the answering station, when the provider reports one
    pub station: Option<Coordinate>,
}

impl SensorReading {
    /// Reading with out-of-scale AQI and invalid concentrations removed
    pub fn sanitized(self) -> Self {
        Self {
            aqi: self.aqi.and_then(valid_eu_aqi),
            components: self.components.sanitized(),
            ..self
        }
    }

    /// Structurally valid and non-empty
    pub fn is_usable(&self) -> bool {
        self.aqi.and_then(valid_eu_aqi).is_some() || !self.components.sanitized().is_empty()
    }
}

/// Point air-quality source consulted by the resolver
#[async_trait]
pub trait SensorLookup: Send + Sync {
    /// Whether a credential for the upstream provider is configured at all
    fn has_credential(&self) -> bool {
        true
    }

    async fn probe(&self, at: Coordinate) -> Result<SensorReading, ProbeError>;
}
