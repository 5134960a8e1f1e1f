use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::facilities::{FacilityLookup, OverpassClient};
use crate::sensors::{OpenWeatherClient, SensorLookup, SensorResolver};
use crate::zones::ZoneClusterer;

/// Services shared by every request; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub resolver: Arc<SensorResolver>,
    pub facilities: Arc<dyn FacilityLookup>,
    pub clusterer: ZoneClusterer,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let sensors = &cfg.sensors;
        let lookup = OpenWeatherClient::new(
            sensors.base_url.clone(),
            sensors.api_key.clone(),
            Duration::from_secs(sensors.http_timeout_secs),
        )
        .context("failed to build sensor client")?;
        if !lookup.has_credential() {
            warn!("no sensor API key configured, air-quality lookups will be unavailable");
        }

        let facilities = OverpassClient::new(
            cfg.facilities.base_url.clone(),
            Duration::from_secs(cfg.facilities.http_timeout_secs),
        )
        .context("failed to build facility client")?;

        info!(
            sensors = %sensors.base_url,
            facilities = %cfg.facilities.base_url,
            "services initialised"
        );
        Ok(Self::with_services(cfg, Arc::new(lookup), Arc::new(facilities)))
    }

    /// Wires explicit collaborators, used by tests and alternative backends
    pub fn with_services(
        cfg: Config,
        sensors: Arc<dyn SensorLookup>,
        facilities: Arc<dyn FacilityLookup>,
    ) -> Self {
        let resolver = SensorResolver::new(sensors, cfg.sensors.resolver_settings());
        Self {
            cfg: Arc::new(cfg),
            resolver: Arc::new(resolver),
            facilities,
            clusterer: ZoneClusterer,
        }
    }
}
