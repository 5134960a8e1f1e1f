use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::sensors::ResolverSettings;

pub const ENV_PREFIX: &str = "AIRMAP__";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub sensors: SensorsConfig,
    pub facilities: FacilitiesConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    /// `*` allows any origin
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            request_timeout_secs: 30,
            enable_cors: true,
            cors_origin: "*".into(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub primary_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub max_concurrent_probes: usize,
    pub http_timeout_secs: u64,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            base_url: crate::sensors::openweather::DEFAULT_BASE_URL.into(),
            api_key: None,
            primary_timeout_secs: 10,
            probe_timeout_secs: 4,
            max_concurrent_probes: 4,
            http_timeout_secs: 15,
        }
    }
}

impl SensorsConfig {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            primary_timeout: Duration::from_secs(self.primary_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            max_concurrent_probes: self.max_concurrent_probes.max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilitiesConfig {
    pub base_url: String,
    pub http_timeout_secs: u64,
    pub default_radius_deg: f64,
}

impl Default for FacilitiesConfig {
    fn default() -> Self {
        Self {
            base_url: crate::facilities::overpass::DEFAULT_BASE_URL.into(),
            http_timeout_secs: 30,
            default_radius_deg: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_cell_size_km: f64,
    pub max_grid_cells: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_cell_size_km: 1.0,
            max_grid_cells: 250_000,
        }
    }
}

impl Config {
    /// Built-in defaults, then `config/default.toml`, then `AIRMAP__*` env vars
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file(DEFAULT_CONFIG_PATH))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment.extract().context("invalid configuration")
    }
}
