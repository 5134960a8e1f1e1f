//! Air-quality estimation, facility zoning and what-if emission simulation
//! served over HTTP.
//!
//! - [`sensors`] resolves a best-effort air-quality estimate for any point
//! - [`zones`] aggregates facilities into zoom-scaled zones
//! - [`emissions`] simulates item placements on a pollution grid
//! - [`api`] exposes all of the above through axum

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod emissions;
pub mod facilities;
pub mod sensors;
pub mod telemetry;
pub mod zones;
