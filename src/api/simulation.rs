//! What-if emission simulation endpoints

use axum::{extract::State, Json};
use serde::Deserialize;

use super::error::ApiError;
use crate::{
    app::AppState,
    emissions::{
        catalog, CatalogEntry, GridBounds, Scenario, SimulationItem, SimulationOutput, WindConfig,
    },
};

/// Upper bound on items accepted in one request
pub const MAX_ITEMS: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(default)]
    pub items: Vec<SimulationItem>,
    #[serde(default = "WindConfig::calm")]
    pub wind: WindConfig,
    pub bounds: GridBounds,
    pub cell_size_km: Option<f64>,
}

/// POST /api/simulation
pub async fn run_simulation(
    State(st): State<AppState>,
    Json(req): Json<SimulationRequest>,
) -> Result<Json<SimulationOutput>, ApiError> {
    let limits = &st.cfg.simulation;
    let cell_size_km = req.cell_size_km.unwrap_or(limits.default_cell_size_km);
    if !(cell_size_km.is_finite() && cell_size_km > 0.0) {
        return Err(ApiError::BadRequest("cellSizeKm must be positive".into()));
    }
    if req.items.len() > MAX_ITEMS {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_ITEMS} items per simulation"
        )));
    }
    let (width, height) = req.bounds.dimensions(cell_size_km);
    if width.saturating_mul(height) > limits.max_grid_cells {
        return Err(ApiError::BadRequest(format!(
            "grid of {width}x{height} cells exceeds the limit of {}",
            limits.max_grid_cells
        )));
    }

    let bounds = req.bounds;
    let scenario = Scenario::with_items(req.items, req.wind)?;

    // CPU-bound; keep it off the async workers
    let output = tokio::task::spawn_blocking(move || scenario.simulate(&bounds, cell_size_km))
        .await
        .map_err(|e| ApiError::InternalError(format!("simulation task failed: {e}")))?;
    Ok(Json(output))
}

/// GET /api/simulation/catalog
pub async fn get_catalog() -> Json<Vec<CatalogEntry>> {
    Json(catalog())
}
