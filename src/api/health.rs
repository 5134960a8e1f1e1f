use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    sensors: ComponentHealth,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

/// GET /api/health
///
/// `degraded` when no sensor credential is configured: zones and simulation
/// still work, air-quality lookups report `api_key`.
pub async fn health_check(State(st): State<AppState>) -> Json<HealthResponse> {
    let sensors = if st.resolver.has_credential() {
        ComponentHealth {
            status: "healthy",
            error: None,
        }
    } else {
        ComponentHealth {
            status: "degraded",
            error: Some("sensor API key not configured"),
        }
    };
    Json(HealthResponse {
        status: sensors.status,
        timestamp: Utc::now(),
        checks: HealthChecks { sensors },
    })
}
