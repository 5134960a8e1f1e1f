pub mod air_quality;
pub mod error;
pub mod health;
pub mod industries;
pub mod simulation;
pub mod zones;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{app::AppState, config::Config};
use self::error::ApiError;

/// JSON bodies above this size are rejected
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new().nest("/api", api_routes(state));

    if cfg.server.enable_cors {
        if let Some(cors) = cors_layer(&cfg.server.cors_origin) {
            router = router.layer(cors);
        }
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/air-quality", get(air_quality::get_air_quality))
        .route("/industries", get(industries::list_industries))
        .route("/industries/correlation", get(industries::get_correlation))
        .route("/zones", get(zones::get_zones))
        .route("/simulation", post(simulation::run_simulation))
        .route("/simulation/catalog", get(simulation::get_catalog))
        .fallback(|| async { ApiError::NotFound("no such endpoint".into()) })
        .with_state(state)
}

fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(v) => AllowOrigin::exact(v),
            Err(e) => {
                warn!(origin, error = %e, "invalid CORS origin, CORS disabled");
                return None;
            }
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

#[cfg(feature = "metrics")]
pub fn with_metrics(app: Router) -> Router {
    use axum_prometheus::PrometheusMetricLayer;
    let (layer, handle) = PrometheusMetricLayer::pair();

    let metrics_router = Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    );

    app.layer(layer).merge(metrics_router)
}
