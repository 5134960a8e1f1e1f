use airmap_engine::{api, app::AppState, config::Config, telemetry};
use anyhow::{Context, Result};
use axum::Router;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();

    let cfg = Config::load()?;
    telemetry::init_tracing(&cfg.logging);

    let state = AppState::new(cfg.clone())?;

    #[allow(unused_mut)]
    let mut app: Router = api::router(state, &cfg);

    #[cfg(feature = "metrics")]
    {
        app = api::with_metrics(app);
    }

    let addr = cfg.server.socket_addr()?;
    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0, the service is reachable from the network");
    }
    info!(%addr, "starting airmap engine");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
