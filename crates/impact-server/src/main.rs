//! Impact Tracker Server binary.

use std::net::SocketAddr;

use anyhow::Context;
use impact_server::{AppState, ServerConfig, metrics::init_metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env es opcional
    dotenv::dotenv().ok();

    // Tracing con filtro desde RUST_LOG
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().context("failed to load configuration")?;
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address()))?;

    tracing::info!(
        "Starting Impact Tracker Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Frontend URL: {}", config.frontend_url);
    tracing::info!("Population policy: {:?}", config.populator.policy);

    let prometheus_handle = init_metrics().context("failed to initialize metrics")?;
    let state = AppState::from_config(&config).context("failed to build application state")?;

    // Poblar antes de aceptar conexiones
    match state.populator().populate(state.cache()).await {
        Ok(outcome) => tracing::info!(
            platforms = outcome.platforms,
            posts = outcome.posts,
            "Startup population finished"
        ),
        Err(e) => tracing::warn!(error = %e, "Startup population failed"),
    }

    if config.populator.seed_posts {
        if let Err(e) = state.populator().seed_posts(state.posts()).await {
            tracing::warn!(error = %e, "Seeding posts collection failed");
        }
    }

    run_server_with_state(addr, state, prometheus_handle).await?;

    Ok(())
}
