//! Escalator API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use escalator_common::config::AppConfig;
use escalator_market::{MarketSnapshotProvider, YahooChartSource};

use escalator_api::routes::create_router;
use escalator_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "escalator_api=debug,escalator_market=debug,escalator_engine=info,tower_http=debug",
            )
        }))
        .init();

    tracing::info!("Starting Escalator API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Market data source + snapshot cache
    let source = YahooChartSource::new(
        config.market_data_url.clone(),
        Duration::from_secs(config.market_request_timeout_secs),
    )?;
    let provider = MarketSnapshotProvider::new(
        Arc::new(source),
        Duration::from_secs(config.market_cache_ttl_secs),
    );
    tracing::info!(
        url = %config.market_data_url,
        cache_ttl_secs = config.market_cache_ttl_secs,
        "Market data provider ready"
    );

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|_| anyhow::anyhow!("BIND_ADDR must be a socket address, got {}", config.bind_addr))?;

    // Build application state
    let state = AppState::new(Arc::new(provider), config);

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
