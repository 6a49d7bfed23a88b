//! Block Bank API binary

use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blockbank_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Block Bank API v{}", blockbank_common::VERSION);

    let config = ApiConfig::load()?;
    info!("Loaded configuration: {:?}", config);
    info!(
        "Chain simulator: latency={}..{}ms, failure_rate={}, deadline={}ms",
        config.chain.min_latency_ms,
        config.chain.max_latency_ms,
        config.chain.failure_rate,
        config.chain.deadline_ms
    );

    let app = create_router(AppState::from_config(&config)?);

    let addr: SocketAddr = config.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down Block Bank API");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
