use std::sync::Arc;

use meeple_api::api::{create_router, AppState};
use meeple_api::config::Config;
use meeple_api::db::{create_redis_client, Cache};
use meeple_api::services::assistant::HttpAssistant;
use meeple_api::services::providers::ElasticCatalog;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let catalog = Arc::new(ElasticCatalog::new(cache, &config));
    let assistant = Arc::new(HttpAssistant::new(config.assistant_url.clone()));
    let state = AppState::new(catalog, assistant);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush queued cache writes before exiting
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
