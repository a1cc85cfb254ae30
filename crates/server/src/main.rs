//! live-search proxy entry point.
//!
//! Loads configuration, builds the commerce client and the proxy service, and
//! serves the HTTP API until interrupted. Logs are JSON on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use livesearch_client::{CommerceClient, CommerceConfig};
use livesearch_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod routes;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    if let Err(e) = config.require_credentials() {
        tracing::warn!(error = %e, "upstream credentials missing; /search and /warm will fail until configured");
    }

    let catalog = CommerceClient::new(CommerceConfig::from(&config)).context("building commerce client")?;
    let service = handler::ProxyService::new(Arc::new(catalog), &config);
    let limits = service.limits();

    let state = routes::AppState {
        service: Arc::new(service),
        cors: config.cors_policy(),
        service_name: Arc::from(config.service_name.as_str()),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;

    tracing::info!(
        bind = %config.bind,
        strict_cors = config.cors_policy().is_strict(),
        max_products = limits.max_products,
        max_categories = limits.max_categories,
        "Starting live-search proxy"
    );

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
