//! # Tenancy Server
//!
//! Serves the tenancy HTTP API over an in-memory store. Bearer tokens come
//! from `TENANCY_DEV_TOKENS`; see [`tenancy_core::config`] for every setting.

use anyhow::Context;
use std::sync::Arc;
use tenancy_core::api::{self, AppState, StaticIdentityProvider};
use tenancy_core::config::Config;
use tenancy_core::lifecycle::{setup_tracing, TenancySystem};
use tenancy_core::store::{MemoryStore, USERS};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(host = %config.api.host, port = config.api.port, "Starting tenancy server");

    let store = Arc::new(MemoryStore::new().with_unique_index(USERS, "email"));
    let system = TenancySystem::start(store, &config);

    let identity = StaticIdentityProvider::new(&config.dev_tokens);
    if identity.is_empty() {
        warn!("No TENANCY_DEV_TOKENS configured, every request is anonymous");
    }
    let router = api::router(AppState::new(system.clone(), Arc::new(identity)));

    let addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    system.shutdown().await.context("Actor shutdown failed")?;
    info!("Tenancy server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
