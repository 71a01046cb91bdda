//! Bloglist API Server
//!
//! REST API server for the Bloglist service.
//!
//! Author: hephaex@gmail.com

use anyhow::Context;
use bloglist_api::{create_router, state::AppState};
use bloglist_core::config::{AppConfig, LoggingConfig};
use bloglist_core::{MemoryStore, PgStore, Store};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json_format {
        let layer = tracing_subscriber::fmt::layer().json();
        registry.with(layer).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    Ok(())
}

fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("BLOGLIST_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match &config.database.url {
        Some(url) => {
            let store = PgStore::connect(url, config.database.max_connections).await?;
            store.migrate().await?;
            tracing::info!("Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging)?;

    if config.auth.jwt_secret == AppConfig::default().auth.jwt_secret {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    let store = open_store(&config).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        ownership_policy = %config.auth.ownership_policy,
        token_ttl_secs = config.auth.token_ttl_secs,
        "Configuration loaded"
    );

    // Create application state
    let state = Arc::new(AppState::new(config, store));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Bloglist API Server starting on http://{}", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
