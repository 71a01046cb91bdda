//! Bloglist API - REST server
//!
//! Provides HTTP endpoints for users, login and blogs, guarded by bearer
//! token authentication.

pub mod audit;
pub mod auth;
pub mod blogs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::{http::HeaderValue, routing::get, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete application router over `state`
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::prometheus_metrics))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .nest("/api", routes::api_routes(&state))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins; no cross-origin access when empty
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Router over a fresh in-memory store with cheap password hashing
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    create_router(test_state(bloglist_core::AppConfig::default()))
}

/// In-memory application state for tests
#[cfg(feature = "test-utils")]
pub fn test_state(config: bloglist_core::AppConfig) -> Arc<AppState> {
    let store = Arc::new(bloglist_core::MemoryStore::new());
    Arc::new(AppState::with_password_config(
        config,
        store,
        Some(auth::PasswordConfig::minimal()),
    ))
}
