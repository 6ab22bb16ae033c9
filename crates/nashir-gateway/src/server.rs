// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;
use std::time::Instant;

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use nashir_cache::MemoryCache;
use nashir_config::model::AggregationConfig;
use nashir_core::{MediaStore, NashirError};
use nashir_pipeline::PublishingPipeline;
use nashir_storage::Database;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::sse;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: Arc<MemoryCache>,
    pub media: Arc<dyn MediaStore>,
    pub pipeline: Arc<PublishingPipeline>,
    pub aggregation: AggregationConfig,
    pub auth: AuthConfig,
    /// Process start time for the health payload's uptime.
    pub started_at: Instant,
}

/// Gateway server configuration (mirrors `GatewayConfig` from nashir-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the gateway router.
///
/// - `POST /v1/webhooks/whatsapp`, `POST /v1/webhooks/email` (bearer auth)
/// - `GET /health` (public)
/// - `GET /v1/events` (public SSE stream of cache invalidation events)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/events", get(sse::get_events))
        .with_state(state.clone());

    let webhook_routes = Router::new()
        .route("/v1/webhooks/whatsapp", post(handlers::post_whatsapp_webhook))
        .route("/v1/webhooks/email", post(handlers::post_email_webhook))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Starts the gateway server and serves until the listener fails.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), NashirError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NashirError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| NashirError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
