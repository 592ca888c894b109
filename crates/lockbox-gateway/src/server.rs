// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use lockbox_auth::PasswordService;
use lockbox_config::model::ServerConfig;
use lockbox_core::{IdentityGate, LockboxError, PluginAdapter, UserStore, VaultStore};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Adapter whose health check decides between "ok" and "degraded".
    pub storage: Arc<dyn PluginAdapter>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Per-user vault blobs.
    pub vaults: Arc<dyn VaultStore>,
    /// Registered accounts.
    pub users: Arc<dyn UserStore>,
    /// Bearer token verification and issuance.
    pub identity: Arc<dyn IdentityGate>,
    /// Password hashing for signup and login.
    pub passwords: PasswordService,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, LockboxError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                LockboxError::Config(format!("invalid CORS origin '{origin}': {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Credentialed CORS cannot use wildcards, so methods and headers are
    // mirrored from the preflight request.
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([header::ETAG]))
}

/// Build the full application router.
///
/// Routes:
/// - GET /health (public)
/// - POST /api/auth/signup, POST /api/auth/login (public)
/// - GET /api/vault, PUT /api/vault (bearer auth)
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Result<Router, LockboxError> {
    let identity = state.identity.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .with_state(state.clone());

    let vault_routes = Router::new()
        .route(
            "/api/vault",
            get(handlers::get_vault).put(handlers::put_vault),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            identity,
            auth_middleware,
        ))
        .with_state(state);

    Ok(Router::new()
        .merge(public_routes)
        .merge(vault_routes)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors_allowed_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Start the HTTP server and run until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), LockboxError> {
    let app = build_router(config, state)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LockboxError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("Lockbox listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| LockboxError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
