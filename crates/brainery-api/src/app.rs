//! Application builder: wires router, state, and background tasks into a
//! running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use brainery_auth::session::SessionCleanup;
use brainery_core::config::AppConfig;
use brainery_core::error::AppError;
use brainery_database::StoreSet;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Brainery server until Ctrl+C, then closes the stores.
pub async fn run_server(config: AppConfig, stores: StoreSet) -> Result<(), AppError> {
    tracing::info!(backend = %stores.backend, "Starting Brainery server...");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cleanup_every = Duration::from_secs(config.session.cleanup_interval_minutes.max(1) * 60);

    let state = AppState::new(config, stores.clone());
    let cleanup = SessionCleanup::new(Arc::clone(state.sessions.registry()))
        .spawn(cleanup_every);

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Brainery server listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cleanup.abort();
    stores.health.close().await;
    tracing::info!("Brainery server stopped");

    served.map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C; shutting down");
    }
}
