//! REST API for grid stability simulation.
//!
//! Endpoints:
//! - `GET /`: static API description
//! - `GET /health`: liveness and engine availability
//! - `GET /api/status`: nested server/engine status
//! - `POST /api/simulate`: run one simulation

pub mod error;
mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::SimulationSelector;
use crate::telemetry::shutdown_signal;

/// Application state shared across all request handlers.
///
/// Read-only once the server starts; the engine availability flag inside
/// the selector is the only value that changes, and only at startup or
/// shutdown.
pub struct AppState {
    /// Engine/analytic dispatcher.
    pub selector: SimulationSelector,
    /// Ceiling for load and generation inputs (MW).
    pub max_mw: f64,
}

impl AppState {
    pub fn new(selector: SimulationSelector, max_mw: f64) -> Self {
        Self { selector, max_mw }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/api/status", get(handlers::get_status))
        .route("/api/simulate", post(handlers::post_simulate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to the given address and serves the API until a shutdown signal.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
