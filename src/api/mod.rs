//! HTTP API for the calculator.
//!
//! Provides three endpoints:
//! - `POST /predict` - form-encoded plant parameters to a carbon estimate
//! - `GET /models` - binding table with artifact availability
//! - `GET /health` - liveness probe

mod handlers;
mod types;

pub use types::{ErrorResponse, HealthResponse, ModelInfo, PredictionResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;

/// Immutable application state shared across all request handlers.
///
/// Constructed once at startup and wrapped in `Arc`; no locks needed since
/// the dispatcher and its bindings are read-only.
pub struct AppState {
    /// Prediction dispatcher over the configured model bindings.
    pub dispatcher: Dispatcher,
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
        .route("/predict", post(handlers::post_predict))
        .route("/models", get(handlers::get_models))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
