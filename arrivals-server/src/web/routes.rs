//! HTTP route handlers.

use axum::{Json, Router, extract::State, routing::get};
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::dto::ArrivalsResponse;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/arrivals", get(arrivals))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Latest snapshot of every station's next arrivals.
///
/// Always answers with the best snapshot available, however stale.
async fn arrivals(State(state): State<AppState>) -> Json<ArrivalsResponse> {
    let snapshot = state.snapshots.get_snapshot();
    debug!(
        stations = snapshot.len(),
        run_count = snapshot.run_count,
        "serving arrivals"
    );
    Json(ArrivalsResponse::from(snapshot.as_ref()))
}
