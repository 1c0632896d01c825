pub mod events;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::utils::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { (StatusCode::OK, "ok").into_response() }))
        .nest("/api", events_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn events_router() -> Router<Arc<AppState>> {
    Router::new().route("/events", post(events::post_events_handler))
}
