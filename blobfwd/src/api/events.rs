use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::error::AppError;
use crate::service::events::handle_events;
use crate::utils::state::AppState;

/// POST /api/events
pub async fn post_events_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    // Decoded by hand so a bad body is a ParseError, not an extractor rejection.
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| AppError::parse(e.to_string()))?;
    let outcome = handle_events(&state, body).await?;
    Ok(Json(outcome))
}
