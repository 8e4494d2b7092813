use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::AppState;

/// Liveness of the shared stores. The session cache is in-process, so it is
/// live whenever we are; the database gets a real probe.
pub async fn handler(State(state): State<AppState>) -> Response {
    let db = state.database().is_ready().await;
    let body = serde_json::json!({ "cache": true, "db": db });

    let status = if db {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}
