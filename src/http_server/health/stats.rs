use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::AppState;

pub async fn handler(State(state): State<AppState>) -> Result<Response, StatsError> {
    let users = state.database().count_users().await?;
    let files = state.database().count_documents().await?;

    Ok(Json(serde_json::json!({ "users": users, "files": files })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
