use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::access::resolve_user;
use crate::http_server::api::token_from_headers;
use crate::AppState;

/// Revoke the caller's session token.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, DisconnectError> {
    let token = token_from_headers(&headers).ok_or(DisconnectError::Unauthorized)?;

    resolve_user(Some(token), state.sessions(), state.database())
        .await?
        .ok_or(DisconnectError::Unauthorized)?;

    state.sessions().remove(token);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, thiserror::Error)]
pub enum DisconnectError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DisconnectError {
    fn into_response(self) -> Response {
        let status = match self {
            DisconnectError::Unauthorized => StatusCode::UNAUTHORIZED,
            DisconnectError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
