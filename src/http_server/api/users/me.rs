use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::access::resolve_user;
use crate::http_server::api::token_from_headers;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
}

pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, MeError> {
    let user = resolve_user(
        token_from_headers(&headers),
        state.sessions(),
        state.database(),
    )
    .await?
    .ok_or(MeError::Unauthorized)?;

    Ok(Json(MeResponse {
        id: user.id.to_string(),
        email: user.email,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum MeError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for MeError {
    fn into_response(self) -> Response {
        let status = match self {
            MeError::Unauthorized => StatusCode::UNAUTHORIZED,
            MeError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
