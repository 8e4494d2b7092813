use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::access::resolve_user;
use crate::database::models::Document;
use crate::http_server::api::token_from_headers;
use crate::AppState;

use super::DocumentResponse;

/// Fetch one of the caller's documents by id.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ShowError> {
    let user = resolve_user(
        token_from_headers(&headers),
        state.sessions(),
        state.database(),
    )
    .await?
    .ok_or(ShowError::Unauthorized)?;

    // A malformed id cannot name a document.
    let id = Uuid::parse_str(&id).map_err(|_| ShowError::NotFound)?;

    let document = Document::find_for_owner(id, *user.id, state.database())
        .await?
        .ok_or(ShowError::NotFound)?;

    Ok(Json(DocumentResponse::from(&document)))
}

#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ShowError {
    fn into_response(self) -> Response {
        let status = match self {
            ShowError::Unauthorized => StatusCode::UNAUTHORIZED,
            ShowError::NotFound => StatusCode::NOT_FOUND,
            ShowError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
